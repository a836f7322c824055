use serde::{Deserialize, Serialize};

/// One zoom level of a tiling scheme: map units per pixel and the nominal map scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelOfDetail {
    pub level: u32,
    pub resolution: f64,
    pub scale: f64,
}

impl LevelOfDetail {
    pub const fn new(level: u32, resolution: f64, scale: f64) -> Self {
        Self { level, resolution, scale }
    }
}

/// The 23 levels of the ArcGIS / Google Web Mercator tiling scheme at 96 dpi.
pub(crate) const WEB_MERCATOR_LODS: [LevelOfDetail; 23] = [
    LevelOfDetail::new(0, 156543.033928, 591657527.591555),
    LevelOfDetail::new(1, 78271.516964, 295828763.795777),
    LevelOfDetail::new(2, 39135.758482, 147914381.897889),
    LevelOfDetail::new(3, 19567.879241, 73957190.948944),
    LevelOfDetail::new(4, 9783.9396205, 36978595.474472),
    LevelOfDetail::new(5, 4891.96981025, 18489297.737236),
    LevelOfDetail::new(6, 2445.984905125, 9244648.868618),
    LevelOfDetail::new(7, 1222.9924525625, 4622324.434309),
    LevelOfDetail::new(8, 611.49622628125, 2311162.217155),
    LevelOfDetail::new(9, 305.748113140625, 1155581.108577),
    LevelOfDetail::new(10, 152.8740565703125, 577790.554289),
    LevelOfDetail::new(11, 76.43702828515625, 288895.277144),
    LevelOfDetail::new(12, 38.218514142578125, 144447.638572),
    LevelOfDetail::new(13, 19.109257071289063, 72223.819286),
    LevelOfDetail::new(14, 9.554628535644531, 36111.909643),
    LevelOfDetail::new(15, 4.777314267822266, 18055.954822),
    LevelOfDetail::new(16, 2.388657133911133, 9027.977411),
    LevelOfDetail::new(17, 1.1943285669555664, 4513.988705),
    LevelOfDetail::new(18, 0.5971642834777832, 2256.994353),
    LevelOfDetail::new(19, 0.2985821417388916, 1128.497176),
    LevelOfDetail::new(20, 0.1492910708694458, 564.248588),
    LevelOfDetail::new(21, 0.0746455354347229, 282.124294),
    LevelOfDetail::new(22, 0.03732276771736145, 141.062147),
];
