mod reporter;

pub use reporter::{PointerReporter, Sample, DEFAULT_THROTTLE};
