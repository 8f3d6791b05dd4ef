mod classifier;
mod clock;
mod mode;
mod record;
mod segmenter;

pub use classifier::*;
pub use clock::*;
pub use mode::*;
pub use record::*;
pub use segmenter::*;
