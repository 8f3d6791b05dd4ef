mod dedup;
mod pipeline;
mod worker;

pub use dedup::*;
pub use pipeline::*;
pub use worker::*;
