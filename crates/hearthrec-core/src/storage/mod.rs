mod spool;

pub use spool::*;
