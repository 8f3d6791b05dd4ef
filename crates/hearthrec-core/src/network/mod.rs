mod uploader;

pub use uploader::*;
