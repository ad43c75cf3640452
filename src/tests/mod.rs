//! transfer function toolkit test modules
pub mod toolkit;

mod distortion;
