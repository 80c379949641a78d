//! Frame sampling, region thresholding and kinematics for manual video motion analysis.

pub mod calibration;
pub mod cursor;
pub mod debug;
pub mod error;
pub mod kinematics;
pub mod rect;
pub mod sampler;
pub mod series;
pub mod threshold;
pub mod video;

pub use error::{Error, Result};
