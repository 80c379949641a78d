pub mod decoder;
pub mod frame;
pub mod source;

pub use decoder::{probe, VideoDecoder, VideoInfo};
pub use frame::Frame;
pub use source::FrameSource;
