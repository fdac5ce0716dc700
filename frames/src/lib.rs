pub mod frames;
pub use frames::{ Frame, Error, FrameRead, FrameWrite, FrameBuffer };

pub mod memory;

#[cfg(feature="serialport")]
pub mod frames_serialport;
