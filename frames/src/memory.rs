//! In-memory byte stream, used to drive frame processors without hardware.

use crate::frames::{ Error, FrameRead, FrameWrite };
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct MemoryStream {
	incoming: VecDeque<u8>,
	written: Vec<u8>,
	closed: bool
}

impl MemoryStream {
	/// Queues bytes for the reader side.
	pub fn feed(&mut self, data: &[u8]) {
		self.incoming.extend(data);
	}

	pub fn take_written(&mut self) -> Vec<u8> {
		std::mem::take(&mut self.written)
	}

	/// After close, reads fail with `UnexpectedEof` once the queued bytes are consumed.
	pub fn close(&mut self) {
		self.closed = true;
	}
}

impl FrameRead for MemoryStream {
	fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
		if self.incoming.is_empty() {
			return Err(if self.closed { Error::UnexpectedEof } else { Error::WouldBlock });
		}

		let n = buf.len().min(self.incoming.len());

		for (dst, src) in buf.iter_mut().zip(self.incoming.drain(..n)) {
			*dst = src;
		}

		Ok(n)
	}
}

impl FrameWrite for MemoryStream {
	fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
		self.written.extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> Result<(), Error> {
		Ok(())
	}
}
