use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
	#[error("{0}")]
	Other(String),
	#[cfg(feature = "serialport")]
	#[error(transparent)]
	SerialPort(#[from] serialport::Error),
	#[error("Would block")]
	WouldBlock,
	#[error("Buffer not empty")]
	BufferNotEmpty,
	#[error("Unexpected Eof")]
	UnexpectedEof,
	#[error("Invalid frame: {0}")]
	InvalidFrame(&'static str),
}

impl Error {
	/// Errors after which the stream can not be trusted anymore.
	pub fn need_reset(&self) -> bool {
		match self {
			#[cfg(feature = "serialport")]
			Self::SerialPort(_) => true,
			Self::UnexpectedEof => true,
			_ => false
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(e: std::io::Error) -> Self {
		match e.kind() {
			std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => Error::WouldBlock,
			std::io::ErrorKind::UnexpectedEof => Error::UnexpectedEof,
			_ => Error::Other(e.to_string())
		}
	}
}

//non-blocking byte streams (ie. serial port)

pub trait FrameRead {
	//read can return 0 or WouldBlock in case there is no data to read
	fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error>;
}

pub trait FrameWrite {
	//write can return 0 or WouldBlock in case there is no place for outgoing data
	fn write(&mut self, buf: &[u8]) -> Result<usize, Error>;
	fn flush(&mut self) -> Result<(), Error>;
}

pub trait Frame {
	type Params;

	/// Number of bytes still needed before `buf` holds a whole frame, 0 when complete.
	///
	/// Implementations may drop leading garbage from `buf` to resynchronize.
	fn get_buffer_len(buf: &mut Vec<u8>, params: &Self::Params) -> Result<usize, Error>;
	fn from_buf(buf: &[u8], params: &Self::Params) -> Result<Self, Error> where Self: Sized;
	fn as_bytes(&self, params: &Self::Params, buf: &mut Vec<u8>) -> Result<(), Error>;
}

/// Partially transferred frame, one per direction.
#[derive(Default, Debug)]
pub struct FrameBuffer {
	buf: Vec<u8>,
	bytes_to_go: usize
}

impl FrameBuffer {
	pub fn is_empty(&self) -> bool {
		self.bytes_to_go == 0
	}

	fn reset(&mut self) {
		self.buf.clear();
		self.bytes_to_go = 0;
	}

	fn pending(&mut self) -> &mut [u8] {
		let start = self.buf.len() - self.bytes_to_go;
		&mut self.buf[start..]
	}

	/// Serializes `frame` for writing. Fails if the previous frame is not fully written.
	pub fn push_frame<F: Frame>(&mut self, frame: &F, params: &F::Params) -> Result<(), Error> {
		if !self.buf.is_empty() {
			return Err(Error::BufferNotEmpty);
		}

		if let Err(e) = frame.as_bytes(params, &mut self.buf) {
			self.reset();
			return Err(e);
		}

		self.bytes_to_go = self.buf.len();

		Ok(())
	}

	/// Reads as much as the stream has and returns a frame once one is complete.
	pub fn read_frame<F: Frame, R: FrameRead>(&mut self, r: &mut R, params: &F::Params) -> Result<Option<F>, Error> {
		loop {
			if self.bytes_to_go == 0 {
				let need = F::get_buffer_len(&mut self.buf, params)?;

				if need == 0 {
					let frame = F::from_buf(&self.buf, params);

					self.reset();

					return frame.map(Some);
				}

				self.buf.resize(self.buf.len() + need, 0);
				self.bytes_to_go = need;
			}

			match r.read(self.pending()) {
				Ok(0) | Err(Error::WouldBlock) => return Ok(None),
				Ok(n) => self.bytes_to_go -= n,
				Err(e) => return Err(e)
			}
		}
	}

	/// Writes the rest of the pushed frame, returns true when it was written completely.
	pub fn write_to<W: FrameWrite>(&mut self, w: &mut W) -> Result<bool, Error> {
		if self.bytes_to_go == 0 {
			return Ok(true);
		}

		let len = self.buf.len();

		match w.write(&self.buf[len - self.bytes_to_go..]) {
			Ok(n) => {
				self.bytes_to_go -= n;

				if self.bytes_to_go == 0 {
					self.reset();
					w.flush()?;

					return Ok(true);
				}
			},
			Err(Error::WouldBlock) => {},
			Err(e) => { return Err(e); }
		}

		Ok(false)
	}
}
