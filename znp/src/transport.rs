//MT serial framing and the pump between a byte stream and the multiplexer

use frames::{ Frame, FrameBuffer, FrameRead, FrameWrite };
use tracing::warn;
use crate::{
	api::{ ZnpApi, MAX_PAYLOAD_LEN },
	error::{ Error, Result },
	types::{ CommandType, Subsystem, ZnpCommand, ZnpFrame }
};

pub const SOF: u8 = 0xFE;

//SOF, LEN, CMD0, CMD1 and FCS
const OVERHEAD: usize = 5;

/// `ZnpFrame` as it travels on the wire: `SOF | LEN | CMD0 | CMD1 | DATA | FCS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MtFrame(pub ZnpFrame);

impl MtFrame {
	/// XOR of every byte in `buf`.
	pub fn fcs(buf: &[u8]) -> u8 {
		buf.iter().fold(0, |acc, b| acc ^ b)
	}
}

impl Frame for MtFrame {
	type Params = ();

	fn get_buffer_len(buf: &mut Vec<u8>, _params: &()) -> core::result::Result<usize, frames::Error> {
		//skip garbage until SOF
		match buf.iter().position(|&b| b == SOF) {
			Some(0) => {},
			Some(i) => { buf.drain(..i); },
			None => { buf.clear(); }
		}

		if buf.len() < 2 {
			return Ok(2 - buf.len());
		}

		let len = buf[1] as usize;

		if len > MAX_PAYLOAD_LEN {
			//not a frame start after all, the length byte may be the next SOF
			buf.remove(0);
			return Self::get_buffer_len(buf, &());
		}

		Ok((len + OVERHEAD).saturating_sub(buf.len()))
	}

	fn from_buf(buf: &[u8], _params: &()) -> core::result::Result<Self, frames::Error> {
		if buf.len() < OVERHEAD || buf[0] != SOF {
			return Err(frames::Error::InvalidFrame("Frame too small"));
		}

		let len = buf[1] as usize;

		if buf.len() != len + OVERHEAD {
			return Err(frames::Error::InvalidFrame("Bad frame length"));
		}

		let (body, fcs) = buf[1..].split_at(buf.len() - 2);

		if Self::fcs(body) != fcs[0] {
			return Err(frames::Error::InvalidFrame("Bad FCS"));
		}

		let command_type = CommandType::from_bits(buf[2] >> 4).ok_or(frames::Error::InvalidFrame("Unknown command type"))?;
		let command = ZnpCommand::new(Subsystem::from_bits(buf[2]), buf[3]);

		Ok(Self(ZnpFrame { command_type, command, payload: buf[4..4 + len].to_vec() }))
	}

	fn as_bytes(&self, _params: &(), buf: &mut Vec<u8>) -> core::result::Result<(), frames::Error> {
		let frame = &self.0;

		if frame.payload.len() > MAX_PAYLOAD_LEN {
			return Err(frames::Error::InvalidFrame("Payload too long"));
		}

		buf.push(SOF);
		buf.push(frame.payload.len() as u8);
		buf.push(((frame.command_type as u8) << 4) | frame.command.subsystem.bits());
		buf.push(frame.command.id);
		buf.extend_from_slice(&frame.payload);
		buf.push(Self::fcs(&buf[1..]));

		Ok(())
	}
}

/// Moves frames between a non-blocking byte stream and a `ZnpApi`.
pub struct ZnpPort<S: FrameRead + FrameWrite> {
	stream: S,
	api: ZnpApi,
	frame_in: FrameBuffer,
	frame_out: FrameBuffer
}

impl<S: FrameRead + FrameWrite> ZnpPort<S> {
	pub fn new(stream: S, api: ZnpApi) -> Self {
		Self {
			stream,
			api,
			frame_in: FrameBuffer::default(),
			frame_out: FrameBuffer::default()
		}
	}

	pub fn api(&self) -> &ZnpApi {
		&self.api
	}

	pub fn stream_mut(&mut self) -> &mut S {
		&mut self.stream
	}

	fn fail(&self, e: frames::Error) -> Error {
		let error = Error::Transport(e);
		self.api.shutdown(error.clone());
		error
	}

	/// Reads and dispatches at most one frame, fires due timers and writes what is queued.
	///
	/// Returns true if anything was transferred.
	pub fn run_once(&mut self) -> Result<bool> {
		let mut busy = false;

		match self.frame_in.read_frame::<MtFrame, _>(&mut self.stream, &()) {
			Ok(Some(frame)) => {
				self.api.on_frame(frame.0);
				busy = true;
			},
			Ok(None) => {},
			Err(e) if e.need_reset() => return Err(self.fail(e)),
			Err(e) => warn!("Dropping frame: {}", e)
		}

		self.api.expire_timers();

		loop {
			if self.frame_out.is_empty() {
				let Some(frame) = self.api.next_outbound() else { break; };

				if let Err(e) = self.frame_out.push_frame(&MtFrame(frame), &()) {
					warn!("Unable to send frame: {}", e);
					continue;
				}
			}

			match self.frame_out.write_to(&mut self.stream) {
				Ok(true) => { busy = true; },
				Ok(false) => break,
				Err(e) if e.need_reset() => return Err(self.fail(e)),
				Err(e) => {
					warn!("Write error: {}", e);
					break;
				}
			}
		}

		Ok(busy)
	}

	/// Pumps until the stream fails.
	#[cfg(feature = "async-std")]
	pub async fn run(&mut self) -> Result<()> {
		let idle = self.api.config().poll_interval();

		loop {
			if !self.run_once()? {
				async_std::task::sleep(idle).await;
			}
		}
	}
}
