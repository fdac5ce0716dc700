use thiserror::Error;
use crate::types::DeviceState;

#[derive(Debug, Clone, Error)]
pub enum Error {
	#[error("Transport: {0}")]
	Transport(#[from] frames::Error),
	#[error("Decode: {0}")]
	Decode(#[from] deku::DekuError),
	#[error("{0} unexpected trailing bytes")]
	TrailingBytes(usize),
	#[error("RPC Error: {0}")]
	Rpc(u8),
	#[error("ZNP Status was not success ({0:#04x})")]
	Status(u8),
	#[error("Empty response received")]
	EmptyResponse,
	#[error("Empty response after status expected, got {0} bytes")]
	UnexpectedData(usize),
	#[error("{0}")]
	Mismatch(&'static str),
	#[error("{0}")]
	Correlation(&'static str),
	#[error("Timeout")]
	Timeout,
	#[error("Non-allowed state reached: {0:?}")]
	InvalidState(DeviceState),
	#[error("Group name is too long ({0} bytes)")]
	GroupNameTooLong(usize),
	#[error("Payload is too long ({0} bytes)")]
	PayloadTooLong(usize),
	#[error("No response commands given")]
	NoResponseCommands,
	#[error("Shutdown: {0}")]
	Shutdown(String),
}

pub type Result<T> = core::result::Result<T, Error>;
