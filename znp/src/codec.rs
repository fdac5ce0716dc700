//little-endian payload codec on top of deku

use deku::{ self, prelude::* };
use crate::error::{ Error, Result };

/// Byte string with a one byte length prefix.
#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct ByteString {
	len: u8,
	#[deku(count = "len")]
	pub data: Vec<u8>
}

impl ByteString {
	pub fn new(data: Vec<u8>) -> Self {
		Self { len: data.len() as u8, data }
	}
}

/// List of 16 bit values with a one byte count prefix.
#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct U16List {
	count: u8,
	#[deku(count = "count")]
	pub items: Vec<u16>
}

impl U16List {
	pub fn new(items: Vec<u16>) -> Self {
		Self { count: items.len() as u8, items }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct U8(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct U16(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct U64(pub u64);

/// Second field of most ZDO confirmations, after the address it concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct AddressStatus {
	pub address: u16,
	pub status: u8
}

pub fn encode<T: DekuContainerWrite>(value: &T) -> Result<Vec<u8>> {
	Ok(value.to_bytes()?)
}

/// Decodes `T` and fails if bytes are left over.
pub fn decode<T: for<'a> DekuContainerRead<'a>>(buf: &[u8]) -> Result<T> {
	let ((rest, _), value) = T::from_bytes((buf, 0))?;

	if !rest.is_empty() {
		return Err(Error::TrailingBytes(rest.len()));
	}

	Ok(value)
}

/// Decodes `T` from the start of `buf`, trailing bytes are ignored.
pub fn decode_partial<T: for<'a> DekuContainerRead<'a>>(buf: &[u8]) -> Result<T> {
	let (_, value) = T::from_bytes((buf, 0))?;

	Ok(value)
}
