use std::future::Future;
use deku::{ self, prelude::* };
use crate::{
	codec::{ self, ByteString, U16 },
	correlator::{ pending, SubscribedCompletion },
	error::Result,
	types::{ Capability, CommandType, NvItemId, ResetInfo, SysCommand, VersionInfo, ZnpFrame }
};
use super::{ check_only_status, check_status, then, ZnpApi };

#[derive(Debug, DekuWrite)]
struct NvItemInit {
	id: NvItemId,
	item_len: u16,
	init_data: ByteString
}

#[derive(Debug, DekuWrite)]
struct NvRead {
	id: NvItemId,
	offset: u8
}

#[derive(Debug, DekuWrite)]
struct NvWrite {
	id: NvItemId,
	offset: u8,
	value: ByteString
}

#[derive(Debug, DekuWrite)]
struct NvDelete {
	id: NvItemId,
	item_len: u16
}

impl ZnpApi {
	/// Resets the co-processor and resolves with the next reset indication.
	pub fn sys_reset(&self, soft_reset: bool) -> impl Future<Output = Result<ResetInfo>> {
		let (completion, pending) = pending();

		let c = completion.clone();
		let connection = self.events().sys_on_reset.subscribe_extended(move |connection, info| {
			connection.disconnect();
			c.complete(Ok(info.clone()));
		}).persist();

		self.track(Box::new(SubscribedCompletion::new(completion, connection)));

		self.send_frame(ZnpFrame::new(CommandType::Areq, SysCommand::Reset, vec![soft_reset as u8]));

		pending
	}

	pub fn sys_ping(&self) -> impl Future<Output = Result<Capability>> {
		then(self.raw_sreq(SysCommand::Ping, Vec::new()), |r| codec::decode(&r))
	}

	pub fn sys_version(&self) -> impl Future<Output = Result<VersionInfo>> {
		then(self.raw_sreq(SysCommand::Version, Vec::new()), |r| codec::decode(&r))
	}

	pub fn sys_osal_nv_item_init_raw(&self, id: NvItemId, item_len: u16, init_data: Vec<u8>) -> impl Future<Output = Result<()>> {
		let request = NvItemInit { id, item_len, init_data: ByteString::new(init_data) };

		then(self.request(SysCommand::OsalNvItemInit, &request), |r| check_only_status(&r))
	}

	pub fn sys_osal_nv_read_raw(&self, id: NvItemId, offset: u8) -> impl Future<Output = Result<Vec<u8>>> {
		then(self.request(SysCommand::OsalNvRead, &NvRead { id, offset }), |r| {
			let value: ByteString = codec::decode(&check_status(&r)?)?;
			Ok(value.data)
		})
	}

	pub fn sys_osal_nv_write_raw(&self, id: NvItemId, offset: u8, value: Vec<u8>) -> impl Future<Output = Result<()>> {
		let request = NvWrite { id, offset, value: ByteString::new(value) };

		then(self.request(SysCommand::OsalNvWrite, &request), |r| check_only_status(&r))
	}

	pub fn sys_osal_nv_delete(&self, id: NvItemId, item_len: u16) -> impl Future<Output = Result<()>> {
		then(self.request(SysCommand::OsalNvDelete, &NvDelete { id, item_len }), |r| check_only_status(&r))
	}

	/// Length of an NV item, 0 if it does not exist.
	pub fn sys_osal_nv_length(&self, id: NvItemId) -> impl Future<Output = Result<u16>> {
		then(self.request(SysCommand::OsalNvLength, &id), |r| Ok(codec::decode::<U16>(&r)?.0))
	}
}
