use std::future::Future;
use deku::{ self, prelude::* };
use crate::{ codec::U8, error::Result, types::AppCnfCommand };
use super::{ check_only_status, then, ZnpApi };

#[derive(Debug, DekuWrite)]
struct SetChannel {
	is_primary: u8,
	channel_mask: u32
}

impl ZnpApi {
	pub fn app_cnf_bdb_set_channel(&self, is_primary: bool, channel_mask: u32) -> impl Future<Output = Result<()>> {
		let request = SetChannel { is_primary: is_primary as u8, channel_mask };

		then(self.request(AppCnfCommand::BdbSetChannel, &request), |r| check_only_status(&r))
	}

	/// Progress is reported on `app_cnf_on_bdb_commissioning_notification`.
	pub fn app_cnf_bdb_start_commissioning(&self, mode: u8) -> impl Future<Output = Result<()>> {
		then(self.request(AppCnfCommand::BdbStartCommissioning, &U8(mode)), |r| check_only_status(&r))
	}
}
