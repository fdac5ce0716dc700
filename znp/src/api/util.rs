use std::future::Future;
use crate::{
	codec::{ self, U16, U64 },
	error::Result,
	types::{ IeeeAddress, ShortAddress, UtilCommand }
};
use super::{ then, ZnpApi };

impl ZnpApi {
	/// IEEE address the address manager holds for `address`.
	pub fn util_addrmgr_nwk_addr_lookup(&self, address: ShortAddress) -> impl Future<Output = Result<IeeeAddress>> {
		then(self.request(UtilCommand::AddrmgrNwkAddrLookup, &U16(address)), |r| Ok(codec::decode::<U64>(&r)?.0))
	}

	pub fn util_addrmgr_ext_addr_lookup(&self, address: IeeeAddress) -> impl Future<Output = Result<ShortAddress>> {
		then(self.request(UtilCommand::AddrmgrExtAddrLookup, &U64(address)), |r| Ok(codec::decode::<U16>(&r)?.0))
	}
}
