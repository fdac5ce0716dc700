use std::future::Future;
use deku::{ self, prelude::* };
use crate::{
	codec::{ self, AddressStatus, ByteString, U16, U16List, U64, U8 },
	correlator::Pending,
	error::{ Error, Result },
	types::{ AddrMode, BindTable, BindTarget, IeeeAddress, IeeeAddressResponse, LinkKey, ShortAddress, StartupFromAppResponse, ZdoCommand, ZnpCommand }
};
use super::{ check_only_status, check_status, then, Confirmation, ZnpApi };

/// Longest group name the co-processor stores.
pub const MAX_GROUP_NAME_LEN: usize = 16;

#[derive(Debug, DekuWrite)]
struct IeeeAddrReq {
	short_addr: u16,
	extended: u8,
	start_index: u8
}

#[derive(Debug, DekuWrite)]
struct MgmtLeaveReq {
	dst_addr: u16,
	device_addr: u64,
	remove_rejoin: u8
}

#[derive(Debug, DekuWrite)]
struct MgmtDirectJoinReq {
	dst_addr: u16,
	device_addr: u64
}

#[derive(Debug, DekuWrite)]
struct MgmtPermitJoinReq {
	addr_mode: AddrMode,
	dst_addr: u16,
	duration: u8,
	tc_significance: u8
}

#[derive(Debug, DekuWrite)]
struct DescReq {
	dst_addr: u16,
	nwk_addr_of_interest: u16
}

#[derive(Debug, DekuWrite)]
struct SimpleDescReq {
	dst_addr: u16,
	nwk_addr_of_interest: u16,
	endpoint: u8
}

#[derive(Debug, DekuWrite)]
struct BindReq {
	dst_addr: u16,
	src_addr: u64,
	src_endpoint: u8,
	cluster_id: u16,
	target: BindTarget
}

#[derive(Debug, DekuWrite)]
struct MgmtBindReq {
	dst_addr: u16,
	start_index: u8
}

#[derive(Debug, DekuWrite)]
struct GroupReq {
	endpoint: u8,
	group_id: u16
}

#[derive(Debug, DekuWrite)]
struct AddGroupReq {
	endpoint: u8,
	group_id: u16,
	name: ByteString
}

#[derive(Debug, DekuRead)]
struct FoundGroup {
	group_id: u16,
	name: ByteString
}

//decodes (address, status) and requires success
fn address_with_status(response: Vec<u8>) -> Result<u16> {
	let reply: AddressStatus = codec::decode(&response)?;

	if reply.status != crate::types::STATUS_SUCCESS {
		return Err(Error::Status(reply.status));
	}

	Ok(reply.address)
}

impl ZnpApi {
	fn zdo_confirmation(&self, command: ZdoCommand, dst_addr: ShortAddress) -> Confirmation {
		Confirmation {
			command: command.into(),
			timeout: self.config().zdo_timeout(),
			prefix: dst_addr.to_le_bytes().to_vec()
		}
	}

	fn zdo_unprefixed(command: ZdoCommand) -> Confirmation {
		Confirmation { command: command.into(), timeout: None, prefix: Vec::new() }
	}

	/// `children_index` requests the associated devices, starting at the index.
	pub fn zdo_ieee_address(&self, address: ShortAddress, children_index: Option<u8>) -> impl Future<Output = Result<IeeeAddressResponse>> {
		let request = IeeeAddrReq {
			short_addr: address,
			extended: children_index.is_some() as u8,
			start_index: children_index.unwrap_or(0)
		};

		let pending = self.request_confirmed(ZdoCommand::IeeeAddrReq, &request, Self::zdo_unprefixed(ZdoCommand::IeeeAddrRsp));

		then(pending, |r| codec::decode(&check_status(&r)?))
	}

	pub fn zdo_remove_link_key(&self, ieee_addr: IeeeAddress) -> impl Future<Output = Result<()>> {
		then(self.request(ZdoCommand::RemoveLinkKey, &U64(ieee_addr)), |r| check_only_status(&r))
	}

	pub fn zdo_get_link_key(&self, ieee_addr: IeeeAddress) -> impl Future<Output = Result<LinkKey>> {
		then(self.request(ZdoCommand::GetLinkKey, &U64(ieee_addr)), |r| codec::decode(&check_status(&r)?))
	}

	/// Asks `dst_addr` to remove `device_addr`, resolves with the address echoed by the response.
	pub fn zdo_mgmt_leave(&self, dst_addr: ShortAddress, device_addr: IeeeAddress, remove_rejoin: u8) -> impl Future<Output = Result<ShortAddress>> {
		let request = MgmtLeaveReq { dst_addr, device_addr, remove_rejoin };
		let pending = self.request_confirmed(ZdoCommand::MgmtLeaveReq, &request, Self::zdo_unprefixed(ZdoCommand::MgmtLeaveRsp));

		then(pending, address_with_status)
	}

	pub fn zdo_mgmt_direct_join(&self, dst_addr: ShortAddress, device_addr: IeeeAddress) -> impl Future<Output = Result<u16>> {
		let request = MgmtDirectJoinReq { dst_addr, device_addr };
		let pending = self.request_confirmed(ZdoCommand::MgmtDirectJoinReq, &request, Self::zdo_unprefixed(ZdoCommand::MgmtDirectJoinRsp));

		then(pending, address_with_status)
	}

	pub fn zdo_mgmt_permit_join(&self, addr_mode: AddrMode, dst_addr: u16, duration: u8, tc_significance: u8) -> impl Future<Output = Result<u16>> {
		let request = MgmtPermitJoinReq { addr_mode, dst_addr, duration, tc_significance };
		let pending = self.request_confirmed(ZdoCommand::MgmtPermitJoinReq, &request, Self::zdo_unprefixed(ZdoCommand::MgmtPermitJoinRsp));

		then(pending, address_with_status)
	}

	pub fn zdo_startup_from_app(&self, start_delay_ms: u16) -> impl Future<Output = Result<StartupFromAppResponse>> {
		then(self.request(ZdoCommand::StartupFromApp, &U16(start_delay_ms)), |r| codec::decode(&r))
	}

	/// The descriptor arrives on `zdo_on_node_desc`.
	pub fn zdo_node_desc_req(&self, address: ShortAddress) -> impl Future<Output = Result<()>> {
		let request = DescReq { dst_addr: address, nwk_addr_of_interest: address };

		then(self.request(ZdoCommand::NodeDescReq, &request), |r| check_only_status(&r))
	}

	/// The endpoints arrive on `zdo_on_active_ep`.
	pub fn zdo_active_ep_req(&self, address: ShortAddress) -> impl Future<Output = Result<()>> {
		let request = DescReq { dst_addr: address, nwk_addr_of_interest: address };

		then(self.request(ZdoCommand::ActiveEpReq, &request), |r| check_only_status(&r))
	}

	/// The descriptor arrives on `zdo_on_simple_desc`.
	pub fn zdo_simple_desc_req(&self, address: ShortAddress, endpoint: u8) -> impl Future<Output = Result<()>> {
		let request = SimpleDescReq { dst_addr: address, nwk_addr_of_interest: address, endpoint };

		then(self.request(ZdoCommand::SimpleDescReq, &request), |r| check_only_status(&r))
	}

	pub fn zdo_bind(&self, dst_addr: ShortAddress, src_addr: IeeeAddress, src_endpoint: u8, cluster_id: u16, target: BindTarget) -> impl Future<Output = Result<()>> {
		let request = BindReq { dst_addr, src_addr, src_endpoint, cluster_id, target };
		let pending = self.request_confirmed(ZdoCommand::BindReq, &request, self.zdo_confirmation(ZdoCommand::BindRsp, dst_addr));

		then(pending, |r| check_only_status(&r))
	}

	pub fn zdo_unbind(&self, dst_addr: ShortAddress, src_addr: IeeeAddress, src_endpoint: u8, cluster_id: u16, target: BindTarget) -> impl Future<Output = Result<()>> {
		let request = BindReq { dst_addr, src_addr, src_endpoint, cluster_id, target };
		let pending = self.request_confirmed(ZdoCommand::UnbindReq, &request, self.zdo_confirmation(ZdoCommand::UnbindRsp, dst_addr));

		then(pending, |r| check_only_status(&r))
	}

	/// Reads the binding table of `dst_addr` from `start_index` on.
	pub fn zdo_mgmt_bind_req(&self, dst_addr: ShortAddress, start_index: u8) -> impl Future<Output = Result<BindTable>> {
		let request = MgmtBindReq { dst_addr, start_index };
		let pending = self.request_confirmed(ZdoCommand::MgmtBindReq, &request, self.zdo_confirmation(ZdoCommand::MgmtBindRsp, dst_addr));

		then(pending, |r| codec::decode(&check_status(&r)?))
	}

	pub fn zdo_ext_remove_group(&self, endpoint: u8, group_id: u16) -> impl Future<Output = Result<()>> {
		then(self.request(ZdoCommand::ExtRemoveGroup, &GroupReq { endpoint, group_id }), |r| check_only_status(&r))
	}

	/// Firmwares answer this one as either `EXT_REMOVE_ALL_GROUP` or `EXT_REMOVE_GROUP`.
	pub fn zdo_ext_remove_all_group(&self, endpoint: u8) -> impl Future<Output = Result<()>> {
		let responses: [ZnpCommand; 2] = [ZdoCommand::ExtRemoveAllGroup.into(), ZdoCommand::ExtRemoveGroup.into()];

		then(self.raw_sreq_with(ZdoCommand::ExtRemoveAllGroup, &responses, vec![endpoint]), |r| check_only_status(&r))
	}

	pub fn zdo_ext_find_all_groups_endpoint(&self, endpoint: u8) -> impl Future<Output = Result<Vec<u16>>> {
		then(self.raw_sreq(ZdoCommand::ExtFindAllGroupsEndpoint, vec![endpoint, 0]), |r| {
			let groups: U16List = codec::decode(&r)?;
			Ok(groups.items)
		})
	}

	/// Resolves with the name of the group.
	pub fn zdo_ext_find_group(&self, endpoint: u8, group_id: u16) -> impl Future<Output = Result<String>> {
		then(self.request(ZdoCommand::ExtFindGroup, &GroupReq { endpoint, group_id }), move |r| {
			let found: FoundGroup = codec::decode_partial(&check_status(&r)?)?;

			if found.group_id != group_id {
				return Err(Error::Mismatch("Received GroupID did not match requested GroupID"));
			}

			Ok(String::from_utf8_lossy(&found.name.data).into_owned())
		})
	}

	pub fn zdo_ext_add_group(&self, endpoint: u8, group_id: u16, name: &str) -> impl Future<Output = Result<()>> {
		let pending = if name.len() > MAX_GROUP_NAME_LEN {
			Pending::failed(Error::GroupNameTooLong(name.len()))
		}
		else {
			let request = AddGroupReq { endpoint, group_id, name: ByteString::new(name.as_bytes().to_vec()) };
			self.request(ZdoCommand::ExtAddGroup, &request)
		};

		then(pending, |r| check_only_status(&r))
	}

	pub fn zdo_ext_count_all_groups(&self) -> impl Future<Output = Result<u8>> {
		then(self.raw_sreq(ZdoCommand::ExtCountAllGroups, Vec::new()), |r| Ok(codec::decode::<U8>(&r)?.0))
	}
}
