//configuration and device info through the simple API

use std::future::Future;
use deku::{ self, prelude::* };
use tracing::debug;
use crate::{
	codec::{ self, ByteString, U8 },
	correlator::{ pending, Continuation, Pending, SubscribedCompletion },
	error::{ Error, Result },
	types::{ DeviceState, IeeeAddress, LogicalType, SapiCommand, ShortAddress, ZnpCommand }
};
use super::{ check_only_status, check_status, then, ZnpApi };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigurationOption(pub u8);

impl ConfigurationOption {
	pub const STARTUP_OPTION: Self = Self(0x03);
	pub const POLL_RATE: Self = Self(0x24);
	pub const QUEUED_POLL_RATE: Self = Self(0x25);
	pub const RESPONSE_POLL_RATE: Self = Self(0x26);
	pub const POLL_FAILURE_RETRIES: Self = Self(0x29);
	pub const INDIRECT_MSG_TIMEOUT: Self = Self(0x2B);
	pub const ROUTE_EXPIRY_TIME: Self = Self(0x2C);
	pub const EXTENDED_PAN_ID: Self = Self(0x2D);
	pub const BCAST_RETRIES: Self = Self(0x2E);
	pub const PASSIVE_ACK_TIMEOUT: Self = Self(0x2F);
	pub const BCAST_DELIVERY_TIME: Self = Self(0x30);
	pub const APS_FRAME_RETRIES: Self = Self(0x43);
	pub const APS_ACK_WAIT_DURATION: Self = Self(0x44);
	pub const BINDING_TIME: Self = Self(0x46);
	pub const PRECFGKEY: Self = Self(0x62);
	pub const PRECFGKEYS_ENABLE: Self = Self(0x63);
	pub const SECURITY_MODE: Self = Self(0x64);
	pub const USERDESC: Self = Self(0x81);
	pub const PANID: Self = Self(0x83);
	pub const CHANLIST: Self = Self(0x84);
	pub const LOGICAL_TYPE: Self = Self(0x87);
	pub const ZDO_DIRECT_CB: Self = Self(0x8F);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceInfo(pub u8);

impl DeviceInfo {
	pub const DEVICE_STATE: Self = Self(0);
	pub const DEVICE_IEEE_ADDRESS: Self = Self(1);
	pub const DEVICE_SHORT_ADDRESS: Self = Self(2);
	pub const PARENT_SHORT_ADDRESS: Self = Self(3);
	pub const PARENT_IEEE_ADDRESS: Self = Self(4);
	pub const CHANNEL: Self = Self(5);
	pub const PAN_ID: Self = Self(6);
	pub const EXTENDED_PAN_ID: Self = Self(7);
}

/// Value type stored under a configuration option.
pub trait ConfigurationItem: for<'a> DekuContainerRead<'a> + DekuContainerWrite {
	const OPTION: ConfigurationOption;
}

/// Value type returned for a device info id.
pub trait DeviceInfoItem: for<'a> DekuContainerRead<'a> {
	const INFO: DeviceInfo;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct StartupOption(pub u8);

impl StartupOption {
	pub const NONE: Self = Self(0);
	pub const CLEAR_CONFIG: Self = Self(1);
	pub const CLEAR_STATE: Self = Self(2);
	pub const AUTO_START: Self = Self(4);
}

impl core::ops::BitOr for StartupOption {
	type Output = Self;

	fn bitor(self, rhs: Self) -> Self {
		Self(self.0 | rhs.0)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct ExtendedPanId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct PreConfigKey(pub [u8; 16]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct PreConfigKeysEnable(pub bool);

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct PanId(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct ChannelList(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct ZdoDirectCb(pub bool);

impl ConfigurationItem for StartupOption { const OPTION: ConfigurationOption = ConfigurationOption::STARTUP_OPTION; }
impl ConfigurationItem for ExtendedPanId { const OPTION: ConfigurationOption = ConfigurationOption::EXTENDED_PAN_ID; }
impl ConfigurationItem for PreConfigKey { const OPTION: ConfigurationOption = ConfigurationOption::PRECFGKEY; }
impl ConfigurationItem for PreConfigKeysEnable { const OPTION: ConfigurationOption = ConfigurationOption::PRECFGKEYS_ENABLE; }
impl ConfigurationItem for PanId { const OPTION: ConfigurationOption = ConfigurationOption::PANID; }
impl ConfigurationItem for ChannelList { const OPTION: ConfigurationOption = ConfigurationOption::CHANLIST; }
impl ConfigurationItem for LogicalType { const OPTION: ConfigurationOption = ConfigurationOption::LOGICAL_TYPE; }
impl ConfigurationItem for ZdoDirectCb { const OPTION: ConfigurationOption = ConfigurationOption::ZDO_DIRECT_CB; }

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct DeviceIeeeAddress(pub IeeeAddress);

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct DeviceShortAddress(pub ShortAddress);

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct ParentShortAddress(pub ShortAddress);

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct ParentIeeeAddress(pub IeeeAddress);

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct DeviceChannel(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct DevicePanId(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct DeviceExtendedPanId(pub u64);

impl DeviceInfoItem for DeviceState { const INFO: DeviceInfo = DeviceInfo::DEVICE_STATE; }
impl DeviceInfoItem for DeviceIeeeAddress { const INFO: DeviceInfo = DeviceInfo::DEVICE_IEEE_ADDRESS; }
impl DeviceInfoItem for DeviceShortAddress { const INFO: DeviceInfo = DeviceInfo::DEVICE_SHORT_ADDRESS; }
impl DeviceInfoItem for ParentShortAddress { const INFO: DeviceInfo = DeviceInfo::PARENT_SHORT_ADDRESS; }
impl DeviceInfoItem for ParentIeeeAddress { const INFO: DeviceInfo = DeviceInfo::PARENT_IEEE_ADDRESS; }
impl DeviceInfoItem for DeviceChannel { const INFO: DeviceInfo = DeviceInfo::CHANNEL; }
impl DeviceInfoItem for DevicePanId { const INFO: DeviceInfo = DeviceInfo::PAN_ID; }
impl DeviceInfoItem for DeviceExtendedPanId { const INFO: DeviceInfo = DeviceInfo::EXTENDED_PAN_ID; }

#[derive(Debug, DekuRead, DekuWrite)]
struct ConfigurationValue {
	option: u8,
	value: ByteString
}

fn read_configuration_value(option: ConfigurationOption, response: &[u8]) -> Result<Vec<u8>> {
	let reply: ConfigurationValue = codec::decode(&check_status(response)?)?;

	if reply.option != option.0 {
		return Err(Error::Mismatch("Read configuration returned wrong option"));
	}

	Ok(reply.value.data)
}

//the reply echoes the info id in front of the value
fn device_info_value(info: DeviceInfo, response: &[u8]) -> Result<Vec<u8>> {
	match response.split_first() {
		None => Err(Error::EmptyResponse),
		Some((&id, _)) if id != info.0 => Err(Error::Mismatch("Wrong DeviceInfo returned")),
		Some((_, value)) => Ok(value.to_vec())
	}
}

impl ZnpApi {
	pub fn sapi_read_configuration_raw(&self, option: ConfigurationOption) -> impl Future<Output = Result<Vec<u8>>> {
		then(self.request(SapiCommand::ReadConfiguration, &U8(option.0)), move |r| read_configuration_value(option, &r))
	}

	pub fn sapi_read_configuration<T: ConfigurationItem>(&self) -> impl Future<Output = Result<T>> {
		then(self.request(SapiCommand::ReadConfiguration, &U8(T::OPTION.0)), |r| {
			codec::decode(&read_configuration_value(T::OPTION, &r)?)
		})
	}

	fn write_configuration(&self, option: ConfigurationOption, value: Vec<u8>) -> Pending<Vec<u8>> {
		self.request(SapiCommand::WriteConfiguration, &ConfigurationValue { option: option.0, value: ByteString::new(value) })
	}

	pub fn sapi_write_configuration_raw(&self, option: ConfigurationOption, value: Vec<u8>) -> impl Future<Output = Result<()>> {
		then(self.write_configuration(option, value), |r| check_only_status(&r))
	}

	pub fn sapi_write_configuration<T: ConfigurationItem>(&self, value: &T) -> impl Future<Output = Result<()>> {
		let pending = match codec::encode(value) {
			Ok(value) => self.write_configuration(T::OPTION, value),
			Err(e) => Pending::failed(e)
		};

		then(pending, |r| check_only_status(&r))
	}

	pub fn sapi_get_device_info_raw(&self, info: DeviceInfo) -> impl Future<Output = Result<Vec<u8>>> {
		then(self.request(SapiCommand::GetDeviceInfo, &U8(info.0)), move |r| device_info_value(info, &r))
	}

	/// The co-processor always sends 8 value bytes, so the value is decoded partially.
	pub fn sapi_get_device_info<T: DeviceInfoItem>(&self) -> impl Future<Output = Result<T>> {
		then(self.request(SapiCommand::GetDeviceInfo, &U8(T::INFO.0)), |r| {
			codec::decode_partial(&device_info_value(T::INFO, &r)?)
		})
	}

	/// Resolves once the device reaches one of `end_states`, fails on any state not in `allowed_states`.
	pub fn wait_for_state(&self, end_states: &[DeviceState], allowed_states: &[DeviceState]) -> impl Future<Output = Result<DeviceState>> {
		let (completion, pending) = pending();
		let state_change = self.events().zdo_on_state_change.clone();
		let end_states = end_states.to_vec();
		let allowed_states = allowed_states.to_vec();

		//decided on the dispatch context, so no state change can slip in before the subscription
		let continuation: Continuation = Box::new(move |result, ctx| {
			let state = match result.and_then(|r| codec::decode_partial::<DeviceState>(&device_info_value(DeviceInfo::DEVICE_STATE, &r)?)) {
				Ok(state) => state,
				Err(e) => {
					completion.complete(Err(e));
					return;
				}
			};

			if end_states.contains(&state) {
				debug!("Immediately reached end state {:?}", state);
				completion.complete(Ok(state));
				return;
			}

			if !allowed_states.contains(&state) {
				debug!("Immediately reached non-allowed state {:?}", state);
				completion.complete(Err(Error::InvalidState(state)));
				return;
			}

			debug!("Subscribing to state change in {:?}", state);

			let c = completion.clone();
			let connection = state_change.subscribe_extended(move |connection, state| {
				debug!("Got state change {:?}", state);

				if end_states.contains(state) {
					connection.disconnect();
					c.complete(Ok(*state));
				}
				else if !allowed_states.contains(state) {
					connection.disconnect();
					c.complete(Err(Error::InvalidState(*state)));
				}
			}).persist();

			ctx.track(Box::new(SubscribedCompletion::new(completion, connection)));
		});

		let command: ZnpCommand = SapiCommand::GetDeviceInfo.into();

		match self.sreq_then(command, &[command], vec![DeviceInfo::DEVICE_STATE.0], continuation) {
			Ok(()) => pending,
			Err(e) => Pending::failed(e)
		}
	}
}
