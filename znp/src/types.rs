//frame level model and the typed values carried in payloads

use deku::{ self, prelude::* };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
	Poll = 0,
	Sreq = 2,
	Areq = 4,
	Srsp = 6
}

impl CommandType {
	pub fn from_bits(bits: u8) -> Option<Self> {
		match bits {
			0 => Some(Self::Poll),
			2 => Some(Self::Sreq),
			4 => Some(Self::Areq),
			6 => Some(Self::Srsp),
			_ => None
		}
	}
}

impl core::fmt::Display for CommandType {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			Self::Poll => write!(f, "POLL"),
			Self::Sreq => write!(f, "SREQ"),
			Self::Areq => write!(f, "AREQ"),
			Self::Srsp => write!(f, "SRSP"),
		}
	}
}

/// Subsystem nibble of a command, `0..=15`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subsystem(u8);

impl Subsystem {
	pub const RPC_ERROR: Self = Self(0);
	pub const SYS: Self = Self(1);
	pub const MAC: Self = Self(2);
	pub const NWK: Self = Self(3);
	pub const AF: Self = Self(4);
	pub const ZDO: Self = Self(5);
	pub const SAPI: Self = Self(6);
	pub const UTIL: Self = Self(7);
	pub const DEBUG: Self = Self(8);
	pub const APP: Self = Self(9);
	pub const APP_CNF: Self = Self(15);

	pub fn from_bits(bits: u8) -> Self {
		Self(bits & 0x0F)
	}

	pub fn bits(self) -> u8 {
		self.0
	}

	fn name(self) -> Option<&'static str> {
		Some(match self.0 {
			0 => "RPC_Error",
			1 => "SYS",
			2 => "MAC",
			3 => "NWK",
			4 => "AF",
			5 => "ZDO",
			6 => "SAPI",
			7 => "UTIL",
			8 => "DEBUG",
			9 => "APP",
			15 => "APP_CNF",
			_ => return None
		})
	}
}

impl core::fmt::Debug for Subsystem {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self.name() {
			Some(name) => write!(f, "{}", name),
			None => write!(f, "UNK({})", self.0)
		}
	}
}

impl core::fmt::Display for Subsystem {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		core::fmt::Debug::fmt(self, f)
	}
}

/// A command is identified by its subsystem and id, regardless of frame type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZnpCommand {
	pub subsystem: Subsystem,
	pub id: u8
}

impl ZnpCommand {
	pub const RPC_ERROR: Self = Self::new(Subsystem::RPC_ERROR, 0);

	pub const fn new(subsystem: Subsystem, id: u8) -> Self {
		Self { subsystem, id }
	}

	fn name(&self) -> Option<&'static str> {
		match self.subsystem {
			Subsystem::SYS => SysCommand::from_id(self.id).map(SysCommand::name),
			Subsystem::AF => AfCommand::from_id(self.id).map(AfCommand::name),
			Subsystem::ZDO => ZdoCommand::from_id(self.id).map(ZdoCommand::name),
			Subsystem::SAPI => SapiCommand::from_id(self.id).map(SapiCommand::name),
			Subsystem::UTIL => UtilCommand::from_id(self.id).map(UtilCommand::name),
			Subsystem::APP_CNF => AppCnfCommand::from_id(self.id).map(AppCnfCommand::name),
			_ => None
		}
	}
}

impl core::fmt::Display for ZnpCommand {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self.name() {
			Some(name) => write!(f, "{} {}", self.subsystem, name),
			None => write!(f, "{} {:#04x}", self.subsystem, self.id)
		}
	}
}

/// One frame as exchanged with the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZnpFrame {
	pub command_type: CommandType,
	pub command: ZnpCommand,
	pub payload: Vec<u8>
}

impl ZnpFrame {
	pub fn new(command_type: CommandType, command: impl Into<ZnpCommand>, payload: Vec<u8>) -> Self {
		Self { command_type, command: command.into(), payload }
	}
}

macro_rules! command_ids {
	($(#[$meta:meta])* $name:ident: $subsystem:ident { $($variant:ident = $value:literal => $text:literal),* $(,)? }) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		#[repr(u8)]
		pub enum $name {
			$($variant = $value),*
		}

		impl $name {
			pub fn from_id(id: u8) -> Option<Self> {
				match id {
					$($value => Some(Self::$variant),)*
					_ => None
				}
			}

			pub fn name(self) -> &'static str {
				match self {
					$(Self::$variant => $text),*
				}
			}
		}

		impl From<$name> for ZnpCommand {
			fn from(c: $name) -> Self {
				ZnpCommand::new(Subsystem::$subsystem, c as u8)
			}
		}
	};
}

command_ids! {
	SysCommand: SYS {
		Reset = 0x00 => "RESET",
		Ping = 0x01 => "PING",
		Version = 0x02 => "VERSION",
		SetExtAddr = 0x03 => "SET_EXTADDR",
		GetExtAddr = 0x04 => "GET_EXTADDR",
		RamRead = 0x05 => "RAM_READ",
		RamWrite = 0x06 => "RAM_WRITE",
		OsalNvItemInit = 0x07 => "OSAL_NV_ITEM_INIT",
		OsalNvRead = 0x08 => "OSAL_NV_READ",
		OsalNvWrite = 0x09 => "OSAL_NV_WRITE",
		OsalStartTimer = 0x0A => "OSAL_START_TIMER",
		OsalStopTimer = 0x0B => "OSAL_STOP_TIMER",
		Random = 0x0C => "RANDOM",
		AdcRead = 0x0D => "ADC_READ",
		Gpio = 0x0E => "GPIO",
		StackTune = 0x0F => "STACK_TUNE",
		SetTime = 0x10 => "SET_TIME",
		GetTime = 0x11 => "GET_TIME",
		OsalNvDelete = 0x12 => "OSAL_NV_DELETE",
		OsalNvLength = 0x13 => "OSAL_NV_LENGTH",
		TestRf = 0x40 => "TEST_RF",
		TestLoopback = 0x41 => "TEST_LOOPBACK",
		ResetInd = 0x80 => "RESET_IND",
		OsalTimerExpired = 0x81 => "OSAL_TIMER_EXPIRED",
	}
}

command_ids! {
	AfCommand: AF {
		Register = 0x00 => "REGISTER",
		DataRequest = 0x01 => "DATA_REQUEST",
		DataRequestExt = 0x02 => "DATA_REQUEST_EXT",
		DataRequestSrcRtg = 0x03 => "DATA_REQUEST_SRC_RTG",
		InterPanCtl = 0x10 => "INTER_PAN_CTL",
		DataStore = 0x11 => "DATA_STORE",
		DataRetrieve = 0x12 => "DATA_RETRIEVE",
		ApsfConfigSet = 0x13 => "APSF_CONFIG_SET",
		DataConfirm = 0x80 => "DATA_CONFIRM",
		IncomingMsg = 0x81 => "INCOMING_MSG",
		IncomingMsgExt = 0x82 => "INCOMING_MSG_EXT",
		ReflectError = 0x83 => "REFLECT_ERROR",
	}
}

command_ids! {
	ZdoCommand: ZDO {
		NwkAddrReq = 0x00 => "NWK_ADDR_REQ",
		IeeeAddrReq = 0x01 => "IEEE_ADDR_REQ",
		NodeDescReq = 0x02 => "NODE_DESC_REQ",
		PowerDescReq = 0x03 => "POWER_DESC_REQ",
		SimpleDescReq = 0x04 => "SIMPLE_DESC_REQ",
		ActiveEpReq = 0x05 => "ACTIVE_EP_REQ",
		MatchDescReq = 0x06 => "MATCH_DESC_REQ",
		ComplexDescReq = 0x07 => "COMPLEX_DESC_REQ",
		UserDescReq = 0x08 => "USER_DESC_REQ",
		DeviceAnnce = 0x0A => "DEVICE_ANNCE",
		UserDescSet = 0x0B => "USER_DESC_SET",
		ServerDiscReq = 0x0C => "SERVER_DISC_REQ",
		EndDeviceBindReq = 0x20 => "END_DEVICE_BIND_REQ",
		BindReq = 0x21 => "BIND_REQ",
		UnbindReq = 0x22 => "UNBIND_REQ",
		SetLinkKey = 0x23 => "SET_LINK_KEY",
		RemoveLinkKey = 0x24 => "REMOVE_LINK_KEY",
		GetLinkKey = 0x25 => "GET_LINK_KEY",
		MgmtNwkDiscReq = 0x30 => "MGMT_NWK_DISC_REQ",
		MgmtLqiReq = 0x31 => "MGMT_LQI_REQ",
		MgmtRtgReq = 0x32 => "MGMT_RTG_REQ",
		MgmtBindReq = 0x33 => "MGMT_BIND_REQ",
		MgmtLeaveReq = 0x34 => "MGMT_LEAVE_REQ",
		MgmtDirectJoinReq = 0x35 => "MGMT_DIRECT_JOIN_REQ",
		MgmtPermitJoinReq = 0x36 => "MGMT_PERMIT_JOIN_REQ",
		MgmtNwkUpdateReq = 0x37 => "MGMT_NWK_UPDATE_REQ",
		MsgCbRegister = 0x3E => "MSG_CB_REGISTER",
		MsgCbRemove = 0x3F => "MSG_CB_REMOVE",
		StartupFromApp = 0x40 => "STARTUP_FROM_APP",
		AutoFindDestination = 0x41 => "AUTO_FIND_DESTINATION",
		ExtRemoveGroup = 0x47 => "EXT_REMOVE_GROUP",
		ExtRemoveAllGroup = 0x48 => "EXT_REMOVE_ALL_GROUP",
		ExtFindAllGroupsEndpoint = 0x49 => "EXT_FIND_ALL_GROUPS_ENDPOINT",
		ExtFindGroup = 0x4A => "EXT_FIND_GROUP",
		ExtAddGroup = 0x4B => "EXT_ADD_GROUP",
		ExtCountAllGroups = 0x4C => "EXT_COUNT_ALL_GROUPS",
		NwkAddrRsp = 0x80 => "NWK_ADDR_RSP",
		IeeeAddrRsp = 0x81 => "IEEE_ADDR_RSP",
		NodeDescRsp = 0x82 => "NODE_DESC_RSP",
		PowerDescRsp = 0x83 => "POWER_DESC_RSP",
		SimpleDescRsp = 0x84 => "SIMPLE_DESC_RSP",
		ActiveEpRsp = 0x85 => "ACTIVE_EP_RSP",
		MatchDescRsp = 0x86 => "MATCH_DESC_RSP",
		ComplexDescRsp = 0x87 => "COMPLEX_DESC_RSP",
		UserDescRsp = 0x88 => "USER_DESC_RSP",
		UserDescConf = 0x89 => "USER_DESC_CONF",
		ServerDiscRsp = 0x8A => "SERVER_DISC_RSP",
		EndDeviceBindRsp = 0xA0 => "END_DEVICE_BIND_RSP",
		BindRsp = 0xA1 => "BIND_RSP",
		UnbindRsp = 0xA2 => "UNBIND_RSP",
		MgmtNwkDiscRsp = 0xB0 => "MGMT_NWK_DISC_RSP",
		MgmtLqiRsp = 0xB1 => "MGMT_LQI_RSP",
		MgmtRtgRsp = 0xB2 => "MGMT_RTG_RSP",
		MgmtBindRsp = 0xB3 => "MGMT_BIND_RSP",
		MgmtLeaveRsp = 0xB4 => "MGMT_LEAVE_RSP",
		MgmtDirectJoinRsp = 0xB5 => "MGMT_DIRECT_JOIN_RSP",
		MgmtPermitJoinRsp = 0xB6 => "MGMT_PERMIT_JOIN_RSP",
		StateChangeInd = 0xC0 => "STATE_CHANGE_IND",
		EndDeviceAnnceInd = 0xC1 => "END_DEVICE_ANNCE_IND",
		MatchDescRspSent = 0xC2 => "MATCH_DESC_RSP_SENT",
		StatusErrorRsp = 0xC3 => "STATUS_ERROR_RSP",
		SrcRtgInd = 0xC4 => "SRC_RTG_IND",
		LeaveInd = 0xC9 => "LEAVE_IND",
		TcDevInd = 0xCA => "TC_DEV_IND",
		PermitJoinInd = 0xCB => "PERMIT_JOIN_IND",
		MsgCbIncoming = 0xFF => "MSG_CB_INCOMING",
	}
}

command_ids! {
	SapiCommand: SAPI {
		StartRequest = 0x00 => "START_REQUEST",
		BindDevice = 0x01 => "BIND_DEVICE",
		AllowBind = 0x02 => "ALLOW_BIND",
		SendDataRequest = 0x03 => "SEND_DATA_REQUEST",
		ReadConfiguration = 0x04 => "READ_CONFIGURATION",
		WriteConfiguration = 0x05 => "WRITE_CONFIGURATION",
		GetDeviceInfo = 0x06 => "GET_DEVICE_INFO",
		FindDeviceRequest = 0x07 => "FIND_DEVICE_REQUEST",
		PermitJoiningRequest = 0x08 => "PERMIT_JOINING_REQUEST",
		SystemReset = 0x09 => "SYSTEM_RESET",
		StartConfirm = 0x80 => "START_CONFIRM",
		BindConfirm = 0x81 => "BIND_CONFIRM",
		AllowBindConfirm = 0x82 => "ALLOW_BIND_CONFIRM",
		SendDataConfirm = 0x83 => "SEND_DATA_CONFIRM",
		FindDeviceConfirm = 0x85 => "FIND_DEVICE_CONFIRM",
		ReceiveDataIndication = 0x87 => "RECEIVE_DATA_INDICATION",
	}
}

command_ids! {
	UtilCommand: UTIL {
		GetDeviceInfo = 0x00 => "GET_DEVICE_INFO",
		GetNvInfo = 0x01 => "GET_NV_INFO",
		SetPanId = 0x02 => "SET_PANID",
		SetChannels = 0x03 => "SET_CHANNELS",
		SetSecLevel = 0x04 => "SET_SECLEVEL",
		SetPreCfgKey = 0x05 => "SET_PRECFGKEY",
		CallbackSubCmd = 0x06 => "CALLBACK_SUB_CMD",
		KeyEvent = 0x07 => "KEY_EVENT",
		TimeAlive = 0x09 => "TIME_ALIVE",
		LedControl = 0x0A => "LED_CONTROL",
		TestLoopback = 0x10 => "TEST_LOOPBACK",
		DataReq = 0x11 => "DATA_REQ",
		SrcMatchEnable = 0x20 => "SRC_MATCH_ENABLE",
		SrcMatchAddEntry = 0x21 => "SRC_MATCH_ADD_ENTRY",
		SrcMatchDelEntry = 0x22 => "SRC_MATCH_DEL_ENTRY",
		SrcMatchCheckSrcAddr = 0x23 => "SRC_MATCH_CHECK_SRC_ADDR",
		SrcMatchAckAllPending = 0x24 => "SRC_MATCH_ACK_ALL_PENDING",
		SrcMatchCheckAllPending = 0x25 => "SRC_MATCH_CHECK_ALL_PENDING",
		AddrmgrExtAddrLookup = 0x40 => "ADDRMGR_EXT_ADDR_LOOKUP",
		AddrmgrNwkAddrLookup = 0x41 => "ADDRMGR_NWK_ADDR_LOOKUP",
		ApsmeLinkKeyDataGet = 0x44 => "APSME_LINK_KEY_DATA_GET",
		ApsmeLinkKeyNvIdGet = 0x45 => "APSME_LINK_KEY_NV_ID_GET",
		AssocCount = 0x48 => "ASSOC_COUNT",
		AssocFindDevice = 0x49 => "ASSOC_FIND_DEVICE",
		AssocGetWithAddress = 0x4A => "ASSOC_GET_WITH_ADDRESS",
		ApsmeRequestKeyCmd = 0x4B => "APSME_REQUEST_KEY_CMD",
		ZclKeyEstInitEst = 0x80 => "ZCL_KEY_EST_INIT_EST",
		ZclKeyEstSign = 0x81 => "ZCL_KEY_EST_SIGN",
		UtilSyncReq = 0xE0 => "UTIL_SYNC_REQ",
		ZclKeyEstablishInd = 0xE1 => "ZCL_KEY_ESTABLISH_IND",
	}
}

command_ids! {
	AppCnfCommand: APP_CNF {
		BdbStartCommissioning = 0x05 => "BDB_START_COMMISSIONING",
		BdbSetChannel = 0x08 => "BDB_SET_CHANNEL",
		BdbCommissioningNotification = 0x80 => "BDB_COMMISSIONING_NOTIFICATION",
	}
}

pub type IeeeAddress = u64;
pub type ShortAddress = u16;

pub const STATUS_SUCCESS: u8 = 0x00;

/// Capability bitmask returned by `SYS_PING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct Capability(pub u16);

impl Capability {
	pub const SYS: u16 = 0x0001;
	pub const MAC: u16 = 0x0002;
	pub const NWK: u16 = 0x0004;
	pub const AF: u16 = 0x0008;
	pub const ZDO: u16 = 0x0010;
	pub const SAPI: u16 = 0x0020;
	pub const UTIL: u16 = 0x0040;
	pub const DEBUG: u16 = 0x0080;
	pub const APP: u16 = 0x0100;
	pub const ZOAD: u16 = 0x1000;

	const NAMES: [(u16, &'static str); 10] = [
		(Self::SYS, "SYS"), (Self::MAC, "MAC"), (Self::NWK, "NWK"), (Self::AF, "AF"), (Self::ZDO, "ZDO"),
		(Self::SAPI, "SAPI"), (Self::UTIL, "UTIL"), (Self::DEBUG, "DEBUG"), (Self::APP, "APP"), (Self::ZOAD, "ZOAD")
	];

	pub fn has(&self, flag: u16) -> bool {
		self.0 & flag == flag
	}
}

impl core::fmt::Display for Capability {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let mut unhandled = self.0;
		let mut first = true;

		for (flag, name) in Self::NAMES {
			if unhandled & flag != 0 {
				if !first {
					write!(f, "|")?;
				}
				first = false;
				write!(f, "{}", name)?;
				unhandled &= !flag;
			}
		}

		if unhandled != 0 {
			if !first {
				write!(f, "|")?;
			}
			write!(f, "{:x}", unhandled)?;
		}

		Ok(())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
#[deku(id_type = "u8")]
pub enum ResetReason {
	#[deku(id = "0x00")]
	PowerUp,
	#[deku(id = "0x01")]
	External,
	#[deku(id = "0x02")]
	Watchdog
}

#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct ResetInfo {
	pub reason: ResetReason,
	pub transport_rev: u8,
	pub product_id: u8,
	pub major_rel: u8,
	pub minor_rel: u8,
	pub hw_rev: u8
}

impl core::fmt::Display for ResetInfo {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "[{:?} {} {} {}.{}.{}]", self.reason, self.transport_rev, self.product_id, self.major_rel, self.minor_rel, self.hw_rev)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct VersionInfo {
	pub transport_rev: u8,
	pub product_id: u8,
	pub major_rel: u8,
	pub minor_rel: u8,
	pub maint_rel: u8,
	pub revision: u32,
	pub reserved: [u8; 5]
}

impl core::fmt::Display for VersionInfo {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "[{} {} {}.{}.{} rev {}]", self.transport_rev, self.product_id, self.major_rel, self.minor_rel, self.maint_rel, self.revision)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, DekuRead, DekuWrite)]
#[deku(id_type = "u8")]
pub enum DeviceState {
	#[deku(id = "0x00")]
	Hold,
	#[deku(id = "0x01")]
	Init,
	#[deku(id = "0x02")]
	NwkDisc,
	#[deku(id = "0x03")]
	NwkJoining,
	#[deku(id = "0x04")]
	NwkRejoin,
	#[deku(id = "0x05")]
	EndDeviceUnauth,
	#[deku(id = "0x06")]
	EndDevice,
	#[deku(id = "0x07")]
	Router,
	#[deku(id = "0x08")]
	CoordStarting,
	#[deku(id = "0x09")]
	ZbCoord,
	#[deku(id = "0x0A")]
	NwkOrphan
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
#[deku(id_type = "u8")]
pub enum LogicalType {
	#[deku(id = "0x00")]
	Coordinator,
	#[deku(id = "0x01")]
	Router,
	#[deku(id = "0x02")]
	EndDevice
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
#[deku(id_type = "u8")]
pub enum Latency {
	#[deku(id = "0x00")]
	NoLatency,
	#[deku(id = "0x01")]
	FastBeacons,
	#[deku(id = "0x02")]
	SlowBeacons
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
#[deku(id_type = "u8")]
pub enum AddrMode {
	#[deku(id = "0x00")]
	NotPresent,
	#[deku(id = "0x01")]
	Group,
	#[deku(id = "0x02")]
	ShortAddress,
	#[deku(id = "0x03")]
	IeeeAddress,
	#[deku(id = "0xFF")]
	Broadcast
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
#[deku(id_type = "u8")]
pub enum StartupFromAppResponse {
	#[deku(id = "0x00")]
	Restored,
	#[deku(id = "0x01")]
	New,
	#[deku(id = "0x02")]
	Leave
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, DekuRead, DekuWrite)]
pub struct NvItemId(pub u16);

impl NvItemId {
	pub const EXTADDR: Self = Self(0x0001);
	pub const BOOTCOUNTER: Self = Self(0x0002);
	pub const STARTUP_OPTION: Self = Self(0x0003);
	pub const START_DELAY: Self = Self(0x0004);
	pub const NIB: Self = Self(0x0021);
	pub const DEVICE_LIST: Self = Self(0x0022);
	pub const ADDRMGR: Self = Self(0x0023);
	pub const POLL_RATE: Self = Self(0x0024);
	pub const EXTENDED_PAN_ID: Self = Self(0x002D);
	pub const BINDING_TABLE: Self = Self(0x0041);
	pub const GROUP_TABLE: Self = Self(0x0042);
	pub const SECURITY_LEVEL: Self = Self(0x0061);
	pub const PRECFGKEY: Self = Self(0x0062);
	pub const PRECFGKEYS_ENABLE: Self = Self(0x0063);
	pub const USE_DEFAULT_TCLK: Self = Self(0x006D);
	pub const USERDESC: Self = Self(0x0081);
	pub const NWKKEY: Self = Self(0x0082);
	pub const PANID: Self = Self(0x0083);
	pub const CHANLIST: Self = Self(0x0084);
	pub const LEAVE_CTRL: Self = Self(0x0085);
	pub const SCAN_DURATION: Self = Self(0x0086);
	pub const LOGICAL_TYPE: Self = Self(0x0087);
	pub const ZDO_DIRECT_CB: Self = Self(0x008F);
	pub const SCENE_TABLE: Self = Self(0x0091);
	pub const SAPI_ENDPOINT: Self = Self(0x00A1);
	pub const RF_TEST_PARAMS: Self = Self(0x0F07);
}

/// Destination of a binding, always encoded as mode, 8 address bytes and endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct BindTarget {
	mode: AddrMode,
	address: u64,
	endpoint: u8
}

impl Default for BindTarget {
	fn default() -> Self {
		Self::not_present()
	}
}

impl BindTarget {
	pub fn not_present() -> Self {
		Self { mode: AddrMode::NotPresent, address: 0, endpoint: 0 }
	}

	pub fn group(group_id: u16) -> Self {
		Self { mode: AddrMode::Group, address: group_id as u64, endpoint: 0 }
	}

	pub fn short_address(address: ShortAddress) -> Self {
		Self { mode: AddrMode::ShortAddress, address: address as u64, endpoint: 0 }
	}

	pub fn ieee_address(address: IeeeAddress, endpoint: u8) -> Self {
		Self { mode: AddrMode::IeeeAddress, address, endpoint }
	}

	pub fn broadcast() -> Self {
		Self { mode: AddrMode::Broadcast, address: 0, endpoint: 0 }
	}

	pub fn mode(&self) -> AddrMode {
		self.mode
	}

	pub fn group_id(&self) -> Option<u16> {
		(self.mode == AddrMode::Group).then_some(self.address as u16)
	}

	pub fn short(&self) -> Option<ShortAddress> {
		(self.mode == AddrMode::ShortAddress).then_some(self.address as u16)
	}

	pub fn ieee(&self) -> Option<(IeeeAddress, u8)> {
		(self.mode == AddrMode::IeeeAddress).then_some((self.address, self.endpoint))
	}
}

impl core::fmt::Display for BindTarget {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self.mode {
			AddrMode::NotPresent => write!(f, "[NotPresent]"),
			AddrMode::Group => write!(f, "[Group {:x}]", self.address as u16),
			AddrMode::ShortAddress => write!(f, "[Short {:x}]", self.address as u16),
			AddrMode::IeeeAddress => write!(f, "[IEEE {:x} Endpoint {}]", self.address, self.endpoint),
			AddrMode::Broadcast => write!(f, "[Broadcast]"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct BindTableEntry {
	pub src_addr: IeeeAddress,
	pub src_endpoint: u8,
	pub cluster_id: u16,
	pub target: BindTarget
}

#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct BindTable {
	pub total_entries: u8,
	pub start_index: u8,
	pub count: u8,
	#[deku(count = "count")]
	pub entries: Vec<BindTableEntry>
}

#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct IeeeAddressResponse {
	pub ieee_addr: IeeeAddress,
	pub nwk_addr: ShortAddress,
	pub start_index: u8,
	pub num_assoc_dev: u8,
	#[deku(count = "num_assoc_dev")]
	pub assoc_dev_list: Vec<ShortAddress>
}

#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct LinkKey {
	pub ieee_addr: IeeeAddress,
	pub key: [u8; 16]
}

//indications

#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct IncomingMsg {
	pub group_id: u16,
	pub cluster_id: u16,
	pub src_addr: ShortAddress,
	pub src_endpoint: u8,
	pub dst_endpoint: u8,
	pub was_broadcast: u8,
	pub link_quality: u8,
	pub security_use: u8,
	pub timestamp: u32,
	pub trans_seq_number: u8,
	pub len: u8,
	#[deku(count = "len")]
	pub data: Vec<u8>
}

#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct EndDeviceAnnounce {
	pub src_addr: ShortAddress,
	pub nwk_addr: ShortAddress,
	pub ieee_addr: IeeeAddress,
	pub capabilities: u8
}

#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct TrustCenterDevice {
	pub src_nwk_addr: ShortAddress,
	pub src_ieee_addr: IeeeAddress,
	pub parent_nwk_addr: ShortAddress
}

#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct LeaveIndication {
	pub src_addr: ShortAddress,
	pub ext_addr: IeeeAddress,
	pub request: u8,
	pub remove: u8,
	pub rejoin: u8
}

#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct PermitJoinIndication {
	pub duration: u8
}

#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct NodeDescriptor {
	pub src_addr: ShortAddress,
	pub status: u8,
	pub nwk_addr: ShortAddress,
	pub logical_type: u8,
	pub aps_flags: u8,
	pub mac_capabilities: u8,
	pub manufacturer_code: u16,
	pub max_buffer_size: u8,
	pub max_in_transfer_size: u16,
	pub server_mask: u16,
	pub max_out_transfer_size: u16,
	pub descriptor_capabilities: u8
}

#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct ActiveEndpoints {
	pub src_addr: ShortAddress,
	pub status: u8,
	pub nwk_addr: ShortAddress,
	pub count: u8,
	#[deku(count = "count")]
	pub endpoints: Vec<u8>
}

#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct SimpleDescriptor {
	pub src_addr: ShortAddress,
	pub status: u8,
	pub nwk_addr: ShortAddress,
	pub len: u8,
	pub endpoint: u8,
	pub profile_id: u16,
	pub device_id: u16,
	pub device_version: u8,
	pub num_in_clusters: u8,
	#[deku(count = "num_in_clusters")]
	pub in_clusters: Vec<u16>,
	pub num_out_clusters: u8,
	#[deku(count = "num_out_clusters")]
	pub out_clusters: Vec<u16>
}

#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct BdbCommissioningNotification {
	pub status: u8,
	pub mode: u8,
	pub remaining_modes: u8
}

/// Payload of an `RPC_Error` SRSP, naming the request the co-processor rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
pub struct RpcErrorInfo {
	pub code: u8,
	pub packed: u8,
	pub id: u8
}

impl RpcErrorInfo {
	pub fn command_type(&self) -> Option<CommandType> {
		CommandType::from_bits(self.packed >> 4)
	}

	pub fn command(&self) -> ZnpCommand {
		ZnpCommand::new(Subsystem::from_bits(self.packed), self.id)
	}
}
