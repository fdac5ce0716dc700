use std::{ cell::RefCell, future::Future, pin::Pin, rc::Rc, time::Duration };
use futures::FutureExt;
use znp::{
	api::{ DataRequest, PanId },
	types::*,
	Error, ManualClock, ZnpApi, ZnpConfig
};

const EVENT_HANDLERS: usize = 11;

fn setup() -> (ZnpApi, ManualClock) {
	let clock = ManualClock::default();
	let api = ZnpApi::with_clock(ZnpConfig::default(), Rc::new(clock.clone()));

	(api, clock)
}

fn srsp(command: impl Into<ZnpCommand>, payload: &[u8]) -> ZnpFrame {
	ZnpFrame::new(CommandType::Srsp, command, payload.to_vec())
}

fn areq(command: impl Into<ZnpCommand>, payload: &[u8]) -> ZnpFrame {
	ZnpFrame::new(CommandType::Areq, command, payload.to_vec())
}

fn poll<F: Future>(f: &mut Pin<Box<F>>) -> Option<F::Output> {
	f.as_mut().now_or_never()
}

#[test]
fn ping() {
	let (api, _) = setup();
	let mut f = Box::pin(api.sys_ping());

	assert_eq!(api.take_outbound(), vec![ZnpFrame::new(CommandType::Sreq, SysCommand::Ping, vec![])]);
	assert!(poll(&mut f).is_none());

	api.on_frame(srsp(SysCommand::Ping, &[0x79, 0x00]));

	assert_eq!(poll(&mut f).unwrap().unwrap(), Capability(0x0079));
	assert_eq!(api.pending_handlers(), EVENT_HANDLERS);
}

#[test]
fn nv_read_strips_status() {
	let (api, _) = setup();
	let mut f = Box::pin(api.sys_osal_nv_read_raw(NvItemId(0x0063), 0));

	assert_eq!(api.take_outbound()[0].payload, vec![0x63, 0x00, 0x00]);

	api.on_frame(srsp(SysCommand::OsalNvRead, &[0x00, 0x02, 0xAA, 0xBB]));

	assert_eq!(poll(&mut f).unwrap().unwrap(), vec![0xAA, 0xBB]);
}

#[test]
fn nv_write_error_status() {
	let (api, _) = setup();
	let mut f = Box::pin(api.sys_osal_nv_write_raw(NvItemId::PRECFGKEYS_ENABLE, 0, vec![0x01]));

	assert_eq!(api.take_outbound()[0].payload, vec![0x63, 0x00, 0x00, 0x01, 0x01]);

	api.on_frame(srsp(SysCommand::OsalNvWrite, &[0x01]));

	assert!(matches!(poll(&mut f), Some(Err(Error::Status(0x01)))));
}

fn issue_bind(api: &ZnpApi) -> Pin<Box<impl Future<Output = znp::Result<()>>>> {
	let f = Box::pin(api.zdo_bind(0x1234, 0x0012_4B00_0102_0304, 1, 0x0006, BindTarget::group(0x0010)));

	let sent = api.take_outbound();
	assert_eq!(sent.len(), 1);
	assert_eq!(sent[0].command, ZdoCommand::BindReq.into());
	assert_eq!(sent[0].payload, vec![
		0x34, 0x12,
		0x04, 0x03, 0x02, 0x01, 0x00, 0x4B, 0x12, 0x00,
		0x01,
		0x06, 0x00,
		0x01, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00
	]);

	f
}

#[test]
fn bind_with_deferred_confirmation() {
	let (api, _) = setup();
	let mut f = issue_bind(&api);

	api.on_frame(srsp(ZdoCommand::BindReq, &[0x00]));
	assert!(poll(&mut f).is_none());

	//confirmation for another destination
	api.on_frame(areq(ZdoCommand::BindRsp, &[0x35, 0x12, 0x00]));
	assert!(poll(&mut f).is_none());

	api.on_frame(areq(ZdoCommand::BindRsp, &[0x34, 0x12, 0x00]));
	assert!(matches!(poll(&mut f), Some(Ok(()))));
	assert_eq!(api.pending_handlers(), EVENT_HANDLERS);
}

#[test]
fn bind_confirmation_with_error_status() {
	let (api, _) = setup();
	let mut f = issue_bind(&api);

	api.on_frame(srsp(ZdoCommand::BindReq, &[0x00]));
	api.on_frame(areq(ZdoCommand::BindRsp, &[0x34, 0x12, 0x8C]));

	assert!(matches!(poll(&mut f), Some(Err(Error::Status(0x8C)))));
}

#[test]
fn bind_request_rejected_skips_confirmation() {
	let (api, _) = setup();
	let mut f = issue_bind(&api);

	api.on_frame(srsp(ZdoCommand::BindReq, &[0x02]));

	assert!(matches!(poll(&mut f), Some(Err(Error::Status(0x02)))));
	assert_eq!(api.pending_handlers(), EVENT_HANDLERS);
}

#[test]
fn bind_timeout() {
	let (api, clock) = setup();
	let mut f = issue_bind(&api);

	api.on_frame(srsp(ZdoCommand::BindReq, &[0x00]));
	assert!(api.next_deadline().is_some());

	clock.advance(Duration::from_secs(14));
	api.expire_timers();
	assert!(poll(&mut f).is_none());

	clock.advance(Duration::from_secs(2));
	api.expire_timers();
	assert!(matches!(poll(&mut f), Some(Err(Error::Timeout))));

	//late confirmation only evicts the expired handler
	assert_eq!(api.pending_handlers(), EVENT_HANDLERS + 1);
	api.on_frame(areq(ZdoCommand::BindRsp, &[0x34, 0x12, 0x00]));
	assert_eq!(api.pending_handlers(), EVENT_HANDLERS);
	assert_eq!(api.next_deadline(), None);
}

#[test]
fn rpc_error_routing() {
	let (api, _) = setup();
	let mut f = Box::pin(api.sys_version());

	//error about PING, not for us
	api.on_frame(srsp(ZnpCommand::RPC_ERROR, &[0x02, 0x21, 0x01]));
	assert!(poll(&mut f).is_none());

	api.on_frame(srsp(ZnpCommand::RPC_ERROR, &[0x02, 0x21, 0x02]));
	assert!(matches!(poll(&mut f), Some(Err(Error::Rpc(2)))));
}

#[test]
fn version_decodes_strictly() {
	let (api, _) = setup();
	let mut f = Box::pin(api.sys_version());

	api.on_frame(srsp(SysCommand::Version, &[0x02, 0x01, 0x02, 0x07, 0x01, 0x4E, 0x4A, 0x34, 0x01, 0, 0, 0, 0, 0]));

	let version = poll(&mut f).unwrap().unwrap();
	assert_eq!((version.major_rel, version.minor_rel, version.maint_rel), (2, 7, 1));
	assert_eq!(version.revision, 0x01344A4E);
}

#[test]
fn permit_join_event() {
	let (api, _) = setup();
	let seen = Rc::new(RefCell::new(Vec::new()));

	let s = seen.clone();
	let _subscription = api.events().zdo_on_permit_join.subscribe(move |ind| s.borrow_mut().push(ind.duration));

	api.on_frame(areq(ZdoCommand::PermitJoinInd, &[0x3C]));

	assert_eq!(*seen.borrow(), vec![0x3C]);
}

#[test]
fn incoming_message_with_trailing_bytes() {
	let (api, _) = setup();
	let seen = Rc::new(RefCell::new(Vec::new()));

	let s = seen.clone();
	let _subscription = api.events().af_on_incoming_msg.subscribe(move |msg| s.borrow_mut().push(msg.clone()));

	api.on_frame(areq(AfCommand::IncomingMsg, &[
		0x00, 0x00,
		0x06, 0x00,
		0x34, 0x12,
		0x01, 0x02,
		0x00, 0x50, 0x00,
		0x00, 0x10, 0x00, 0x00,
		0x07,
		0x03, 0x01, 0x02, 0x03,
		0xAA, 0xBB, 0xCC
	]));

	let seen = seen.borrow();
	assert_eq!(seen.len(), 1);
	assert_eq!(seen[0].cluster_id, 0x0006);
	assert_eq!(seen[0].src_addr, 0x1234);
	assert_eq!((seen[0].src_endpoint, seen[0].dst_endpoint), (1, 2));
	assert_eq!(seen[0].link_quality, 0x50);
	assert_eq!(seen[0].timestamp, 0x1000);
	assert_eq!(seen[0].trans_seq_number, 7);
	assert_eq!(seen[0].data, vec![0x01, 0x02, 0x03]);
}

#[test]
fn strict_event_ignores_malformed_payload() {
	let (api, _) = setup();
	let seen = Rc::new(RefCell::new(0));

	let s = seen.clone();
	let _subscription = api.events().zdo_on_state_change.subscribe(move |_| *s.borrow_mut() += 1);

	api.on_frame(areq(ZdoCommand::StateChangeInd, &[0x09, 0x00]));
	api.on_frame(areq(ZdoCommand::StateChangeInd, &[0x0F]));
	assert_eq!(*seen.borrow(), 0);

	api.on_frame(areq(ZdoCommand::StateChangeInd, &[0x09]));
	assert_eq!(*seen.borrow(), 1);
}

#[test]
fn empty_response_set_is_rejected() {
	let (api, _) = setup();
	let mut f = Box::pin(api.raw_sreq_with(SysCommand::Ping, &[], Vec::new()));

	assert!(matches!(poll(&mut f), Some(Err(Error::NoResponseCommands))));
	assert!(api.take_outbound().is_empty());
	assert_eq!(api.pending_handlers(), EVENT_HANDLERS);
}

#[test]
fn empty_prefix_delivers_payload_verbatim() {
	let (api, _) = setup();
	let mut f = Box::pin(api.wait_for(CommandType::Areq, ZdoCommand::MgmtLeaveRsp, None, Vec::new()));

	api.on_frame(areq(ZdoCommand::MgmtLeaveRsp, &[0x34, 0x12, 0x00]));

	assert_eq!(poll(&mut f).unwrap().unwrap(), vec![0x34, 0x12, 0x00]);
}

#[test]
fn prefix_longer_than_payload_does_not_match() {
	let (api, _) = setup();
	let mut f = Box::pin(api.wait_for(CommandType::Areq, ZdoCommand::MgmtLeaveRsp, None, vec![0x34, 0x12, 0x00, 0x00]));

	api.on_frame(areq(ZdoCommand::MgmtLeaveRsp, &[0x34, 0x12, 0x00]));

	assert!(poll(&mut f).is_none());
	assert_eq!(api.pending_handlers(), EVENT_HANDLERS + 1);
}

#[test]
fn overlapping_requests_complete_in_insertion_order() {
	let (api, _) = setup();
	let mut first = Box::pin(api.sys_ping());
	let mut second = Box::pin(api.sys_ping());

	api.on_frame(srsp(SysCommand::Ping, &[0x01, 0x00]));
	assert_eq!(poll(&mut first).unwrap().unwrap(), Capability(0x0001));
	assert!(poll(&mut second).is_none());

	api.on_frame(srsp(SysCommand::Ping, &[0x79, 0x00]));
	assert_eq!(poll(&mut second).unwrap().unwrap(), Capability(0x0079));
}

#[test]
fn remove_all_groups_accepts_remove_response() {
	let (api, _) = setup();
	let mut f = Box::pin(api.zdo_ext_remove_all_group(1));

	assert_eq!(api.take_outbound()[0].payload, vec![0x01]);

	api.on_frame(srsp(ZdoCommand::ExtRemoveGroup, &[0x00]));

	assert!(matches!(poll(&mut f), Some(Ok(()))));
}

#[test]
fn remove_all_groups_takes_rpc_error_for_any_response() {
	let (api, _) = setup();
	let mut f = Box::pin(api.zdo_ext_remove_all_group(1));

	//SREQ to ZDO EXT_REMOVE_GROUP, the second allowed response
	api.on_frame(srsp(ZnpCommand::RPC_ERROR, &[0x03, 0x25, 0x47]));

	assert!(matches!(poll(&mut f), Some(Err(Error::Rpc(3)))));
	assert_eq!(api.pending_handlers(), EVENT_HANDLERS);
}

#[test]
fn group_name_is_bounded() {
	let (api, _) = setup();
	let mut f = Box::pin(api.zdo_ext_add_group(1, 0x0010, "seventeen-chars!!"));

	assert!(matches!(poll(&mut f), Some(Err(Error::GroupNameTooLong(17)))));
	assert!(api.take_outbound().is_empty());

	let mut f = Box::pin(api.zdo_ext_add_group(1, 0x0010, "kitchen"));
	assert_eq!(api.take_outbound()[0].payload, b"\x01\x10\x00\x07kitchen".to_vec());

	api.on_frame(srsp(ZdoCommand::ExtAddGroup, &[0x00]));
	assert!(matches!(poll(&mut f), Some(Ok(()))));
}

#[test]
fn find_group_checks_echoed_id() {
	let (api, _) = setup();
	let mut f = Box::pin(api.zdo_ext_find_group(1, 0x0010));
	api.on_frame(srsp(ZdoCommand::ExtFindGroup, b"\x00\x10\x00\x07kitchen"));
	assert_eq!(poll(&mut f).unwrap().unwrap(), "kitchen");

	let mut f = Box::pin(api.zdo_ext_find_group(1, 0x0010));
	api.on_frame(srsp(ZdoCommand::ExtFindGroup, b"\x00\x11\x00\x00"));
	assert!(matches!(poll(&mut f), Some(Err(Error::Mismatch(_)))));
}

#[test]
fn reset_waits_for_indication() {
	let (api, _) = setup();
	let mut f = Box::pin(api.sys_reset(true));

	assert_eq!(api.take_outbound(), vec![ZnpFrame::new(CommandType::Areq, SysCommand::Reset, vec![0x01])]);
	assert_eq!(api.events().sys_on_reset.subscriber_count(), 1);

	api.on_frame(areq(SysCommand::ResetInd, &[0x00, 0x02, 0x01, 0x02, 0x07, 0x01]));

	let info = poll(&mut f).unwrap().unwrap();
	assert_eq!(info.reason, ResetReason::PowerUp);
	assert_eq!((info.major_rel, info.minor_rel), (2, 7));
	assert_eq!(api.events().sys_on_reset.subscriber_count(), 0);
}

fn device_state(state: u8) -> ZnpFrame {
	srsp(SapiCommand::GetDeviceInfo, &[0x00, state, 0, 0, 0, 0, 0, 0, 0])
}

#[test]
fn wait_for_state_immediately_done() {
	let (api, _) = setup();
	let mut f = Box::pin(api.wait_for_state(&[DeviceState::ZbCoord], &[]));

	assert_eq!(api.take_outbound()[0].payload, vec![0x00]);

	api.on_frame(device_state(0x09));

	assert_eq!(poll(&mut f).unwrap().unwrap(), DeviceState::ZbCoord);
	assert_eq!(api.events().zdo_on_state_change.subscriber_count(), 0);
}

#[test]
fn wait_for_state_follows_state_changes() {
	let (api, _) = setup();
	let allowed = [DeviceState::Hold, DeviceState::Init, DeviceState::CoordStarting];
	let mut f = Box::pin(api.wait_for_state(&[DeviceState::ZbCoord], &allowed));

	api.on_frame(device_state(0x00));
	assert!(poll(&mut f).is_none());
	assert_eq!(api.events().zdo_on_state_change.subscriber_count(), 1);

	api.on_frame(areq(ZdoCommand::StateChangeInd, &[0x08]));
	assert!(poll(&mut f).is_none());

	api.on_frame(areq(ZdoCommand::StateChangeInd, &[0x09]));
	assert_eq!(poll(&mut f).unwrap().unwrap(), DeviceState::ZbCoord);
	assert_eq!(api.events().zdo_on_state_change.subscriber_count(), 0);
}

#[test]
fn wait_for_state_rejects_non_allowed_state() {
	let (api, _) = setup();

	let mut f = Box::pin(api.wait_for_state(&[DeviceState::ZbCoord], &[DeviceState::Init]));
	api.on_frame(device_state(0x00));
	assert!(matches!(poll(&mut f), Some(Err(Error::InvalidState(DeviceState::Hold)))));

	let mut f = Box::pin(api.wait_for_state(&[DeviceState::ZbCoord], &[DeviceState::Init]));
	api.on_frame(device_state(0x01));
	api.on_frame(areq(ZdoCommand::StateChangeInd, &[0x0A]));
	assert!(matches!(poll(&mut f), Some(Err(Error::InvalidState(DeviceState::NwkOrphan)))));
}

fn data_request() -> DataRequest {
	DataRequest {
		dst_addr: 0x1234,
		dst_endpoint: 1,
		src_endpoint: 1,
		cluster_id: 0x0006,
		trans_id: 0x2A,
		options: 0,
		radius: 0x0F,
		data: vec![0x01, 0x00, 0x01]
	}
}

#[test]
fn data_request_checks_echoed_transaction() {
	let (api, _) = setup();

	let mut f = Box::pin(api.af_data_request(data_request()));
	assert_eq!(api.take_outbound()[0].payload, vec![0x34, 0x12, 0x01, 0x01, 0x06, 0x00, 0x2A, 0x00, 0x0F, 0x03, 0x01, 0x00, 0x01]);
	api.on_frame(srsp(AfCommand::DataRequest, &[0x00]));
	api.on_frame(areq(AfCommand::DataConfirm, &[0x00, 0x01, 0x2A]));
	assert!(matches!(poll(&mut f), Some(Ok(()))));

	let mut f = Box::pin(api.af_data_request(data_request()));
	api.on_frame(srsp(AfCommand::DataRequest, &[0x00]));
	api.on_frame(areq(AfCommand::DataConfirm, &[0x00, 0x01, 0x2B]));
	assert!(matches!(poll(&mut f), Some(Err(Error::Correlation(_)))));

	let mut f = Box::pin(api.af_data_request(data_request()));
	api.on_frame(srsp(AfCommand::DataRequest, &[0x00]));
	api.on_frame(areq(AfCommand::DataConfirm, &[0xE9, 0x01, 0x2A]));
	assert!(matches!(poll(&mut f), Some(Err(Error::Status(0xE9)))));
}

#[test]
fn permit_join_returns_echoed_address() {
	let (api, _) = setup();

	let mut f = Box::pin(api.zdo_mgmt_permit_join(AddrMode::ShortAddress, 0x0000, 0x3C, 0));
	assert_eq!(api.take_outbound()[0].payload, vec![0x02, 0x00, 0x00, 0x3C, 0x00]);
	api.on_frame(srsp(ZdoCommand::MgmtPermitJoinReq, &[0x00]));
	api.on_frame(areq(ZdoCommand::MgmtPermitJoinRsp, &[0x00, 0x00, 0x00]));
	assert_eq!(poll(&mut f).unwrap().unwrap(), 0x0000);

	let mut f = Box::pin(api.zdo_mgmt_leave(0x1234, 0x0102, 0));
	api.on_frame(srsp(ZdoCommand::MgmtLeaveReq, &[0x00]));
	api.on_frame(areq(ZdoCommand::MgmtLeaveRsp, &[0x34, 0x12, 0x01]));
	assert!(matches!(poll(&mut f), Some(Err(Error::Status(0x01)))));
}

#[test]
fn mgmt_bind_decodes_table() {
	let (api, _) = setup();
	let mut f = Box::pin(api.zdo_mgmt_bind_req(0x1234, 0));

	api.on_frame(srsp(ZdoCommand::MgmtBindReq, &[0x00]));
	api.on_frame(areq(ZdoCommand::MgmtBindRsp, &[
		0x34, 0x12, 0x00,
		0x01, 0x00, 0x01,
		0x04, 0x03, 0x02, 0x01, 0x00, 0x4B, 0x12, 0x00, 0x01, 0x06, 0x00,
		0x03, 0x08, 0x07, 0x06, 0x05, 0x00, 0x4B, 0x12, 0x00, 0x02
	]));

	let table = poll(&mut f).unwrap().unwrap();
	assert_eq!(table.total_entries, 1);
	assert_eq!(table.entries.len(), 1);
	assert_eq!(table.entries[0].cluster_id, 0x0006);
	assert_eq!(table.entries[0].target.ieee(), Some((0x0012_4B00_0506_0708, 2)));
}

#[test]
fn typed_configuration_checks_echoed_option() {
	let (api, _) = setup();

	let mut f = Box::pin(api.sapi_read_configuration::<PanId>());
	assert_eq!(api.take_outbound()[0].payload, vec![0x83]);
	api.on_frame(srsp(SapiCommand::ReadConfiguration, &[0x00, 0x83, 0x02, 0x34, 0x12]));
	assert_eq!(poll(&mut f).unwrap().unwrap(), PanId(0x1234));

	let mut f = Box::pin(api.sapi_read_configuration::<PanId>());
	assert_eq!(api.take_outbound()[0].payload, vec![0x83]);
	api.on_frame(srsp(SapiCommand::ReadConfiguration, &[0x00, 0x84, 0x02, 0x34, 0x12]));
	assert!(matches!(poll(&mut f), Some(Err(Error::Mismatch(_)))));

	let mut f = Box::pin(api.sapi_write_configuration(&PanId(0xABCD)));
	assert_eq!(api.take_outbound()[0].payload, vec![0x83, 0x02, 0xCD, 0xAB]);
	api.on_frame(srsp(SapiCommand::WriteConfiguration, &[0x00]));
	assert!(matches!(poll(&mut f), Some(Ok(()))));
}

#[test]
fn shutdown_fails_pending_and_keeps_events() {
	let (api, _) = setup();
	let mut ping = Box::pin(api.sys_ping());
	api.take_outbound();
	let mut bind = issue_bind(&api);
	api.on_frame(srsp(ZdoCommand::BindReq, &[0x00]));

	api.shutdown(Error::Shutdown("port closed".to_string()));

	assert!(matches!(poll(&mut ping), Some(Err(Error::Shutdown(_)))));
	assert!(matches!(poll(&mut bind), Some(Err(Error::Shutdown(_)))));
	assert_eq!(api.pending_handlers(), EVENT_HANDLERS);
	assert_eq!(api.next_deadline(), None);
}

#[test]
fn shutdown_fails_pending_reset() {
	let (api, _) = setup();
	let mut f = Box::pin(api.sys_reset(false));

	api.shutdown(Error::Shutdown("port closed".to_string()));

	assert!(matches!(poll(&mut f), Some(Err(Error::Shutdown(_)))));
	assert_eq!(api.events().sys_on_reset.subscriber_count(), 0);

	//a later indication has nobody left to complete
	api.on_frame(areq(SysCommand::ResetInd, &[0x00, 0x02, 0x01, 0x02, 0x07, 0x01]));
	assert_eq!(api.pending_handlers(), EVENT_HANDLERS);
}

#[test]
fn shutdown_fails_wait_for_state_subscription() {
	let (api, _) = setup();
	let mut f = Box::pin(api.wait_for_state(&[DeviceState::ZbCoord], &[DeviceState::Hold]));

	api.on_frame(device_state(0x00));
	assert!(poll(&mut f).is_none());
	assert_eq!(api.events().zdo_on_state_change.subscriber_count(), 1);

	api.shutdown(Error::Shutdown("port closed".to_string()));

	assert!(matches!(poll(&mut f), Some(Err(Error::Shutdown(_)))));
	assert_eq!(api.events().zdo_on_state_change.subscriber_count(), 0);
}

#[test]
fn shutdown_from_subscriber_applies_after_dispatch() {
	let (api, _) = setup();
	let mut ping = Box::pin(api.sys_ping());

	let session = api.clone();
	let _subscription = api.events().zdo_on_permit_join.subscribe(move |_| {
		session.shutdown(Error::Shutdown("closed by subscriber".to_string()));
	});

	api.on_frame(areq(ZdoCommand::PermitJoinInd, &[0x3C]));

	assert!(matches!(poll(&mut ping), Some(Err(Error::Shutdown(_)))));
	assert_eq!(api.pending_handlers(), EVENT_HANDLERS);
	assert!(api.take_outbound().is_empty());
}

#[test]
fn dropping_session_resolves_pending() {
	let (api, _) = setup();
	let mut f = Box::pin(api.sys_ping());

	drop(api);

	assert!(matches!(poll(&mut f), Some(Err(Error::Shutdown(_)))));
}

#[test]
fn subscriber_may_issue_requests() {
	let (api, _) = setup();

	let session = api.clone();
	let pings = Rc::new(RefCell::new(Vec::new()));
	let p = pings.clone();
	let _subscription = api.events().zdo_on_end_device_announce.subscribe(move |_| {
		p.borrow_mut().push(Box::pin(session.sys_ping()));
	});

	api.on_frame(areq(ZdoCommand::EndDeviceAnnceInd, &[0x34, 0x12, 0x34, 0x12, 1, 2, 3, 4, 5, 6, 7, 8, 0x8E]));

	assert_eq!(api.take_outbound(), vec![ZnpFrame::new(CommandType::Sreq, SysCommand::Ping, vec![])]);
	assert_eq!(api.pending_handlers(), EVENT_HANDLERS + 1);

	api.on_frame(srsp(SysCommand::Ping, &[0x79, 0x00]));

	let mut f = pings.borrow_mut().remove(0);
	assert_eq!(poll(&mut f).unwrap().unwrap(), Capability(0x0079));
}
