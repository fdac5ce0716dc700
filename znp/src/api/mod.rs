//frame multiplexer and the typed command façade

use std::{ cell::RefCell, collections::VecDeque, future::Future, rc::Rc, time::{ Duration, Instant } };
use deku::{ DekuContainerRead, DekuContainerWrite };
use tracing::{ debug, trace, warn };
use crate::{
	codec,
	config::ZnpConfig,
	correlator::{ self, pending, Continuation, EventHandler, Pending, SyncRequestHandler, TimedHandler },
	error::{ Error, Result },
	event::Broadcaster,
	handler::{ Detached, DispatchContext, FollowUp, FrameHandler, HandlerChain },
	timer::{ Clock, SystemClock, TimerService },
	types::*
};

pub mod sys;
pub mod af;
pub mod zdo;
pub mod sapi;
pub mod util;
pub mod app_cnf;

pub use af::{ DataRequest, EndpointDescriptor };
pub use sapi::*;

/// Largest payload an MT frame can carry.
pub const MAX_PAYLOAD_LEN: usize = 250;

/// Broadcasters of the unsolicited indications.
#[derive(Default)]
pub struct Events {
	pub sys_on_reset: Broadcaster<ResetInfo>,
	pub zdo_on_state_change: Broadcaster<DeviceState>,
	pub zdo_on_end_device_announce: Broadcaster<EndDeviceAnnounce>,
	pub zdo_on_trustcenter_device: Broadcaster<TrustCenterDevice>,
	pub zdo_on_permit_join: Broadcaster<PermitJoinIndication>,
	pub zdo_on_leave: Broadcaster<LeaveIndication>,
	pub zdo_on_node_desc: Broadcaster<NodeDescriptor>,
	pub zdo_on_active_ep: Broadcaster<ActiveEndpoints>,
	pub zdo_on_simple_desc: Broadcaster<SimpleDescriptor>,
	pub app_cnf_on_bdb_commissioning_notification: Broadcaster<BdbCommissioningNotification>,
	pub af_on_incoming_msg: Broadcaster<IncomingMsg>
}

/// Indication that completes a request after its SRSP.
pub struct Confirmation {
	pub command: ZnpCommand,
	pub timeout: Option<Duration>,
	pub prefix: Vec<u8>
}

#[derive(Default)]
struct Inner {
	chain: HandlerChain,
	timers: TimerService,
	outbound: VecDeque<ZnpFrame>,
	detached: Vec<Box<dyn Detached>>,
	//nested on_frame calls
	dispatch_depth: usize,
	deferred_shutdown: Option<Error>
}

impl Inner {
	fn install(&mut self, follow_up: FollowUp, now: Instant) {
		match follow_up.timeout {
			Some((duration, on_expire)) => {
				let token = self.timers.arm(now + duration, on_expire);
				self.chain.push(Box::new(TimedHandler::new(token, follow_up.handler)));
			},
			None => self.chain.push(follow_up.handler)
		}
	}

	fn track(&mut self, detached: Box<dyn Detached>) {
		self.detached.retain(|d| !d.is_done());
		self.detached.push(detached);
	}

	//puts the walked chain back in front of handlers added while it was out
	fn restore(&mut self, chain: HandlerChain) {
		let added = std::mem::replace(&mut self.chain, chain);
		self.chain.append(added);
	}
}

/// Handle to one co-processor session. Clones share the session.
#[derive(Clone)]
pub struct ZnpApi {
	inner: Rc<RefCell<Inner>>,
	events: Rc<Events>,
	clock: Rc<dyn Clock>,
	config: Rc<ZnpConfig>
}

impl ZnpApi {
	pub fn new(config: ZnpConfig) -> Self {
		Self::with_clock(config, Rc::new(SystemClock))
	}

	pub fn with_clock(config: ZnpConfig, clock: Rc<dyn Clock>) -> Self {
		let api = Self {
			inner: Rc::new(RefCell::new(Inner::default())),
			events: Rc::new(Events::default()),
			clock,
			config: Rc::new(config)
		};

		let events = api.events.clone();

		api.add_event(SysCommand::ResetInd, &events.sys_on_reset, false);
		api.add_event(ZdoCommand::StateChangeInd, &events.zdo_on_state_change, false);
		api.add_event(ZdoCommand::EndDeviceAnnceInd, &events.zdo_on_end_device_announce, false);
		api.add_event(ZdoCommand::TcDevInd, &events.zdo_on_trustcenter_device, false);
		api.add_event(ZdoCommand::PermitJoinInd, &events.zdo_on_permit_join, false);
		api.add_event(ZdoCommand::LeaveInd, &events.zdo_on_leave, false);
		api.add_event(ZdoCommand::NodeDescRsp, &events.zdo_on_node_desc, false);
		api.add_event(ZdoCommand::ActiveEpRsp, &events.zdo_on_active_ep, false);
		api.add_event(ZdoCommand::SimpleDescRsp, &events.zdo_on_simple_desc, false);
		api.add_event(AppCnfCommand::BdbCommissioningNotification, &events.app_cnf_on_bdb_commissioning_notification, false);
		//some firmwares append 3 bytes to INCOMING_MSG
		api.add_event(AfCommand::IncomingMsg, &events.af_on_incoming_msg, true);

		api
	}

	fn add_event<T: for<'a> DekuContainerRead<'a> + 'static>(&self, command: impl Into<ZnpCommand>, broadcaster: &Broadcaster<T>, allow_partial: bool) {
		self.add_handler(Box::new(EventHandler::new(CommandType::Areq, command.into(), broadcaster.clone(), allow_partial)));
	}

	pub fn events(&self) -> &Events {
		&self.events
	}

	pub fn config(&self) -> &ZnpConfig {
		&self.config
	}

	pub fn now(&self) -> Instant {
		self.clock.now()
	}

	/// Appends `handler` to the chain.
	pub fn add_handler(&self, handler: Box<dyn FrameHandler>) {
		self.inner.borrow_mut().chain.push(handler);
	}

	/// Appends a handler whose timeout, if any, starts now.
	pub fn install(&self, follow_up: FollowUp) {
		let now = self.clock.now();
		self.inner.borrow_mut().install(follow_up, now);
	}

	/// Registers an operation completed outside the chain so `shutdown` fails it too.
	pub fn track(&self, detached: Box<dyn Detached>) {
		self.inner.borrow_mut().track(detached);
	}

	pub fn pending_handlers(&self) -> usize {
		self.inner.borrow().chain.len()
	}

	/// Offers an inbound frame to the handler chain.
	pub fn on_frame(&self, frame: ZnpFrame) {
		trace!("<- {} {} {}", frame.command_type, frame.command, hex::encode(&frame.payload));

		//the chain is walked without holding the borrow so handlers and subscribers may issue requests
		let mut chain = {
			let mut inner = self.inner.borrow_mut();
			inner.dispatch_depth += 1;
			std::mem::take(&mut inner.chain)
		};
		let mut ctx = DispatchContext::default();

		let handled = chain.dispatch(&frame, &mut ctx);

		let now = self.clock.now();
		let mut inner = self.inner.borrow_mut();

		inner.restore(chain);
		inner.dispatch_depth -= 1;

		let (follow_ups, detached) = ctx.into_parts();

		for follow_up in follow_ups {
			inner.install(follow_up, now);
		}

		for d in detached {
			inner.track(d);
		}

		let deferred = if inner.dispatch_depth == 0 { inner.deferred_shutdown.take() } else { None };

		drop(inner);

		if !handled {
			debug!("Unhandled frame {} {}", frame.command_type, frame.command);
		}

		if let Some(error) = deferred {
			self.shutdown(error);
		}
	}

	/// Fires the timers that are due.
	pub fn expire_timers(&self) {
		let now = self.clock.now();
		let expired = self.inner.borrow_mut().timers.expire(now);

		for on_expire in expired {
			on_expire();
		}
	}

	pub fn next_deadline(&self) -> Option<Instant> {
		self.inner.borrow().timers.next_deadline()
	}

	/// Queues a frame for the transport.
	pub fn send_frame(&self, frame: ZnpFrame) {
		trace!("-> {} {} {}", frame.command_type, frame.command, hex::encode(&frame.payload));
		self.inner.borrow_mut().outbound.push_back(frame);
	}

	pub fn next_outbound(&self) -> Option<ZnpFrame> {
		self.inner.borrow_mut().outbound.pop_front()
	}

	pub fn take_outbound(&self) -> Vec<ZnpFrame> {
		self.inner.borrow_mut().outbound.drain(..).collect()
	}

	/// Fails every pending operation with `error`. Event subscriptions stay.
	///
	/// Called while a frame is dispatched, it takes effect once the dispatch is done.
	pub fn shutdown(&self, error: Error) {
		let mut inner = self.inner.borrow_mut();

		if inner.dispatch_depth > 0 {
			if inner.deferred_shutdown.is_none() {
				inner.deferred_shutdown = Some(error);
			}

			return;
		}

		warn!("Failing pending operations: {}", error);

		let mut chain = std::mem::take(&mut inner.chain);
		let detached = std::mem::take(&mut inner.detached);

		inner.outbound.clear();
		drop(inner);

		chain.drain(&error);

		for d in detached {
			d.abort(&error);
		}

		self.inner.borrow_mut().restore(chain);
	}

	/// Installs a SREQ handler for `responses` and sends the request, `continuation` gets the outcome.
	pub fn sreq_then(&self, command: impl Into<ZnpCommand>, responses: &[ZnpCommand], payload: Vec<u8>, continuation: Continuation) -> Result<()> {
		if responses.is_empty() {
			return Err(Error::NoResponseCommands);
		}

		if payload.len() > MAX_PAYLOAD_LEN {
			return Err(Error::PayloadTooLong(payload.len()));
		}

		self.add_handler(Box::new(SyncRequestHandler::new(responses.to_vec(), continuation)));
		self.send_frame(ZnpFrame::new(CommandType::Sreq, command, payload));

		Ok(())
	}

	pub fn raw_sreq(&self, command: impl Into<ZnpCommand>, payload: Vec<u8>) -> Pending<Vec<u8>> {
		let command = command.into();
		self.raw_sreq_with(command, &[command], payload)
	}

	/// SREQ whose SRSP may come back as any of `responses`.
	pub fn raw_sreq_with(&self, command: impl Into<ZnpCommand>, responses: &[ZnpCommand], payload: Vec<u8>) -> Pending<Vec<u8>> {
		let (completion, pending) = pending();

		let continuation: Continuation = Box::new(move |result, _| {
			completion.complete(result);
		});

		match self.sreq_then(command, responses, payload, continuation) {
			Ok(()) => pending,
			Err(e) => Pending::failed(e)
		}
	}

	pub(crate) fn request<T: DekuContainerWrite>(&self, command: impl Into<ZnpCommand>, request: &T) -> Pending<Vec<u8>> {
		match codec::encode(request) {
			Ok(payload) => self.raw_sreq(command, payload),
			Err(e) => Pending::failed(e)
		}
	}

	/// Waits for a frame of `command` whose payload starts with `prefix`, resolves to the rest of the payload.
	pub fn wait_for(&self, command_type: CommandType, command: impl Into<ZnpCommand>, timeout: Option<Duration>, prefix: Vec<u8>) -> Pending<Vec<u8>> {
		let (completion, pending) = pending();

		self.install(correlator::wait_for(command_type, command.into(), timeout, prefix, completion));

		pending
	}

	/// SREQ whose SRSP carries only a status, followed by a wait for `confirmation`.
	pub fn sreq_confirmed(&self, command: impl Into<ZnpCommand>, payload: Vec<u8>, confirmation: Confirmation) -> Pending<Vec<u8>> {
		let command = command.into();
		let (completion, pending) = pending();

		let continuation: Continuation = Box::new(move |result, ctx| {
			match result.and_then(|response| check_only_status(&response)) {
				Ok(()) => ctx.install(correlator::wait_for(CommandType::Areq, confirmation.command, confirmation.timeout, confirmation.prefix, completion)),
				Err(e) => { completion.complete(Err(e)); }
			}
		});

		match self.sreq_then(command, &[command], payload, continuation) {
			Ok(()) => pending,
			Err(e) => Pending::failed(e)
		}
	}

	pub(crate) fn request_confirmed<T: DekuContainerWrite>(&self, command: impl Into<ZnpCommand>, request: &T, confirmation: Confirmation) -> Pending<Vec<u8>> {
		match codec::encode(request) {
			Ok(payload) => self.sreq_confirmed(command, payload, confirmation),
			Err(e) => Pending::failed(e)
		}
	}
}

/// Applies `f` to the outcome of `pending`, errors skip it.
pub(crate) fn then<T, U, F: FnOnce(T) -> Result<U>>(pending: Pending<T>, f: F) -> impl Future<Output = Result<U>> {
	async move { f(pending.await?) }
}

/// Strips the leading status byte, which must be success.
pub fn check_status(response: &[u8]) -> Result<Vec<u8>> {
	match response.split_first() {
		None => Err(Error::EmptyResponse),
		Some((&STATUS_SUCCESS, rest)) => Ok(rest.to_vec()),
		Some((&status, _)) => Err(Error::Status(status))
	}
}

/// Like `check_status`, nothing may follow the status.
pub fn check_only_status(response: &[u8]) -> Result<()> {
	let rest = check_status(response)?;

	if !rest.is_empty() {
		return Err(Error::UnexpectedData(rest.len()));
	}

	Ok(())
}
