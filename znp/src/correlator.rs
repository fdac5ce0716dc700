//handlers backing pending operations and event subscriptions

use std::{ cell::RefCell, future::Future, pin::Pin, rc::Rc, task::{ Context, Poll }, time::Duration };
use deku::DekuContainerRead;
use futures::channel::oneshot;
use tracing::{ debug, warn };
use crate::{
	codec,
	error::{ Error, Result },
	event::{ Broadcaster, Connection },
	handler::{ Detached, DispatchContext, FollowUp, FrameHandler, FrameHandlerAction, TimeoutHandler },
	timer::TimerToken,
	types::{ CommandType, RpcErrorInfo, ZnpCommand, ZnpFrame }
};

/// Producer side of a pending operation, completes at most once.
pub struct Completion<T> {
	sender: Rc<RefCell<Option<oneshot::Sender<Result<T>>>>>
}

impl<T> Clone for Completion<T> {
	fn clone(&self) -> Self {
		Self { sender: self.sender.clone() }
	}
}

impl<T> Completion<T> {
	/// Returns false if the operation was already completed.
	pub fn complete(&self, result: Result<T>) -> bool {
		match self.sender.borrow_mut().take() {
			Some(sender) => {
				//receiver may be gone, the slot counts as completed anyway
				let _ = sender.send(result);
				true
			},
			None => false
		}
	}

	pub fn is_completed(&self) -> bool {
		self.sender.borrow().is_none()
	}
}

enum PendingState<T> {
	Waiting(oneshot::Receiver<Result<T>>),
	Failed(Option<Error>)
}

/// Consumer side of a pending operation.
pub struct Pending<T> {
	state: PendingState<T>
}

impl<T> Pending<T> {
	pub fn failed(error: Error) -> Self {
		Self { state: PendingState::Failed(Some(error)) }
	}
}

impl<T> Future for Pending<T> {
	type Output = Result<T>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let this = self.get_mut();

		match &mut this.state {
			PendingState::Waiting(receiver) => match Pin::new(receiver).poll(cx) {
				Poll::Ready(Ok(result)) => Poll::Ready(result),
				Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(Error::Shutdown("operation dropped".to_string()))),
				Poll::Pending => Poll::Pending
			},
			PendingState::Failed(error) => Poll::Ready(Err(error.take().unwrap_or(Error::Shutdown("polled after completion".to_string()))))
		}
	}
}

pub fn pending<T>() -> (Completion<T>, Pending<T>) {
	let (sender, receiver) = oneshot::channel();

	(
		Completion { sender: Rc::new(RefCell::new(Some(sender))) },
		Pending { state: PendingState::Waiting(receiver) }
	)
}

/// Completion fed by a persisted broadcaster subscriber.
pub struct SubscribedCompletion<T> {
	completion: Completion<T>,
	connection: Connection
}

impl<T> SubscribedCompletion<T> {
	pub fn new(completion: Completion<T>, connection: Connection) -> Self {
		Self { completion, connection }
	}
}

impl<T: 'static> Detached for SubscribedCompletion<T> {
	fn is_done(&self) -> bool {
		self.completion.is_completed() || !self.connection.is_connected()
	}

	fn abort(self: Box<Self>, error: &Error) {
		self.connection.disconnect();
		self.completion.complete(Err(error.clone()));
	}
}

/// Runs on the dispatch context with the SRSP payload or the error that ended the request.
pub type Continuation = Box<dyn FnOnce(Result<Vec<u8>>, &mut DispatchContext)>;

/// SREQ waiting for its SRSP, or an RPC error naming one of the response commands.
pub struct SyncRequestHandler {
	responses: Vec<ZnpCommand>,
	continuation: Option<Continuation>
}

impl SyncRequestHandler {
	pub fn new(responses: Vec<ZnpCommand>, continuation: Continuation) -> Self {
		Self { responses, continuation: Some(continuation) }
	}

	fn finish(&mut self, result: Result<Vec<u8>>, ctx: &mut DispatchContext) {
		if let Some(continuation) = self.continuation.take() {
			continuation(result, ctx);
		}
	}
}

impl FrameHandler for SyncRequestHandler {
	fn handle(&mut self, frame: &ZnpFrame, ctx: &mut DispatchContext) -> FrameHandlerAction {
		if frame.command_type != CommandType::Srsp {
			return FrameHandlerAction::PASS;
		}

		if self.responses.contains(&frame.command) {
			self.finish(Ok(frame.payload.clone()), ctx);
			return FrameHandlerAction::CONSUME;
		}

		if frame.command == ZnpCommand::RPC_ERROR {
			match codec::decode::<RpcErrorInfo>(&frame.payload) {
				Ok(info) => {
					if info.command_type() == Some(CommandType::Sreq) && self.responses.contains(&info.command()) {
						self.finish(Err(Error::Rpc(info.code)), ctx);
						return FrameHandlerAction::CONSUME;
					}
				},
				Err(e) => debug!("Unable to parse RPC error: {}", e)
			}
		}

		FrameHandlerAction::PASS
	}

	fn abort(&mut self, error: &Error) {
		self.finish(Err(error.clone()), &mut DispatchContext::default());
	}
}

/// Waits for a frame of the given command whose payload starts with `prefix`, delivers the rest.
pub struct WaitForHandler {
	command_type: CommandType,
	command: ZnpCommand,
	prefix: Vec<u8>,
	completion: Completion<Vec<u8>>
}

impl WaitForHandler {
	pub fn new(command_type: CommandType, command: ZnpCommand, prefix: Vec<u8>, completion: Completion<Vec<u8>>) -> Self {
		Self { command_type, command, prefix, completion }
	}
}

impl FrameHandler for WaitForHandler {
	fn handle(&mut self, frame: &ZnpFrame, _ctx: &mut DispatchContext) -> FrameHandlerAction {
		if frame.command_type == self.command_type && frame.command == self.command && frame.payload.starts_with(&self.prefix) {
			self.completion.complete(Ok(frame.payload[self.prefix.len()..].to_vec()));
			return FrameHandlerAction::CONSUME;
		}

		FrameHandlerAction::PASS
	}

	fn abort(&mut self, error: &Error) {
		self.completion.complete(Err(error.clone()));
	}
}

/// Builds the follow-up for a wait, the timeout completes it with `Error::Timeout`.
pub fn wait_for(command_type: CommandType, command: ZnpCommand, timeout: Option<Duration>, prefix: Vec<u8>, completion: Completion<Vec<u8>>) -> FollowUp {
	let timeout = timeout.map(|duration| {
		let completion = completion.clone();
		let on_expire: TimeoutHandler = Box::new(move || {
			completion.complete(Err(Error::Timeout));
		});

		(duration, on_expire)
	});

	FollowUp {
		handler: Box::new(WaitForHandler::new(command_type, command, prefix, completion)),
		timeout
	}
}

/// Ties a handler to a timer, once the timer fired the handler is evicted without seeing frames.
pub struct TimedHandler {
	token: TimerToken,
	inner: Box<dyn FrameHandler>
}

impl TimedHandler {
	pub fn new(token: TimerToken, inner: Box<dyn FrameHandler>) -> Self {
		Self { token, inner }
	}
}

impl FrameHandler for TimedHandler {
	fn handle(&mut self, frame: &ZnpFrame, ctx: &mut DispatchContext) -> FrameHandlerAction {
		if !self.token.is_active() {
			return FrameHandlerAction::EVICT;
		}

		let action = self.inner.handle(frame, ctx);

		if action.remove_me {
			self.token.disarm();
		}

		action
	}

	fn abort(&mut self, error: &Error) {
		if self.token.disarm() {
			self.inner.abort(error);
		}
	}

	fn is_permanent(&self) -> bool {
		self.inner.is_permanent()
	}
}

/// Permanent handler decoding one indication and handing it to a broadcaster.
pub struct EventHandler<T> {
	command_type: CommandType,
	command: ZnpCommand,
	broadcaster: Broadcaster<T>,
	allow_partial: bool
}

impl<T> EventHandler<T> {
	pub fn new(command_type: CommandType, command: ZnpCommand, broadcaster: Broadcaster<T>, allow_partial: bool) -> Self {
		Self { command_type, command, broadcaster, allow_partial }
	}
}

impl<T: for<'a> DekuContainerRead<'a> + 'static> FrameHandler for EventHandler<T> {
	fn handle(&mut self, frame: &ZnpFrame, _ctx: &mut DispatchContext) -> FrameHandlerAction {
		if frame.command_type != self.command_type || frame.command != self.command {
			return FrameHandlerAction::PASS;
		}

		let decoded = if self.allow_partial {
			codec::decode_partial::<T>(&frame.payload)
		}
		else {
			codec::decode::<T>(&frame.payload)
		};

		match decoded {
			Ok(value) => {
				self.broadcaster.emit(&value);
				FrameHandlerAction::HANDLED
			},
			Err(e) => {
				warn!("Exception while decoding event {}: {}", self.command, e);
				FrameHandlerAction::PASS
			}
		}
	}

	fn is_permanent(&self) -> bool {
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use futures::FutureExt;
	use crate::types::{ Subsystem, SysCommand, ZdoCommand, PermitJoinIndication };

	fn forward(completion: Completion<Vec<u8>>) -> Continuation {
		Box::new(move |result, _| { completion.complete(result); })
	}

	#[test]
	fn completion_is_single_shot() {
		let (completion, pending) = pending::<u8>();

		assert!(completion.complete(Ok(1)));
		assert!(!completion.complete(Err(Error::Timeout)));
		assert!(completion.is_completed());
		assert_eq!(pending.now_or_never().unwrap().unwrap(), 1);
	}

	#[test]
	fn dropped_completion_resolves_to_shutdown() {
		let (completion, pending) = pending::<u8>();

		drop(completion);
		assert!(matches!(pending.now_or_never(), Some(Err(Error::Shutdown(_)))));
	}

	#[test]
	fn subscribed_completion_abort_detaches() {
		let broadcaster = Broadcaster::<u8>::default();
		let (completion, pending) = pending::<u8>();

		let c = completion.clone();
		let connection = broadcaster.subscribe(move |v| { c.complete(Ok(*v)); }).persist();
		let detached: Box<dyn Detached> = Box::new(SubscribedCompletion::new(completion, connection));

		assert!(!detached.is_done());
		detached.abort(&Error::Timeout);

		assert_eq!(broadcaster.subscriber_count(), 0);
		assert!(matches!(pending.now_or_never(), Some(Err(Error::Timeout))));
	}

	#[test]
	fn rpc_error_for_other_command_passes() {
		let (completion, pending) = pending();
		let mut handler = SyncRequestHandler::new(vec![SysCommand::Version.into()], forward(completion));
		let mut ctx = DispatchContext::default();

		let other = ZnpFrame::new(CommandType::Srsp, ZnpCommand::RPC_ERROR, vec![0x02, 0x21, 0x01]);
		assert_eq!(handler.handle(&other, &mut ctx), FrameHandlerAction::PASS);

		let truncated = ZnpFrame::new(CommandType::Srsp, ZnpCommand::RPC_ERROR, vec![0x02, 0x21]);
		assert_eq!(handler.handle(&truncated, &mut ctx), FrameHandlerAction::PASS);

		let areq = ZnpFrame::new(CommandType::Srsp, ZnpCommand::RPC_ERROR, vec![0x02, 0x41, 0x02]);
		assert_eq!(handler.handle(&areq, &mut ctx), FrameHandlerAction::PASS);

		let matching = ZnpFrame::new(CommandType::Srsp, ZnpCommand::RPC_ERROR, vec![0x02, 0x21, 0x02]);
		assert_eq!(handler.handle(&matching, &mut ctx), FrameHandlerAction::CONSUME);
		assert!(matches!(pending.now_or_never(), Some(Err(Error::Rpc(2)))));
	}

	#[test]
	fn wait_for_strips_prefix() {
		let (completion, pending) = pending();
		let mut handler = WaitForHandler::new(CommandType::Areq, ZdoCommand::BindRsp.into(), vec![0x34, 0x12], completion);
		let mut ctx = DispatchContext::default();

		let other = ZnpFrame::new(CommandType::Areq, ZdoCommand::BindRsp, vec![0x35, 0x12, 0x00]);
		assert_eq!(handler.handle(&other, &mut ctx), FrameHandlerAction::PASS);

		let short = ZnpFrame::new(CommandType::Areq, ZdoCommand::BindRsp, vec![0x34]);
		assert_eq!(handler.handle(&short, &mut ctx), FrameHandlerAction::PASS);

		let frame = ZnpFrame::new(CommandType::Areq, ZdoCommand::BindRsp, vec![0x34, 0x12, 0x00]);
		assert_eq!(handler.handle(&frame, &mut ctx), FrameHandlerAction::CONSUME);
		assert_eq!(pending.now_or_never().unwrap().unwrap(), vec![0x00]);
	}

	#[test]
	fn timed_handler_evicts_after_timer_fired() {
		let (completion, pending) = pending();
		let token = TimerToken::default();
		let inner = WaitForHandler::new(CommandType::Areq, ZdoCommand::BindRsp.into(), vec![], completion.clone());
		let mut handler = TimedHandler::new(token.clone(), Box::new(inner));

		assert!(token.disarm());
		completion.complete(Err(Error::Timeout));

		let frame = ZnpFrame::new(CommandType::Areq, ZdoCommand::BindRsp, vec![0x00]);
		assert_eq!(handler.handle(&frame, &mut DispatchContext::default()), FrameHandlerAction::EVICT);
		assert!(matches!(pending.now_or_never(), Some(Err(Error::Timeout))));
	}

	#[test]
	fn event_decode_failure_passes() {
		let broadcaster = Broadcaster::<PermitJoinIndication>::default();
		let mut handler = EventHandler::new(CommandType::Areq, ZdoCommand::PermitJoinInd.into(), broadcaster, false);
		let mut ctx = DispatchContext::default();

		let bad = ZnpFrame::new(CommandType::Areq, ZdoCommand::PermitJoinInd, vec![0x3C, 0x00]);
		assert_eq!(handler.handle(&bad, &mut ctx), FrameHandlerAction::PASS);

		let unrelated = ZnpFrame::new(CommandType::Areq, ZnpCommand::new(Subsystem::ZDO, 0xCC), vec![0x3C]);
		assert_eq!(handler.handle(&unrelated, &mut ctx), FrameHandlerAction::PASS);

		let good = ZnpFrame::new(CommandType::Areq, ZdoCommand::PermitJoinInd, vec![0x3C]);
		assert_eq!(handler.handle(&good, &mut ctx), FrameHandlerAction::HANDLED);
		assert!(handler.is_permanent());
	}
}
