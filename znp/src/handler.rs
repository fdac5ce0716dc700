use std::time::Duration;
use crate::{ error::Error, types::ZnpFrame };

/// What the chain does with a handler after it has seen a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandlerAction {
	/// Do not offer the frame to handlers further down the chain.
	pub stop_processing: bool,
	/// Remove this handler, it will not be called again.
	pub remove_me: bool
}

impl FrameHandlerAction {
	pub const PASS: Self = Self { stop_processing: false, remove_me: false };
	pub const CONSUME: Self = Self { stop_processing: true, remove_me: true };
	pub const HANDLED: Self = Self { stop_processing: true, remove_me: false };
	pub const EVICT: Self = Self { stop_processing: false, remove_me: true };
}

pub trait FrameHandler {
	fn handle(&mut self, frame: &ZnpFrame, ctx: &mut DispatchContext) -> FrameHandlerAction;

	/// Called instead of `handle` when the chain is torn down.
	fn abort(&mut self, _error: &Error) {}

	/// Permanent handlers survive a teardown of the chain.
	fn is_permanent(&self) -> bool {
		false
	}
}

pub type TimeoutHandler = Box<dyn FnOnce()>;

/// Handler to install once the current frame has been dispatched.
pub struct FollowUp {
	pub handler: Box<dyn FrameHandler>,
	pub timeout: Option<(Duration, TimeoutHandler)>
}

/// Pending operation completed outside the chain (ie. by an event subscriber).
///
/// Tearing the session down aborts it like a transient handler.
pub trait Detached {
	fn is_done(&self) -> bool;
	fn abort(self: Box<Self>, error: &Error);
}

/// Collects what a handler wants registered while the chain is being walked.
#[derive(Default)]
pub struct DispatchContext {
	follow_ups: Vec<FollowUp>,
	detached: Vec<Box<dyn Detached>>
}

impl DispatchContext {
	pub fn install(&mut self, follow_up: FollowUp) {
		self.follow_ups.push(follow_up);
	}

	pub fn track(&mut self, detached: Box<dyn Detached>) {
		self.detached.push(detached);
	}

	pub fn into_parts(self) -> (Vec<FollowUp>, Vec<Box<dyn Detached>>) {
		(self.follow_ups, self.detached)
	}
}

#[derive(Default)]
pub struct HandlerChain {
	handlers: Vec<Box<dyn FrameHandler>>
}

impl HandlerChain {
	pub fn push(&mut self, handler: Box<dyn FrameHandler>) {
		self.handlers.push(handler);
	}

	pub fn append(&mut self, mut other: HandlerChain) {
		self.handlers.append(&mut other.handlers);
	}

	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}

	/// Offers `frame` to every handler in insertion order, returns true if one stopped processing.
	pub fn dispatch(&mut self, frame: &ZnpFrame, ctx: &mut DispatchContext) -> bool {
		let mut i = 0;

		while i < self.handlers.len() {
			let action = self.handlers[i].handle(frame, ctx);

			if action.remove_me {
				self.handlers.remove(i);
			}
			else {
				i += 1;
			}

			if action.stop_processing {
				return true;
			}
		}

		false
	}

	/// Aborts every transient handler with `error`, permanent ones are kept.
	pub fn drain(&mut self, error: &Error) {
		let handlers = std::mem::take(&mut self.handlers);

		for mut handler in handlers {
			if handler.is_permanent() {
				self.handlers.push(handler);
			}
			else {
				handler.abort(error);
			}
		}
	}
}
