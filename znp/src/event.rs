//fan-out of unsolicited indications to subscribers

use std::{ cell::{ Cell, RefCell }, rc::Rc };
use tracing::warn;

/// Handle passed to extended subscribers, lets a callback detach itself.
#[derive(Debug, Clone)]
pub struct Connection {
	connected: Rc<Cell<bool>>
}

impl Connection {
	fn new() -> Self {
		Self { connected: Rc::new(Cell::new(true)) }
	}

	pub fn disconnect(&self) {
		self.connected.set(false);
	}

	pub fn is_connected(&self) -> bool {
		self.connected.get()
	}
}

/// Detaches its subscriber when dropped, unless persisted.
#[must_use = "dropping a Subscription detaches the subscriber"]
pub struct Subscription {
	connection: Connection,
	persistent: bool
}

impl Subscription {
	/// Keeps the subscriber attached, the returned connection can still detach it.
	pub fn persist(mut self) -> Connection {
		self.persistent = true;
		self.connection.clone()
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if !self.persistent {
			self.connection.disconnect();
		}
	}
}

type Callback<T> = Rc<RefCell<dyn FnMut(&Connection, &T)>>;

struct Slot<T> {
	connection: Connection,
	callback: Callback<T>
}

impl<T> Clone for Slot<T> {
	fn clone(&self) -> Self {
		Self { connection: self.connection.clone(), callback: self.callback.clone() }
	}
}

pub struct Broadcaster<T> {
	slots: Rc<RefCell<Vec<Slot<T>>>>
}

impl<T> Clone for Broadcaster<T> {
	fn clone(&self) -> Self {
		Self { slots: self.slots.clone() }
	}
}

impl<T> Default for Broadcaster<T> {
	fn default() -> Self {
		Self { slots: Rc::new(RefCell::new(Vec::new())) }
	}
}

impl<T: 'static> Broadcaster<T> {
	pub fn subscribe<F: FnMut(&T) + 'static>(&self, mut f: F) -> Subscription {
		self.subscribe_extended(move |_, value| f(value))
	}

	pub fn subscribe_extended<F: FnMut(&Connection, &T) + 'static>(&self, f: F) -> Subscription {
		let connection = Connection::new();

		self.slots.borrow_mut().push(Slot {
			connection: connection.clone(),
			callback: Rc::new(RefCell::new(f))
		});

		Subscription { connection, persistent: false }
	}

	/// Calls every connected subscriber. Subscribers added meanwhile see the next emission.
	pub fn emit(&self, value: &T) {
		let snapshot: Vec<Slot<T>> = self.slots.borrow().iter().cloned().collect();

		for slot in snapshot {
			if !slot.connection.is_connected() {
				continue;
			}

			match slot.callback.try_borrow_mut() {
				Ok(mut callback) => (&mut *callback)(&slot.connection, value),
				Err(_) => warn!("Subscriber re-entered, emission skipped")
			}
		}

		self.slots.borrow_mut().retain(|s| s.connection.is_connected());
	}

	pub fn subscriber_count(&self) -> usize {
		self.slots.borrow().iter().filter(|s| s.connection.is_connected()).count()
	}
}
