use std::{ cell::Cell, rc::Rc, time::{ Duration, Instant } };
use crate::handler::TimeoutHandler;

pub trait Clock {
	fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> Instant {
		Instant::now()
	}
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
	start: Instant,
	offset: Rc<Cell<Duration>>
}

impl Default for ManualClock {
	fn default() -> Self {
		Self { start: Instant::now(), offset: Rc::new(Cell::new(Duration::ZERO)) }
	}
}

impl ManualClock {
	pub fn advance(&self, by: Duration) {
		self.offset.set(self.offset.get() + by);
	}
}

impl Clock for ManualClock {
	fn now(&self) -> Instant {
		self.start + self.offset.get()
	}
}

/// Shared active flag between a handler and its timer.
#[derive(Debug, Clone)]
pub struct TimerToken {
	active: Rc<Cell<bool>>
}

impl Default for TimerToken {
	fn default() -> Self {
		Self { active: Rc::new(Cell::new(true)) }
	}
}

impl TimerToken {

	pub fn is_active(&self) -> bool {
		self.active.get()
	}

	/// Returns true for the one caller that found the token active.
	pub fn disarm(&self) -> bool {
		self.active.replace(false)
	}
}

struct TimerEntry {
	deadline: Instant,
	token: TimerToken,
	on_expire: TimeoutHandler
}

#[derive(Default)]
pub struct TimerService {
	entries: Vec<TimerEntry>
}

impl TimerService {
	pub fn arm(&mut self, deadline: Instant, on_expire: TimeoutHandler) -> TimerToken {
		let token = TimerToken::default();

		self.entries.push(TimerEntry { deadline, token: token.clone(), on_expire });

		token
	}

	/// Takes the timers due at `now`, in deadline order. Disarmed ones are dropped silently.
	pub fn expire(&mut self, now: Instant) -> Vec<TimeoutHandler> {
		let entries = std::mem::take(&mut self.entries);

		let (mut due, pending): (Vec<_>, Vec<_>) = entries.into_iter()
			.filter(|e| e.token.is_active())
			.partition(|e| e.deadline <= now);

		self.entries = pending;

		due.sort_by_key(|e| e.deadline);

		due.into_iter()
			.filter_map(|e| if e.token.disarm() { Some(e.on_expire) } else { None })
			.collect()
	}

	pub fn next_deadline(&self) -> Option<Instant> {
		self.entries.iter()
			.filter(|e| e.token.is_active())
			.map(|e| e.deadline)
			.min()
	}

	pub fn len(&self) -> usize {
		self.entries.iter().filter(|e| e.token.is_active()).count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
