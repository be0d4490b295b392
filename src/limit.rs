//! Token-bucket admission queue that paces outbound API requests.
//!
//! Every dispatch borrows a [`QueuePermit`] first; permits drain a reservoir that a
//! lazily started timer refills one permit per tick. When the reservoir runs dry, or
//! the optional concurrency cap is reached, callers park in FIFO order until a refill
//! tick or a released permit admits them.

// std
use std::collections::VecDeque;
// crates.io
use tokio::{sync::oneshot, task::AbortHandle};
// self
use crate::{
	_prelude::*,
	config::{QUEUE_IDLE_FLOOR, QUEUE_RESERVOIR, QUEUE_RESERVOIR_REFILL_INTERVAL},
};

/// Admission queue shared by all requests of one client.
///
/// The refill timer is spawned on first use and cancels itself once the queue sits
/// idle with the reservoir above [`QUEUE_IDLE_FLOOR`], so an inactive client keeps no
/// background task alive. Dropping the queue aborts the timer outright.
#[derive(Debug)]
pub struct RequestQueue {
	inner: Arc<QueueInner>,
}
impl RequestQueue {
	/// Creates a queue with the given reservoir size, refill cadence, and optional
	/// cap on concurrently held permits.
	pub fn new(reservoir: u32, refill_interval: Duration, max_concurrency: Option<usize>) -> Self {
		Self {
			inner: Arc::new(QueueInner {
				capacity: reservoir,
				refill_interval,
				max_concurrency,
				state: Mutex::new(QueueState {
					reservoir,
					running: 0,
					waiters: VecDeque::new(),
					refill_task: None,
				}),
			}),
		}
	}

	/// Permits currently left in the reservoir.
	pub fn current_reservoir(&self) -> u32 {
		self.inner.state.lock().reservoir
	}

	/// Callers parked behind the reservoir or the concurrency cap.
	pub fn queued(&self) -> usize {
		self.inner.state.lock().waiters.len()
	}

	/// Permits currently held.
	pub fn running(&self) -> usize {
		self.inner.state.lock().running
	}

	/// Obtains a permit, parking the caller FIFO when none is available.
	pub async fn acquire(&self) -> QueuePermit {
		let waiter = {
			let mut state = self.inner.state.lock();

			self.spawn_refill_timer(&mut state);

			if state.reservoir > 0 && self.inner.has_concurrency_slot(&state) {
				state.reservoir -= 1;
				state.running += 1;

				None
			} else {
				let (admit_tx, admit_rx) = oneshot::channel();

				state.waiters.push_back(admit_tx);

				Some(admit_rx)
			}
		};

		if let Some(admit_rx) = waiter {
			// The sender lives in the queue state, which this borrow keeps alive; the
			// admitting side accounts for the permit before signalling.
			let _ = admit_rx.await;
		}

		QueuePermit { queue: self.inner.clone() }
	}

	fn spawn_refill_timer(&self, state: &mut QueueState) {
		if state.refill_task.is_some() {
			return;
		}

		let inner = Arc::downgrade(&self.inner);
		let interval = self.inner.refill_interval;
		let handle = tokio::spawn(async move {
			let mut ticks = tokio::time::interval(interval);

			// A tokio interval yields its first tick immediately; a fresh timer must
			// wait a full interval before refilling.
			ticks.tick().await;

			loop {
				ticks.tick().await;

				let Some(inner) = inner.upgrade() else { break };

				if !inner.refill_once() {
					break;
				}
			}
		});

		state.refill_task = Some(handle.abort_handle());
	}
}
impl Default for RequestQueue {
	fn default() -> Self {
		Self::new(QUEUE_RESERVOIR, QUEUE_RESERVOIR_REFILL_INTERVAL, None)
	}
}
impl Drop for RequestQueue {
	fn drop(&mut self) {
		if let Some(task) = self.inner.state.lock().refill_task.take() {
			task.abort();
		}
	}
}

#[derive(Debug)]
struct QueueInner {
	capacity: u32,
	refill_interval: Duration,
	max_concurrency: Option<usize>,
	state: Mutex<QueueState>,
}
impl QueueInner {
	fn has_concurrency_slot(&self, state: &QueueState) -> bool {
		self.max_concurrency.is_none_or(|cap| state.running < cap)
	}

	/// One timer tick. Returns `false` once the timer should stop, either because the
	/// reservoir is full or because the queue sits idle above the floor.
	fn refill_once(&self) -> bool {
		let mut state = self.state.lock();

		if state.reservoir < self.capacity {
			state.reservoir += 1;
		}

		self.admit_waiters(&mut state);

		let idle = state.waiters.is_empty()
			&& state.running == 0
			&& state.reservoir > QUEUE_IDLE_FLOOR;

		if idle || state.reservoir >= self.capacity {
			state.refill_task = None;

			false
		} else {
			true
		}
	}

	fn admit_waiters(&self, state: &mut QueueState) {
		while state.reservoir > 0 && self.has_concurrency_slot(state) {
			let Some(waiter) = state.waiters.pop_front() else { break };

			state.reservoir -= 1;
			state.running += 1;

			if waiter.send(()).is_err() {
				// The parked caller was cancelled; hand the permit back.
				state.reservoir += 1;
				state.running -= 1;
			}
		}
	}
}

#[derive(Debug)]
struct QueueState {
	reservoir: u32,
	running: usize,
	waiters: VecDeque<oneshot::Sender<()>>,
	refill_task: Option<AbortHandle>,
}

/// RAII admission slot returned by [`RequestQueue::acquire`].
///
/// Dropping the permit frees its concurrency slot and admits the next parked caller
/// when the reservoir allows it.
pub struct QueuePermit {
	queue: Arc<QueueInner>,
}
impl Debug for QueuePermit {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("QueuePermit(..)")
	}
}
impl Drop for QueuePermit {
	fn drop(&mut self) {
		let mut state = self.queue.state.lock();

		state.running = state.running.saturating_sub(1);

		self.queue.admit_waiters(&mut state);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test(start_paused = true)]
	async fn burst_drains_the_reservoir_without_waiting() {
		let queue = RequestQueue::new(4, Duration::from_millis(166), None);
		let mut permits = Vec::new();

		for _ in 0..4 {
			permits.push(queue.acquire().await);
		}

		assert_eq!(queue.current_reservoir(), 0);
		assert_eq!(queue.running(), 4);
		assert_eq!(queue.queued(), 0);
	}

	#[tokio::test(start_paused = true)]
	async fn overflow_waits_for_a_refill_tick() {
		let queue = RequestQueue::new(1, Duration::from_millis(166), None);
		let _first = queue.acquire().await;
		let mut second = std::pin::pin!(queue.acquire());

		// Not admitted yet: the reservoir is empty and no tick has passed.
		assert!(is_pending(second.as_mut()).await);
		assert_eq!(queue.queued(), 1);

		tokio::time::advance(Duration::from_millis(166)).await;

		let _second = second.await;

		assert_eq!(queue.queued(), 0);
		assert_eq!(queue.running(), 2);
	}

	#[tokio::test(start_paused = true)]
	async fn waiters_are_admitted_in_fifo_order() {
		let queue = Arc::new(RequestQueue::new(1, Duration::from_millis(166), None));
		let _first = queue.acquire().await;
		let order = Arc::new(Mutex::new(Vec::new()));
		let spawn_waiter = |label: &'static str| {
			let order = order.clone();
			let queue = queue.clone();

			tokio::spawn(async move {
				let _permit = queue.acquire().await;

				order.lock().push(label);
			})
		};
		let second = spawn_waiter("second");

		tokio::task::yield_now().await;

		let third = spawn_waiter("third");

		tokio::task::yield_now().await;
		tokio::time::advance(Duration::from_millis(166)).await;
		second.await.expect("The first parked waiter should be admitted by the first tick.");
		tokio::time::advance(Duration::from_millis(166)).await;
		third.await.expect("The second parked waiter should be admitted by the second tick.");

		assert_eq!(*order.lock(), ["second", "third"]);
	}

	#[tokio::test(start_paused = true)]
	async fn concurrency_cap_hands_slots_over_on_drop() {
		let queue = RequestQueue::new(8, Duration::from_millis(166), Some(1));
		let first = queue.acquire().await;
		let mut second = std::pin::pin!(queue.acquire());

		assert!(is_pending(second.as_mut()).await);
		assert_eq!(queue.queued(), 1);

		drop(first);

		let _second = second.await;

		assert_eq!(queue.running(), 1);
		// The handoff consumed a reservoir permit, not just the freed slot.
		assert_eq!(queue.current_reservoir(), 6);
	}

	#[tokio::test(start_paused = true)]
	async fn idle_timer_tops_up_once_and_stops() {
		let queue = RequestQueue::new(30, Duration::from_millis(166), None);

		drop(queue.acquire().await);
		drop(queue.acquire().await);

		assert_eq!(queue.current_reservoir(), 28);

		// First tick refills one permit and, with the queue idle above the floor,
		// cancels the timer. Further ticks would have refilled the rest.
		tokio::time::advance(Duration::from_millis(166)).await;
		tokio::task::yield_now().await;

		assert_eq!(queue.current_reservoir(), 29);

		tokio::time::advance(Duration::from_millis(166 * 5)).await;
		tokio::task::yield_now().await;

		assert_eq!(queue.current_reservoir(), 29);
		assert!(queue.inner.state.lock().refill_task.is_none());
	}

	#[tokio::test(start_paused = true)]
	async fn timer_restarts_after_an_idle_stop() {
		let queue = RequestQueue::new(30, Duration::from_millis(166), None);

		drop(queue.acquire().await);
		tokio::time::advance(Duration::from_millis(166)).await;
		tokio::task::yield_now().await;

		assert!(queue.inner.state.lock().refill_task.is_none());
		assert_eq!(queue.current_reservoir(), 30);

		drop(queue.acquire().await);

		assert!(queue.inner.state.lock().refill_task.is_some());

		tokio::time::advance(Duration::from_millis(166)).await;
		tokio::task::yield_now().await;

		assert_eq!(queue.current_reservoir(), 30);
	}

	/// Polls the future once and reports whether it is still pending.
	async fn is_pending(mut fut: std::pin::Pin<&mut impl Future>) -> bool {
		// std
		use std::task::Poll;

		std::future::poll_fn(|cx| Poll::Ready(fut.as_mut().poll(cx).is_pending())).await
	}
}
