//! Fixed-cadence polling loop with a cancellation token

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use crate::models::Embedder;
use crate::storage::{InputCollection, OutputCollection};
use crate::ui;

use super::{CycleOutcome, GroupingPipeline};

/// Clonable cancellation token. `wait` sleeps but wakes as soon as any clone
/// calls `cancel`.
#[derive(Clone, Default)]
pub struct Shutdown {
	inner: Arc<(Mutex<bool>, Condvar)>,
}

impl Shutdown {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn cancel(&self) {
		let (lock, cvar) = &*self.inner;
		let mut cancelled = lock.lock().unwrap_or_else(|e| e.into_inner());
		*cancelled = true;
		cvar.notify_all();
	}

	pub fn is_cancelled(&self) -> bool {
		let (lock, _) = &*self.inner;
		*lock.lock().unwrap_or_else(|e| e.into_inner())
	}

	/// Cancels this token on Ctrl-C. A process can install only one handler.
	pub fn on_interrupt(&self) -> Result<(), ctrlc::Error> {
		let token = self.clone();
		ctrlc::set_handler(move || {
			ui::warn("Interrupted, stopping after the current cycle");
			token.cancel();
		})
	}

	/// Returns true if cancelled before or during the wait
	pub fn wait(&self, timeout: Duration) -> bool {
		let (lock, cvar) = &*self.inner;
		let guard = lock.lock().unwrap_or_else(|e| e.into_inner());
		let (guard, _) = cvar
			.wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
			.unwrap_or_else(|e| e.into_inner());
		*guard
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
	pub cycles: usize,
	pub published: usize,
	pub unchanged: usize,
	pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
	poll_interval: Duration,
	retry_delay: Duration,
	max_cycles: Option<usize>,
}

impl Scheduler {
	pub fn new(poll_interval: Duration, retry_delay: Duration) -> Self {
		Self {
			poll_interval,
			retry_delay,
			max_cycles: None,
		}
	}

	/// Stop after `n` cycles instead of running until cancelled
	pub fn max_cycles(mut self, n: usize) -> Self {
		self.max_cycles = Some(n);
		self
	}

	/// Runs cycles back to back, sleeping between them, until `shutdown` is
	/// cancelled or the cycle limit is reached. Cycle errors are logged and
	/// the whole cycle is retried after `retry_delay`.
	pub fn run<E, I, O>(&self, pipeline: &mut GroupingPipeline<E, I, O>, shutdown: &Shutdown) -> RunStats
	where
		E: Embedder,
		I: InputCollection,
		O: OutputCollection,
	{
		let mut stats = RunStats::default();

		ui::info(&format!(
			"Polling every {}s (retry after {}s)",
			self.poll_interval.as_secs_f32(),
			self.retry_delay.as_secs_f32()
		));

		while !shutdown.is_cancelled() {
			stats.cycles += 1;

			let delay = match pipeline.cycle() {
				Ok(CycleOutcome::Unchanged) => {
					stats.unchanged += 1;
					self.poll_interval
				}
				Ok(CycleOutcome::Published(_)) => {
					stats.published += 1;
					ui::info("Done! Waiting for next change...");
					self.poll_interval
				}
				Err(e) => {
					stats.failed += 1;
					ui::error(&format!("Error: {}", e));
					if e.is_fatal() {
						ui::warn("This will keep failing until the model or configuration is fixed");
					}
					ui::warn(&format!("Retrying in {}s", self.retry_delay.as_secs_f32()));
					self.retry_delay
				}
			};

			if self.max_cycles.is_some_and(|max| stats.cycles >= max) {
				break;
			}

			if shutdown.wait(delay) {
				break;
			}
		}

		ui::debug(&format!(
			"Stopped after {} cycles ({} published, {} unchanged, {} failed)",
			stats.cycles, stats.published, stats.unchanged, stats.failed
		));

		stats
	}
}
