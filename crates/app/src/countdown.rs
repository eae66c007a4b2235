//! Synchronized countdown — a once-per-second callback aligned to wall-clock
//! second boundaries.
//!
//! Starting a countdown arms a one-shot timer for the remainder of the
//! current second. When it fires the callback runs once and a repeating
//! one-second timer takes over, so every later tick lands on (or just
//! after) a second boundary and a seconds display never skips or repeats.
//!
//! Stopping is idempotent. A callback already running when
//! [`CountdownHandle::stop`] is called may still complete.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use autosnooze_domain::time::{Clock, SystemClock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

const TICK: Duration = Duration::from_secs(1);
const MS_PER_SECOND: i64 = 1_000;

const SYNCING: u8 = 0;
const TICKING: u8 = 1;
const STOPPED: u8 = 2;

/// Which timer a [`CountdownHandle`] currently has armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    /// Waiting for the next second boundary.
    Syncing,
    /// Repeating every second.
    Ticking,
    /// No timer armed.
    Stopped,
}

/// Owned ticking session. Dropping the handle stops it.
#[derive(Debug)]
pub struct CountdownHandle {
    task: Option<JoinHandle<()>>,
    phase: Arc<AtomicU8>,
}

/// Start ticking against the system clock.
///
/// Must be called from within a tokio runtime.
pub fn start<F>(on_tick: F) -> CountdownHandle
where
    F: FnMut() + Send + 'static,
{
    start_with_clock(&SystemClock, on_tick)
}

/// Start ticking, reading the current millisecond offset from `clock`.
///
/// Must be called from within a tokio runtime.
pub fn start_with_clock<F>(clock: &impl Clock, mut on_tick: F) -> CountdownHandle
where
    F: FnMut() + Send + 'static,
{
    let delay = delay_until_next_second(clock.now_millis());
    let first_tick = Instant::now() + delay;
    let phase = Arc::new(AtomicU8::new(SYNCING));
    let task_phase = Arc::clone(&phase);

    let task = tokio::spawn(async move {
        tokio::time::sleep_until(first_tick).await;
        on_tick();

        if task_phase
            .compare_exchange(SYNCING, TICKING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let mut interval = tokio::time::interval_at(first_tick + TICK, TICK);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            on_tick();
        }
    });

    tracing::debug!(?delay, "countdown armed");

    CountdownHandle {
        task: Some(task),
        phase,
    }
}

/// Time from `now_millis` (epoch milliseconds) to the next whole second.
///
/// Exactly on a boundary this is a full second.
#[must_use]
pub fn delay_until_next_second(now_millis: i64) -> Duration {
    let offset = now_millis.rem_euclid(MS_PER_SECOND);
    let remaining = u64::try_from(MS_PER_SECOND - offset).unwrap_or(1_000);
    Duration::from_millis(remaining)
}

impl CountdownHandle {
    /// Cancel whichever timer is armed. Safe to call any number of times.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("countdown stopped");
        }
        self.phase.store(STOPPED, Ordering::Release);
    }

    #[must_use]
    pub fn phase(&self) -> CountdownPhase {
        match self.phase.load(Ordering::Acquire) {
            SYNCING => CountdownPhase::Syncing,
            TICKING => CountdownPhase::Ticking,
            _ => CountdownPhase::Stopped,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase() != CountdownPhase::Stopped
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use autosnooze_domain::time::FixedClock;

    use super::*;

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
        let ticks = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&ticks);
        (ticks, move || {
            handle.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn should_wait_for_rest_of_current_second() {
        assert_eq!(
            delay_until_next_second(1_700_000_000_250),
            Duration::from_millis(750)
        );
        assert_eq!(
            delay_until_next_second(1_700_000_000_999),
            Duration::from_millis(1)
        );
    }

    #[test]
    fn should_wait_full_second_when_exactly_on_boundary() {
        assert_eq!(
            delay_until_next_second(1_700_000_000_000),
            Duration::from_millis(1_000)
        );
    }

    #[test]
    fn should_handle_pre_epoch_millis() {
        assert_eq!(delay_until_next_second(-250), Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn should_fire_first_tick_on_next_second_boundary() {
        let (ticks, on_tick) = counter();
        let handle = start_with_clock(&FixedClock::from_millis(1_700_000_000_250), on_tick);
        settle().await;
        assert_eq!(handle.phase(), CountdownPhase::Syncing);

        tokio::time::advance(Duration::from_millis(749)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);

        tokio::time::advance(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
        assert_eq!(handle.phase(), CountdownPhase::Ticking);
    }

    #[tokio::test(start_paused = true)]
    async fn should_tick_every_second_after_sync() {
        let (ticks, on_tick) = counter();
        let _handle = start_with_clock(&FixedClock::from_millis(1_700_000_000_600), on_tick);

        tokio::time::advance(Duration::from_millis(400)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_millis(999)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);

        tokio::time::advance(Duration::from_millis(1_000)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_tick_when_stopped_before_first_tick() {
        let (ticks, on_tick) = counter();
        let mut handle = start_with_clock(&FixedClock::from_millis(1_700_000_000_100), on_tick);
        handle.stop();
        assert_eq!(handle.phase(), CountdownPhase::Stopped);

        tokio::time::advance(Duration::from_secs(3)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn should_stay_stopped_when_stop_called_twice() {
        let (ticks, on_tick) = counter();
        let mut handle = start_with_clock(&FixedClock::from_millis(1_700_000_000_500), on_tick);

        tokio::time::advance(Duration::from_millis(1_500)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);

        handle.stop();
        handle.stop();
        assert!(!handle.is_active());

        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn should_stop_ticking_when_handle_dropped() {
        let (ticks, on_tick) = counter();
        let handle = start_with_clock(&FixedClock::from_millis(1_700_000_000_000), on_tick);
        drop(handle);

        tokio::time::advance(Duration::from_secs(3)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn should_tick_within_a_second_on_system_clock() {
        let (ticks, on_tick) = counter();
        let _handle = start(on_tick);

        tokio::time::advance(Duration::from_millis(1_000)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
    }
}
