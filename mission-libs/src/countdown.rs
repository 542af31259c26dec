use chrono::{DateTime, Duration, Utc};
use core::fmt;
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;

const TICK: std::time::Duration = std::time::Duration::from_secs(1);

/// Time left until the suggested mission
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CountdownStatus {
    Remaining(Duration),
    Begun,
}

impl CountdownStatus {
    /// # Examples
    /// ```
    /// use chrono::{Duration, TimeZone, Utc};
    /// use mission_libs::countdown::CountdownStatus;
    ///
    /// let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
    /// let later = now + Duration::seconds(26 * 3600 + 61);
    ///
    /// assert_eq!(
    ///     CountdownStatus::at(later, now).to_string(),
    ///     "Next mission in 26h 1m 1s"
    /// );
    /// assert_eq!(CountdownStatus::at(now, later), CountdownStatus::Begun);
    /// ```
    pub fn at(target: DateTime<Utc>, now: DateTime<Utc>) -> CountdownStatus {
        let remaining = target - now;
        if remaining <= Duration::zero() {
            CountdownStatus::Begun
        } else {
            CountdownStatus::Remaining(remaining)
        }
    }
}

impl fmt::Display for CountdownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountdownStatus::Begun => write!(f, "The mission has begun!"),
            CountdownStatus::Remaining(remaining) => {
                let millis = remaining.num_milliseconds();
                write!(
                    f,
                    "Next mission in {}h {}m {}s",
                    millis / 3_600_000,
                    (millis % 3_600_000) / 60_000,
                    (millis % 60_000) / 1000
                )
            }
        }
    }
}

/// A once-a-second countdown to the suggested mission, published on a
/// `watch` channel.
///
/// Only one countdown runs at a time: `start` cancels the one before it, and
/// so does dropping the `Countdown`. A countdown stops by itself after
/// publishing `Begun`.
pub struct Countdown {
    updates: Arc<watch::Sender<Option<CountdownStatus>>>,
    running: Option<(CancellationToken, JoinHandle<()>)>,
}

impl Default for Countdown {
    fn default() -> Self {
        Countdown::new()
    }
}

impl Countdown {
    pub fn new() -> Countdown {
        let (updates, _) = watch::channel(None);
        Countdown {
            updates: Arc::new(updates),
            running: None,
        }
    }

    /// The latest status is always available, `None` until a first start
    pub fn subscribe(&self) -> watch::Receiver<Option<CountdownStatus>> {
        self.updates.subscribe()
    }

    pub fn latest(&self) -> Option<CountdownStatus> {
        *self.updates.borrow()
    }

    /// Publishes the status right away, then ticks every second until the
    /// target passes.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self, target: DateTime<Utc>, now: DateTime<Utc>) {
        self.cancel();

        let status = CountdownStatus::at(target, now);
        self.updates.send_replace(Some(status));
        if status == CountdownStatus::Begun {
            debug!("mission at {} already began, not counting down", target);
            return;
        }

        info!("counting down to mission at {}", target);
        let token = CancellationToken::new();
        let task = tokio::spawn(tick(target, now, self.updates.clone(), token.clone()));
        self.running = Some((token, task));
    }

    pub fn cancel(&mut self) {
        if let Some((token, _)) = self.running.take() {
            token.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .map_or(false, |(token, task)| !token.is_cancelled() && !task.is_finished())
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn tick(
    target: DateTime<Utc>,
    started_at: DateTime<Utc>,
    updates: Arc<watch::Sender<Option<CountdownStatus>>>,
    token: CancellationToken,
) {
    let origin = Instant::now();
    let mut ticks = interval_at(origin + TICK, TICK);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("countdown to {} cancelled", target);
                return;
            }
            _ = ticks.tick() => {}
        }

        let elapsed = Duration::milliseconds(origin.elapsed().as_millis() as i64);
        let status = CountdownStatus::at(target, started_at + elapsed);
        updates.send_replace(Some(status));

        if status == CountdownStatus::Begun {
            info!("mission at {} has begun", target);
            return;
        }
    }
}
