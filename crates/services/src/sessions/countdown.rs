use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::warn;

/// Background task calling `on_tick` once per period until it breaks.
///
/// Dropping a `Countdown` detaches the task; only `cancel` stops it.
#[derive(Debug)]
pub(crate) struct Countdown {
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Spawn on the current tokio runtime. Returns `None` outside a runtime.
    pub(crate) fn spawn<F, Fut>(period: Duration, mut on_tick: F) -> Option<Self>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let Ok(runtime) = Handle::try_current() else {
            warn!("no tokio runtime; countdown not started");
            return None;
        };

        let handle = runtime.spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if on_tick().await.is_break() {
                    break;
                }
            }
        });
        Some(Self { handle })
    }

    pub(crate) fn cancel(self) {
        self.handle.abort();
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
