use crate::domain::ports::{Cycle, SignalSink};
use std::future::Future;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_secs(30);

/// Drives a [`Cycle`] on a fixed interval and hands every outcome to a sink.
///
/// Cycles never overlap: each one is awaited to completion before the next tick
/// is taken, and ticks missed while a slow cycle was running are delayed rather
/// than fired in a burst.
#[derive(Debug, Clone)]
pub struct PollingScheduler {
    interval: Duration,
    max_cycles: Option<u64>,
}

impl Default for PollingScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_POLLING_INTERVAL)
    }
}

impl PollingScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_cycles: None,
        }
    }

    /// 跑完指定次數就停止
    pub fn with_max_cycles(mut self, max_cycles: u64) -> Self {
        self.max_cycles = Some(max_cycles);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn run<C: Cycle, S: SignalSink>(&self, cycle: &C, sink: &S) -> u64 {
        self.run_until(cycle, sink, std::future::pending::<()>()).await
    }

    /// 持續輪詢直到 `shutdown` 完成；進行中的 cycle 會先跑完。回傳完成的次數
    pub async fn run_until<C, S, F>(&self, cycle: &C, sink: &S, shutdown: F) -> u64
    where
        C: Cycle,
        S: SignalSink,
        F: Future<Output = ()>,
    {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!("⏱️ Polling every {:?}", self.interval);

        let mut completed = 0u64;
        loop {
            if self.max_cycles.is_some_and(|max| completed >= max) {
                tracing::info!("Reached {} cycles, stopping", completed);
                break;
            }

            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("🛑 Shutdown requested after {} cycles", completed);
                    break;
                }
                _ = ticker.tick() => {}
            }

            let outcome = cycle.run_cycle().await;
            if let Err(e) = sink.emit(&outcome) {
                tracing::warn!("Failed to emit signal: {}", e);
            }
            completed += 1;
        }

        completed
    }
}
