//! Periodic driver for the announcement cycle
//!
//! Cycles start on a fixed interval, the first one immediately. A cycle that
//! outlasts the interval delays the next tick instead of stacking up.
//! Cancellation is observed between cycles only; an in-flight cycle always
//! finishes and closes its devices.

use crate::cycle::Announcer;
use beacon_core::{AnnouncementConfig, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Default announcement interval
pub const ANNOUNCE_INTERVAL: Duration = Duration::from_secs(30);

/// Supplies the configuration used by the next cycle
pub trait ConfigSource: Send + Sync {
    fn current(&self) -> AnnouncementConfig;
}

impl ConfigSource for AnnouncementConfig {
    fn current(&self) -> AnnouncementConfig {
        self.clone()
    }
}

pub struct Scheduler {
    announcer: Arc<Announcer>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(announcer: Arc<Announcer>) -> Self {
        Self {
            announcer,
            interval: ANNOUNCE_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run cycles until `cancel` fires
    ///
    /// An error escaping a cycle stops the loop and is returned to the caller.
    pub async fn run(&self, config: &dyn ConfigSource, cancel: CancellationToken) -> Result<()> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_secs = self.interval.as_secs_f64(), "Starting LLDP announcements");

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Stopping LLDP announcements");
                    return Ok(());
                }
                _ = ticker.tick() => {}
            }

            if let Err(e) = self.announcer.run_once(config.current()).await {
                error!(error = %e, "Announcement cycle failed");
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_config_source() {
        let config = AnnouncementConfig::new("host", "desc");
        assert_eq!(config.current(), config);
    }
}
