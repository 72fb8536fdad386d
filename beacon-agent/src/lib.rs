//! Announcement orchestration for lldp-beacon
//!
//! This crate runs the LLDP announcement cycle and the periodic driver
//! around it:
//!
//! - `Announcer`: one serialized cycle over every eligible interface
//! - `Scheduler`: starts a cycle every interval until cancelled
//! - `ConfigSource`: where each cycle reads its announcement settings
//!
//! # Example
//!
//! ```no_run
//! use beacon_agent::{Announcer, Scheduler};
//! use beacon_core::AnnouncementConfig;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let announcer = Arc::new(Announcer::system());
//!     let config = AnnouncementConfig::default();
//!
//!     Scheduler::new(announcer)
//!         .run(&config, CancellationToken::new())
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod cycle;
pub mod scheduler;

pub use cycle::{
    Announcer, AnnouncerOptions, CycleReport, InterfaceOutcome, DEVICE_SETUP_TIMEOUT,
    READY_POLL_INTERVAL,
};
pub use scheduler::{ConfigSource, Scheduler, ANNOUNCE_INTERVAL};
