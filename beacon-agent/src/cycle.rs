//! The LLDP announcement cycle
//!
//! One cycle enumerates eligible interfaces, matches each to a capture
//! device and sends one LLDP frame per interface. Failures stay local to the
//! interface they happened on.

use beacon_capture::{
    enumerate, match_device, restrict_to, CaptureBackend, CaptureDevice, InterfaceSource,
    PcapBackend, SystemInterfaces,
};
use beacon_core::{AnnouncementConfig, Error, InterfaceCandidate, Result};
use beacon_lldp::{build_frame, build_tlvs};
use beacon_packet::EthernetFrame;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info, info_span};
use uuid::Uuid;

/// Bound on opening a device and waiting for it to become ready
pub const DEVICE_SETUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Interval between readiness checks
pub const READY_POLL_INTERVAL: Duration = Duration::from_millis(15);

/// Result of announcing on one interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceOutcome {
    /// Frame handed to the device
    Sent,
    /// Nothing attempted, e.g. no matching capture device
    Skipped(String),
    /// Open, readiness, assembly or send failed
    Failed(String),
}

impl fmt::Display for InterfaceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceOutcome::Sent => write!(f, "sent"),
            InterfaceOutcome::Skipped(reason) => write!(f, "skipped: {}", reason),
            InterfaceOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Summary of one cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Cycle identifier, also attached to the cycle's log span
    pub id: Uuid,
    /// Whether there was anything to send to
    pub attempted: bool,
    /// Per-interface outcomes, in enumeration order
    pub outcomes: Vec<(String, InterfaceOutcome)>,
}

impl CycleReport {
    fn nothing(id: Uuid) -> Self {
        Self {
            id,
            attempted: false,
            outcomes: Vec::new(),
        }
    }

    pub fn sent(&self) -> usize {
        self.count(|o| matches!(o, InterfaceOutcome::Sent))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, InterfaceOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, InterfaceOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&InterfaceOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Tuning of the announcement cycle
#[derive(Debug, Clone)]
pub struct AnnouncerOptions {
    /// Device open and readiness bound
    pub ready_timeout: Duration,
    /// Readiness poll interval
    pub poll_interval: Duration,
    /// Only announce on these OS interface names, all when empty
    pub interfaces: Vec<String>,
}

impl Default for AnnouncerOptions {
    fn default() -> Self {
        Self {
            ready_timeout: DEVICE_SETUP_TIMEOUT,
            poll_interval: READY_POLL_INTERVAL,
            interfaces: Vec::new(),
        }
    }
}

/// Sends LLDP announcements on every eligible interface
///
/// Cycles are serialized: a second `run_once` waits until the running one
/// has closed its last device.
pub struct Announcer {
    interfaces: Arc<dyn InterfaceSource>,
    backend: Arc<dyn CaptureBackend>,
    options: Arc<AnnouncerOptions>,
    lock: Arc<Mutex<()>>,
}

impl Announcer {
    pub fn new(interfaces: Arc<dyn InterfaceSource>, backend: Arc<dyn CaptureBackend>) -> Self {
        Self {
            interfaces,
            backend,
            options: Arc::new(AnnouncerOptions::default()),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Announcer over the host's interfaces and libpcap devices
    pub fn system() -> Self {
        Self::new(Arc::new(SystemInterfaces::new()), Arc::new(PcapBackend::new()))
    }

    pub fn with_options(mut self, options: AnnouncerOptions) -> Self {
        self.options = Arc::new(options);
        self
    }

    pub fn options(&self) -> &AnnouncerOptions {
        &self.options
    }

    /// Run one cycle
    ///
    /// Returns `false` when there was no eligible interface or no capture
    /// device, `true` once every interface has been attempted.
    pub async fn run_once(&self, config: AnnouncementConfig) -> Result<bool> {
        Ok(self.run_cycle(config).await?.attempted)
    }

    /// Run one cycle and report per-interface outcomes
    pub async fn run_cycle(&self, config: AnnouncementConfig) -> Result<CycleReport> {
        let guard = Arc::clone(&self.lock).lock_owned().await;

        let interfaces = Arc::clone(&self.interfaces);
        let backend = Arc::clone(&self.backend);
        let options = Arc::clone(&self.options);

        let task = tokio::task::spawn_blocking(move || {
            // held until every device of this cycle is closed
            let _guard = guard;
            cycle(interfaces.as_ref(), backend.as_ref(), &options, &config)
        });

        match task.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => {
                error!("Announcement cycle panicked");
                Err(Error::Task("announcement cycle panicked".to_string()))
            }
            Err(e) => {
                error!(error = %e, "Failed to join announcement cycle");
                Err(Error::Task(format!("Failed to join announcement cycle: {}", e)))
            }
        }
    }
}

fn cycle(
    interfaces: &dyn InterfaceSource,
    backend: &dyn CaptureBackend,
    options: &AnnouncerOptions,
    config: &AnnouncementConfig,
) -> Result<CycleReport> {
    let id = Uuid::now_v7();
    let span = info_span!("cycle", cycle = %id);
    let _enter = span.enter();

    let candidates = restrict_to(enumerate(interfaces)?, &options.interfaces);
    if candidates.is_empty() {
        info!("No eligible interfaces, nothing to announce");
        return Ok(CycleReport::nothing(id));
    }

    let mut devices = backend.devices()?;
    if devices.is_empty() {
        info!("No capture devices available, nothing to announce");
        return Ok(CycleReport::nothing(id));
    }

    let names: Vec<String> = devices.iter().map(|d| d.name().to_string()).collect();
    let mut report = CycleReport {
        id,
        attempted: true,
        outcomes: Vec::with_capacity(candidates.len()),
    };

    for candidate in &candidates {
        let outcome = match match_device(&names, candidate) {
            Some(index) => announce(devices[index].as_mut(), candidate, config, options),
            None => InterfaceOutcome::Skipped("no capture device found".to_string()),
        };

        match &outcome {
            InterfaceOutcome::Sent => {}
            InterfaceOutcome::Skipped(reason) => {
                debug!(interface = %candidate.name, %reason, "Skipped interface");
            }
            InterfaceOutcome::Failed(reason) => {
                error!(interface = %candidate.name, %reason, "Error sending LLDP packet");
            }
        }

        report.outcomes.push((candidate.name.clone(), outcome));
    }

    info!(
        sent = report.sent(),
        skipped = report.skipped(),
        failed = report.failed(),
        "Announcement cycle finished"
    );

    Ok(report)
}

/// Open, wait, build, send; the device is closed on every path
fn announce(
    device: &mut dyn CaptureDevice,
    candidate: &InterfaceCandidate,
    config: &AnnouncementConfig,
    options: &AnnouncerOptions,
) -> InterfaceOutcome {
    let mut session = DeviceSession { device };

    match session.transmit(candidate, config, options) {
        Ok(()) => InterfaceOutcome::Sent,
        Err(e @ Error::Assembly(_)) => {
            error!(interface = %candidate.name, error = %e, "LLDPDU invariant violated");
            InterfaceOutcome::Failed(e.to_string())
        }
        Err(e) => InterfaceOutcome::Failed(e.to_string()),
    }
}

/// Closes the device when dropped
struct DeviceSession<'a> {
    device: &'a mut dyn CaptureDevice,
}

impl DeviceSession<'_> {
    fn transmit(
        &mut self,
        candidate: &InterfaceCandidate,
        config: &AnnouncementConfig,
        options: &AnnouncerOptions,
    ) -> Result<()> {
        if !self.device.is_open() {
            self.device.open(true, options.ready_timeout)?;
        }
        self.wait_ready(options)?;

        let lldpdu = build_tlvs(candidate, config)?;
        let frame = build_frame(candidate, &lldpdu)?;
        if !frame.fits_mtu() {
            return Err(Error::assembly(format!(
                "frame of {} octets exceeds the {}-octet Ethernet maximum",
                frame.len(),
                EthernetFrame::MAX_FRAME_SIZE
            )));
        }

        info!(
            interface = %candidate.name,
            description = %candidate.description,
            device = %self.device.name(),
            "Sending LLDP packet"
        );
        self.device.send(&frame.to_bytes())
    }

    /// Poll until the device reports open, bounded by the setup timeout
    fn wait_ready(&self, options: &AnnouncerOptions) -> Result<()> {
        let started = Instant::now();

        while !self.device.is_open() {
            if started.elapsed() >= options.ready_timeout {
                return Err(Error::DeviceNotReady {
                    device: self.device.name().to_string(),
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }
            std::thread::sleep(options.poll_interval);
        }

        Ok(())
    }
}

impl Drop for DeviceSession<'_> {
    fn drop(&mut self) {
        self.device.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_display() {
        assert_eq!(InterfaceOutcome::Sent.to_string(), "sent");
        assert_eq!(
            InterfaceOutcome::Skipped("no capture device found".into()).to_string(),
            "skipped: no capture device found"
        );
    }

    #[test]
    fn test_report_counts() {
        let report = CycleReport {
            id: Uuid::now_v7(),
            attempted: true,
            outcomes: vec![
                ("eth0".into(), InterfaceOutcome::Sent),
                ("eth1".into(), InterfaceOutcome::Failed("send".into())),
                ("eth2".into(), InterfaceOutcome::Skipped("none".into())),
                ("eth3".into(), InterfaceOutcome::Sent),
            ],
        };
        assert_eq!(report.sent(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);
    }

    #[test]
    fn test_default_options() {
        let options = AnnouncerOptions::default();
        assert_eq!(options.ready_timeout, Duration::from_secs(10));
        assert_eq!(options.poll_interval, Duration::from_millis(15));
        assert!(options.interfaces.is_empty());
    }
}
