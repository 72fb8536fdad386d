//! Capture devices used to transmit raw frames
//!
//! A device is opened for a single send attempt and closed right after; no
//! handle outlives the cycle that opened it.

use beacon_core::{Error, InterfaceCandidate, Result};
use pcap::{Active, Capture, Device};
use std::time::Duration;
use tracing::debug;

/// Default snapshot length (maximum bytes per packet)
const DEFAULT_SNAPLEN: i32 = 65535;

/// A transmit-capable capture device
pub trait CaptureDevice: Send {
    /// Device name as reported by the capture library
    fn name(&self) -> &str;

    /// Whether the device currently holds an open handle
    fn is_open(&self) -> bool;

    /// Open the device, promiscuous when requested
    fn open(&mut self, promiscuous: bool, timeout: Duration) -> Result<()>;

    /// Transmit one complete Ethernet frame
    fn send(&mut self, frame: &[u8]) -> Result<()>;

    /// Release the handle; closing a closed device is a no-op
    fn close(&mut self);
}

/// Lists the capture devices available on the host
pub trait CaptureBackend: Send + Sync {
    fn devices(&self) -> Result<Vec<Box<dyn CaptureDevice>>>;
}

/// Index of the device whose name contains the candidate id, compared
/// case-insensitively
///
/// A device named exactly like the id is preferred, so `eth1` does not land on
/// `eth10`; otherwise the first containing name wins.
pub fn match_device<S: AsRef<str>>(
    device_names: &[S],
    candidate: &InterfaceCandidate,
) -> Option<usize> {
    let id = candidate.id.to_lowercase();
    let names: Vec<String> = device_names
        .iter()
        .map(|name| name.as_ref().to_lowercase())
        .collect();

    names
        .iter()
        .position(|name| *name == id)
        .or_else(|| names.iter().position(|name| name.contains(&id)))
}

/// libpcap device
pub struct PcapDevice {
    device: Device,
    capture: Option<Capture<Active>>,
}

impl PcapDevice {
    pub fn new(device: Device) -> Self {
        Self {
            device,
            capture: None,
        }
    }
}

impl CaptureDevice for PcapDevice {
    fn name(&self) -> &str {
        &self.device.name
    }

    fn is_open(&self) -> bool {
        self.capture.is_some()
    }

    fn open(&mut self, promiscuous: bool, timeout: Duration) -> Result<()> {
        debug!(device = %self.device.name, promiscuous, "Opening capture device");

        let name = self.device.name.clone();
        let timeout_ms = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        let capture = Capture::from_device(self.device.clone())
            .map_err(|e| Error::device(&name, format!("Failed to create capture: {}", e)))?
            .promisc(promiscuous)
            .snaplen(DEFAULT_SNAPLEN)
            .timeout(timeout_ms)
            .immediate_mode(true)
            .open()
            .map_err(|e| Error::device(&name, format!("Failed to open capture: {}", e)))?;

        self.capture = Some(capture);
        Ok(())
    }

    fn send(&mut self, frame: &[u8]) -> Result<()> {
        let capture = self
            .capture
            .as_mut()
            .ok_or_else(|| Error::send(&self.device.name, "device is not open"))?;

        capture
            .sendpacket(frame)
            .map_err(|e| Error::send(&self.device.name, e.to_string()))
    }

    fn close(&mut self) {
        if self.capture.take().is_some() {
            debug!(device = %self.device.name, "Closed capture device");
        }
    }
}

impl Drop for PcapDevice {
    fn drop(&mut self) {
        self.close();
    }
}

/// Capture devices reported by libpcap
#[derive(Debug, Default, Clone, Copy)]
pub struct PcapBackend;

impl PcapBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CaptureBackend for PcapBackend {
    fn devices(&self) -> Result<Vec<Box<dyn CaptureDevice>>> {
        let devices = Device::list()
            .map_err(|e| Error::device("*", format!("Failed to list capture devices: {}", e)))?;

        debug!(count = devices.len(), "Listed capture devices");

        Ok(devices
            .into_iter()
            .map(|device| Box::new(PcapDevice::new(device)) as Box<dyn CaptureDevice>)
            .collect())
    }
}
