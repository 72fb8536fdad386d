//! Error types for lldp-beacon

use thiserror::Error;

/// Result type alias for beacon operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for lldp-beacon
#[derive(Error, Debug)]
pub enum Error {
    /// Local I/O error (sysfs, procfs, configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The OS interface table could not be read at all
    #[error("Interface enumeration failed: {0}")]
    Enumeration(String),

    /// Capture device could not be listed or opened
    #[error("Capture device '{device}' error: {reason}")]
    Device { device: String, reason: String },

    /// Capture device did not report ready within the setup timeout
    #[error("Capture device '{device}' not ready after {waited_ms}ms")]
    DeviceNotReady { device: String, waited_ms: u64 },

    /// Frame transmission failed on an opened device
    #[error("Send on '{device}' failed: {reason}")]
    Send { device: String, reason: String },

    /// TLV value does not fit the 9-bit length field
    #[error("TLV {tlv} value of {len} octets exceeds the maximum of {max}")]
    TlvTooLong {
        tlv: &'static str,
        len: usize,
        max: usize,
    },

    /// Capability bit position does not fit the 16-bit capability field
    #[error("Capability {capability} uses bit {bit}, outside the 16-bit field")]
    CapabilityOutOfRange { capability: &'static str, bit: u32 },

    /// TLV sequence violates the LLDPDU invariants
    #[error("LLDPDU assembly error: {0}")]
    Assembly(String),

    /// Invalid configuration value or file
    #[error("Configuration error: {0}")]
    Config(String),

    /// Blocking cycle task failed to join
    #[error("Announcement task failed: {0}")]
    Task(String),
}

impl Error {
    /// Create a device error with a custom reason
    pub fn device<D: Into<String>, R: Into<String>>(device: D, reason: R) -> Self {
        Error::Device {
            device: device.into(),
            reason: reason.into(),
        }
    }

    /// Create a send error with a custom reason
    pub fn send<D: Into<String>, R: Into<String>>(device: D, reason: R) -> Self {
        Error::Send {
            device: device.into(),
            reason: reason.into(),
        }
    }

    /// Create an assembly error with a custom message
    pub fn assembly<S: Into<String>>(msg: S) -> Self {
        Error::Assembly(msg.into())
    }

    /// Create a configuration error with a custom message
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }
}
