//! Announcement configuration and host-derived defaults

use std::fmt;

/// Values advertised in the SystemName and SystemDescription TLVs
///
/// A snapshot is taken by the driver at every tick and passed by value into
/// the cycle; nothing in the cycle keeps it past the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementConfig {
    pub system_name: String,
    pub system_description: String,
}

impl AnnouncementConfig {
    pub fn new(system_name: impl Into<String>, system_description: impl Into<String>) -> Self {
        Self {
            system_name: system_name.into(),
            system_description: system_description.into(),
        }
    }

    /// Replace fields with the given overrides where present
    pub fn with_overrides(
        mut self,
        system_name: Option<&str>,
        system_description: Option<&str>,
    ) -> Self {
        if let Some(name) = system_name {
            self.system_name = name.to_string();
        }
        if let Some(desc) = system_description {
            self.system_description = desc.to_string();
        }
        self
    }
}

impl Default for AnnouncementConfig {
    /// Host name, and "<os version>, <n> Processors"
    fn default() -> Self {
        Self {
            system_name: host::hostname(),
            system_description: format!(
                "{}, {} Processors",
                host::os_version(),
                host::processor_count()
            ),
        }
    }
}

impl fmt::Display for AnnouncementConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.system_name, self.system_description)
    }
}

/// Host facts used for the default configuration
pub mod host {
    use sysinfo::System;

    /// Number of logical processors, 1 when it cannot be determined
    pub fn processor_count() -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// OS host name, "localhost" when it cannot be determined
    pub fn hostname() -> String {
        System::host_name().unwrap_or_else(|| "localhost".to_string())
    }

    /// OS name with the kernel release, e.g. "Linux 24.04 Ubuntu (kernel 6.8.0)"
    pub fn os_version() -> String {
        let os = System::long_os_version().unwrap_or_else(|| std::env::consts::OS.to_string());
        match System::kernel_version() {
            Some(kernel) => format!("{} (kernel {})", os, kernel),
            None => os,
        }
    }
}
