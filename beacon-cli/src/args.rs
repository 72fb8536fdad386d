//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "lldp-beacon")]
#[command(version, about = "Announces this host to its link neighbours with LLDP", long_about = None)]
pub struct Cli {
    /// Only announce on this interface (repeatable)
    #[arg(short = 'I', long = "interface", value_name = "NAME", global = true)]
    pub interfaces: Vec<String>,

    /// TOML configuration file, re-read before every cycle
    #[arg(short, long, value_name = "PATH", env = "LLDP_BEACON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Advertised system name (defaults to the host name)
    #[arg(long, value_name = "NAME", env = "LLDP_BEACON_SYSTEM_NAME")]
    pub system_name: Option<String>,

    /// Advertised system description (defaults to OS version and processor count)
    #[arg(long, value_name = "TEXT", env = "LLDP_BEACON_SYSTEM_DESCRIPTION")]
    pub system_description: Option<String>,

    /// Seconds between announcement cycles
    #[arg(
        short = 't',
        long,
        value_name = "SECONDS",
        default_value = "30",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,

    /// Milliseconds to wait for a capture device to open and become ready
    #[arg(long, value_name = "MILLISECONDS", default_value = "10000")]
    pub ready_timeout: u64,

    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Verbose output (-v, -vv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List eligible interfaces and their capture devices
    Interfaces,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["lldp-beacon"]).unwrap();
        assert_eq!(cli.interval(), Duration::from_secs(30));
        assert_eq!(cli.ready_timeout(), Duration::from_secs(10));
        assert!(!cli.once);
        assert!(cli.interfaces.is_empty());
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_repeated_interface_and_verbosity() {
        let cli = Cli::try_parse_from([
            "lldp-beacon",
            "-I",
            "eth0",
            "--interface",
            "eth1",
            "-vv",
            "--once",
        ])
        .unwrap();
        assert_eq!(cli.interfaces, vec!["eth0", "eth1"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.once);
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(Cli::try_parse_from(["lldp-beacon", "--interval", "0"]).is_err());
    }

    #[test]
    fn test_interfaces_subcommand() {
        let cli = Cli::try_parse_from(["lldp-beacon", "interfaces", "-I", "eth0"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Interfaces));
        assert_eq!(cli.interfaces, vec!["eth0"]);
    }

    #[test]
    fn test_announcement_overrides() {
        let cli = Cli::try_parse_from([
            "lldp-beacon",
            "--system-name",
            "core-sw-01",
            "--system-description",
            "lab rack 4",
        ])
        .unwrap();
        assert_eq!(cli.system_name.as_deref(), Some("core-sw-01"));
        assert_eq!(cli.system_description.as_deref(), Some("lab rack 4"));
    }
}
