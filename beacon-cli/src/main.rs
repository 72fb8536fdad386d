use anyhow::Context;
use beacon_agent::{Announcer, AnnouncerOptions, Scheduler};
use beacon_capture::{
    enumerate, match_device, restrict_to, CaptureBackend, PcapBackend, SystemInterfaces,
};
use beacon_cli::{logging, Cli, Commands, Overrides, Settings};
use beacon_lldp::readable_size;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Exit status of `--once` when there was nothing to announce on
const EXIT_NOTHING_TO_ANNOUNCE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            let chain = format!("{:#}", e);
            error!(error = %chain, "lldp-beacon terminated");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if let Some(Commands::Interfaces) = cli.command {
        list_interfaces(&cli)?;
        return Ok(ExitCode::SUCCESS);
    }

    match std::env::current_exe() {
        Ok(exe) => {
            let dir = exe.parent().unwrap_or(&exe);
            info!(directory = %dir.display(), "Execution directory");
        }
        Err(e) => warn!(error = %e, "Could not resolve execution directory"),
    }

    let overrides = Overrides {
        system_name: cli.system_name.clone(),
        system_description: cli.system_description.clone(),
    };
    let settings = Settings::load(cli.config.clone(), overrides)
        .context("loading announcement settings")?;
    info!(config = %settings.snapshot(), "Announcement settings");

    let options = AnnouncerOptions {
        ready_timeout: cli.ready_timeout(),
        interfaces: cli.interfaces.clone(),
        ..AnnouncerOptions::default()
    };
    let announcer = Arc::new(Announcer::system().with_options(options));

    if cli.once {
        let attempted = announcer
            .run_once(settings.reload())
            .await
            .context("announcement cycle failed")?;
        return Ok(if attempted {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(EXIT_NOTHING_TO_ANNOUNCE)
        });
    }

    let cancel = CancellationToken::new();
    spawn_signal_handler(cancel.clone());

    Scheduler::new(announcer)
        .with_interval(cli.interval())
        .run(&settings, cancel)
        .await
        .context("announcement cycle failed")?;

    Ok(ExitCode::SUCCESS)
}

fn list_interfaces(cli: &Cli) -> anyhow::Result<()> {
    let candidates = restrict_to(
        enumerate(&SystemInterfaces::new()).context("enumerating interfaces")?,
        &cli.interfaces,
    );

    let device_names: Vec<String> = match PcapBackend::new().devices() {
        Ok(devices) => devices.iter().map(|d| d.name().to_string()).collect(),
        Err(e) => {
            warn!(error = %e, "Capture devices unavailable");
            Vec::new()
        }
    };

    println!(
        "{:<16} {:<18} {:>8} {:>6}  {}",
        "INTERFACE", "MAC", "SPEED", "INDEX", "CAPTURE DEVICE"
    );
    for candidate in &candidates {
        let device = match_device(&device_names, candidate)
            .map(|index| device_names[index].as_str())
            .unwrap_or("-");
        println!(
            "{:<16} {:<18} {:>8} {:>6}  {}",
            candidate.name,
            candidate.mac_address.to_string(),
            readable_size(candidate.speed_bps),
            candidate.link_index(),
            device
        );
    }

    if candidates.is_empty() {
        println!("No eligible interfaces");
    }

    Ok(())
}

fn spawn_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, finishing current cycle");
        cancel.cancel();
    });
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                warn!(error = %e, "Could not install SIGTERM handler");
                ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    ctrl_c().await;
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}
