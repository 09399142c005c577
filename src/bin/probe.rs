use anyhow::Result;
use clap::Parser;
use rtu_probe::probe::{
    init_logging, probe_loop, LoopOptions, ProbeConfig, ProbeError, Reporter, SerialChannel,
    StopFlag, SystemClock, EXIT_DEVICE_FAILURE,
};
use std::io;
use tracing::{error, info};

fn main() {
    // Parse CLI arguments
    let config = ProbeConfig::parse();

    init_logging(&config.log_level, config.is_json_format());

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }

    if let Err(e) = run(config) {
        error!(error = %e, "Probe failed");
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<ProbeError>()
            .map_or(EXIT_DEVICE_FAILURE, ProbeError::exit_code);
        std::process::exit(code);
    }
}

fn run(config: ProbeConfig) -> Result<()> {
    let settings = config.serial_settings();
    // Closed on drop, whichever way run() returns
    let mut channel = SerialChannel::open(&settings)?;

    info!(
        device = %settings.path,
        baud = settings.baud_rate,
        timeout_ms = config.timeout_ms,
        "Probing serial device"
    );

    let options = LoopOptions {
        count: config.count,
        rate_window: config.rate.then(|| config.rate_window()),
        keep_intervals: config.summary && config.count.is_some(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = probe_loop(
        &mut channel,
        &SystemClock,
        &options,
        &StopFlag::new(),
        &mut out,
        &mut io::stderr(),
    )?;

    if options.keep_intervals {
        Reporter.print_summary(&mut out, &summary)?;
    }

    Ok(())
}
