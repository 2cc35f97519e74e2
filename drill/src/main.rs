//! Drill
//!
//! Runs the libmonster file pipeline through its paces against the real
//! filesystem and writes a JSON report. Usage: `drill [config.toml]`.
//!
//! The drill's own log output goes to stdout through fern and, via the
//! log bridge, into a file logger configured from the given config.

mod logging;
mod runner;
mod scenarios;

use std::sync::Arc;

use libmonster::host::HostLogSource;
use libmonster::logger::FileLogger;
use libmonster::LogConfig;
use log::{error, info, warn};

use crate::logging::setup_logging;
use crate::runner::DrillRunner;
use crate::scenarios::Drills;

const REPORT_FILE: &str = "drill_report.json";

fn load_config() -> anyhow::Result<LogConfig> {
    match std::env::args().nth(1) {
        Some(path) => Ok(LogConfig::load(&path)?),
        None => Ok(LogConfig::default().with_app_name("drill")),
    }
}

fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    let source = Arc::new(HostLogSource::new());
    setup_logging(Arc::clone(&source))?;

    let file_logger = FileLogger::new(source.clone());
    let log_file = match file_logger.initialize_with(&config) {
        Ok(Some(path)) => {
            info!("Logging initialized, writing to: {}", path.display());
            Some(path.display().to_string())
        }
        Ok(None) => {
            info!("File logging disabled by config");
            None
        }
        Err(e) => {
            // Console logging keeps working without the file
            warn!("File logging unavailable: {}", e);
            None
        }
    };

    info!("Drill - libmonster file pipeline");

    let start_time = std::time::Instant::now();
    let drills = Drills::new(config.log_dir.join("drill-out"))?;
    let console_config = LogConfig {
        enable_log: true,
        ..config.clone()
    };

    let mut runner = DrillRunner::new();
    runner.run("two_event_scenario", || drills.two_event_scenario());
    runner.run("filtering", || drills.filtering());
    runner.run("concurrent_producers", || drills.concurrent_producers(8, 2_000));
    runner.run("lifecycle_guards", || drills.lifecycle_guards());
    runner.run("console_front_end", || drills.console_front_end(&console_config));

    let report = runner.report(start_time, log_file.clone());

    info!(
        "Drill summary: Total: {}, Passed: {}, Failed: {}",
        report.total, report.passed, report.failed
    );
    info!("Execution Time: {}ms", report.execution_time_ms);

    println!("\nDrill Summary");
    println!("=============");
    println!(
        "Total: {}, Passed: {}, Failed: {}",
        report.total, report.passed, report.failed
    );

    let report_path = config.log_dir.join(REPORT_FILE);
    match serde_json::to_string_pretty(&report) {
        Ok(json) => match std::fs::write(&report_path, json) {
            Ok(()) => info!("Report saved to: {}", report_path.display()),
            Err(e) => error!("Failed to write report: {}", e),
        },
        Err(e) => error!("Failed to serialize report: {}", e),
    }

    if log_file.is_some() {
        match file_logger.shutdown() {
            Ok(stats) => println!("Log file: {} records written", stats.written),
            Err(e) => eprintln!("Log file incomplete: {}", e),
        }
    }

    if report.failed > 0 {
        eprintln!("Drills failed");
        std::process::exit(1);
    }

    Ok(())
}
