use std::sync::Arc;

use libmonster::host::{HostLogSource, LogBridge};

/// Console output through fern, with every record also forwarded to the host source.
pub fn setup_logging(source: Arc<HostLogSource>) -> Result<(), fern::InitError> {
    let bridge: Box<dyn log::Log> = Box::new(LogBridge::new(source, log::LevelFilter::Info));

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .chain(bridge)
        .apply()?;

    Ok(())
}
