use std::str::FromStr;

use dlg_core::DialogueError;
use tracing::Level;

use crate::map_cli_log_level;

pub(crate) fn parse_log_level(raw: &str) -> Result<Level, DialogueError> {
    Level::from_str(raw.trim()).map_err(|_| {
        map_cli_log_level(format!(
            "Unsupported log level \"{}\". Use trace, debug, info, warn or error.",
            raw
        ))
    })
}

/// Installs the stderr subscriber. A subscriber that is already installed
/// (tests, embedding hosts) is left in place.
pub(crate) fn init_logging(raw_level: &str) -> Result<(), DialogueError> {
    let level = parse_log_level(raw_level)?;
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    Ok(())
}
