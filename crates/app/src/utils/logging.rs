use std::time::Duration;

use inventaire_domain::InventaireError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Initialise the tracing subscriber.
///
/// Reads `RUST_LOG` for the filter, defaulting to `info`. Safe to call
/// more than once; subsequent calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"items::save_item"`).
/// * `elapsed` - Duration the command execution took.
/// * `error` - The failure, when any; `None` logs a success.
///
/// Failures carry the stable [`error_label`] so log lines can be grouped
/// by error kind. The helper keeps the command wrappers concise. Callers
/// must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&InventaireError>) {
    let duration_ms = elapsed.as_millis() as u64;

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(err) => {
            warn!(command, duration_ms, error = error_label(err), "command_execution_failure");
        }
    }
}

/// Convert an `InventaireError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &InventaireError) -> &'static str {
    match error {
        InventaireError::Validation(_) => "validation",
        InventaireError::Auth(_) => "auth",
        InventaireError::Write(_) => "write",
        InventaireError::Feed(_) => "feed",
        InventaireError::NotFound(_) => "not_found",
        InventaireError::Database(_) => "database",
        InventaireError::Config(_) => "config",
        InventaireError::Internal(_) => "internal",
    }
}
