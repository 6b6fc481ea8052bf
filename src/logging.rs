use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::settings::{config_dir, Settings};

pub const LOG_FILE: &str = "spendlog.log";

pub fn log_path() -> PathBuf {
    config_dir().join(LOG_FILE)
}

/// Route tracing output to the log file. The terminal belongs to the form, so
/// nothing is ever written to stdout/stderr. `RUST_LOG` overrides the
/// configured level. Failing to open the file leaves logging disabled.
pub fn init(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    init_at(&log_path(), filter);
}

fn init_at(path: &Path, filter: EnvFilter) {
    if let Some(dir) = path.parent() {
        if std::fs::create_dir_all(dir).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };

    // A subscriber may already be installed (several tests in one process);
    // the first one stays in place.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();
}
