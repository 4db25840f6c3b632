//! Message macros with debug-aware output routing.
//!
//! Every user-facing line goes through one of these macros. In normal mode
//! they print plain text to the console; in debug mode they emit `tracing`
//! events instead, so crawl progress and report statistics show up with
//! timestamps and levels next to the HTTP client's own diagnostics.
//!
//! ## Debug Mode
//!
//! Debug mode is on when `TIMESHEET_DEBUG` or `RUST_LOG` is set. The binary
//! calls [`init_tracing`] at startup, which installs a `tracing-subscriber`
//! formatter filtered by `RUST_LOG` (default `timesheet=debug`).
//!
//! ```text
//! msg_info!(..) ──▶ is_debug_mode()? ──yes──▶ tracing::info!
//!                                    └─no───▶ println!
//! ```
//!
//! ## Macros
//!
//! - `msg_print!`, `msg_success!`, `msg_info!`, `msg_warning!`: stdout or `info`/`warn`
//! - `msg_error!`: stderr or `error`
//! - `msg_debug!`: `debug` in debug mode, silent otherwise
//! - `msg_error_anyhow!`, `msg_bail_anyhow!`: build or return an `anyhow::Error`

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

/// Environment flag that turns on debug output.
pub const DEBUG_ENV: &str = "TIMESHEET_DEBUG";

static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// Returns whether debug mode is on. Cached after the first call.
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var(DEBUG_ENV).is_ok() || std::env::var("RUST_LOG").is_ok())
}

/// Installs the global tracing subscriber when debug mode is on.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    if !is_debug_mode() {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("timesheet=debug"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}

/// Prints a message as-is.
///
/// ```rust,ignore
/// msg_print!(Message::ReportHeader(author, from, to), true);
/// ```
#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("{}", $msg);
        } else {
            println!("{}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\n{}\n", $msg);
        } else {
            println!("\n{}\n", $msg);
        }
    };
}

/// Prints a success message with a ✅ prefix.
#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("✅ {}", $msg);
        } else {
            println!("✅ {}", $msg);
        }
    };
}

/// Prints an error message with a ❌ prefix to stderr.
#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::error!("❌ {}", $msg);
        } else {
            eprintln!("❌ {}", $msg);
        }
    };
}

/// Prints a warning with a ⚠️ prefix.
#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::warn!("⚠️ {}", $msg);
        } else {
            println!("⚠️ {}", $msg);
        }
    };
}

/// Prints an informational message with an ℹ️ prefix.
///
/// Used for crawl progress: session resolved, ids discovered, pages read.
#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("ℹ️ {}", $msg);
        } else {
            println!("ℹ️ {}", $msg);
        }
    };
}

/// Debug-only message; nothing is printed outside debug mode.
#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::debug!("🔍 {}", $msg);
        }
    };
}

/// Creates an `anyhow::Error` from a message.
#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        anyhow::anyhow!("❌ {}", $msg)
    };
}

/// Returns early with an `anyhow::Error` built from a message.
#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        anyhow::bail!("❌ {}", $msg)
    };
}
