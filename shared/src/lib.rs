extern crate pretty_env_logger;

pub mod angles;
pub mod document;
pub mod object;
pub mod state;

pub use document::ConfigDocument;
pub use log::{error, info, warn};
pub use object::*;
pub use state::*;

use chrono::Local;
use std::io::Write;

pub const VERSION: (u32, u32) = (0, 3);
pub const VERSION_STR: &str = "0.3.0";

/// Milliseconds since the Unix epoch, the unit every storage timestamp is written in.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn init_logging() {
    // pretty_env_logger prints nothing without an explicit filter in the builder.
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned());

    let _ = pretty_env_logger::formatted_builder()
        .parse_filters(&filter)
        .format(|buf, record| {
            let level = buf.default_styled_level(record.level());
            // Only the crate name, e.g. placement_editor::bridge -> placement_editor
            let crate_name = record
                .module_path()
                .and_then(|path| path.split("::").next())
                .unwrap_or("unknown");
            writeln!(
                buf,
                "[{}] [{}] [{:>5}]: {}",
                Local::now().format("%H:%M:%S%.3f"),
                crate_name,
                level,
                record.args()
            )
        })
        .try_init();
}
