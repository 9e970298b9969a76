//! Tracing subscriber setup for the binary.
//!
//! `RUST_LOG` sets the filter (default `course_authoring=info`) and
//! `LOG_FORMAT=json` switches to structured JSON lines. Logs go to stderr so
//! stdout stays clean for the JSON documents the commands print.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "course_authoring=info";

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}
