use std::io::Write;

use log::LevelFilter;

/// Resolve the log level: explicit flag first, then `RUST_LOG`, then info.
pub fn resolve_level(level: Option<&str>) -> LevelFilter {
    level
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .or_else(|| std::env::var("RUST_LOG").ok().and_then(|v| v.parse().ok()))
        .unwrap_or(LevelFilter::Info)
}

pub fn init(level: Option<&str>) {
    let log_level = resolve_level(level);
    let result = env_logger::Builder::new()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {:5}] {}",
                buf.timestamp_seconds(),
                record.level(),
                record.args()
            )
        })
        .try_init();
    if result.is_ok() {
        log::info!("logger initialized (level: {log_level})");
    }
}
