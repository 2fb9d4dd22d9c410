//! Logging bootstrap shared by the binary and tests.

use std::str::FromStr;

use tracing::{Level, warn};

/// Parse a configured level name. Names are case-insensitive and `warning`
/// is accepted as an alias for `warn`.
pub fn parse_level(name: &str) -> Option<Level> {
    let name = name.trim();
    if name.eq_ignore_ascii_case("warning") {
        return Some(Level::WARN);
    }
    Level::from_str(name).ok()
}

/// Install the global fmt subscriber and return the level in effect.
/// Unknown names fall back to `info`. Only the first call installs a
/// subscriber; later calls are no-ops.
pub fn init(level: &str) -> Level {
    let parsed = parse_level(level);
    let effective = parsed.unwrap_or(Level::INFO);

    let installed = tracing_subscriber::fmt()
        .with_max_level(effective)
        .with_target(false)
        .try_init()
        .is_ok();
    if installed && parsed.is_none() {
        warn!(level, "unknown log level, using info");
    }
    effective
}
