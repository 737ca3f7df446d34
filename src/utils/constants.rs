/// Shared constants

/// Length of the identifier prefix shown in lists
pub const SHORT_ID_LEN: usize = 12;

/// Seconds the engine waits for a graceful stop before killing the process
pub const STOP_GRACE_PERIOD_SECS: i64 = 10;

/// Default number of trailing log lines
pub const DEFAULT_LOG_TAIL: usize = 100;

pub const DEFAULT_FOOTER_COLOR: &str = "white";
pub const DEFAULT_STATUS_COLOR: &str = "white";
pub const DEFAULT_ACCENT_COLOR: &str = "yellow";

/// Environment variable holding the tracing filter (e.g. `debug`, `docktui=trace`)
pub const LOG_ENV_VAR: &str = "DOCKTUI_LOG";

pub const APP_DIR_NAME: &str = "docktui";
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const FOOTER_HINT: &str = "R=refresh | S=start | T=stop | Q=quit";
