use env_logger::Env;

/// Initialize logging with a level taken from the `BATTLESHIP_LOG` environment variable.
/// Defaults to `info` if the variable is not set. Calling it twice is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(Env::new().filter_or("BATTLESHIP_LOG", "info"))
        .format_timestamp_millis()
        .try_init();
}
