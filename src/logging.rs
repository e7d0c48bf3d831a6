use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "LINKDIR_LOG";

pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "linkdir=warn",
        1 => "linkdir=info",
        _ => "linkdir=debug",
    }
}

/// Installs the stderr subscriber. `LINKDIR_LOG` overrides the verbosity
/// flags when set.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
