use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::state::{AppConfig, AppState};

/// Pick the default log level: explicit flag, then config file, then warn.
pub fn resolve_log_level(
    explicit: Option<LevelFilter>,
    config_path: Option<std::path::PathBuf>,
) -> LevelFilter {
    if let Some(level) = explicit {
        return level;
    }
    let config = AppState::load(config_path)
        .map(|state| state.config)
        .unwrap_or_default();
    parse_level(&config)
}

fn parse_level(config: &AppConfig) -> LevelFilter {
    config.log_level.parse().unwrap_or(LevelFilter::WARN)
}

/// Initialize logging to stderr and the panic handler.
///
/// stdout is reserved for command output so that commands can be piped
/// into one another.
pub fn init_logging(level: LevelFilter) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stderr_layer).init();

    register_panic_logger();
    report_build_info();
}

/// Registers a panic hook that logs panics using the `tracing` crate
pub fn register_panic_logger() {
    std::panic::set_hook(Box::new(|panic| match panic.location() {
        Some(loc) => {
            tracing::error!(
                message = %panic,
                panic.file = loc.file(),
                panic.line = loc.line(),
                panic.column = loc.column(),
            );
        }
        None => tracing::error!(message = %panic),
    }));
}

pub fn report_build_info() {
    let build = common::build_info!();

    tracing::debug!(
        build_profile = build.build_profile,
        version = build.version,
        repo_version = build.repo_version,
        protocol = build.protocol_version,
        "delphi starting up"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_level_wins() {
        let level = resolve_log_level(Some(LevelFilter::TRACE), None);
        assert_eq!(level, LevelFilter::TRACE);
    }

    #[test]
    fn test_level_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            log_level: "debug".to_string(),
        };
        AppState::init(Some(dir.path().to_path_buf()), Some(config)).unwrap();

        let level = resolve_log_level(None, Some(dir.path().to_path_buf()));
        assert_eq!(level, LevelFilter::DEBUG);
    }

    #[test]
    fn test_bad_level_falls_back() {
        let config = AppConfig {
            log_level: "loud".to_string(),
        };
        assert_eq!(parse_level(&config), LevelFilter::WARN);

        let dir = tempfile::tempdir().unwrap();
        let level = resolve_log_level(None, Some(dir.path().join("missing")));
        assert_eq!(level, LevelFilter::WARN);
    }
}
