use ccbuild_core::api::LoggingConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

/// Every target emitted by this workspace starts with this prefix
/// (`ccbuild_core`, `ccbuild_plugins`, `ccbuild_cli`, `ccbuild.process`).
const TARGET_PREFIX: &str = "ccbuild";

/// Level for targets outside this workspace when only a bare level is
/// configured.
const DEPENDENCY_LEVEL: &str = "warn";

/// Turn the configured level into filter directives. A bare level such as
/// `debug` applies to ccbuild targets only; anything containing `=` or `,`
/// is taken as a full directive string.
pub fn filter_directives(level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("{DEPENDENCY_LEVEL},{TARGET_PREFIX}={level}")
    }
}

fn log_dir(logging: &LoggingConfig) -> std::path::PathBuf {
    match logging
        .directory
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        Some(d) => std::path::PathBuf::from(d),
        None => std::env::temp_dir().join(TARGET_PREFIX),
    }
}

pub fn init_tracing(logging: &LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(filter_directives(&logging.level)).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = log_dir(logging);
        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("{TARGET_PREFIX}.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_applies_to_ccbuild_targets() {
        assert_eq!(filter_directives("debug"), "warn,ccbuild=debug");
        assert_eq!(filter_directives(" trace "), "warn,ccbuild=trace");
    }

    #[test]
    fn full_directives_pass_through() {
        assert_eq!(
            filter_directives("info,ccbuild.process=trace"),
            "info,ccbuild.process=trace"
        );
        assert_eq!(filter_directives("tokio=debug"), "tokio=debug");
    }

    #[test]
    fn directives_parse_as_filters() {
        for level in ["info", "trace", "info,ccbuild.process=trace"] {
            assert!(EnvFilter::try_new(filter_directives(level)).is_ok());
        }
    }

    #[test]
    fn log_dir_defaults_to_temp() {
        let mut cfg = LoggingConfig::default();
        assert_eq!(log_dir(&cfg), std::env::temp_dir().join("ccbuild"));

        cfg.directory = Some("  ".into());
        assert_eq!(log_dir(&cfg), std::env::temp_dir().join("ccbuild"));

        cfg.directory = Some("/var/log/ccbuild".into());
        assert_eq!(log_dir(&cfg), std::path::PathBuf::from("/var/log/ccbuild"));
    }
}
