use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "matfx_engine=debug,wgpu_core=warn"). When unset, `RUST_LOG` is consulted,
/// then [`default_filter`].
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Crates that log at the MatFX verbosity level.
const MATFX_TARGETS: &[&str] = &["matfx", "matfx_engine"];

/// GPU stack internals, kept quiet unless asked for.
const GPU_TARGETS: &[&str] = &["wgpu_core", "wgpu_hal", "naga"];

/// Built-in filter: everything from MatFX (`trace` in debug builds, `info` in
/// release), GPU internals at `warn`, other crates at `info`.
pub fn default_filter() -> String {
    let level = if cfg!(debug_assertions) { "trace" } else { "info" };

    let mut directives = vec!["info".to_string()];
    directives.extend(MATFX_TARGETS.iter().map(|t| format!("{t}={level}")));
    directives.extend(GPU_TARGETS.iter().map(|t| format!("{t}=warn")));
    directives.join(",")
}

fn resolve_filter(explicit: Option<String>, env: Option<String>) -> String {
    explicit
        .or(env)
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(default_filter)
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);
        builder.is_test(cfg!(test));

        // Another logger may already be installed (e.g. by a test harness).
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized (filter: {filter})");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_covers_matfx_and_gpu_targets() {
        let filter = default_filter();
        let level = if cfg!(debug_assertions) { "trace" } else { "info" };

        assert!(filter.starts_with("info,"));
        assert!(filter.contains(&format!("matfx={level}")));
        assert!(filter.contains(&format!("matfx_engine={level}")));
        for target in ["wgpu_core", "wgpu_hal", "naga"] {
            assert!(filter.contains(&format!("{target}=warn")));
        }
    }

    #[test]
    fn explicit_filter_wins_over_env() {
        let f = resolve_filter(Some("warn".into()), Some("debug".into()));
        assert_eq!(f, "warn");
    }

    #[test]
    fn env_filter_used_when_no_explicit() {
        let f = resolve_filter(None, Some("matfx_engine=debug".into()));
        assert_eq!(f, "matfx_engine=debug");
    }

    #[test]
    fn blank_filter_falls_back_to_default() {
        assert_eq!(resolve_filter(None, Some("  ".into())), default_filter());
        assert_eq!(resolve_filter(None, None), default_filter());
    }

    #[test]
    fn init_twice_is_harmless() {
        let quiet = LoggingConfig {
            env_filter: Some("off".into()),
            ..LoggingConfig::default()
        };
        init_logging(quiet.clone());
        init_logging(quiet);
        assert!(INIT.is_completed());
    }
}
