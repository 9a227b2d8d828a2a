use crate::config_loader::MasterConfig;
use env_logger::Builder;
use log::LevelFilter;

pub fn resolve_level(config: Option<&MasterConfig>, debug_flag: bool) -> LevelFilter {
    // CLI flag first, then config, then default
    let log_level_str = if debug_flag {
        "debug".to_string()
    } else {
        config
            .and_then(|c| c.app_settings.log_level.clone())
            .unwrap_or_else(|| "info".to_string())
    };

    match log_level_str.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        s => {
            eprintln!("Unrecognized log level '{}', defaulting to info.", s);
            LevelFilter::Info
        }
    }
}

pub fn initialize_logging(config: Option<&MasterConfig>, cli_matches: &clap::ArgMatches) {
    let mut builder = Builder::new();
    builder.filter_level(resolve_level(config, cli_matches.get_flag("debug")));
    // RUST_LOG still wins for per-module tuning.
    builder.parse_default_env();

    builder.try_init().unwrap_or_else(|e| {
        eprintln!("Failed to initialize logger: {}. Logging might not work as expected.", e);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_overrides_config() {
        let mut config = MasterConfig::default();
        config.app_settings.log_level = Some("warn".to_string());
        assert_eq!(resolve_level(Some(&config), true), LevelFilter::Debug);
        assert_eq!(resolve_level(Some(&config), false), LevelFilter::Warn);
    }

    #[test]
    fn unknown_level_defaults_to_info() {
        let mut config = MasterConfig::default();
        config.app_settings.log_level = Some("chatty".to_string());
        assert_eq!(resolve_level(Some(&config), false), LevelFilter::Info);
        assert_eq!(resolve_level(None, false), LevelFilter::Info);
    }
}
