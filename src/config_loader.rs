use crate::app_config::{ApplicationConfig, KeyBindings};
use crate::common::timestamp_utils;
use crate::ui::i18n::Language;
use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Instant;

pub const DEFAULT_CONFIG_PATH: &str = "config/camsnap.yaml";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MasterConfig {
    #[serde(rename = "application")]
    pub app_settings: ApplicationConfig,
    pub keys: KeyBindings,
}

/// Loads the YAML configuration at `path`.
///
/// A missing file is only an error when the path was given explicitly;
/// otherwise the built-in defaults are returned.
pub fn load_config(path: &str, explicit: bool) -> Result<MasterConfig> {
    debug!("📄 Attempting to load config from: {}", path);
    let start_time = Instant::now();

    if !Path::new(path).exists() {
        if explicit {
            bail!("❌ Configuration file '{}' does not exist.", path);
        }
        info!("ℹ️ No configuration file at '{}', using built-in defaults.", path);
        let config = MasterConfig::default();
        validate_master_config(&config).context("Default configuration validation failed 👎")?;
        return Ok(config);
    }

    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file '{}'. 📖", path))?;
    let config = parse_config(&config_str)
        .with_context(|| format!("Failed to load configuration from '{}'. 💔", path))?;

    info!("✅ Successfully loaded and validated configuration from '{}' in {:?}", path, start_time.elapsed());
    Ok(config)
}

pub fn parse_config(config_str: &str) -> Result<MasterConfig> {
    let parse_start_time = Instant::now();
    let config: MasterConfig = serde_yaml::from_str(config_str)
        .context("Failed to parse YAML configuration")?;
    debug!("Parsed YAML in {:?}", parse_start_time.elapsed());

    validate_master_config(&config).context("Master configuration validation failed 👎")?;
    Ok(config)
}

/// Applies `--output`, `--camera` and `--lang` on top of the loaded file.
pub fn apply_cli_overrides(config: &mut MasterConfig, matches: &ArgMatches) -> Result<()> {
    if let Some(output) = matches.get_one::<String>("output") {
        debug!("Output directory overridden via CLI: {}", output);
        config.app_settings.output_directory = output.clone();
    }
    if let Some(index) = matches.get_one::<i32>("camera") {
        debug!("Camera index overridden via CLI: {}", index);
        config.app_settings.camera_index = *index;
    }
    if let Some(lang) = matches.get_one::<String>("lang") {
        config.app_settings.language = lang
            .parse::<Language>()
            .map_err(|e| anyhow::anyhow!(e))?;
        debug!("Language overridden via CLI: {:?}", config.app_settings.language);
    }
    validate_master_config(config).context("Configuration invalid after applying CLI overrides")
}

pub fn validate_master_config(config: &MasterConfig) -> Result<()> {
    debug!("🕵️ Validating master configuration...");
    let validation_start_time = Instant::now();
    let app = &config.app_settings;

    if app.output_directory.trim().is_empty() {
        bail!("❌ Application output_directory cannot be empty.");
    }
    let output_path = Path::new(&app.output_directory);
    if output_path.exists() && !output_path.is_dir() {
        bail!("❌ Output directory '{}' exists but is not a directory.", app.output_directory);
    }
    if app.camera_index < 0 {
        bail!("❌ camera_index must be non-negative, got {}.", app.camera_index);
    }
    if app.filename_prefix.is_empty() {
        bail!("❌ Application filename_prefix cannot be empty.");
    }
    if app.filename_prefix.contains(&['/', '\\'][..]) {
        bail!("❌ filename_prefix '{}' must not contain path separators.", app.filename_prefix);
    }
    if app.filename_timestamp_format.is_empty() {
        bail!("❌ Application filename_timestamp_format cannot be empty.");
    }
    if !timestamp_utils::is_valid_format(&app.filename_timestamp_format) {
        bail!("❌ filename_timestamp_format '{}' is not a valid strftime pattern.", app.filename_timestamp_format);
    }
    if app.filename_timestamp_format.contains(&['/', '\\'][..]) {
        bail!(
            "❌ filename_timestamp_format '{}' must not contain path separators.",
            app.filename_timestamp_format
        );
    }
    if !(1..=100).contains(&app.jpeg_quality) {
        bail!("❌ jpeg_quality must be within 1..=100, got {}.", app.jpeg_quality);
    }
    if !(1..=1000).contains(&app.tick_interval_ms) {
        bail!("❌ tick_interval_ms must be within 1..=1000, got {}.", app.tick_interval_ms);
    }
    if app.display_max_width == 0 || app.display_max_height == 0 {
        bail!(
            "❌ Display bounds must be positive, got {}x{}.",
            app.display_max_width, app.display_max_height
        );
    }

    let keys = &config.keys;
    let mut seen = HashSet::new();
    for (action, key) in [("capture", keys.capture), ("quit", keys.quit), ("new_folder", keys.new_folder)] {
        if !key.is_ascii() || key.is_ascii_digit() {
            bail!("❌ Key binding for '{}' must be a non-digit ASCII character, got {:?}.", action, key);
        }
        if !seen.insert(key) {
            bail!("❌ Key {:?} is bound to more than one action.", key);
        }
    }

    debug!("👍 Master configuration validated successfully in {:?}.", validation_start_time.elapsed());
    Ok(())
}
