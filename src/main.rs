use anyhow::{bail, Context, Result};
use camsnap::common::logging_setup;
use camsnap::config_loader::{self, DEFAULT_CONFIG_PATH};
use camsnap::{cli, operations};
use log::{debug, error, info};
use std::time::Instant;

fn main() -> Result<()> {
    let main_start_time = Instant::now();
    let matches = cli::build_cli().get_matches();

    let explicit_config = matches.get_one::<String>("config");
    let config_path = explicit_config.map(|s| s.as_str()).unwrap_or(DEFAULT_CONFIG_PATH);

    let config_load_start_time = Instant::now();
    let mut master_config = match config_loader::load_config(config_path, explicit_config.is_some()) {
        Ok(cfg) => {
            logging_setup::initialize_logging(Some(&cfg), &matches);
            debug!("Configuration ready in {:?}", config_load_start_time.elapsed());
            cfg
        }
        Err(e) => {
            logging_setup::initialize_logging(None, &matches);
            error!("❌ Failed to load configuration from '{}': {:#}. Exiting.", config_path, e);
            return Err(e.context(format!("Failed to load configuration from '{}'", config_path)));
        }
    };
    config_loader::apply_cli_overrides(&mut master_config, &matches)
        .context("Invalid command line override")?;

    info!(
        "🚀 camsnap starting: camera {}, output '{}', language {}",
        master_config.app_settings.camera_index,
        master_config.app_settings.output_directory,
        master_config.app_settings.language
    );

    let (operation_name, op_result) = match matches.subcommand() {
        None => ("preview", operations::preview_op::handle_preview_cli(&master_config, &matches)),
        Some(("preview", sub)) => ("preview", operations::preview_op::handle_preview_cli(&master_config, sub)),
        Some(("snap", sub)) => ("snap", operations::snap_op::handle_snap_cli(&master_config, sub)),
        Some(("probe", sub)) => ("probe", operations::probe_op::handle_probe_cli(&master_config, sub)),
        Some((other, _)) => bail!("Subcommand '{}' not implemented.", other),
    };

    if let Err(e) = op_result {
        error!("❌ Operation '{}' failed: {:#}", operation_name, e);
        return Err(e);
    }

    info!("🏁 camsnap finished in {:?}.", main_start_time.elapsed());
    Ok(())
}
