use anyhow::{Result, bail};
use phenoimp_core::Config;
use std::path::Path;

/// Which file the effective configuration came from
fn config_source(cwd: &Path) -> String {
  let project_config = Config::project_config_path(cwd);
  if project_config.exists() {
    return format!("Using project config: {:?}", project_config);
  }
  match Config::user_config_path() {
    Some(user_path) if user_path.exists() => format!("Using user config: {:?}", user_path),
    _ => "Using default configuration (no config file found)".to_string(),
  }
}

/// Show current effective configuration
pub fn cmd_config_show(cwd: &Path) -> Result<()> {
  let config = Config::load_for_project(cwd)?;

  println!("Effective configuration for: {:?}", cwd);
  println!();
  println!("{}", config_source(cwd));
  println!();

  // Show config as TOML
  let toml_str = toml::to_string_pretty(&config)?;
  println!("{}", toml_str);

  Ok(())
}

/// Initialize project configuration file
pub fn cmd_config_init(cwd: &Path) -> Result<()> {
  let config_path = Config::project_config_path(cwd);

  if config_path.exists() {
    bail!(
      "Config file already exists: {:?}. Delete it first if you want to regenerate",
      config_path
    );
  }

  if let Some(parent) = config_path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(&config_path, Config::generate_template())?;

  println!("Created project config: {:?}", config_path);
  println!("Edit the file to customize settings.");

  Ok(())
}
