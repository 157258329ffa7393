//! CLI command implementations

mod config;
mod distort;

pub use config::{cmd_config_init, cmd_config_show};
pub use distort::{DistortArgs, cmd_distort};
