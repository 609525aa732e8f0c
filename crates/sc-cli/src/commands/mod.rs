pub mod keynodes;
pub mod run;

use std::path::Path;

use sc_agent::AgentConfig;
use sc_core::logging_facility;

/// Load `--config` (or defaults) and install logging for its profile
pub fn load_config(path: Option<&Path>) -> Result<AgentConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => AgentConfig::from_path(path)?,
        None => AgentConfig::default(),
    };
    logging_facility::init(config.log_profile);
    Ok(config)
}
