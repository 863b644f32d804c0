use crate::commands::{CmdMessage, CmdResult};
use crate::config::DefectConfig;
use crate::error::{DefectError, Result};
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = DefectConfig::load(config_dir)?;
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll => {
            for key in DefectConfig::KEYS {
                if let Some(value) = config.get(key) {
                    result.add_message(CmdMessage::info(format!("{} = {}", key, value)));
                }
            }
        }
        ConfigAction::ShowKey(key) => match config.get(&key) {
            Some(value) => result.add_message(CmdMessage::info(format!("{} = {}", key, value))),
            None => {
                return Err(DefectError::InvalidInput(format!(
                    "Unknown config key: {}",
                    key
                )))
            }
        },
        ConfigAction::Set(key, value) => {
            config.set(&key, &value).map_err(DefectError::InvalidInput)?;
            config.save(config_dir)?;
            result.add_message(CmdMessage::success(format!("{} set to {}", key, value)));
            result.add_message(CmdMessage::info(
                "Storage changes take effect on the next run.",
            ));
        }
    }

    Ok(result.with_config(config))
}
