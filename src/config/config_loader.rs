use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads a config file, sniffing the format from the extension.
    ///
    /// `$VAR` references in the file body are expanded from the environment
    /// before parsing; literal dollar signs must be escaped as `\$`.
    pub fn load<'a, T: Serialize + Deserialize<'a>>(file_path: PathBuf) -> Result<T, ConfigError> {
        let Some(ext) = file_path.extension() else {
            return Err(ConfigError::NotFound(format!(
                "Could not find file extension on path {file_path:?}"
            )));
        };
        let file_format = match ext.to_str() {
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            Some("json") => FileFormat::Json,
            Some("toml") => FileFormat::Toml,
            Some("ron") => FileFormat::Ron,
            _ => {
                return Err(ConfigError::NotFound(format!(
                    "File format not supported. File needs to end with .yaml, .json, .toml or .ron. {file_path:?}"
                )));
            }
        };

        let config_str = fs::read_to_string(&file_path)
            .map_err(|e| ConfigError::Message(format!("Could not read {file_path:?}: {e}")))?;
        let config_str_with_env_vars = shellexpand::env(&config_str)
            .map_err(|e| ConfigError::Message(format!("Environment expansion failed: {e}")))?;

        let config = Config::builder()
            .add_source(File::from_str(&config_str_with_env_vars, file_format))
            .build()?;
        config.try_deserialize()
    }
}
