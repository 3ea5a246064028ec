//! Configuration of the model, loaded from YAML.

use crate::{
    constants::status_period,
    enums::LlcName,
    error::{ErrorKind, MTDomeGuiError, MTDomeGuiResult},
};
use serde::{Deserialize, Serialize};
use std::{fs::File, path::Path};
use tokio::time::Duration;

/// Connection information of the dome controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomeComConfig {
    pub host: String,
    pub port: u16,
    /// Timeout of the connection in seconds.
    pub connection_timeout: f64,
}

impl Default for DomeComConfig {
    fn default() -> Self {
        DomeComConfig {
            host: String::from("localhost"),
            port: 4998,
            connection_timeout: 10.0,
        }
    }
}

impl DomeComConfig {
    pub fn get_connection_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.connection_timeout)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub dome_com: DomeComConfig,
    /// Lower level components whose status is polled once connected.
    pub polled_subsystems: Vec<LlcName>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            dome_com: DomeComConfig::default(),
            polled_subsystems: LlcName::ALL
                .into_iter()
                .filter(|llc_name| status_period(*llc_name).is_some())
                .collect(),
        }
    }
}

impl ModelConfig {
    pub fn from_yaml(yaml: &str) -> MTDomeGuiResult<ModelConfig> {
        let config: ModelConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> MTDomeGuiResult<ModelConfig> {
        let file = File::open(path).map_err(|error| {
            MTDomeGuiError::from_error(
                ErrorKind::Configuration,
                &format!("Cannot open {}.", path.display()),
                error,
            )
        })?;
        let config: ModelConfig = serde_yaml::from_reader(file)?;
        config.validate()?;

        log::info!("Loaded configuration from {}.", path.display());
        Ok(config)
    }

    fn validate(&self) -> MTDomeGuiResult<()> {
        if let Some(llc_name) = self
            .polled_subsystems
            .iter()
            .find(|llc_name| status_period(**llc_name).is_none())
        {
            return Err(MTDomeGuiError::new(
                ErrorKind::Configuration,
                &format!("{llc_name} has no status to poll."),
            ));
        }
        if !self.dome_com.connection_timeout.is_finite() || self.dome_com.connection_timeout <= 0.0
        {
            return Err(MTDomeGuiError::new(
                ErrorKind::Configuration,
                "The connection timeout must be positive.",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = ModelConfig::default();

        assert_eq!(config.dome_com.host, "localhost");
        assert_eq!(config.dome_com.port, 4998);
        assert_eq!(
            config.dome_com.get_connection_timeout(),
            Duration::from_secs(10)
        );
        assert_eq!(config.polled_subsystems.len(), 9);
        assert!(!config.polled_subsystems.contains(&LlcName::Obc));
    }

    #[test]
    fn test_from_yaml() {
        let config = ModelConfig::from_yaml(
            "dome_com:\n  host: 127.0.0.1\n  port: 5000\npolled_subsystems: [AMCS, MonCS]\n",
        )
        .unwrap();

        assert_eq!(config.dome_com.host, "127.0.0.1");
        assert_eq!(config.dome_com.port, 5000);
        assert_eq!(config.dome_com.connection_timeout, 10.0);
        assert_eq!(
            config.polled_subsystems,
            vec![LlcName::Amcs, LlcName::Moncs]
        );
    }

    #[test]
    fn test_from_yaml_empty_uses_defaults() {
        let config = ModelConfig::from_yaml("{}").unwrap();

        assert_eq!(config, ModelConfig::default());
    }

    #[test]
    fn test_from_yaml_rejects_bridge_crane() {
        let error = ModelConfig::from_yaml("polled_subsystems: [OBC]").unwrap_err();

        assert_eq!(error.get_kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_from_yaml_rejects_unknown_subsystem() {
        let error = ModelConfig::from_yaml("polled_subsystems: [XYZ]").unwrap_err();

        assert_eq!(error.get_kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_from_yaml_file_missing() {
        let error = ModelConfig::from_yaml_file(Path::new("does/not/exist.yaml")).unwrap_err();

        assert_eq!(error.get_kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_from_yaml_file_bundled() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/mtdomegui.yaml");

        let config = ModelConfig::from_yaml_file(&path).unwrap();

        assert_eq!(config, ModelConfig::default());
    }
}
