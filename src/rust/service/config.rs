use std::path::PathBuf;

use crate::artifact::DEFAULT_MODEL_PATH;
use crate::runtime::RuntimeConfig;

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Artifact loaded once at startup
    pub model_path: PathBuf,
    /// Listener port on all interfaces
    pub port: u16,
    pub runtime: RuntimeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            port: DEFAULT_PORT,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
    }
}
