//! Configuration du simulateur

use serde::{Deserialize, Serialize};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Configuration principale du simulateur
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub memory: MemoryConfig,
    pub execution: ExecutionConfig,
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Taille de la RAM en mots
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    pub start_address: i64,
    pub single_step: bool,
    /// Nombre maximal de pas avant abandon (illimité si absent)
    pub step_limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Journalise chaque pas d'exécution
    pub enabled: bool,
    pub log_level: String, // "error", "warn", "info", "debug" ou "trace"
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            memory: MemoryConfig::default(),
            execution: ExecutionConfig::default(),
            trace: TraceConfig::default(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size: crate::DEFAULT_MEMORY_SIZE,
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            start_address: 0,
            single_step: false,
            step_limit: None,
        }
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_level: "info".to_string(),
        }
    }
}

impl SimulatorConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Lecture de la configuration {}", path.display()))?;
        let config: SimulatorConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load_from_file(path).unwrap_or_default()
    }

    /// Niveau de journalisation configuré
    pub fn log_level(&self) -> log::LevelFilter {
        self.trace.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SimulatorConfig::default();
        assert_eq!(config.memory.size, 1024);
        assert_eq!(config.execution.start_address, 0);
        assert!(!config.execution.single_step);
        assert_eq!(config.execution.step_limit, None);
        assert!(!config.trace.enabled);
        assert_eq!(config.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SimulatorConfig = toml::from_str(
            "[memory]\nsize = 256\n\n[trace]\nenabled = true\nlog_level = \"debug\"\n",
        )
        .unwrap();
        assert_eq!(config.memory.size, 256);
        assert!(config.trace.enabled);
        assert_eq!(config.log_level(), log::LevelFilter::Debug);
        assert_eq!(config.execution, ExecutionConfig::default());
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("duck.toml");

        let mut config = SimulatorConfig::default();
        config.execution.start_address = 16;
        config.execution.step_limit = Some(500);
        config.save_to_file(&path)?;

        assert_eq!(SimulatorConfig::load_from_file(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = SimulatorConfig::load_or_default(temp_dir.path().join("absent.toml"));
        assert_eq!(config, SimulatorConfig::default());
    }
}
