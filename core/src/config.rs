// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Size of the worker pool. Fixed, neither the CLI nor the config file can change it
pub const DEFAULT_WORKER_COUNT: usize = 3;

/// Optional values read from a JSON configuration file
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolConfigFile {
    pub num_tasks: Option<u64>,
    pub max_delay_secs: Option<u64>,
}

impl PoolConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Values from `overrides` win over values from `self`
    pub fn merge(self, overrides: PoolConfigFile) -> Self {
        Self {
            num_tasks: overrides.num_tasks.or(self.num_tasks),
            max_delay_secs: overrides.max_delay_secs.or(self.max_delay_secs),
        }
    }
}

/// Validated pool parameters
///
/// Fields are private so every instance went through validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    num_tasks: usize,
    max_delay_secs: u64,
    num_workers: usize,
}

impl PoolConfig {
    pub fn new(num_tasks: usize, max_delay_secs: u64) -> Result<Self, ConfigError> {
        positive("num_tasks", num_tasks as u64)?;
        positive("max_delay_secs", max_delay_secs)?;
        Ok(Self {
            num_tasks,
            max_delay_secs,
            num_workers: DEFAULT_WORKER_COUNT,
        })
    }

    /// Total number of tasks to distribute
    pub fn num_tasks(&self) -> usize {
        self.num_tasks
    }

    /// Inclusive upper bound of the simulated delay, in whole seconds
    pub fn max_delay_secs(&self) -> u64 {
        self.max_delay_secs
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }
}

impl TryFrom<PoolConfigFile> for PoolConfig {
    type Error = ConfigError;

    fn try_from(file: PoolConfigFile) -> Result<Self, Self::Error> {
        let num_tasks = file.num_tasks.ok_or(ConfigError::Missing("num_tasks"))?;
        let max_delay_secs = file
            .max_delay_secs
            .ok_or(ConfigError::Missing("max_delay_secs"))?;
        let num_tasks = usize::try_from(num_tasks).map_err(|_| ConfigError::TooLarge {
            name: "num_tasks",
            value: num_tasks,
        })?;
        Self::new(num_tasks, max_delay_secs)
    }
}

fn positive(name: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::NotPositive { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_always_has_three_workers() {
        let config = PoolConfig::new(5, 3).unwrap();
        assert_eq!(config.num_workers(), DEFAULT_WORKER_COUNT);
        assert_eq!(config.num_workers(), 3);

        let file: PoolConfigFile =
            serde_json::from_str(r#"{ "num_tasks": 1, "max_delay_secs": 1 }"#).unwrap();
        assert_eq!(PoolConfig::try_from(file).unwrap().num_workers(), 3);
    }

    #[test]
    fn test_rejects_zero_values() {
        assert!(matches!(
            PoolConfig::new(0, 3),
            Err(ConfigError::NotPositive {
                name: "num_tasks",
                ..
            })
        ));
        assert!(matches!(
            PoolConfig::new(4, 0),
            Err(ConfigError::NotPositive {
                name: "max_delay_secs",
                ..
            })
        ));
    }

    #[test]
    fn test_cli_values_override_file_values() {
        let file: PoolConfigFile =
            serde_json::from_str(r#"{ "num_tasks": 10, "max_delay_secs": 2 }"#).unwrap();
        let cli = PoolConfigFile {
            num_tasks: Some(7),
            ..Default::default()
        };

        let config = PoolConfig::try_from(file.merge(cli)).unwrap();
        assert_eq!(config.num_tasks(), 7);
        assert_eq!(config.max_delay_secs(), 2);
    }

    #[test]
    fn test_missing_delay_is_reported() {
        let file = PoolConfigFile {
            num_tasks: Some(1),
            ..Default::default()
        };
        assert!(matches!(
            PoolConfig::try_from(file),
            Err(ConfigError::Missing("max_delay_secs"))
        ));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let parsed = serde_json::from_str::<PoolConfigFile>(r#"{ "num_mappers": 3 }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_worker_count_is_not_a_config_field() {
        let parsed = serde_json::from_str::<PoolConfigFile>(
            r#"{ "num_tasks": 1, "max_delay_secs": 1, "num_workers": 18446744073709551615 }"#,
        );
        assert!(parsed.is_err());
    }
}
