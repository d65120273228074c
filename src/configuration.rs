use std::fs::File;
use std::io::BufReader;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::math::curve::nonparametriccurve::arraytabulatedfunction::ArrayTabulatedFunction;
use crate::math::curve::nonparametriccurve::linkedlisttabulatedfunction::LinkedListTabulatedFunction;
use crate::math::curve::nonparametriccurve::tabulatedfunction::TabulatedFunction;
use crate::math::curve::nonparametriccurve::tabulatedfunctionerror::TabulatedFunctionError;

/// Storage behind a [`TabulatedFunction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Contiguous buffer, O(1) indexed access.
    #[default]
    Array,
    /// Cyclic doubly-linked ring, O(1) borders, walks of at most count / 2
    /// steps from the cached node.
    LinkedList,
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("cannot read configuration: {0}")]
    IOError(#[from] std::io::Error),
    #[error("cannot parse configuration: {0}")]
    JsonParseError(#[from] serde_json::Error),
}

/// Chooses the storage new tabulated functions are built with, so callers
/// can hold `Box<dyn TabulatedFunction>` without naming a backend.
///
/// ```json
/// { "storage": "linked_list" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Configuration {
    storage: StorageKind,
}

impl Configuration {
    pub fn new(storage: StorageKind) -> Configuration {
        Configuration { storage }
    }

    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    pub fn from_json_str(json: &str) -> Result<Configuration, ConfigurationError> {
        let config: Configuration = serde_json::from_str(json)?;
        debug!(storage = ?config.storage, "configuration parsed");
        Ok(config)
    }

    pub fn from_reader(file_path: &str) -> Result<Configuration, ConfigurationError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let config: Configuration = serde_json::from_reader(reader)?;
        debug!(storage = ?config.storage, file_path, "configuration loaded");
        Ok(config)
    }

    /// `point_count` points evenly spread over `[left_x, right_x]`, all with y = 0.
    pub fn tabulate(&self,
                    left_x: f64,
                    right_x: f64,
                    point_count: usize) -> Result<Box<dyn TabulatedFunction>, TabulatedFunctionError> {
        let func: Box<dyn TabulatedFunction> = match self.storage {
            StorageKind::Array => Box::new(ArrayTabulatedFunction::new(left_x, right_x, point_count)?),
            StorageKind::LinkedList => Box::new(LinkedListTabulatedFunction::new(left_x, right_x, point_count)?),
        };
        Ok(func)
    }

    /// One point per entry of `values`, evenly spread over `[left_x, right_x]`.
    pub fn tabulate_values(&self,
                           left_x: f64,
                           right_x: f64,
                           values: &[f64]) -> Result<Box<dyn TabulatedFunction>, TabulatedFunctionError> {
        let func: Box<dyn TabulatedFunction> = match self.storage {
            StorageKind::Array => Box::new(ArrayTabulatedFunction::from_values(left_x, right_x, values)?),
            StorageKind::LinkedList => Box::new(LinkedListTabulatedFunction::from_values(left_x, right_x, values)?),
        };
        Ok(func)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::math::curve::curve::Curve;

    #[test]
    fn parses_storage_kind() {
        let config = Configuration::from_json_str(r#"{ "storage": "linked_list" }"#).unwrap();
        assert_eq!(config.storage(), StorageKind::LinkedList);
        let config = Configuration::from_json_str(r#"{ "storage": "array" }"#).unwrap();
        assert_eq!(config.storage(), StorageKind::Array);
    }

    #[test]
    fn missing_storage_defaults_to_array() {
        let config = Configuration::from_json_str("{}").unwrap();
        assert_eq!(config, Configuration::default());
        assert_eq!(config.storage(), StorageKind::Array);
    }

    #[test]
    fn unknown_storage_is_a_parse_error() {
        let err = Configuration::from_json_str(r#"{ "storage": "skip_list" }"#).unwrap_err();
        assert!(matches!(err, ConfigurationError::JsonParseError(_)));
    }

    #[test]
    fn reads_configuration_file() {
        let path = std::env::temp_dir().join(format!("tabfunc-config-{}.json", std::process::id()));
        File::create(&path).unwrap().write_all(br#"{ "storage": "linked_list" }"#).unwrap();
        let config = Configuration::from_reader(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.storage(), StorageKind::LinkedList);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Configuration::from_reader("/nonexistent/tabfunc.json").unwrap_err();
        assert!(matches!(err, ConfigurationError::IOError(_)));
    }

    #[test]
    fn builds_either_storage_behind_the_trait() {
        for storage in [StorageKind::Array, StorageKind::LinkedList] {
            let func = Configuration::new(storage).tabulate_values(0.0, 2.0, &[0.0, 1.0, 4.0]).unwrap();
            assert_eq!(func.count(), 3);
            assert_eq!(func.value(1.5), 2.5);
            let func = Configuration::new(storage).tabulate(0.0, 2.0, 2).unwrap();
            assert_eq!(func.value(1.0), 0.0);
            assert!(Configuration::new(storage).tabulate(2.0, 0.0, 2).is_err());
        }
    }
}
