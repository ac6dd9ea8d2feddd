/* src/loader/format/yaml.rs */

use serde_json::Value;

use super::super::{BindingError, Format};

/// YAML format parser using `serde_yaml`.
pub struct Yaml;

impl Format for Yaml {
	fn extensions(&self) -> &'static [&'static str] {
		&["yaml", "yml"]
	}

	fn parse(&self, key: &str, input: &[u8]) -> Result<Value, BindingError> {
		serde_yaml::from_slice(input).map_err(|e| BindingError::parse(key, e))
	}
}
