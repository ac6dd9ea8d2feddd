/* src/loader/format/toml.rs */

use serde_json::Value;

use super::super::{BindingError, Format};

/// TOML format parser using `toml`.
pub struct Toml;

impl Format for Toml {
	fn extensions(&self) -> &'static [&'static str] {
		&["toml"]
	}

	fn parse(&self, key: &str, input: &[u8]) -> Result<Value, BindingError> {
		let s = std::str::from_utf8(input).map_err(|e| BindingError::parse(key, e))?;
		toml::from_str(s).map_err(|e| BindingError::parse(key, e))
	}
}
