/* src/loader/format/json.rs */

use serde_json::Value;

use super::super::{BindingError, Format};

/// JSON format parser using `serde_json`.
pub struct Json;

impl Format for Json {
	fn extensions(&self) -> &'static [&'static str] {
		&["json"]
	}

	fn parse(&self, key: &str, input: &[u8]) -> Result<Value, BindingError> {
		serde_json::from_slice(input).map_err(|e| BindingError::parse(key, e))
	}
}
