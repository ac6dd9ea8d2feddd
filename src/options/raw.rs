/* src/options/raw.rs */

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::FileProvider;
use crate::loader::normalize_key;

/// Bundling options exactly as bound from configuration.
///
/// `None` means "not set by any layer"; the resolver fills these in.
///
/// Keys match regardless of case and of `_` / `-` separators, so
/// `minificationEnabled`, `MinificationEnabled` and `minification_enabled`
/// all bind the same field. Switches accept booleans or the strings
/// `"true"` / `"false"`, since layered sources such as environment variables
/// only carry text. Unknown keys are ignored.
#[derive(Debug, Clone, Default)]
pub struct RawOptions {
	pub bundling_enabled: Option<bool>,
	pub client_cache_enabled: Option<bool>,
	pub disk_cache_enabled: Option<bool>,
	pub minification_enabled: Option<bool>,
	pub auto_prefixer_enabled: Option<bool>,
	pub always_disable_auto_prefixer_in_dev_mode: bool,
	/// Never read from configuration text; set by post-bind hooks.
	pub file_provider: Option<Arc<dyn FileProvider>>,
}

impl RawOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_bundling(mut self, enabled: bool) -> Self {
		self.bundling_enabled = Some(enabled);
		self
	}

	pub fn with_client_cache(mut self, enabled: bool) -> Self {
		self.client_cache_enabled = Some(enabled);
		self
	}

	pub fn with_disk_cache(mut self, enabled: bool) -> Self {
		self.disk_cache_enabled = Some(enabled);
		self
	}

	pub fn with_minification(mut self, enabled: bool) -> Self {
		self.minification_enabled = Some(enabled);
		self
	}

	pub fn with_auto_prefixer(mut self, enabled: bool) -> Self {
		self.auto_prefixer_enabled = Some(enabled);
		self
	}

	pub fn with_dev_mode_auto_prefixer_disabled(mut self, disabled: bool) -> Self {
		self.always_disable_auto_prefixer_in_dev_mode = disabled;
		self
	}

	pub fn with_file_provider(mut self, provider: Arc<dyn FileProvider>) -> Self {
		self.file_provider = Some(provider);
		self
	}
}

impl<'de> Deserialize<'de> for RawOptions {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let entries = BTreeMap::<String, Value>::deserialize(deserializer)?;
		let mut raw = RawOptions::default();

		for (key, value) in &entries {
			let slot = match normalize_key(key).as_str() {
				"bundlingenabled" => &mut raw.bundling_enabled,
				"clientcacheenabled" => &mut raw.client_cache_enabled,
				"diskcacheenabled" => &mut raw.disk_cache_enabled,
				"minificationenabled" => &mut raw.minification_enabled,
				"autoprefixerenabled" => &mut raw.auto_prefixer_enabled,
				"alwaysdisableautoprefixerindevmode" => {
					raw.always_disable_auto_prefixer_in_dev_mode =
						switch(key, value).map_err(D::Error::custom)?.unwrap_or(false);
					continue;
				}
				_ => continue,
			};
			*slot = switch(key, value).map_err(D::Error::custom)?;
		}

		Ok(raw)
	}
}

fn switch(key: &str, value: &Value) -> Result<Option<bool>, String> {
	match value {
		Value::Null => Ok(None),
		Value::Bool(b) => Ok(Some(*b)),
		Value::String(text) => match text.trim() {
			"" => Ok(None),
			t if t.eq_ignore_ascii_case("true") => Ok(Some(true)),
			t if t.eq_ignore_ascii_case("false") => Ok(Some(false)),
			other => Err(format!("'{}': expected a boolean, found \"{}\"", key, other)),
		},
		other => Err(format!("'{}': expected a boolean, found {}", key, other)),
	}
}
