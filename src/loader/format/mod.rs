/* src/loader/format/mod.rs */

use serde_json::Value;

use super::{BindingError, Format};

#[cfg(feature = "json")]
mod json;
#[cfg(feature = "json")]
pub use json::Json;

#[cfg(feature = "toml")]
mod toml;
#[cfg(feature = "toml")]
pub use toml::Toml;

#[cfg(feature = "yaml")]
mod yaml;
#[cfg(feature = "yaml")]
pub use yaml::Yaml;

/// An enum wrapper for all supported formats, enabling dynamic dispatch-like behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyFormat {
	#[cfg(feature = "json")]
	Json,
	#[cfg(feature = "toml")]
	Toml,
	#[cfg(feature = "yaml")]
	Yaml,
}

impl AnyFormat {
	/// Picks the registered format handling the extension of `name`.
	pub fn for_name(formats: &[AnyFormat], name: &str) -> Option<AnyFormat> {
		let ext = name.rsplit_once('.').map(|(_, ext)| ext)?;
		formats
			.iter()
			.copied()
			.find(|format| format.extensions().contains(&ext))
	}
}

impl Format for AnyFormat {
	fn extensions(&self) -> &'static [&'static str] {
		match self {
			#[cfg(feature = "json")]
			Self::Json => Json.extensions(),
			#[cfg(feature = "toml")]
			Self::Toml => Toml.extensions(),
			#[cfg(feature = "yaml")]
			Self::Yaml => Yaml.extensions(),
			#[cfg(not(any(feature = "json", feature = "toml", feature = "yaml")))]
			_ => unreachable!(),
		}
	}

	fn parse(&self, _key: &str, _input: &[u8]) -> Result<Value, BindingError> {
		match self {
			#[cfg(feature = "json")]
			Self::Json => Json.parse(_key, _input),
			#[cfg(feature = "toml")]
			Self::Toml => Toml.parse(_key, _input),
			#[cfg(feature = "yaml")]
			Self::Yaml => Yaml.parse(_key, _input),
			#[cfg(not(any(feature = "json", feature = "toml", feature = "yaml")))]
			_ => unreachable!(),
		}
	}
}
