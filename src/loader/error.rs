/* src/loader/error.rs */

/// Errors raised while loading layers or binding a section.
///
/// Any of these aborts a reconfiguration cycle before defaults are applied.
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
	/// Parsing error from a format implementation.
	#[error("parse error in '{key}': {message}")]
	Parse { key: String, message: String },

	/// A required layer was not found under any registered format.
	#[error("required layer not found: {0}")]
	NotFound(String),

	/// The section exists but does not match the target type.
	#[error("invalid value in section '{section}': {source}")]
	Bind {
		section: String,
		#[source]
		source: serde_json::Error,
	},

	/// IO error from source.
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	/// Sandbox violation in file system source.
	#[cfg(feature = "fs")]
	#[error("sandbox violation")]
	SandboxViolation,

	/// Generic static error message.
	#[error("custom error: {0}")]
	Custom(&'static str),
}

impl BindingError {
	pub(crate) fn parse(key: &str, message: impl ToString) -> Self {
		Self::Parse {
			key: key.to_string(),
			message: message.to_string(),
		}
	}
}
