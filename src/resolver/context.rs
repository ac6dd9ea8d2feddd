/* src/resolver/context.rs */

use std::sync::atomic::{AtomicI64, Ordering};

/// A setting that can inherit, force off, or force on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriState {
	#[default]
	Unset,
	ForceDisabled,
	ForceEnabled,
}

impl TriState {
	/// Maps a persisted settings code: `0` unset, `1` force-disabled, `> 1` force-enabled.
	///
	/// Negative codes are treated as unset.
	pub fn from_code(code: i64) -> Self {
		match code {
			1 => Self::ForceDisabled,
			c if c > 1 => Self::ForceEnabled,
			_ => Self::Unset,
		}
	}

	/// The forced value, or `fallback` when unset.
	pub fn value_or(self, fallback: bool) -> bool {
		match self {
			Self::ForceEnabled => true,
			Self::ForceDisabled => false,
			Self::Unset => fallback,
		}
	}
}

/// Whether the host runs in development mode.
pub trait EnvironmentProvider: Send + Sync {
	fn is_development(&self) -> bool;
}

/// Settings-derived overrides, as raw integer codes (see [`TriState::from_code`]).
pub trait SettingsProvider: Send + Sync {
	fn bundle_optimization_code(&self) -> i64;
	fn disk_caching_code(&self) -> i64;
}

/// Inputs to resolution that do not come from the configuration tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolutionContext {
	pub is_development: bool,
	pub bundle_optimization: TriState,
	pub disk_caching: TriState,
}

impl ResolutionContext {
	/// Reads the current environment flag and settings codes.
	pub fn capture(environment: &dyn EnvironmentProvider, settings: &dyn SettingsProvider) -> Self {
		Self {
			is_development: environment.is_development(),
			bundle_optimization: TriState::from_code(settings.bundle_optimization_code()),
			disk_caching: TriState::from_code(settings.disk_caching_code()),
		}
	}
}

/// A fixed environment flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticEnvironment(pub bool);

impl StaticEnvironment {
	pub fn development() -> Self {
		Self(true)
	}

	pub fn production() -> Self {
		Self(false)
	}
}

impl EnvironmentProvider for StaticEnvironment {
	fn is_development(&self) -> bool {
		self.0
	}
}

/// Reads the environment name from a process environment variable.
///
/// Development mode is on when the variable equals `development` (ASCII case-insensitive).
/// The variable is read on every call, so each reload sees its current value.
#[derive(Debug, Clone)]
pub struct ProcessEnvironment {
	var: String,
}

impl ProcessEnvironment {
	pub const DEFAULT_VAR: &'static str = "APP_ENVIRONMENT";

	pub fn new(var: impl Into<String>) -> Self {
		Self { var: var.into() }
	}
}

impl Default for ProcessEnvironment {
	fn default() -> Self {
		Self::new(Self::DEFAULT_VAR)
	}
}

impl EnvironmentProvider for ProcessEnvironment {
	fn is_development(&self) -> bool {
		std::env::var(&self.var).is_ok_and(|name| name.trim().eq_ignore_ascii_case("development"))
	}
}

/// Settings codes held in memory and changeable at runtime.
#[derive(Debug, Default)]
pub struct StaticSettings {
	bundle_optimization: AtomicI64,
	disk_caching: AtomicI64,
}

impl StaticSettings {
	pub fn new(bundle_optimization: i64, disk_caching: i64) -> Self {
		Self {
			bundle_optimization: AtomicI64::new(bundle_optimization),
			disk_caching: AtomicI64::new(disk_caching),
		}
	}

	pub fn set_bundle_optimization(&self, code: i64) {
		self.bundle_optimization.store(code, Ordering::SeqCst);
	}

	pub fn set_disk_caching(&self, code: i64) {
		self.disk_caching.store(code, Ordering::SeqCst);
	}
}

impl SettingsProvider for StaticSettings {
	fn bundle_optimization_code(&self) -> i64 {
		self.bundle_optimization.load(Ordering::SeqCst)
	}

	fn disk_caching_code(&self) -> i64 {
		self.disk_caching.load(Ordering::SeqCst)
	}
}
