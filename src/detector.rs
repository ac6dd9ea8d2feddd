/* src/detector.rs */

//!
//! Classifies the difference between two resolved snapshots.
//!
//! Only minification and autoprefixing change the *content* of artifacts the
//! bundler has already produced. Every other switch affects how requests are
//! served, not what is in the cache, so it never invalidates.

use crate::options::BundleOptions;

/// A switch of [`BundleOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionField {
	Bundling,
	ClientCache,
	DiskCache,
	Minification,
	AutoPrefixer,
	DevModeAutoPrefixerOverride,
}

impl OptionField {
	/// Whether a change to this field makes cached artifacts stale.
	pub fn affects_cache(self) -> bool {
		matches!(self, Self::Minification | Self::AutoPrefixer)
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Bundling => "bundling_enabled",
			Self::ClientCache => "client_cache_enabled",
			Self::DiskCache => "disk_cache_enabled",
			Self::Minification => "minification_enabled",
			Self::AutoPrefixer => "auto_prefixer_enabled",
			Self::DevModeAutoPrefixerOverride => "always_disable_auto_prefixer_in_dev_mode",
		}
	}
}

impl std::fmt::Display for OptionField {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The switches that changed between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsDiff {
	/// `false` when there was no previous snapshot.
	pub has_previous: bool,
	pub changed: Vec<OptionField>,
}

impl OptionsDiff {
	pub fn is_empty(&self) -> bool {
		self.changed.is_empty()
	}

	pub fn is_cache_affecting(&self) -> bool {
		self.has_previous && self.changed.iter().any(|field| field.affects_cache())
	}
}

/// Lists every switch that differs between `prev` and `next`.
pub fn diff(prev: Option<&BundleOptions>, next: &BundleOptions) -> OptionsDiff {
	let Some(prev) = prev else {
		return OptionsDiff::default();
	};

	let pairs = [
		(OptionField::Bundling, prev.bundling_enabled, next.bundling_enabled),
		(OptionField::ClientCache, prev.client_cache_enabled, next.client_cache_enabled),
		(OptionField::DiskCache, prev.disk_cache_enabled, next.disk_cache_enabled),
		(OptionField::Minification, prev.minification_enabled, next.minification_enabled),
		(OptionField::AutoPrefixer, prev.auto_prefixer_enabled, next.auto_prefixer_enabled),
		(
			OptionField::DevModeAutoPrefixerOverride,
			prev.always_disable_auto_prefixer_in_dev_mode,
			next.always_disable_auto_prefixer_in_dev_mode,
		),
	];

	OptionsDiff {
		has_previous: true,
		changed: pairs
			.into_iter()
			.filter(|(_, before, after)| before != after)
			.map(|(field, _, _)| field)
			.collect(),
	}
}

/// Returns true if moving from `prev` to `next` makes cached artifacts stale.
///
/// The first resolution (`prev` is `None`) never invalidates: nothing is cached yet.
pub fn is_cache_affecting(prev: Option<&BundleOptions>, next: &BundleOptions) -> bool {
	match prev {
		None => false,
		Some(prev) => {
			prev.minification_enabled != next.minification_enabled
				|| prev.auto_prefixer_enabled != next.auto_prefixer_enabled
		}
	}
}
