/* src/resolver/resolve.rs */

use std::sync::Arc;

use crate::options::{BundleOptions, FileProvider, RawOptions};

use super::ResolutionContext;

/// Resolves raw options into a complete snapshot.
///
/// Pure: the same inputs always produce an equal snapshot.
///
/// Precedence for each switch is "explicitly configured" first, then the
/// default derived from `ctx`. Bundling and minification default to the
/// bundle-optimization signal (or production mode when unset); disk caching
/// to the disk-caching signal (or production mode); client caching to
/// production mode. The autoprefixer follows bundling, except that
/// `always_disable_auto_prefixer_in_dev_mode` turns it off in development
/// when it was not configured explicitly.
pub fn resolve(
	raw: &RawOptions,
	ctx: &ResolutionContext,
	fallback_provider: &Arc<dyn FileProvider>,
) -> BundleOptions {
	let production = !ctx.is_development;
	let bundling_default = ctx.bundle_optimization.value_or(production);
	let disk_cache_default = ctx.disk_caching.value_or(production);

	// Must run before the bundling fallback below.
	let auto_prefixer = raw.auto_prefixer_enabled.or(
		(raw.always_disable_auto_prefixer_in_dev_mode && ctx.is_development).then_some(false),
	);

	BundleOptions {
		bundling_enabled: raw.bundling_enabled.unwrap_or(bundling_default),
		client_cache_enabled: raw.client_cache_enabled.unwrap_or(production),
		disk_cache_enabled: raw.disk_cache_enabled.unwrap_or(disk_cache_default),
		minification_enabled: raw.minification_enabled.unwrap_or(bundling_default),
		auto_prefixer_enabled: auto_prefixer.unwrap_or(bundling_default),
		always_disable_auto_prefixer_in_dev_mode: raw.always_disable_auto_prefixer_in_dev_mode,
		file_provider: raw
			.file_provider
			.clone()
			.unwrap_or_else(|| Arc::clone(fallback_provider)),
	}
}
