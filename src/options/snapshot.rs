/* src/options/snapshot.rs */

use std::sync::Arc;

use super::FileProvider;

/// Fully resolved bundling options at one point in time.
///
/// Every switch is materialized. Snapshots are immutable and shared as
/// `Arc<BundleOptions>`; a reload produces a new snapshot rather than
/// mutating the active one.
#[derive(Debug, Clone)]
pub struct BundleOptions {
	pub bundling_enabled: bool,
	pub client_cache_enabled: bool,
	pub disk_cache_enabled: bool,
	pub minification_enabled: bool,
	pub auto_prefixer_enabled: bool,
	pub always_disable_auto_prefixer_in_dev_mode: bool,
	pub file_provider: Arc<dyn FileProvider>,
}

/// Compares the switches only; the file provider is not part of equality.
impl PartialEq for BundleOptions {
	fn eq(&self, other: &Self) -> bool {
		self.bundling_enabled == other.bundling_enabled
			&& self.client_cache_enabled == other.client_cache_enabled
			&& self.disk_cache_enabled == other.disk_cache_enabled
			&& self.minification_enabled == other.minification_enabled
			&& self.auto_prefixer_enabled == other.auto_prefixer_enabled
			&& self.always_disable_auto_prefixer_in_dev_mode
				== other.always_disable_auto_prefixer_in_dev_mode
	}
}

impl Eq for BundleOptions {}
