/* tests/detector_tests.rs */

use std::sync::Arc;

use bundle_live::BundleOptions;
use bundle_live::detector::{OptionField, diff, is_cache_affecting};
use bundle_live::options::NullFileProvider;

fn baseline() -> BundleOptions {
	BundleOptions {
		bundling_enabled: true,
		client_cache_enabled: true,
		disk_cache_enabled: true,
		minification_enabled: true,
		auto_prefixer_enabled: true,
		always_disable_auto_prefixer_in_dev_mode: false,
		file_provider: Arc::new(NullFileProvider),
	}
}

#[test]
fn test_first_resolution_never_affects_cache() {
	let mut next = baseline();
	assert!(!is_cache_affecting(None, &next));
	next.minification_enabled = false;
	assert!(!is_cache_affecting(None, &next));
	assert!(!diff(None, &next).is_cache_affecting());
}

#[test]
fn test_minification_change_affects_cache() {
	let prev = baseline();
	let mut next = baseline();
	next.minification_enabled = false;
	assert!(is_cache_affecting(Some(&prev), &next));

	let d = diff(Some(&prev), &next);
	assert_eq!(d.changed, vec![OptionField::Minification]);
	assert!(d.is_cache_affecting());
}

#[test]
fn test_auto_prefixer_change_affects_cache() {
	let prev = baseline();
	let mut next = baseline();
	next.auto_prefixer_enabled = false;
	assert!(is_cache_affecting(Some(&prev), &next));
}

#[test]
fn test_request_time_fields_do_not_affect_cache() {
	let prev = baseline();

	let mut next = baseline();
	next.client_cache_enabled = false;
	assert!(!is_cache_affecting(Some(&prev), &next));

	let mut next = baseline();
	next.disk_cache_enabled = false;
	assert!(!is_cache_affecting(Some(&prev), &next));

	let mut next = baseline();
	next.bundling_enabled = false;
	assert!(!is_cache_affecting(Some(&prev), &next));

	let mut next = baseline();
	next.bundling_enabled = false;
	next.client_cache_enabled = false;
	next.disk_cache_enabled = false;
	next.always_disable_auto_prefixer_in_dev_mode = true;
	let d = diff(Some(&prev), &next);
	assert_eq!(d.changed.len(), 4);
	assert!(!d.is_cache_affecting());
}

#[test]
fn test_file_provider_identity_is_ignored() {
	let prev = baseline();
	let next = baseline();
	assert!(diff(Some(&prev), &next).is_empty());
	assert_eq!(prev, next);
}

#[test]
fn test_diff_and_predicate_agree_for_every_field() {
	let flips: [fn(&mut BundleOptions); 5] = [
		|o| o.bundling_enabled = !o.bundling_enabled,
		|o| o.client_cache_enabled = !o.client_cache_enabled,
		|o| o.disk_cache_enabled = !o.disk_cache_enabled,
		|o| o.minification_enabled = !o.minification_enabled,
		|o| o.auto_prefixer_enabled = !o.auto_prefixer_enabled,
	];

	let prev = baseline();
	for flip in flips {
		let mut next = baseline();
		flip(&mut next);
		let d = diff(Some(&prev), &next);
		assert_eq!(d.changed.len(), 1);
		assert_eq!(d.is_cache_affecting(), is_cache_affecting(Some(&prev), &next));
	}
}
