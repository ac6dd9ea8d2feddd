/* tests/loader_tests.rs */

#![cfg(all(feature = "json", feature = "toml"))]

use std::sync::Arc;

use bundle_live::RawOptions;
use bundle_live::loader::{BindingError, ConfigTree, Layer, LayeredLoader, MemorySource, format::AnyFormat};
use serde_json::json;

fn loader(source: Arc<MemorySource>, layers: Vec<Layer>) -> LayeredLoader {
	let mut builder = LayeredLoader::builder()
		.source(source)
		.format(AnyFormat::Json)
		.format(AnyFormat::Toml);
	for layer in layers {
		builder = builder.layer(layer);
	}
	builder.build().unwrap()
}

#[tokio::test]
async fn test_layers_merge_in_order() {
	let source = Arc::new(MemorySource::new());
	source.insert(
		"appsettings.json",
		r#"{"bundling": {"minificationEnabled": true, "diskCacheEnabled": true}}"#,
	);
	source.insert("appsettings.production.toml", "[bundling]\nminificationEnabled = false\n");

	let loader = loader(
		source,
		vec![Layer::probe("appsettings"), Layer::probe("appsettings.production")],
	);
	let tree = loader.load().await.unwrap();

	let raw: RawOptions = tree.bind("bundling").unwrap();
	assert_eq!(raw.minification_enabled, Some(false));
	assert_eq!(raw.disk_cache_enabled, Some(true));
	assert_eq!(raw.auto_prefixer_enabled, None);
	assert_eq!(tree.origins().len(), 2);
	assert_eq!(tree.origins()[1].format, "toml");
}

#[tokio::test]
async fn test_missing_required_layer_fails() {
	let source = Arc::new(MemorySource::new());
	let loader = loader(source, vec![Layer::probe("appsettings")]);
	match loader.load().await {
		Err(BindingError::NotFound(name)) => assert_eq!(name, "appsettings"),
		other => panic!("Expected NotFound, got {:?}", other),
	}
}

#[tokio::test]
async fn test_missing_optional_layer_is_skipped() {
	let source = Arc::new(MemorySource::new());
	source.insert("base.json", r#"{"bundling": {"bundlingEnabled": true}}"#);
	let loader = loader(
		source,
		vec![Layer::file("base.json"), Layer::probe("local").optional()],
	);
	let tree = loader.load().await.unwrap();
	let raw: RawOptions = tree.bind("bundling").unwrap();
	assert_eq!(raw.bundling_enabled, Some(true));
}

#[tokio::test]
async fn test_invalid_layer_fails() {
	let source = Arc::new(MemorySource::new());
	source.insert("base.json", "{ not json");
	let loader = loader(source, vec![Layer::file("base.json")]);
	assert!(matches!(loader.load().await, Err(BindingError::Parse { .. })));
}

#[tokio::test]
async fn test_inline_layer_provides_defaults() {
	let source = Arc::new(MemorySource::new());
	source.insert("site.json", r#"{"Bundling": {"clientCacheEnabled": false}}"#);
	let loader = loader(
		source,
		vec![
			Layer::inline(json!({"bundling": {"clientCacheEnabled": true, "minificationEnabled": true}})),
			Layer::file("site.json"),
		],
	);
	let tree = loader.load().await.unwrap();
	let raw: RawOptions = tree.bind("bundling").unwrap();
	assert_eq!(raw.client_cache_enabled, Some(false));
	assert_eq!(raw.minification_enabled, Some(true));
}

#[test]
fn test_nested_section_lookup_ignores_case() {
	let tree = ConfigTree::from_value(json!({
		"Web": {"Bundling": {"minification_enabled": "False", "AutoPrefixerEnabled": "true"}}
	}));
	let raw: RawOptions = tree.bind("web:bundling").unwrap();
	assert_eq!(raw.minification_enabled, Some(false));
	assert_eq!(raw.auto_prefixer_enabled, Some(true));
}

#[test]
fn test_later_layer_overrides_differently_spelled_key() {
	let mut tree = ConfigTree::from_value(json!({"bundling": {"minification_enabled": true}}));
	tree.merge(json!({"Bundling": {"MinificationEnabled": false}}));

	let section = tree.section("bundling").unwrap().as_object().unwrap();
	assert_eq!(section.len(), 1);
	assert_eq!(section.get("minification_enabled"), Some(&json!(false)));

	let raw: RawOptions = tree.bind("bundling").unwrap();
	assert_eq!(raw.minification_enabled, Some(false));
}

#[test]
fn test_normalize_key() {
	use bundle_live::loader::normalize_key;

	assert_eq!(normalize_key("auto-prefixer_Enabled"), "autoprefixerenabled");
	assert_eq!(normalize_key("AutoPrefixerEnabled"), normalize_key("auto_prefixer_enabled"));
}

#[test]
fn test_missing_section_binds_defaults() {
	let tree = ConfigTree::from_value(json!({"other": {}}));
	let raw: RawOptions = tree.bind("bundling").unwrap();
	assert_eq!(raw.bundling_enabled, None);
	assert!(!raw.always_disable_auto_prefixer_in_dev_mode);
}

#[test]
fn test_malformed_switch_is_binding_error() {
	let tree = ConfigTree::from_value(json!({"bundling": {"minificationEnabled": "sometimes"}}));
	match tree.bind::<RawOptions>("bundling") {
		Err(BindingError::Bind { section, .. }) => assert_eq!(section, "bundling"),
		other => panic!("Expected Bind error, got {:?}", other.map(|_| ())),
	}

	let tree = ConfigTree::from_value(json!({"bundling": {"diskCacheEnabled": 3}}));
	assert!(tree.bind::<RawOptions>("bundling").is_err());
}

#[tokio::test]
async fn test_memory_source_edits_are_visible() {
	let source = Arc::new(MemorySource::new());
	source.insert("app.json", r#"{"bundling": {"minificationEnabled": true}}"#);
	let loader = loader(Arc::clone(&source), vec![Layer::probe("app")]);

	let raw: RawOptions = loader.load().await.unwrap().bind("bundling").unwrap();
	assert_eq!(raw.minification_enabled, Some(true));

	source.insert("app.json", r#"{"bundling": {"minificationEnabled": false}}"#);
	let raw: RawOptions = loader.load().await.unwrap().bind("bundling").unwrap();
	assert_eq!(raw.minification_enabled, Some(false));

	assert!(source.remove("app.json"));
	assert!(loader.load().await.is_err());
}

#[cfg(feature = "fs")]
#[tokio::test]
async fn test_file_source_sandbox() -> Result<(), Box<dyn std::error::Error>> {
	use bundle_live::loader::FileSource;

	let dir = tempfile::tempdir()?;
	tokio::fs::write(dir.path().join("app.json"), br#"{"bundling": {"bundlingEnabled": false}}"#).await?;

	let loader = LayeredLoader::builder()
		.source(FileSource::new(dir.path()))
		.format(AnyFormat::Json)
		.layer(Layer::probe("app"))
		.build()
		.unwrap();
	let raw: RawOptions = loader.load().await?.bind("bundling")?;
	assert_eq!(raw.bundling_enabled, Some(false));

	let escaping = LayeredLoader::builder()
		.source(FileSource::new(dir.path()))
		.format(AnyFormat::Json)
		.layer(Layer::file("../app.json"))
		.build()
		.unwrap();
	assert!(matches!(escaping.load().await, Err(BindingError::SandboxViolation)));

	Ok(())
}
