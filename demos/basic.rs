/* demos/basic.rs */

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bundle_live::controller::{LayeredSource, ReloadManager};
use bundle_live::invalidate::{ArtifactCache, CacheError, CacheRegistry};
use bundle_live::loader::{FileSource, Layer, LayeredLoader, format::AnyFormat};
use bundle_live::options::PhysicalFileProvider;
use bundle_live::resolver::{ProcessEnvironment, StaticSettings};
use bundle_live::signal::{WatchConfig, WatchTarget};

/// Stand-in for the bundler's output cache.
struct PrintingCache;

#[async_trait]
impl ArtifactCache for PrintingCache {
	async fn clear_all(&self) -> Result<(), CacheError> {
		println!("-> artifact cache cleared");
		Ok(())
	}
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// 0. Prepare a real file
	let config_path = "demo_bundling.json";
	fs::write(
		config_path,
		br#"{"bundling": {"minificationEnabled": true, "diskCacheEnabled": true}}"#,
	)?;
	println!("Created {}", config_path);

	// 1. Configuration source: the file, watched for changes
	let loader = LayeredLoader::builder()
		.source(FileSource::new("."))
		.format(AnyFormat::Json)
		.format(AnyFormat::Toml)
		.layer(Layer::probe("demo_bundling"))
		.build()
		.unwrap();
	let source = Arc::new(LayeredSource::new(loader));
	source.watch(WatchTarget::File(config_path.into()), WatchConfig::default())?;

	// 2. The cache registers itself once it exists
	let registry = Arc::new(CacheRegistry::new());
	registry.register(Arc::new(PrintingCache));

	// 3. Reload manager
	let manager = ReloadManager::builder()
		.source(source)
		.locator(registry)
		.environment(Arc::new(ProcessEnvironment::default()))
		.settings(Arc::new(StaticSettings::new(0, 0)))
		.file_provider(Arc::new(PhysicalFileProvider::new("wwwroot")))
		.on_error(|e| eprintln!("reload failed: {}", e))
		.build()?;

	// 4. Initial load
	let options = manager.load().await?;
	println!("Initial options: {:?}", options);

	println!("Edit {} to see updates. Waiting 20 seconds...", config_path);
	for _ in 0..10 {
		tokio::time::sleep(Duration::from_secs(2)).await;
		if let Some(options) = manager.current() {
			println!(
				"minification={} auto_prefixer={} disk_cache={}",
				options.minification_enabled, options.auto_prefixer_enabled, options.disk_cache_enabled
			);
		}
	}

	// Cleanup
	manager.dispose();
	fs::remove_file(config_path)?;
	println!("Done.");
	Ok(())
}
