/* tests/watch_integration.rs */

#![cfg(all(feature = "watch", feature = "json"))]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bundle_live::controller::{LayeredSource, ReloadManager};
use bundle_live::invalidate::{ArtifactCache, CacheError, CacheRegistry};
use bundle_live::loader::{FileSource, Layer, LayeredLoader, format::AnyFormat};
use bundle_live::resolver::StaticEnvironment;
use bundle_live::signal::{ChangeNotifier, WatchConfig, WatchTarget, Watcher};

#[derive(Default)]
struct CountingCache {
	clears: AtomicUsize,
}

#[async_trait]
impl ArtifactCache for CountingCache {
	async fn clear_all(&self) -> Result<(), CacheError> {
		self.clears.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}
}

fn fast() -> WatchConfig {
	WatchConfig {
		debounce: Duration::from_millis(50),
		..WatchConfig::default()
	}
}

#[tokio::test]
async fn test_file_edit_reloads_options() -> Result<(), Box<dyn std::error::Error>> {
	let dir = tempfile::tempdir()?;
	let file = dir.path().join("bundling.json");
	tokio::fs::write(&file, br#"{"bundling": {"minificationEnabled": true}}"#).await?;

	let loader = LayeredLoader::builder()
		.source(FileSource::new(dir.path()))
		.format(AnyFormat::Json)
		.layer(Layer::probe("bundling"))
		.build()
		.unwrap();
	let source = Arc::new(LayeredSource::new(loader));
	source.watch(WatchTarget::File(file.clone()), fast())?;

	let cache = Arc::new(CountingCache::default());
	let registry = Arc::new(CacheRegistry::new());
	registry.register(cache.clone());

	let manager = ReloadManager::builder()
		.source(source.clone())
		.locator(registry)
		.environment(Arc::new(StaticEnvironment::production()))
		.build()?;
	assert!(manager.load().await?.minification_enabled);

	tokio::fs::write(&file, br#"{"bundling": {"minificationEnabled": false}}"#).await?;

	let mut reloaded = false;
	for _ in 0..50 {
		// 5 seconds max
		tokio::time::sleep(Duration::from_millis(100)).await;
		if manager.current().is_some_and(|o| !o.minification_enabled) {
			reloaded = true;
			break;
		}
	}

	assert!(reloaded);
	assert_eq!(cache.clears.load(Ordering::SeqCst), 1);
	Ok(())
}

#[tokio::test]
async fn test_directory_watch_ignores_hidden_files() -> Result<(), Box<dyn std::error::Error>> {
	let dir = tempfile::tempdir()?;
	let notifier = Arc::new(ChangeNotifier::new());
	let mut token = notifier.subscribe()?;

	let _watcher = Watcher::new(
		WatchTarget::Directory(dir.path().to_path_buf()),
		fast(),
		notifier.clone(),
	)?;

	tokio::fs::write(dir.path().join(".swap"), b"x").await?;
	let hidden = tokio::time::timeout(Duration::from_millis(500), token.changed()).await;
	assert!(hidden.is_err());

	tokio::fs::write(dir.path().join("site.json"), b"{}").await?;
	let notice = tokio::time::timeout(Duration::from_secs(5), token.changed())
		.await?
		.expect("notifier open");
	assert!(notice.paths.iter().any(|p| p.ends_with("site.json")));
	Ok(())
}

#[tokio::test]
async fn test_watch_missing_directory_fails() {
	let notifier = Arc::new(ChangeNotifier::new());
	let result = Watcher::new(
		WatchTarget::Directory("/definitely/not/here".into()),
		WatchConfig::default(),
		notifier,
	);
	assert!(result.is_err());
}
