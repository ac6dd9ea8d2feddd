/* src/loader/source/file.rs */

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::super::{BindingError, Source};

/// A file system source backed by tokio::fs, confined to a root directory.
pub struct FileSource {
	root: PathBuf,
}

impl FileSource {
	/// Create a new FileSource rooted at the given path.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// Returns the root directory of this source.
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Resolves the path safely, ensuring it is within the root directory.
	async fn resolve_secure(&self, key: &str) -> Result<PathBuf, BindingError> {
		if Path::new(key)
			.components()
			.any(|c| matches!(c, Component::ParentDir))
		{
			return Err(BindingError::SandboxViolation);
		}

		let canonical_root = fs::canonicalize(&self.root).await?;

		match fs::canonicalize(self.root.join(key)).await {
			Ok(path) if path.starts_with(&canonical_root) => Ok(path),
			Ok(_) => Err(BindingError::SandboxViolation),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				Err(BindingError::NotFound(key.to_string()))
			}
			Err(e) => Err(BindingError::Io(e)),
		}
	}
}

#[async_trait]
impl Source for FileSource {
	async fn read(&self, key: &str) -> Result<Vec<u8>, BindingError> {
		let path = self.resolve_secure(key).await?;
		Ok(fs::read(path).await?)
	}

	async fn exists(&self, key: &str) -> bool {
		self.resolve_secure(key).await.is_ok()
	}
}
