/* src/loader/layered.rs */

//!
//! Ordered, format-agnostic configuration layers.

use serde_json::Value;

use super::format::AnyFormat;
use super::{BindingError, ConfigTree, Format, LoadInfo, LoadResult, Source};

#[derive(Debug, Clone, PartialEq)]
enum LayerKind {
	/// Base name probed against every registered format.
	Probe(String),
	/// Exact key; format chosen by extension.
	File(String),
	/// Value supplied in code.
	Inline(Value),
}

/// One configuration layer. Later layers override earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
	kind: LayerKind,
	optional: bool,
}

impl Layer {
	/// A layer found by probing `base_name.<ext>` for each registered format.
	pub fn probe(base_name: impl Into<String>) -> Self {
		Self {
			kind: LayerKind::Probe(base_name.into()),
			optional: false,
		}
	}

	/// A layer read from an exact key, parsed according to its extension.
	pub fn file(key: impl Into<String>) -> Self {
		Self {
			kind: LayerKind::File(key.into()),
			optional: false,
		}
	}

	/// A layer supplied in code, e.g. compiled-in defaults.
	pub fn inline(value: Value) -> Self {
		Self {
			kind: LayerKind::Inline(value),
			optional: true,
		}
	}

	/// Marks the layer as optional: a missing layer is skipped instead of failing the load.
	pub fn optional(mut self) -> Self {
		self.optional = true;
		self
	}

	fn name(&self) -> &str {
		match &self.kind {
			LayerKind::Probe(name) | LayerKind::File(name) => name,
			LayerKind::Inline(_) => "<inline>",
		}
	}
}

/// Loads a stack of layers from one [`Source`] and merges them into a [`ConfigTree`].
pub struct LayeredLoader {
	source: Box<dyn Source>,
	formats: Vec<AnyFormat>,
	layers: Vec<Layer>,
}

pub struct LayeredLoaderBuilder {
	source: Option<Box<dyn Source>>,
	formats: Vec<AnyFormat>,
	layers: Vec<Layer>,
}

impl LayeredLoaderBuilder {
	pub fn new() -> Self {
		Self {
			source: None,
			formats: Vec::new(),
			layers: Vec::new(),
		}
	}

	pub fn source(mut self, source: impl Source + 'static) -> Self {
		self.source = Some(Box::new(source));
		self
	}

	pub fn format(mut self, format: AnyFormat) -> Self {
		self.formats.push(format);
		self
	}

	pub fn layer(mut self, layer: Layer) -> Self {
		self.layers.push(layer);
		self
	}

	pub fn build(self) -> Result<LayeredLoader, &'static str> {
		let source = self.source.ok_or("source is required")?;
		if self.formats.is_empty() {
			return Err("at least one format is required");
		}
		Ok(LayeredLoader {
			source,
			formats: self.formats,
			layers: self.layers,
		})
	}
}

impl Default for LayeredLoaderBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl LayeredLoader {
	pub fn builder() -> LayeredLoaderBuilder {
		LayeredLoaderBuilder::new()
	}

	/// Layers in merge order.
	pub fn layers(&self) -> &[Layer] {
		&self.layers
	}

	/// Loads every layer and merges them in order.
	///
	/// Fails on the first invalid layer or missing required layer.
	pub async fn load(&self) -> Result<ConfigTree, BindingError> {
		let mut tree = ConfigTree::new();

		for layer in &self.layers {
			match self.load_layer(layer).await {
				LoadResult::Ok { value, info } => {
					tree.merge(value);
					tree.record_origin(info);
				}
				LoadResult::NotFound if layer.optional => {
					#[cfg(feature = "logging")]
					log::debug!("Optional layer '{}' not found, skipping", layer.name());
				}
				LoadResult::NotFound => return Err(BindingError::NotFound(layer.name().to_string())),
				LoadResult::Invalid(e) => return Err(e),
			}
		}

		Ok(tree)
	}

	async fn load_layer(&self, layer: &Layer) -> LoadResult<Value> {
		match &layer.kind {
			LayerKind::Inline(value) => LoadResult::Ok {
				value: value.clone(),
				info: LoadInfo {
					key: layer.name().to_string(),
					format: "inline",
				},
			},
			LayerKind::File(key) => match AnyFormat::for_name(&self.formats, key) {
				Some(format) => self.load_explicit(key, &format).await,
				None => LoadResult::Invalid(BindingError::parse(key, "no registered format for extension")),
			},
			LayerKind::Probe(base_name) => match self.probe(base_name).await {
				Some((key, format)) => self.load_explicit(&key, &format).await,
				None => LoadResult::NotFound,
			},
		}
	}

	/// Finds the first existing `base_name.<ext>` across registered formats.
	async fn probe(&self, base_name: &str) -> Option<(String, AnyFormat)> {
		let mut found: Option<(String, AnyFormat)> = None;

		for format in &self.formats {
			for ext in format.extensions() {
				let key = format!("{}.{}", base_name, ext);
				if !self.source.exists(&key).await {
					continue;
				}
				if found.is_none() {
					found = Some((key, *format));
					continue;
				}
				#[cfg(feature = "logging")]
				if let Some((first, _)) = &found {
					log::warn!(
						"Conflict detected: multiple configuration files found for '{}'. Using '{}', ignoring '{}'.",
						base_name,
						first,
						key
					);
				}
			}
			#[cfg(not(feature = "logging"))]
			if found.is_some() {
				break;
			}
		}

		found
	}

	async fn load_explicit(&self, key: &str, format: &AnyFormat) -> LoadResult<Value> {
		let bytes = match self.source.read(key).await {
			Ok(b) => b,
			Err(BindingError::NotFound(_)) => return LoadResult::NotFound,
			Err(e) => return LoadResult::Invalid(e),
		};

		let value = match format.parse(key, &bytes) {
			// Empty documents (e.g. a blank YAML file) contribute nothing.
			Ok(Value::Null) => Value::Object(Default::default()),
			Ok(value @ Value::Object(_)) => value,
			Ok(_) => return LoadResult::Invalid(BindingError::parse(key, "layer root must be a table")),
			Err(e) => return LoadResult::Invalid(e),
		};

		LoadResult::Ok {
			value,
			info: LoadInfo {
				key: key.to_string(),
				format: format.extensions().first().copied().unwrap_or("unknown"),
			},
		}
	}
}

impl std::fmt::Debug for LayeredLoader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LayeredLoader")
			.field("formats", &self.formats)
			.field("layers", &self.layers)
			.finish_non_exhaustive()
	}
}
