/* src/resolver/mod.rs */

//!
//! Resolution of raw options into a complete [`BundleOptions`](crate::BundleOptions).

mod context;
mod resolve;

pub use context::{
	EnvironmentProvider, ProcessEnvironment, ResolutionContext, SettingsProvider, StaticEnvironment,
	StaticSettings, TriState,
};
pub use resolve::resolve;
