//! Configuration loading and validation.
//!
//! Defines the [`ConfigSource`] trait for pluggable config backends and
//! the [`ConfigVersion`] enum identifying the loaded snapshot. Submodules
//! provide the data model, validation logic, and concrete source
//! implementations.
//!
//! Configuration is read exactly once at startup: the route table built
//! from it is immutable for the process lifetime, so there is no change
//! detection or reload machinery here.

pub mod model;
pub mod sources;
pub mod validation;

use async_trait::async_trait;

use crate::error::WaypointError;
use model::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigVersion {
    Hash(String),
}

// async_trait is required here because ConfigSource is used as Box<dyn ConfigSource>
// and native async fn in traits (Rust 1.75+) does not support dyn dispatch.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn load(&self) -> Result<(Config, ConfigVersion), WaypointError>;
}
