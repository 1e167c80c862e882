//! Logical backend name resolution.
//!
//! The router only ever produces logical backend names; turning a name
//! into a network endpoint is this collaborator's job. [`StaticResolver`]
//! is the bundled implementation, a fixed map built from the config's
//! `backends` section. A deployment with real service discovery supplies
//! its own [`BackendResolver`] and owns endpoint selection, health, and
//! retries.

use std::collections::HashMap;

use url::Url;

use crate::error::WaypointError;

pub trait BackendResolver: Send + Sync {
    fn name(&self) -> &'static str;

    /// Resolve a logical backend name to an endpoint base URL.
    fn resolve(&self, backend: &str) -> Result<Url, WaypointError>;
}

pub struct StaticResolver {
    endpoints: HashMap<String, Url>,
}

impl StaticResolver {
    /// Build from the config's logical-name -> URL map.
    ///
    /// URLs were already syntax-checked by config validation; a parse
    /// failure here is reported per backend rather than panicking.
    pub fn from_backends(backends: &HashMap<String, String>) -> Result<Self, WaypointError> {
        let mut endpoints = HashMap::with_capacity(backends.len());
        for (name, raw) in backends {
            let url = Url::parse(raw).map_err(|e| WaypointError::UriParse {
                source: Box::new(e),
            })?;
            endpoints.insert(name.clone(), url);
        }
        Ok(Self { endpoints })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl BackendResolver for StaticResolver {
    fn name(&self) -> &'static str {
        "static"
    }

    fn resolve(&self, backend: &str) -> Result<Url, WaypointError> {
        self.endpoints
            .get(backend)
            .cloned()
            .ok_or_else(|| WaypointError::BackendUnresolved {
                name: backend.to_string(),
            })
    }
}
