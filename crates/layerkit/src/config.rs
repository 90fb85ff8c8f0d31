//! # Configuration
//!
//! Model behavior that is a matter of policy rather than schema lives in
//! [`ModelConfig`], loaded with [`confique`] from an optional TOML file over
//! compiled defaults.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `unknown_keys` | `reject` | Construction with an undeclared key: `reject` fails, `ignore` skips it |
//!
//! A schema picks up its config from [`SchemaBuilder::config`](crate::entity::SchemaBuilder::config);
//! namespaces and inheriting schemas copy it.

use std::path::Path;

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What construction and mass assignment do with keys the schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeys {
    #[default]
    Reject,
    Ignore,
}

/// Configuration for entity models, stored in `layerkit.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelConfig {
    /// "reject" or "ignore". When absent, undeclared keys are rejected.
    pub unknown_keys: Option<UnknownKeys>,
}

impl ModelConfig {
    /// Load from a TOML file, falling back to defaults for missing keys.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(path) = path {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }

    pub fn unknown_keys(&self) -> UnknownKeys {
        self.unknown_keys.unwrap_or_default()
    }

    pub fn ignoring_unknown_keys() -> Self {
        Self {
            unknown_keys: Some(UnknownKeys::Ignore),
        }
    }
}
