#![allow(clippy::result_large_err)]

//! Function config resolution: turns a `ConfigMap` or `KCLRun` function
//! config into the canonical [`KclRun`] descriptor.

use crate::core::error::AppError;
use crate::core::resource::{GroupVersionKind, KubeObject};
use crate::core::types::ErrorCategory;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod loader;
pub mod runtime;
pub mod validation;

pub use loader::ConfigLoader;
pub use runtime::{EngineConfig, EngineKind, RuntimeConfig};
pub use validation::ConfigValidator;

/// API group of the `KCLRun` resource.
pub const KCL_RUN_GROUP: &str = "fn.kpt.dev";

/// API version of the `KCLRun` resource.
pub const KCL_RUN_VERSION: &str = "v1alpha1";

/// Group and version of the `KCLRun` resource, as written in `apiVersion`.
pub const KCL_RUN_API_VERSION: &str = "fn.kpt.dev/v1alpha1";

pub const KCL_RUN_KIND: &str = "KCLRun";

pub const CONFIG_MAP_API_VERSION: &str = "v1";

pub const CONFIG_MAP_KIND: &str = "ConfigMap";

/// ConfigMap data key whose value holds the KCL program.
pub const SOURCE_KEY: &str = "source";

/// Name used when the function config does not carry one.
pub const DEFAULT_PROGRAM_NAME: &str = "kcl-function-run";

/// Canonical run descriptor handed to the engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KclRun {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,

    /// Inline KCL program text.
    pub source: String,

    /// Parameters in key-value pairs format.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
}

/// The `v1/ConfigMap` function config shape.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ConfigMapResource {
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Null values read as empty strings.
    #[serde(default, deserialize_with = "nullable_data")]
    pub data: Option<IndexMap<String, String>>,
}

fn nullable_data<'de, D>(deserializer: D) -> Result<Option<IndexMap<String, String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let data = Option::<IndexMap<String, Option<String>>>::deserialize(deserializer)?;
    Ok(data.map(|data| {
        data.into_iter()
            .map(|(key, value)| (key, value.unwrap_or_default()))
            .collect()
    }))
}

/// The `fn.kpt.dev/v1alpha1/KCLRun` function config shape.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct KclRunResource {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub params: Option<IndexMap<String, Value>>,
}

/// The closed set of accepted function config shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigVariant {
    ConfigMap(ConfigMapResource),
    KclRun(KclRunResource),
}

impl ConfigVariant {
    pub fn config_map_identity() -> GroupVersionKind {
        GroupVersionKind::from_api_version_and_kind(CONFIG_MAP_API_VERSION, CONFIG_MAP_KIND)
    }

    pub fn kcl_run_identity() -> GroupVersionKind {
        GroupVersionKind {
            group: KCL_RUN_GROUP.to_string(),
            version: KCL_RUN_VERSION.to_string(),
            kind: KCL_RUN_KIND.to_string(),
        }
    }

    /// Select the variant by `(apiVersion, kind)` and decode the object into it.
    pub fn from_object(object: &KubeObject) -> Result<Self, AppError> {
        match (object.api_version(), object.kind()) {
            (CONFIG_MAP_API_VERSION, CONFIG_MAP_KIND) => object
                .decode::<ConfigMapResource>()
                .map(ConfigVariant::ConfigMap)
                .map_err(|err| decode_error(CONFIG_MAP_KIND, err)),
            (KCL_RUN_API_VERSION, KCL_RUN_KIND) => object
                .decode::<KclRunResource>()
                .map(ConfigVariant::KclRun)
                .map_err(|err| decode_error(KCL_RUN_KIND, err)),
            _ => Err(AppError::new(
                ErrorCategory::UnsupportedConfigKind,
                format!(
                    "`functionConfig` must be either {} or {}, but we got: {}",
                    Self::config_map_identity(),
                    Self::kcl_run_identity(),
                    object.identity()
                ),
            )),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ConfigVariant::ConfigMap(_) => CONFIG_MAP_KIND,
            ConfigVariant::KclRun(_) => KCL_RUN_KIND,
        }
    }
}

fn decode_error(kind: &str, err: serde_yaml::Error) -> AppError {
    AppError::new(
        ErrorCategory::DecodeFailure,
        format!("failed to decode {} functionConfig: {}", kind, err),
    )
    .with_context("kind", kind)
}

impl From<ConfigVariant> for KclRun {
    fn from(variant: ConfigVariant) -> Self {
        match variant {
            ConfigVariant::ConfigMap(cm) => {
                let mut run = KclRun {
                    name: cm.metadata.name.unwrap_or_default(),
                    namespace: cm.metadata.namespace.unwrap_or_default(),
                    ..KclRun::default()
                };
                // The source entry stays in params as well.
                for (key, value) in cm.data.unwrap_or_default() {
                    if key == SOURCE_KEY {
                        run.source = value.clone();
                    }
                    run.params.insert(key, Value::String(value));
                }
                run
            }
            ConfigVariant::KclRun(resource) => KclRun {
                name: resource.metadata.name.unwrap_or_default(),
                namespace: resource.metadata.namespace.unwrap_or_default(),
                source: resource.source.unwrap_or_default(),
                params: resource.params.unwrap_or_default(),
            },
        }
    }
}

/// Resolve, default and validate the function config.
pub fn resolve(function_config: Option<&KubeObject>) -> Result<KclRun, AppError> {
    let object = match function_config {
        Some(object) if !object.is_empty() => object,
        _ => {
            return Err(AppError::new(
                ErrorCategory::ConfigMissing,
                format!(
                    "FunctionConfig is missing. Expect `{}` or `{}`",
                    CONFIG_MAP_KIND, KCL_RUN_KIND
                ),
            ))
        }
    };

    let variant = ConfigVariant::from_object(object)?;
    tracing::debug!(kind = variant.kind(), "selected functionConfig variant");

    let mut run = KclRun::from(variant);
    ConfigValidator::apply_defaults(&mut run);
    ConfigValidator::validate(&run)?;

    tracing::debug!(
        name = %run.name,
        params = run.params.len(),
        "resolved KCLRun descriptor"
    );
    Ok(run)
}
