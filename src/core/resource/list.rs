use crate::core::resource::codec::{render_yaml, CodecError, KubeObject};
use crate::core::types::ErrorSeverity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const RESOURCE_LIST_API_VERSION: &str = "config.kubernetes.io/v1";
pub const RESOURCE_LIST_KIND: &str = "ResourceList";

/// The kpt function wire envelope: items, the function config and results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceList {
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_kind")]
    pub kind: String,

    #[serde(default)]
    pub items: Vec<KubeObject>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_config: Option<KubeObject>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<FnResult>,
}

/// A single entry in `ResourceList.results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FnResult {
    pub message: String,
    pub severity: ErrorSeverity,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl FnResult {
    pub fn error<T: Into<String>>(message: T) -> Self {
        FnResult {
            message: message.into(),
            severity: ErrorSeverity::Error,
            tags: BTreeMap::new(),
        }
    }

    pub fn warning<T: Into<String>>(message: T) -> Self {
        FnResult {
            severity: ErrorSeverity::Warning,
            ..FnResult::error(message)
        }
    }
}

fn default_api_version() -> String {
    RESOURCE_LIST_API_VERSION.to_string()
}

fn default_kind() -> String {
    RESOURCE_LIST_KIND.to_string()
}

impl ResourceList {
    pub fn new(items: Vec<KubeObject>, function_config: Option<KubeObject>) -> Self {
        ResourceList {
            api_version: default_api_version(),
            kind: default_kind(),
            items,
            function_config,
            results: Vec::new(),
        }
    }

    pub fn parse(text: &str) -> Result<Self, CodecError> {
        if text.trim().is_empty() {
            return Err(CodecError::Empty);
        }
        let list: ResourceList = serde_yaml::from_str(text)?;
        if list.kind != RESOURCE_LIST_KIND {
            return Err(CodecError::UnexpectedKind {
                expected: RESOURCE_LIST_KIND,
                found: list.kind,
            });
        }
        Ok(list)
    }

    pub fn to_yaml_string(&self) -> Result<String, CodecError> {
        render_yaml(self)
    }

    pub fn has_errors(&self) -> bool {
        self.results
            .iter()
            .any(|result| result.severity == ErrorSeverity::Error)
    }
}
