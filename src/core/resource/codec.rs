//! YAML text to tree conversions used on both sides of the engine call.

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::sync::OnceLock;
use uuid::Uuid;

/// Failures raised while converting between YAML text and trees.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("document is empty")]
    Empty,
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("expected a mapping at the document root, found {0}")]
    NotAMapping(&'static str),
    #[error("input was of unexpected kind {found:?}; expected {expected:?}")]
    UnexpectedKind {
        expected: &'static str,
        found: String,
    },
}

/// Editable tree form of a single structured document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node(Value);

impl Node {
    /// Parse exactly one YAML document.
    pub fn parse(text: &str) -> Result<Self, CodecError> {
        if text.trim().is_empty() {
            return Err(CodecError::Empty);
        }
        let value: Value = serde_yaml::from_str(text)?;
        if value.is_null() {
            return Err(CodecError::Empty);
        }
        Ok(Node(value))
    }

    pub fn from_value(value: Value) -> Self {
        Node(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn to_yaml_string(&self) -> Result<String, CodecError> {
        render_yaml(&self.0)
    }
}

impl From<KubeObject> for Node {
    fn from(object: KubeObject) -> Self {
        Node(Value::Mapping(object.0))
    }
}

/// A KRM object as seen by the caller: a YAML mapping with typed accessors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KubeObject(Mapping);

impl KubeObject {
    /// Parse a single YAML document whose root must be a mapping.
    pub fn parse(text: &str) -> Result<Self, CodecError> {
        Self::try_from(Node::parse(text)?.into_value())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn api_version(&self) -> &str {
        self.0
            .get("apiVersion")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn kind(&self) -> &str {
        self.0.get("kind").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.metadata_field("name")
    }

    pub fn namespace(&self) -> &str {
        self.metadata_field("namespace")
    }

    pub fn identity(&self) -> GroupVersionKind {
        GroupVersionKind::from_api_version_and_kind(self.api_version(), self.kind())
    }

    /// Decode the object into a typed shape.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_yaml::Error> {
        serde_yaml::from_value(Value::Mapping(self.0.clone()))
    }

    pub fn to_yaml_string(&self) -> Result<String, CodecError> {
        render_yaml(&self.0)
    }

    fn metadata_field(&self, field: &str) -> &str {
        self.0
            .get("metadata")
            .and_then(|meta| meta.get(field))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

impl TryFrom<Value> for KubeObject {
    type Error = CodecError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Mapping(mapping) => Ok(KubeObject(mapping)),
            other => Err(CodecError::NotAMapping(value_kind(&other))),
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

const YAML_1_1_BOOLS: &[&str] = &[
    "y", "Y", "yes", "Yes", "YES", "n", "N", "no", "No", "NO", "true", "True", "TRUE", "false",
    "False", "FALSE", "on", "On", "ON", "off", "Off", "OFF",
];

/// Plain scalars that YAML 1.1 resolves to timestamps, binary or
/// sexagesimal integers, or integers with `_` separators.
fn yaml_1_1_scalar() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(concat!(
            r"^(?:",
            r"[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}",
            r"(?:(?:[Tt]|[ \t]+)[0-9]{1,2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]*)?",
            r"(?:[ \t]*(?:Z|[-+][0-9]{1,2}(?::[0-9]{2})?))?)?",
            r"|[-+]?0b[01_]+",
            r"|[-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+(?:\.[0-9_]*)?",
            r"|[-+]?[0-9][0-9_]*_[0-9_]*(?:\.[0-9_]*)?",
            r")$"
        ))
        .expect("valid YAML 1.1 scalar pattern")
    })
}

fn is_yaml_1_1_ambiguous(text: &str) -> bool {
    YAML_1_1_BOOLS.contains(&text) || yaml_1_1_scalar().is_match(text)
}

/// Serialize to YAML, single-quoting strings a YAML 1.1 reader would not
/// read back as strings.
///
/// serde_yaml follows YAML 1.2 and leaves `yes` or `2001-12-14` plain. Those
/// strings are swapped for unique plain tokens before emitting, then the
/// tokens are replaced with the quoted originals.
pub fn render_yaml<T: Serialize>(value: &T) -> Result<String, CodecError> {
    let mut value = serde_yaml::to_value(value)?;
    let nonce = Uuid::new_v4().simple().to_string();
    let mut quoted = Vec::new();
    mask_ambiguous(&mut value, &nonce, &mut quoted);

    let mut text = serde_yaml::to_string(&value)?;
    for (index, original) in quoted.iter().enumerate() {
        text = text.replace(
            &mask_token(&nonce, index),
            &format!("'{}'", original.replace('\'', "''")),
        );
    }
    Ok(text)
}

fn mask_token(nonce: &str, index: usize) -> String {
    format!("kptkcl{}q{}e", nonce, index)
}

fn mask_ambiguous(value: &mut Value, nonce: &str, quoted: &mut Vec<String>) {
    match value {
        Value::String(text) if is_yaml_1_1_ambiguous(text) => {
            let token = mask_token(nonce, quoted.len());
            quoted.push(std::mem::replace(text, token));
        }
        Value::Sequence(items) => {
            for item in items {
                mask_ambiguous(item, nonce, quoted);
            }
        }
        Value::Mapping(mapping) => {
            let mut masked = Mapping::with_capacity(mapping.len());
            for (mut key, mut item) in std::mem::take(mapping) {
                mask_ambiguous(&mut key, nonce, quoted);
                mask_ambiguous(&mut item, nonce, quoted);
                masked.insert(key, item);
            }
            *mapping = masked;
        }
        Value::Tagged(tagged) => mask_ambiguous(&mut tagged.value, nonce, quoted),
        _ => {}
    }
}

/// Type identity of a KRM object, split the way Kubernetes splits `apiVersion`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    /// Build an identity from `apiVersion` and `kind`. An `apiVersion` with
    /// more than one `/` keeps only the kind.
    pub fn from_api_version_and_kind(api_version: &str, kind: &str) -> Self {
        let (group, version) = match api_version.split('/').collect::<Vec<_>>().as_slice() {
            [""] | ["", ""] => (String::new(), String::new()),
            [version] => (String::new(), (*version).to_string()),
            [group, version] => ((*group).to_string(), (*version).to_string()),
            _ => (String::new(), String::new()),
        };
        GroupVersionKind {
            group,
            version,
            kind: kind.to_string(),
        }
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}, Kind={}", self.group, self.version, self.kind)
    }
}
