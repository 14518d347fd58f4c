//! KRM resources: the document codec and the ResourceList envelope.

pub mod codec;
pub mod list;

pub use codec::{render_yaml, CodecError, GroupVersionKind, KubeObject, Node};
pub use list::{FnResult, ResourceList, RESOURCE_LIST_API_VERSION, RESOURCE_LIST_KIND};
