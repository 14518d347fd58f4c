pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod resource;
pub mod types;

pub use config::{resolve, ConfigVariant, KclRun};
pub use engine::{EngineRequest, TransformEngine};
pub use error::AppError;
pub use pipeline::{process, TransformPipeline};
pub use resource::{KubeObject, Node, ResourceList};
pub use types::{ErrorCategory, ErrorSeverity};
