//! Presidio detection tasks
//!
//! - [`collector`]: turns the plugin configuration into task descriptors
//! - [`mapping`]: maps engine labels to host entity types, per language
//! - [`task`]: the detection task itself

pub mod collector;
pub mod mapping;
#[allow(clippy::module_inception)]
pub mod task;

pub use collector::{pii_list, PresidioTaskCollector, TaskDescriptor};
pub use mapping::{build_entity_map, demultiplex, EntityMap, TaskEntity};
pub use task::{PiiTask, PresidioTask};
