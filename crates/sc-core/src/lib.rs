//! sc-core - graph substrate for the command/action protocol
//!
//! This crate provides everything the protocol layer needs from the semantic
//! graph, and nothing more:
//! - `Addr` handles and element types
//! - The `GraphStore` interface and an in-memory reference store
//! - Declarative templates with named bindings
//! - The keynode registry and the `ResultCode` taxonomy
//! - The error facility and the structured logging facility

pub mod addr;
pub mod element_type;
pub mod errors;
pub mod keynodes;
pub mod logging_facility;
pub mod result_code;
pub mod store;
pub mod template;
pub mod utils;

pub use sc_core_types::schema;

// Re-export commonly used types
pub use addr::{Addr, ElementId};
pub use element_type::{ElementType, TypeFilter};
pub use errors::{ExError, ExErrorKind, StoreError, StoreResult};
pub use keynodes::{KeynodeEntry, Keynodes};
pub use result_code::ResultCode;
pub use store::{EdgeInfo, EdgeOutcome, GraphStore, Iter3Match, Iter5Match, MemoryStore};
pub use template::{Template, TemplateBinding, TemplateItem};
