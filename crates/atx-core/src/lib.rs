//! atx-core: mapping-driven shaping of generic serializer trees
//!
//! This crate focuses on a small, well-factored surface:
//! - Node model for the serializer's tagged tree, with its JSON codec
//! - Mapping registry (renames, hidden/visible properties, identifiers)
//! - Structural stages: delete, filter, rename, format, flatten, type-as-key,
//!   snake-case keys
//! - Pipeline of stages and the one-way `Transformer` strategies
//!
pub mod case;
pub mod delete;
pub mod error;
pub mod filter;
pub mod format;
pub mod mapping;
pub mod node;
pub mod pipeline;
pub mod rename;
pub mod restructure;
pub mod transformer;

pub use case::{camel_case_to_underscore, keys_to_underscore, namespace_as_key, to_snake_case};
pub use delete::{delete_keys, delete_properties};
pub use error::{Error, Result};
pub use filter::delete_properties_not_in_filter;
pub use format::{flatten_objects_with_single_key_scalars, format_scalar_values};
pub use mapping::{Mapping, MappingRegistry};
pub use node::{Node, ObjectNode, Properties, Scalar, TYPE_TAG_KEY};
pub use pipeline::{Pipeline, Stage};
pub use rename::rename_key_value;
pub use restructure::set_type_as_key;
pub use transformer::{JsonTransformer, KeyedJsonTransformer, Transformer, encode_json};
