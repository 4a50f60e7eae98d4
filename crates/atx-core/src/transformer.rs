//! One-way transformers: generic serializer tree in, wire text out.
//!
//! [`Transformer`] is the seam format strategies implement. The two strategies
//! here pick a stage order and hand the shaped tree to `serde_json`.
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::mapping::MappingRegistry;
use crate::node::{Node, TYPE_TAG_KEY};
use crate::pipeline::{Pipeline, Stage};

pub trait Transformer {
    fn mappings(&self) -> &MappingRegistry;

    /// Shapes `value` and encodes it.
    fn serialize(&self, value: Node) -> Result<String>;

    /// Always fails: transformers only go from domain to wire.
    fn deserialize(&self, _value: &str) -> Result<Node> {
        Err(Error::Unsupported {
            transformer: std::any::type_name::<Self>(),
        })
    }
}

/// Pretty JSON for a shaped tree.
pub fn encode_json(node: &Node) -> Result<String> {
    Ok(serde_json::to_string_pretty(&node.to_json())?)
}

/// Plain JSON objects: type tags are dropped, keys snake cased.
#[derive(Debug, Clone)]
pub struct JsonTransformer {
    mappings: Arc<MappingRegistry>,
    pipeline: Pipeline,
}

impl JsonTransformer {
    pub fn new(mappings: Arc<MappingRegistry>) -> Self {
        Self {
            mappings,
            pipeline: Self::pipeline(),
        }
    }

    pub fn pipeline() -> Pipeline {
        Pipeline::new([
            Stage::HideProperties,
            Stage::RenameKeys,
            Stage::FilterProperties,
            Stage::FormatScalars,
            Stage::DeleteKeys(vec![TYPE_TAG_KEY.to_string()]),
            Stage::FlattenScalars,
            Stage::KeysToUnderscore,
        ])
    }

    pub fn shape(&self, mut value: Node) -> Node {
        self.pipeline.run(&self.mappings, &mut value);
        value
    }
}

impl Transformer for JsonTransformer {
    fn mappings(&self) -> &MappingRegistry {
        &self.mappings
    }

    fn serialize(&self, value: Node) -> Result<String> {
        encode_json(&self.shape(value))
    }
}

/// JSON where every typed object sits under its type name,
/// e.g. `{"user": {"id": 1}}`.
#[derive(Debug, Clone)]
pub struct KeyedJsonTransformer {
    mappings: Arc<MappingRegistry>,
    pipeline: Pipeline,
}

impl KeyedJsonTransformer {
    pub fn new(mappings: Arc<MappingRegistry>) -> Self {
        Self {
            mappings,
            pipeline: Self::pipeline(),
        }
    }

    pub fn pipeline() -> Pipeline {
        Pipeline::new([
            Stage::HideProperties,
            Stage::RenameKeys,
            Stage::FilterProperties,
            Stage::FormatScalars,
            Stage::TypeAsKey,
            Stage::FlattenScalars,
            Stage::KeysToUnderscore,
        ])
    }

    pub fn shape(&self, mut value: Node) -> Node {
        self.pipeline.run(&self.mappings, &mut value);
        value
    }
}

impl Transformer for KeyedJsonTransformer {
    fn mappings(&self) -> &MappingRegistry {
        &self.mappings
    }

    fn serialize(&self, value: Node) -> Result<String> {
        encode_json(&self.shape(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Mapping;
    use crate::node::ObjectNode;

    fn registry() -> Arc<MappingRegistry> {
        Arc::new(MappingRegistry::new([Mapping::new("App\\User")]))
    }

    #[test]
    fn deserialize_is_unsupported() {
        let t = JsonTransformer::new(registry());
        assert!(matches!(t.deserialize(""), Err(Error::Unsupported { .. })));
        assert!(matches!(t.deserialize("{\"id\":1}"), Err(Error::Unsupported { .. })));

        let k = KeyedJsonTransformer::new(registry());
        match k.deserialize("[]") {
            Err(e @ Error::Unsupported { .. }) => {
                assert!(e.to_string().contains("KeyedJsonTransformer"));
                assert!(e.to_string().ends_with("does not perform deserialization"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn transformers_share_the_registry() {
        let reg = registry();
        let a = JsonTransformer::new(Arc::clone(&reg));
        let b = KeyedJsonTransformer::new(Arc::clone(&reg));
        assert!(std::ptr::eq(a.mappings(), b.mappings()));
        assert_eq!(Arc::strong_count(&reg), 3);
    }

    #[test]
    fn plain_json_drops_tags_and_snake_cases() {
        let t = JsonTransformer::new(registry());
        let node = Node::Object(
            ObjectNode::tagged("App\\User")
                .with("id", Node::wrapped(1))
                .with("firstName", Node::wrapped("A")),
        );
        let out: serde_json::Value = serde_json::from_str(&t.serialize(node).unwrap()).unwrap();
        assert_eq!(out, serde_json::json!({"id": 1, "first_name": "A"}));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn transformers_are_thread_safe() {
        assert_send_sync::<JsonTransformer>();
        assert_send_sync::<KeyedJsonTransformer>();
    }
}
