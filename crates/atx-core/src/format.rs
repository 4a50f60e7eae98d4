// Scalar unwrapping and single-key flattening.
use crate::node::{Node, Scalar};

/// Replaces every serializer-wrapped primitive with the bare value.
pub fn format_scalar_values(node: &mut Node) {
    match node {
        Node::Wrapped { value, .. } => {
            let value = std::mem::replace(value, Scalar::Null);
            *node = Node::Scalar(value);
        }
        Node::Object(obj) => obj.properties.values_mut().for_each(format_scalar_values),
        Node::Array(items) => items.iter_mut().for_each(format_scalar_values),
        Node::Scalar(_) => {}
    }
}

/// Collapses objects holding exactly one key whose value is a bare scalar
/// into that scalar. Children are resolved first.
pub fn flatten_objects_with_single_key_scalars(node: &mut Node) {
    match node {
        Node::Object(obj) => {
            obj.properties
                .values_mut()
                .for_each(flatten_objects_with_single_key_scalars);
            if obj.key_count() == 1
                && obj.properties.first().is_some_and(|(_, v)| v.is_scalar())
                && let Some((_, only)) = obj.properties.pop()
            {
                *node = only;
            }
        }
        Node::Array(items) => items
            .iter_mut()
            .for_each(flatten_objects_with_single_key_scalars),
        Node::Wrapped { .. } | Node::Scalar(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ObjectNode;
    use serde_json::json;

    #[test]
    fn unwraps_at_every_depth() {
        let mut node = Node::Object(
            ObjectNode::tagged("T")
                .with("a", Node::wrapped("x"))
                .with("b", vec![Node::wrapped(1), Node::wrapped(true)])
                .with("c", ObjectNode::new().with("d", Node::wrapped(Scalar::Null))),
        );
        format_scalar_values(&mut node);
        assert_eq!(
            node.to_json(),
            json!({"@type": "T", "a": "x", "b": [1, true], "c": {"d": null}})
        );
        let once = node.clone();
        format_scalar_values(&mut node);
        assert_eq!(node, once);
    }

    #[test]
    fn wrapped_scalar_under_single_key_flattens() {
        let mut node = Node::Object(
            ObjectNode::new()
                .with("wrapper", ObjectNode::new().with("field", Node::wrapped("x")))
                .with("other", Scalar::Int(1)),
        );
        format_scalar_values(&mut node);
        flatten_objects_with_single_key_scalars(&mut node);
        assert_eq!(node.to_json(), json!({"wrapper": "x", "other": 1}));
    }

    #[test]
    fn single_key_root_flattens_to_its_scalar() {
        let mut node = Node::Object(ObjectNode::new().with("field", Node::wrapped("x")));
        format_scalar_values(&mut node);
        flatten_objects_with_single_key_scalars(&mut node);
        assert_eq!(node, Node::Scalar(Scalar::from("x")));
    }

    #[test]
    fn array_elements_are_flattened() {
        let mut node = Node::Array(vec![
            Node::Object(ObjectNode::new().with("a", Scalar::Int(1))),
            Node::Object(ObjectNode::new().with("b", Scalar::Int(2)).with("c", Scalar::Int(3))),
        ]);
        flatten_objects_with_single_key_scalars(&mut node);
        assert_eq!(node.to_json(), json!([1, {"b": 2, "c": 3}]));
    }

    #[test]
    fn flattening_is_innermost_first() {
        let mut node = Node::Object(
            ObjectNode::new().with(
                "a",
                ObjectNode::new().with("b", ObjectNode::new().with("c", Scalar::Int(1))),
            ),
        );
        flatten_objects_with_single_key_scalars(&mut node);
        assert_eq!(node, Node::Scalar(Scalar::Int(1)));
    }

    #[test]
    fn multi_key_empty_and_nested_objects_stay() {
        let mut node = Node::Object(
            ObjectNode::new()
                .with("pair", ObjectNode::new().with("x", Scalar::Int(1)).with("y", Scalar::Int(2)))
                .with("empty", ObjectNode::new())
                .with("list", ObjectNode::new().with("items", vec![Node::Scalar(Scalar::Int(1))]))
                .with("tagged", ObjectNode::tagged("T").with("x", Scalar::Int(1)))
                .with("raw", ObjectNode::new().with("w", Node::wrapped(1))),
        );
        let before = node.clone();
        flatten_objects_with_single_key_scalars(&mut node);
        assert_eq!(node, before);
    }
}
