use crate::case::namespace_as_key;
use crate::node::Node;

/// Turns every tagged object into a one-entry map keyed by its type name:
/// `{@type: "App\\User", id: 1}` becomes `{user: {id: 1}}`. Objects with an
/// empty tag are left as they are.
pub fn set_type_as_key(node: &mut Node) {
    match node {
        Node::Object(obj) => {
            obj.properties.values_mut().for_each(set_type_as_key);
            if let Some(tag) = obj.type_tag.take_if(|t| !t.is_empty()) {
                let inner = std::mem::take(obj);
                obj.properties
                    .insert(namespace_as_key(&tag), Node::Object(inner));
            }
        }
        Node::Array(items) => items.iter_mut().for_each(set_type_as_key),
        Node::Wrapped { .. } | Node::Scalar(_) => {}
    }
}
