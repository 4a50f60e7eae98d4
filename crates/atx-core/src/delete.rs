use crate::mapping::MappingRegistry;
use crate::node::{Node, TYPE_TAG_KEY};

/// Removes the given keys from every object at every depth, whatever its
/// type. Listing `@type` drops the type tags.
pub fn delete_keys<S: AsRef<str>>(node: &mut Node, unwanted: &[S]) {
    let drop_tag = unwanted.iter().any(|k| k.as_ref() == TYPE_TAG_KEY);
    node.for_each_object_mut(&mut |obj| {
        if drop_tag {
            obj.type_tag = None;
        }
        obj.properties
            .retain(|k, _| !unwanted.iter().any(|u| u.as_ref() == k.as_str()));
    });
}

/// Removes the hidden properties of `type_key` from nodes tagged with it.
pub fn delete_properties(mappings: &MappingRegistry, node: &mut Node, type_key: &str) {
    let Some(mapping) = mappings.lookup(type_key) else {
        return;
    };
    if mapping.hidden_properties.is_empty() {
        return;
    }
    node.for_each_object_mut(&mut |obj| {
        if obj.is_tagged_as(type_key) {
            obj.properties
                .retain(|k, _| !mapping.hidden_properties.contains(k));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Mapping;
    use crate::node::{ObjectNode, Scalar};

    fn keys(node: &Node) -> Vec<&str> {
        node.as_object()
            .unwrap()
            .properties
            .keys()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn unwanted_keys_go_everywhere() {
        let mut node = Node::Array(vec![
            Node::Object(
                ObjectNode::tagged("A")
                    .with("secret", Scalar::Int(1))
                    .with("keep", Scalar::Int(2))
                    .with("child", ObjectNode::tagged("B").with("secret", Scalar::Int(3))),
            ),
        ]);
        delete_keys(&mut node, &["secret"]);
        let first = &node.as_array().unwrap()[0];
        assert_eq!(keys(first), vec!["keep", "child"]);
        assert!(keys(first.get("child").unwrap()).is_empty());
        assert!(first.as_object().unwrap().is_tagged_as("A"));
    }

    #[test]
    fn deleting_the_tag_key_clears_tags() {
        let mut node = Node::Object(
            ObjectNode::tagged("A").with("child", ObjectNode::tagged("B")),
        );
        delete_keys(&mut node, &[TYPE_TAG_KEY.to_string()]);
        assert_eq!(node.as_object().unwrap().type_tag, None);
        assert_eq!(node.get("child").unwrap().as_object().unwrap().type_tag, None);
    }

    #[test]
    fn hidden_properties_only_affect_their_type() {
        let reg = MappingRegistry::new([Mapping::new("App\\User").with_hidden("password")]);
        let mut node = Node::Object(
            ObjectNode::tagged("App\\Order")
                .with("password", Scalar::from("order-level"))
                .with(
                    "buyers",
                    vec![
                        Node::Object(
                            ObjectNode::tagged("App\\User")
                                .with("name", Scalar::from("A"))
                                .with("password", Scalar::from("x")),
                        ),
                        Node::Object(
                            ObjectNode::tagged("App\\User")
                                .with("password", Scalar::from("y")),
                        ),
                    ],
                ),
        );
        delete_properties(&reg, &mut node, "App\\User");
        assert_eq!(keys(&node), vec!["password", "buyers"]);
        let buyers = node.get("buyers").unwrap().as_array().unwrap();
        assert_eq!(keys(&buyers[0]), vec!["name"]);
        assert!(keys(&buyers[1]).is_empty());
    }

    #[test]
    fn unmapped_type_is_untouched() {
        let reg = MappingRegistry::default();
        let mut node = Node::Object(ObjectNode::tagged("X").with("password", Scalar::Null));
        let before = node.clone();
        delete_properties(&reg, &mut node, "X");
        assert_eq!(node, before);
    }
}
