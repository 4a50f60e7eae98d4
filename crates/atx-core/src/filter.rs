use crate::mapping::MappingRegistry;
use crate::node::Node;

/// Keeps only the identifier and the visible properties of `type_key` nodes.
/// A mapping without visible properties filters nothing.
pub fn delete_properties_not_in_filter(mappings: &MappingRegistry, node: &mut Node, type_key: &str) {
    let Some(mapping) = mappings.lookup(type_key) else {
        return;
    };
    if mapping.visible_properties.is_empty() {
        return;
    }
    node.for_each_object_mut(&mut |obj| {
        if obj.is_tagged_as(type_key) {
            obj.properties.retain(|k, _| {
                *k == mapping.identifier_key || mapping.visible_properties.contains(k)
            });
        }
    });
}
