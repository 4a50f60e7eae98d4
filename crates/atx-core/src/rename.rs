use crate::mapping::MappingRegistry;
use crate::node::{Node, Properties};

/// Applies the aliases of `type_key` to nodes tagged with it. Values and
/// positions are kept; properties without an alias keep their name.
pub fn rename_key_value(mappings: &MappingRegistry, node: &mut Node, type_key: &str) {
    let Some(mapping) = mappings.lookup(type_key) else {
        return;
    };
    if mapping.aliases.is_empty() {
        return;
    }
    node.for_each_object_mut(&mut |obj| {
        if !obj.is_tagged_as(type_key) {
            return;
        }
        let old = std::mem::take(&mut obj.properties);
        let mut renamed = Properties::with_capacity(old.len());
        for (key, value) in old {
            let key = mapping.aliases.get(&key).cloned().unwrap_or(key);
            if renamed.contains_key(&key) {
                tracing::debug!(type_key, key = %key, "renamed property collides; keeping the later value");
            }
            renamed.insert(key, value);
        }
        obj.properties = renamed;
    });
}
