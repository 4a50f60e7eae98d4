use crate::case::keys_to_underscore;
use crate::delete::{delete_keys, delete_properties};
use crate::filter::delete_properties_not_in_filter;
use crate::format::{flatten_objects_with_single_key_scalars, format_scalar_values};
use crate::mapping::MappingRegistry;
use crate::node::Node;
use crate::rename::rename_key_value;
use crate::restructure::set_type_as_key;

/// One structural rewrite. Type-scoped stages run once per registered type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    HideProperties,
    FilterProperties,
    RenameKeys,
    FormatScalars,
    DeleteKeys(Vec<String>),
    FlattenScalars,
    TypeAsKey,
    KeysToUnderscore,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::HideProperties => "hide-properties",
            Stage::FilterProperties => "filter-properties",
            Stage::RenameKeys => "rename-keys",
            Stage::FormatScalars => "format-scalars",
            Stage::DeleteKeys(_) => "delete-keys",
            Stage::FlattenScalars => "flatten-scalars",
            Stage::TypeAsKey => "type-as-key",
            Stage::KeysToUnderscore => "keys-to-underscore",
        }
    }

    pub fn apply(&self, mappings: &MappingRegistry, node: &mut Node) {
        match self {
            Stage::HideProperties => {
                for type_key in mappings.type_keys() {
                    delete_properties(mappings, node, type_key);
                }
            }
            Stage::FilterProperties => {
                for type_key in mappings.type_keys() {
                    delete_properties_not_in_filter(mappings, node, type_key);
                }
            }
            Stage::RenameKeys => {
                for type_key in mappings.type_keys() {
                    rename_key_value(mappings, node, type_key);
                }
            }
            Stage::FormatScalars => format_scalar_values(node),
            Stage::DeleteKeys(keys) => delete_keys(node, keys.as_slice()),
            Stage::FlattenScalars => flatten_objects_with_single_key_scalars(node),
            Stage::TypeAsKey => set_type_as_key(node),
            Stage::KeysToUnderscore => keys_to_underscore(node),
        }
    }
}

/// Ordered stages; the order is chosen by whoever builds the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: impl IntoIterator<Item = Stage>) -> Self {
        Self {
            stages: stages.into_iter().collect(),
        }
    }

    pub fn then(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn run(&self, mappings: &MappingRegistry, node: &mut Node) {
        tracing::debug!(stages = self.stages.len(), mappings = mappings.len(), "running pipeline");
        for stage in &self.stages {
            tracing::trace!(stage = stage.name(), "applying stage");
            stage.apply(mappings, node);
        }
    }
}
