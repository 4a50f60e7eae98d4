//! Per-type configuration and the read-only registry the stages consult.
//!
//! A type without a [`Mapping`] is passed through untouched by every
//! type-scoped stage; lookups never fail.
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::{Error, Result};

fn default_identifier() -> String {
    "id".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Mapping {
    pub type_key: String,
    #[serde(default = "default_identifier")]
    pub identifier_key: String,
    #[serde(default)]
    pub aliases: IndexMap<String, String>,
    #[serde(default)]
    pub hidden_properties: IndexSet<String>,
    #[serde(default)]
    pub visible_properties: IndexSet<String>,
}

impl Mapping {
    pub fn new(type_key: impl Into<String>) -> Self {
        Self {
            type_key: type_key.into(),
            identifier_key: default_identifier(),
            aliases: IndexMap::new(),
            hidden_properties: IndexSet::new(),
            visible_properties: IndexSet::new(),
        }
    }

    pub fn with_identifier(mut self, key: impl Into<String>) -> Self {
        self.identifier_key = key.into();
        self
    }

    pub fn with_alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.aliases.insert(from.into(), to.into());
        self
    }

    pub fn with_hidden(mut self, key: impl Into<String>) -> Self {
        self.hidden_properties.insert(key.into());
        self
    }

    pub fn with_visible(mut self, key: impl Into<String>) -> Self {
        self.visible_properties.insert(key.into());
        self
    }

    /// Alias targets reached from more than one source property, in the
    /// order the targets first appear.
    pub fn alias_conflicts(&self) -> Vec<(&str, Vec<&str>)> {
        let mut by_target: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for (from, to) in &self.aliases {
            by_target.entry(to.as_str()).or_default().push(from.as_str());
        }
        by_target
            .into_iter()
            .filter(|(_, sources)| sources.len() > 1)
            .collect()
    }
}

/// Immutable set of mappings keyed by type key.
#[derive(Debug, Clone, Default)]
pub struct MappingRegistry {
    mappings: BTreeMap<String, Mapping>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MappingFile {
    Many(Vec<Mapping>),
    One(Mapping),
}

impl MappingRegistry {
    pub fn new(mappings: impl IntoIterator<Item = Mapping>) -> Self {
        let mut out = BTreeMap::new();
        for m in mappings {
            for (target, sources) in m.alias_conflicts() {
                tracing::warn!(
                    type_key = %m.type_key,
                    alias = target,
                    ?sources,
                    "ambiguous aliases; the last renamed property wins"
                );
            }
            if out.contains_key(&m.type_key) {
                tracing::warn!(type_key = %m.type_key, "mapping defined twice; keeping the later one");
            }
            out.insert(m.type_key.clone(), m);
        }
        Self { mappings: out }
    }

    pub fn lookup(&self, type_key: &str) -> Option<&Mapping> {
        self.mappings.get(type_key)
    }

    /// Registered type keys in sorted order.
    pub fn type_keys(&self) -> impl Iterator<Item = &str> {
        self.mappings.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mapping> {
        self.mappings.values()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Strict check, reporting the first type with ambiguous aliases.
    pub fn validate(&self) -> Result<()> {
        for m in self.mappings.values() {
            if let Some((target, sources)) = m.alias_conflicts().into_iter().next() {
                return Err(Error::AliasConflict {
                    type_key: m.type_key.clone(),
                    target: target.to_string(),
                    sources: sources.into_iter().map(str::to_string).collect(),
                });
            }
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(Self::new(parse_mapping_file(s)?))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::new(read_mapping_file(path)?))
    }

    /// Loads every `*.json` file below `dir`, in path order.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir) {
            let entry = entry?;
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json") {
                files.push(p.to_path_buf());
            }
        }
        files.sort();
        let mut all = Vec::new();
        for f in &files {
            tracing::debug!(path = %f.display(), "loading mappings");
            all.extend(read_mapping_file(f)?);
        }
        Ok(Self::new(all))
    }

    /// File or directory, whichever `path` is.
    pub fn load(path: &Path) -> Result<Self> {
        if path.is_dir() {
            Self::from_dir(path)
        } else {
            Self::from_file(path)
        }
    }
}

fn read_mapping_file(path: &Path) -> Result<Vec<Mapping>> {
    let data = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_mapping_file(&data)
}

fn parse_mapping_file(s: &str) -> Result<Vec<Mapping>> {
    Ok(match serde_json::from_str::<MappingFile>(s)? {
        MappingFile::Many(v) => v,
        MappingFile::One(m) => vec![m],
    })
}
