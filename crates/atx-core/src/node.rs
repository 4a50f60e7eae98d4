// Tree model shared with the generic serializer.
//
// Raw form (what the serializer emits as JSON):
// - `{"@type": "App\\User", ...}`             tagged object
// - `{"@scalar": "integer", "@value": 1}`     wrapped primitive
// - `{"@map": "array", "@value": [...]}`      collection (list or map)
//
// The magic keys only exist in `from_json`/`to_json`; stages work on `Node`.
use indexmap::IndexMap;
use serde_json::{Map, Value as Json};

use crate::error::{Error, Result};

pub const TYPE_TAG_KEY: &str = "@type";
pub const SCALAR_TYPE_KEY: &str = "@scalar";
pub const SCALAR_VALUE_KEY: &str = "@value";
pub const MAP_TYPE_KEY: &str = "@map";

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`.
    UInt(u64),
    Float(f64),
    Str(String),
}

impl From<&Scalar> for Json {
    fn from(v: &Scalar) -> Self {
        match v {
            Scalar::Null => Json::Null,
            Scalar::Bool(b) => Json::Bool(*b),
            Scalar::Int(n) => Json::Number((*n).into()),
            Scalar::UInt(n) => Json::Number((*n).into()),
            Scalar::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Scalar::Str(s) => Json::String(s.clone()),
        }
    }
}

impl Scalar {
    /// `None` for arrays and objects.
    pub fn from_json(v: &Json) -> Option<Scalar> {
        match v {
            Json::Null => Some(Scalar::Null),
            Json::Bool(b) => Some(Scalar::Bool(*b)),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Scalar::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Some(Scalar::UInt(u))
                } else {
                    n.as_f64().map(Scalar::Float)
                }
            }
            Json::String(s) => Some(Scalar::Str(s.clone())),
            Json::Array(_) | Json::Object(_) => None,
        }
    }

    /// Label the serializer uses for this primitive in `@scalar`.
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Null => "NULL",
            Scalar::Bool(_) => "boolean",
            Scalar::Int(_) | Scalar::UInt(_) => "integer",
            Scalar::Float(_) => "double",
            Scalar::Str(_) => "string",
        }
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Int(n.into())
    }
}

impl From<u64> for Scalar {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or(Scalar::UInt(n), Scalar::Int)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

pub type Properties = IndexMap<String, Node>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectNode {
    pub type_tag: Option<String>,
    pub properties: Properties,
}

impl ObjectNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tagged(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: Some(type_tag.into()),
            properties: Properties::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Node>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn is_tagged_as(&self, type_key: &str) -> bool {
        self.type_tag.as_deref() == Some(type_key)
    }

    /// Keys as the raw form would count them: the type tag is one of them.
    pub fn key_count(&self) -> usize {
        self.properties.len() + usize::from(self.type_tag.is_some())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Primitive still carrying the serializer's type label.
    Wrapped { kind: String, value: Scalar },
    Scalar(Scalar),
    Object(ObjectNode),
    Array(Vec<Node>),
}

impl From<Scalar> for Node {
    fn from(s: Scalar) -> Self {
        Node::Scalar(s)
    }
}

impl From<ObjectNode> for Node {
    fn from(o: ObjectNode) -> Self {
        Node::Object(o)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Array(items)
    }
}

impl Node {
    /// Wrap a primitive the way the serializer does, labelled with its kind.
    pub fn wrapped(value: impl Into<Scalar>) -> Self {
        let value = value.into();
        Node::Wrapped {
            kind: value.kind().to_string(),
            value,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            Node::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectNode> {
        match self {
            Node::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_object().and_then(|o| o.properties.get(key))
    }

    /// Pre-order visit of every object node; children are visited after `f`
    /// has had a chance to change them.
    pub(crate) fn for_each_object_mut(&mut self, f: &mut impl FnMut(&mut ObjectNode)) {
        match self {
            Node::Object(obj) => {
                f(obj);
                for child in obj.properties.values_mut() {
                    child.for_each_object_mut(f);
                }
            }
            Node::Array(items) => {
                for child in items.iter_mut() {
                    child.for_each_object_mut(f);
                }
            }
            Node::Wrapped { .. } | Node::Scalar(_) => {}
        }
    }

    pub fn from_json(value: Json) -> Result<Node> {
        match value {
            Json::Array(items) => items
                .into_iter()
                .map(Node::from_json)
                .collect::<Result<Vec<_>>>()
                .map(Node::Array),
            Json::Object(map) => object_from_json(map),
            other => Scalar::from_json(&other)
                .map(Node::Scalar)
                .ok_or_else(|| Error::InvalidNode("unexpected value".into())),
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            Node::Wrapped { kind, value } => {
                let mut map = Map::with_capacity(2);
                map.insert(SCALAR_TYPE_KEY.to_string(), Json::String(kind.clone()));
                map.insert(SCALAR_VALUE_KEY.to_string(), value.into());
                Json::Object(map)
            }
            Node::Scalar(s) => s.into(),
            Node::Object(obj) => {
                let mut map = Map::with_capacity(obj.key_count());
                if let Some(tag) = &obj.type_tag {
                    map.insert(TYPE_TAG_KEY.to_string(), Json::String(tag.clone()));
                }
                for (k, v) in &obj.properties {
                    map.insert(k.clone(), v.to_json());
                }
                Json::Object(map)
            }
            Node::Array(items) => Json::Array(items.iter().map(Node::to_json).collect()),
        }
    }
}

fn object_from_json(mut map: Map<String, Json>) -> Result<Node> {
    if let Some(kind) = map.shift_remove(SCALAR_TYPE_KEY) {
        let kind = kind
            .as_str()
            .ok_or_else(|| Error::InvalidNode(format!("{SCALAR_TYPE_KEY} must be a string")))?
            .to_string();
        let raw = map.shift_remove(SCALAR_VALUE_KEY).unwrap_or(Json::Null);
        let value = Scalar::from_json(&raw).ok_or_else(|| {
            Error::InvalidNode(format!("{SCALAR_VALUE_KEY} of a {kind} scalar is not a primitive"))
        })?;
        return Ok(Node::Wrapped { kind, value });
    }

    if map.shift_remove(MAP_TYPE_KEY).is_some() {
        return match map.shift_remove(SCALAR_VALUE_KEY) {
            Some(Json::Array(items)) => Node::from_json(Json::Array(items)),
            Some(Json::Object(entries)) => {
                let mut obj = ObjectNode::new();
                for (k, v) in entries {
                    obj.properties.insert(k, Node::from_json(v)?);
                }
                Ok(Node::Object(obj))
            }
            None => Ok(Node::Array(Vec::new())),
            Some(_) => Err(Error::InvalidNode(format!(
                "{SCALAR_VALUE_KEY} of a {MAP_TYPE_KEY} must be an array or object"
            ))),
        };
    }

    let type_tag = match map.shift_remove(TYPE_TAG_KEY) {
        Some(Json::String(tag)) => Some(tag),
        Some(_) => {
            return Err(Error::InvalidNode(format!("{TYPE_TAG_KEY} must be a string")));
        }
        None => None,
    };
    let mut obj = ObjectNode {
        type_tag,
        properties: Properties::with_capacity(map.len()),
    };
    for (k, v) in map {
        obj.properties.insert(k, Node::from_json(v)?);
    }
    Ok(Node::Object(obj))
}
