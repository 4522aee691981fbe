use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::PATH_SEPARATOR;
use crate::error::{Error, Result};

/// Value stored under a locale key.
///
/// Variant order matters for deserialization: a JSON array of strings is a
/// `List`, an array of string arrays is a `ListOfLists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocaleValue {
    Scalar(String),
    List(Vec<String>),
    ListOfLists(Vec<Vec<String>>),
    Node(BTreeMap<String, LocaleValue>),
}

impl LocaleValue {
    /// Human-readable shape name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            LocaleValue::Scalar(_) => "string",
            LocaleValue::List(_) => "list",
            LocaleValue::ListOfLists(_) => "list of lists",
            LocaleValue::Node(_) => "mapping",
        }
    }

    /// Every string carried by a leaf, in declaration order.
    pub fn strings(&self) -> Vec<&str> {
        match self {
            LocaleValue::Scalar(value) => vec![value.as_str()],
            LocaleValue::List(values) => values.iter().map(String::as_str).collect(),
            LocaleValue::ListOfLists(lists) => lists
                .iter()
                .flat_map(|values| values.iter().map(String::as_str))
                .collect(),
            LocaleValue::Node(_) => Vec::new(),
        }
    }
}

/// Hierarchical, dot-path addressable locale table.
///
/// Stores are built once and shared read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleStore {
    pub name: String,
    pub entries: BTreeMap<String, LocaleValue>,
}

impl LocaleStore {
    pub fn new(name: impl Into<String>, entries: BTreeMap<String, LocaleValue>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Decode a store from a JSON object.
    pub fn from_json_str(name: impl Into<String>, source: &str) -> Result<Self> {
        let entries: BTreeMap<String, LocaleValue> = serde_json::from_str(source)?;
        Ok(Self::new(name, entries))
    }

    /// Decode a store from a TOML document.
    pub fn from_toml_str(name: impl Into<String>, source: &str) -> Result<Self> {
        let entries: BTreeMap<String, LocaleValue> = toml::from_str(source)?;
        Ok(Self::new(name, entries))
    }

    /// Load a store from disk. The file extension selects the format and the
    /// file stem becomes the store name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("custom")
            .to_string();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(name, &content),
            Some("toml") => Self::from_toml_str(name, &content),
            other => Err(Error::Parse(format!(
                "{}: unsupported locale file extension {:?}",
                path.display(),
                other
            ))),
        }
    }

    /// Descend the store along `path`.
    ///
    /// Returns `Ok(None)` when a key is missing and `InvalidLocaleShape` when
    /// a non-final segment addresses a leaf.
    pub fn lookup(&self, path: &str) -> Result<Option<&LocaleValue>> {
        let mut node = &self.entries;
        let mut segments = path.split(PATH_SEPARATOR).peekable();
        let mut walked = String::new();

        while let Some(segment) = segments.next() {
            let Some(value) = node.get(segment) else {
                return Ok(None);
            };
            if !walked.is_empty() {
                walked.push(PATH_SEPARATOR);
            }
            walked.push_str(segment);

            if segments.peek().is_none() {
                return Ok(Some(value));
            }

            match value {
                LocaleValue::Node(children) => node = children,
                _ => {
                    return Err(Error::InvalidLocaleShape {
                        path: path.to_string(),
                        segment: walked,
                    });
                }
            }
        }

        Ok(None)
    }

    /// True when `path` addresses a value. Shape errors count as absent.
    pub fn contains(&self, path: &str) -> bool {
        matches!(self.lookup(path), Ok(Some(_)))
    }

    /// Overlay this store on `base`: entries of `self` win, mappings present
    /// in both are merged recursively. The result keeps the name of `self`.
    pub fn merged_over(self, base: LocaleStore) -> LocaleStore {
        LocaleStore {
            name: self.name,
            entries: merge_nodes(base.entries, self.entries),
        }
    }

    /// All leaves with their full dotted paths, depth first in key order.
    pub fn leaves(&self) -> Vec<(String, &LocaleValue)> {
        let mut out = Vec::new();
        collect_leaves(&self.entries, "", &mut out);
        out
    }
}

fn merge_nodes(
    mut base: BTreeMap<String, LocaleValue>,
    overlay: BTreeMap<String, LocaleValue>,
) -> BTreeMap<String, LocaleValue> {
    for (key, value) in overlay {
        let merged = match (base.remove(&key), value) {
            (Some(LocaleValue::Node(lower)), LocaleValue::Node(upper)) => {
                LocaleValue::Node(merge_nodes(lower, upper))
            }
            (_, value) => value,
        };
        base.insert(key, merged);
    }
    base
}

fn collect_leaves<'a>(
    node: &'a BTreeMap<String, LocaleValue>,
    prefix: &str,
    out: &mut Vec<(String, &'a LocaleValue)>,
) {
    for (key, value) in node {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}{PATH_SEPARATOR}{key}")
        };
        match value {
            LocaleValue::Node(children) => collect_leaves(children, &path, out),
            leaf => out.push((path, leaf)),
        }
    }
}
