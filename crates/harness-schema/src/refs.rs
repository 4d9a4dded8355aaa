//! # `$ref` Cycle Detection
//!
//! A `$ref` applies its target at the same instance location. A chain of
//! `$ref`s that comes back to a schema it already visited therefore never
//! consumes any of the instance, and the engine recurses until the thread
//! overflows its stack. A stack overflow aborts the process and cannot be
//! caught at the case boundary, so such schemas are rejected before they
//! reach the engine.
//!
//! Only chains the harness can resolve without the engine are followed:
//!
//! - fragment-only references (`#`, `#/json/pointer`) within one document;
//! - references whose base is exactly a registry key, optionally followed
//!   by a JSON-pointer fragment;
//! - references whose base is the top-level schema's own `$id`.
//!
//! Anything else (anchors, relative URIs, unknown documents) ends the
//! chain. Recursion through `properties`, `items` and the other keywords
//! that descend into the instance is not a cycle and is never reported.

use std::fmt;

use harness_core::TestCase;
use serde_json::{Map, Value};

/// Keywords whose values are data, not subschemas.
const DATA_KEYWORDS: &[&str] = &["const", "default", "enum", "examples"];

/// A `$ref` chain that returns to a schema it already visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefCycle {
    /// Visited locations in order; the last entry repeats an earlier one.
    pub trail: Vec<String>,
}

impl fmt::Display for RefCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.trail.join(" -> "))
    }
}

/// Find a `$ref` cycle in `case.schema` or any of its registry documents.
pub fn find_cycle(case: &TestCase) -> Option<RefCycle> {
    let documents = Documents {
        root: &case.schema,
        root_id: root_id(&case.schema),
        registry: case.registry.as_ref(),
    };
    documents.walk("", &case.schema, true).or_else(|| {
        case.registry_entries()
            .find_map(|(key, doc)| documents.walk(key, doc, true))
    })
}

fn root_id(schema: &Value) -> Option<&str> {
    let id = schema
        .get("$id")
        .or_else(|| schema.get("id"))
        .and_then(Value::as_str)?;
    let id = id.trim_end_matches('#');
    (!id.is_empty()).then_some(id)
}

/// The documents of one case. The top-level schema is keyed by `""`.
struct Documents<'a> {
    root: &'a Value,
    root_id: Option<&'a str>,
    registry: Option<&'a Map<String, Value>>,
}

impl<'a> Documents<'a> {
    fn document(&self, key: &str) -> Option<&'a Value> {
        if key.is_empty() {
            Some(self.root)
        } else {
            self.registry?.get(key)
        }
    }

    /// Resolve `reference`, found inside document `doc`, to a document key
    /// and a JSON pointer into that document.
    fn resolve(&self, doc: &'a str, reference: &'a str) -> Option<(&'a str, &'a str)> {
        let (base, fragment) = reference.split_once('#').unwrap_or((reference, ""));
        if !fragment.is_empty() && !fragment.starts_with('/') {
            return None;
        }
        let key = if base.is_empty() {
            doc
        } else if self.root_id == Some(base) {
            ""
        } else {
            self.registry?.get_key_value(base)?.0.as_str()
        };
        Some((key, fragment))
    }

    fn follow(&self, doc: &'a str, reference: &'a str) -> Option<RefCycle> {
        let mut seen: Vec<(&str, &str)> = Vec::new();
        let mut trail = Vec::new();
        let (mut doc, mut reference) = (doc, reference);
        loop {
            let (key, pointer) = self.resolve(doc, reference)?;
            trail.push(format!("{key}#{pointer}"));
            if seen.contains(&(key, pointer)) {
                return Some(RefCycle { trail });
            }
            seen.push((key, pointer));
            reference = self
                .document(key)?
                .pointer(pointer)?
                .get("$ref")?
                .as_str()?;
            doc = key;
        }
    }

    fn walk(&self, doc: &'a str, value: &'a Value, is_root: bool) -> Option<RefCycle> {
        match value {
            Value::Object(map) => {
                // A nested resource changes the base URI for its fragments.
                if !is_root && introduces_resource(map) {
                    return None;
                }
                if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
                    if let Some(cycle) = self.follow(doc, reference) {
                        return Some(cycle);
                    }
                }
                map.iter()
                    .filter(|(keyword, _)| !DATA_KEYWORDS.contains(&keyword.as_str()))
                    .find_map(|(_, child)| self.walk(doc, child, false))
            }
            Value::Array(items) => items.iter().find_map(|item| self.walk(doc, item, false)),
            _ => None,
        }
    }
}

fn introduces_resource(map: &Map<String, Value>) -> bool {
    ["$id", "id"].iter().any(|keyword| {
        map.get(*keyword)
            .and_then(Value::as_str)
            .is_some_and(|id| !id.starts_with('#'))
    })
}
