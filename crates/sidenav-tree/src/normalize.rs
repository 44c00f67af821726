//! Normalization of raw specification entries into [`NavNode`]s.
//!
//! Accepted entry shapes:
//!
//! - `"a/b"` — leaf with id `a/b`
//! - `{"type": "doc", "id": "a/b", "label": "…"}` — leaf with a label override
//! - `{"type": "category", "label": "…", "items": […]}` — category
//!   (`children` is accepted in place of `items`)
//! - `{"Label": […]}` — category shorthand (single key, sequence value)
//!
//! Entries that match none of these are recorded as
//! [`ValidationError::MalformedEntry`] and dropped from the output. The
//! [`SourceMap`] keeps the input position of every surviving node so that
//! diagnostics on the pruned tree point at the entry the author wrote.

use serde_json::{Map, Value};

use crate::build::BuildOptions;
use crate::error::ValidationError;
use crate::node::{Category, CategoryLink, Leaf, NavNode, is_external_url};
use crate::path::NodePath;
use crate::spec::value_kind;

const LEAF_KEYS: &[&str] = &["type", "id", "label", "className"];
const CATEGORY_KEYS: &[&str] = &[
    "type",
    "label",
    "items",
    "children",
    "collapsed",
    "collapsible",
    "link",
    "className",
];

/// Result of normalizing a whole sidebar.
pub(crate) struct Normalized {
    pub items: Vec<NavNode>,
    /// Input positions of `items`, mirroring the tree shape.
    pub sources: SourceMap,
    pub malformed: Vec<ValidationError>,
    /// Categories that only lost their items to malformed entries
    /// (input positions).
    pub pruned: Vec<NodePath>,
}

/// Input positions of the nodes kept at one level, with their children.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct SourceMap(Vec<SourceEntry>);

#[derive(Debug, PartialEq, Eq)]
struct SourceEntry {
    index: usize,
    children: SourceMap,
}

impl SourceMap {
    /// Translate a path in the normalized tree to the input position.
    ///
    /// Segments past the recorded shape are kept as they are.
    pub fn to_input(&self, path: &NodePath) -> NodePath {
        let mut input = NodePath::root();
        let mut level = Some(self);
        for segment in path.segments() {
            let entry = level.and_then(|map| map.0.get(segment.index));
            let index = entry.map_or(segment.index, |e| e.index);
            input = input.child(index, segment.name.as_deref());
            level = entry.map(|e| &e.children);
        }
        input
    }
}

pub(crate) struct Normalizer<'a> {
    options: &'a BuildOptions,
    fail_fast: bool,
    malformed: Vec<ValidationError>,
    pruned: Vec<NodePath>,
}

impl<'a> Normalizer<'a> {
    pub fn new(options: &'a BuildOptions, fail_fast: bool) -> Self {
        Self {
            options,
            fail_fast,
            malformed: Vec::new(),
            pruned: Vec::new(),
        }
    }

    pub fn run(mut self, values: &[Value]) -> Normalized {
        let (items, sources) = self.normalize_items(values, &NodePath::root());
        Normalized {
            items,
            sources,
            malformed: self.malformed,
            pruned: self.pruned,
        }
    }

    fn stopped(&self) -> bool {
        self.fail_fast && !self.malformed.is_empty()
    }

    fn normalize_items(
        &mut self,
        values: &[Value],
        parent: &NodePath,
    ) -> (Vec<NavNode>, SourceMap) {
        let mut items = Vec::with_capacity(values.len());
        let mut sources = Vec::with_capacity(values.len());
        for (index, value) in values.iter().enumerate() {
            if self.stopped() {
                break;
            }
            let path = parent.child(index, entry_name(value));
            match self.normalize_entry(value, &path) {
                Ok((node, children)) => {
                    items.push(node);
                    sources.push(SourceEntry { index, children });
                }
                Err(reason) => self
                    .malformed
                    .push(ValidationError::MalformedEntry { path, reason }),
            }
        }
        (items, SourceMap(sources))
    }

    fn normalize_entry(
        &mut self,
        value: &Value,
        path: &NodePath,
    ) -> Result<(NavNode, SourceMap), String> {
        match value {
            Value::String(id) => {
                require_non_blank(id, "document id")?;
                Ok((NavNode::Leaf(Leaf::new(id.clone())), SourceMap::default()))
            }
            Value::Object(map) => match map.get("type") {
                Some(Value::String(kind)) => match kind.as_str() {
                    "doc" => Ok((normalize_leaf(map, path)?, SourceMap::default())),
                    "category" => self.normalize_category(map, path),
                    other => Err(format!("unsupported entry type `{other}`")),
                },
                Some(other) => Err(format!(
                    "`type` must be a string, found {}",
                    value_kind(other)
                )),
                None => self.normalize_shorthand(map, path),
            },
            other => Err(format!(
                "expected a document id or an object, found {}",
                value_kind(other)
            )),
        }
    }

    fn normalize_category(
        &mut self,
        map: &Map<String, Value>,
        path: &NodePath,
    ) -> Result<(NavNode, SourceMap), String> {
        log_unknown_keys(map, CATEGORY_KEYS, path);

        let label = required_string(map, "label")?;
        let raw_items = match (map.get("items"), map.get("children")) {
            (Some(_), Some(_)) => {
                return Err("`items` and `children` are mutually exclusive".to_owned());
            }
            (Some(items), None) | (None, Some(items)) => items,
            (None, None) => return Err("category requires `items`".to_owned()),
        };
        let Value::Array(raw_items) = raw_items else {
            return Err(format!(
                "category items must be a sequence, found {}",
                value_kind(raw_items)
            ));
        };
        let collapsible =
            optional_bool(map, "collapsible")?.unwrap_or(self.options.default_collapsible);
        // A category that cannot be toggled starts expanded unless told otherwise.
        let collapsed = optional_bool(map, "collapsed")?
            .unwrap_or(collapsible && self.options.default_collapsed);
        let link = map.get("link").map(parse_link).transpose()?;
        let class_name = optional_string(map, "className")?;

        let (items, sources) = self.normalize_items(raw_items, path);
        if items.is_empty() && !raw_items.is_empty() {
            self.pruned.push(path.clone());
        }

        let category = Category {
            label,
            collapsed,
            collapsible,
            link,
            class_name,
            items,
        };
        Ok((NavNode::Category(category), sources))
    }

    fn normalize_shorthand(
        &mut self,
        map: &Map<String, Value>,
        path: &NodePath,
    ) -> Result<(NavNode, SourceMap), String> {
        let mut entries = map.iter();
        let (Some((label, Value::Array(raw_items))), None) = (entries.next(), entries.next())
        else {
            return Err("object entry requires a `type` field".to_owned());
        };
        require_non_blank(label, "category label")?;

        let (items, sources) = self.normalize_items(raw_items, path);
        if items.is_empty() && !raw_items.is_empty() {
            self.pruned.push(path.clone());
        }

        let collapsible = self.options.default_collapsible;
        let category = Category::new(label.clone(), items)
            .with_collapsed(collapsible && self.options.default_collapsed)
            .with_collapsible(collapsible);
        Ok((NavNode::Category(category), sources))
    }
}

fn normalize_leaf(map: &Map<String, Value>, path: &NodePath) -> Result<NavNode, String> {
    log_unknown_keys(map, LEAF_KEYS, path);

    Ok(NavNode::Leaf(Leaf {
        id: required_string(map, "id")?,
        label: optional_string(map, "label")?,
        class_name: optional_string(map, "className")?,
    }))
}

fn parse_link(value: &Value) -> Result<CategoryLink, String> {
    match value {
        Value::String(target)
            if target.starts_with("http://") || target.starts_with("https://") =>
        {
            parse_url(target)
        }
        Value::String(id) => {
            require_non_blank(id, "link id")?;
            Ok(CategoryLink::doc(id.clone()))
        }
        Value::Object(map) => match map.get("type").and_then(Value::as_str) {
            Some("doc") => Ok(CategoryLink::doc(required_string(map, "id")?)),
            Some("url") => parse_url(&required_string(map, "href")?),
            Some(other) => Err(format!("unsupported link type `{other}`")),
            None => Err("link requires a string `type` field".to_owned()),
        },
        other => Err(format!(
            "link must be a string or an object, found {}",
            value_kind(other)
        )),
    }
}

fn parse_url(href: &str) -> Result<CategoryLink, String> {
    if is_external_url(href) {
        Ok(CategoryLink::url(href))
    } else {
        Err(format!("link `{href}` is not a well-formed URL"))
    }
}

/// Name used for an entry in diagnostics, if one can be read.
///
/// Matches the names the tree walk gives: leaves by id, categories by label.
fn entry_name(value: &Value) -> Option<&str> {
    match value {
        Value::String(id) => Some(id),
        Value::Object(map) => {
            let key = if map.get("type").and_then(Value::as_str) == Some("doc") {
                "id"
            } else {
                "label"
            };
            map.get(key).and_then(Value::as_str).or_else(|| {
                // Shorthand categories are named by their only key.
                (map.len() == 1 && !map.contains_key("type"))
                    .then(|| map.keys().next().map(String::as_str))
                    .flatten()
            })
        }
        _ => None,
    }
}

fn require_non_blank(value: &str, what: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{what} cannot be empty"));
    }
    Ok(())
}

fn required_string(map: &Map<String, Value>, key: &str) -> Result<String, String> {
    match map.get(key) {
        Some(Value::String(value)) => {
            require_non_blank(value, &format!("`{key}`"))?;
            Ok(value.clone())
        }
        Some(other) => Err(format!("`{key}` must be a string, found {}", value_kind(other))),
        None => Err(format!("missing `{key}`")),
    }
}

fn optional_string(map: &Map<String, Value>, key: &str) -> Result<Option<String>, String> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(format!("`{key}` must be a string, found {}", value_kind(other))),
    }
}

fn optional_bool(map: &Map<String, Value>, key: &str) -> Result<Option<bool>, String> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(other) => Err(format!("`{key}` must be a boolean, found {}", value_kind(other))),
    }
}

fn log_unknown_keys(map: &Map<String, Value>, known: &[&str], path: &NodePath) {
    for key in map.keys().filter(|key| !known.contains(&key.as_str())) {
        tracing::debug!(%path, key = %key, "Ignoring unknown sidebar entry key");
    }
}
