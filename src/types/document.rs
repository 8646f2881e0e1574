//! Document, collection and item types
//!
//! A [`Document`] is the whole database: a JSON object whose array-valued
//! keys are collections of [`Item`]s. Items are arbitrary JSON objects whose
//! only reserved field is a numeric `id`, unique within its collection.
//!
//! Nothing beyond "top level is an object" is enforced on decode. Keys that do
//! not hold an array, and array elements that are not objects, read as absent
//! and are written back untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema-less record; field order is kept as supplied
pub type Item = Map<String, Value>;

/// Numeric item identifier
pub type ItemId = i64;

/// Reserved identifier field
pub const ID_FIELD: &str = "id";

/// The entire database state held in the backing file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    entries: Map<String, Value>,
}

impl Document {
    /// Empty document, encoded as `{}`
    pub fn new() -> Self {
        Self::default()
    }

    fn collection(&self, name: &str) -> Option<&Vec<Value>> {
        self.entries.get(name)?.as_array()
    }

    fn collection_mut(&mut self, name: &str) -> Option<&mut Vec<Value>> {
        self.entries.get_mut(name)?.as_array_mut()
    }

    /// True when `name` holds an array
    pub fn has_collection(&self, name: &str) -> bool {
        self.collection(name).is_some()
    }

    /// Object items of `name` in stored order; empty if `name` is not a collection
    pub fn items<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Item> + 'a {
        self.collection(name)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
    }

    /// First item of `name` whose id is `id`
    pub fn find(&self, name: &str, id: ItemId) -> Option<&Item> {
        self.items(name).find(|item| has_id(item, id))
    }

    /// Mutable first item of `name` whose id is `id`
    pub fn find_mut(&mut self, name: &str, id: ItemId) -> Option<&mut Item> {
        self.collection_mut(name)?
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .find(|item| has_id(item, id))
    }

    /// Remove and return the first item of `name` whose id is `id`
    pub fn remove(&mut self, name: &str, id: ItemId) -> Option<Item> {
        let items = self.collection_mut(name)?;
        let position = items
            .iter()
            .position(|value| value.as_object().is_some_and(|item| has_id(item, id)))?;
        match items.remove(position) {
            Value::Object(item) => Some(item),
            _ => None,
        }
    }

    /// Append `payload` to `name` under the next free id and return the stored item.
    ///
    /// The collection is materialized when absent. A non-array value under
    /// `name` is replaced by a fresh collection.
    pub fn insert(&mut self, name: &str, payload: Item) -> Item {
        let slot = self.entries.entry(name).or_insert(Value::Null);
        let mut items = match slot.take() {
            Value::Array(items) => items,
            _ => Vec::new(),
        };

        let item = new_item(next_id(&items), payload);
        items.push(Value::Object(item.clone()));
        *slot = Value::Array(items);
        item
    }

    /// Names of the array-valued keys in stored order
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, value)| value.is_array())
            .map(|(name, _)| name.as_str())
    }
}

/// Numeric value of an item's `id`.
///
/// Only integral numbers qualify: `3` and `3.0` yield `3`, while `2.5`, ids
/// beyond the `i64` range and non-numbers yield `None`.
pub fn item_id(item: &Item) -> Option<ItemId> {
    let id = item.get(ID_FIELD)?;
    if let Some(v) = id.as_i64() {
        return Some(v);
    }
    let v = id.as_f64()?;
    let in_range = v >= ItemId::MIN as f64 && v < ItemId::MAX as f64;
    (v.fract() == 0.0 && in_range).then_some(v as ItemId)
}

/// True when `item` carries exactly the numeric id `id`
pub fn has_id(item: &Item, id: ItemId) -> bool {
    item_id(item) == Some(id)
}

/// `1 + max(ids)`, counting missing, non-numeric or non-integral ids as `0`
pub fn next_id(items: &[Value]) -> ItemId {
    items
        .iter()
        .map(|value| value.as_object().map_or(0, sequence_id))
        .fold(0, ItemId::max)
        .saturating_add(1)
}

/// Id as seen by the sequence: integers past `i64::MAX` saturate
fn sequence_id(item: &Item) -> ItemId {
    item_id(item)
        .or_else(|| item.get(ID_FIELD)?.as_u64().map(|_| ItemId::MAX))
        .unwrap_or(0)
}

/// Build a new item: `id` first, then the payload fields minus any `id`
pub fn new_item(id: ItemId, payload: Item) -> Item {
    let mut item = Item::with_capacity(payload.len() + 1);
    item.insert(ID_FIELD.to_string(), Value::from(id));
    merge_fields(&mut item, payload);
    item
}

/// Overwrite `target` fields with `fields`, never touching `id`
pub fn merge_fields(target: &mut Item, fields: Item) {
    for (key, value) in fields {
        if key != ID_FIELD {
            target.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> Item {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {}", other),
        }
    }

    fn document(value: Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_next_id_on_empty_collection() {
        assert_eq!(next_id(&[]), 1);
    }

    #[test]
    fn test_next_id_uses_max_not_position() {
        let items = vec![json!({"id": 7}), json!({"id": 2})];
        assert_eq!(next_id(&items), 8);
    }

    #[test]
    fn test_next_id_treats_bad_ids_as_zero() {
        let items = vec![
            json!({"id": "abc"}),
            json!({"name": "no id"}),
            json!({"id": null}),
            json!({"id": 0.5}),
            json!("not an item"),
        ];
        assert_eq!(next_id(&items), 1);

        assert_eq!(next_id(&[json!({"id": -5})]), 1);
        assert_eq!(next_id(&[json!({"id": 2}), json!({"id": 2.5})]), 3);
        assert_eq!(next_id(&[json!({"id": u64::MAX})]), ItemId::MAX);
    }

    #[test]
    fn test_item_id_variants() {
        assert_eq!(item_id(&item(json!({"id": 3}))), Some(3));
        assert_eq!(item_id(&item(json!({"id": 3.0}))), Some(3));
        assert_eq!(item_id(&item(json!({"id": 2.5}))), None);
        assert_eq!(item_id(&item(json!({"id": u64::MAX}))), None);
        assert_eq!(item_id(&item(json!({"id": "3"}))), None);
        assert_eq!(item_id(&item(json!({}))), None);
    }

    #[test]
    fn test_fractional_id_never_matches() {
        let doc = document(json!({"t": [{"id": 2.5, "n": "x"}, {"id": 2, "n": "y"}]}));
        assert_eq!(doc.find("t", 2).and_then(|i| i.get("n")), Some(&json!("y")));
        assert!(doc.find("t", 3).is_none());

        let mut doc = document(json!({"t": [{"id": 2.5, "n": "x"}]}));
        assert!(doc.find("t", 2).is_none());
        assert!(doc.find_mut("t", 2).is_none());
        assert!(doc.remove("t", 2).is_none());
        assert_eq!(doc, document(json!({"t": [{"id": 2.5, "n": "x"}]})));
    }

    #[test]
    fn test_new_item_overrides_payload_id() {
        let created = new_item(4, item(json!({"id": 99, "a": 1})));
        assert_eq!(Value::Object(created.clone()), json!({"id": 4, "a": 1}));
        assert_eq!(created.keys().next().map(String::as_str), Some(ID_FIELD));
    }

    #[test]
    fn test_merge_fields_keeps_id() {
        let mut target = item(json!({"id": 1, "a": 1, "b": 2}));
        merge_fields(&mut target, item(json!({"id": 50, "b": 3, "c": 4})));
        assert_eq!(Value::Object(target), json!({"id": 1, "a": 1, "b": 3, "c": 4}));
    }

    #[test]
    fn test_collection_materialized_lazily() {
        let mut doc = Document::new();
        assert!(!doc.has_collection("users"));
        assert_eq!(doc.items("users").count(), 0);

        let created = doc.insert("users", item(json!({"n": 1})));
        assert_eq!(Value::Object(created), json!({"id": 1, "n": 1}));
        assert!(doc.has_collection("users"));
        assert_eq!(serde_json::to_value(&doc).unwrap(), json!({"users": [{"id": 1, "n": 1}]}));
    }

    #[test]
    fn test_document_decoding_is_lenient() {
        let doc: Document = serde_json::from_str(
            r#"{"b": [{"id": 1}, 7, "x"], "meta": {"v": 1}, "tags": ["a"], "a": []}"#,
        )
        .unwrap();
        assert_eq!(doc.collection_names().collect::<Vec<_>>(), vec!["b", "tags", "a"]);
        assert_eq!(doc.items("b").count(), 1);
        assert_eq!(doc.items("meta").count(), 0);
        assert_eq!(doc.items("tags").count(), 0);

        assert!(serde_json::from_str::<Document>("[]").is_err());
        assert!(serde_json::from_str::<Document>("7").is_err());
    }

    #[test]
    fn test_insert_keeps_sibling_keys() {
        let mut doc = document(json!({"users": [{"id": 1, "n": "ada"}, "stray"], "meta": {"v": 1}}));

        let created = doc.insert("users", item(json!({"n": "bob"})));
        assert_eq!(Value::Object(created), json!({"id": 2, "n": "bob"}));
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "users": [{"id": 1, "n": "ada"}, "stray", {"id": 2, "n": "bob"}],
                "meta": {"v": 1}
            })
        );
    }

    #[test]
    fn test_insert_over_non_array_value() {
        let mut doc = document(json!({"meta": {"v": 1}, "other": 3}));
        doc.insert("meta", Item::new());
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({"meta": [{"id": 1}], "other": 3})
        );
    }

    #[test]
    fn test_remove_first_match_only() {
        let mut doc = document(json!({"t": ["x", {"id": 1, "n": "a"}, {"id": 1, "n": "b"}]}));
        let removed = doc.remove("t", 1).unwrap();
        assert_eq!(removed.get("n"), Some(&json!("a")));
        assert_eq!(doc, document(json!({"t": ["x", {"id": 1, "n": "b"}]})));
    }
}
