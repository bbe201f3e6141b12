//! In-process document store
//!
//! Used by `serve --in-memory` and by the router tests. Follows MongoDB's
//! semantics where the HTTP layer can observe them: `_id` assignment on
//! insert, cross-type sort order, arrays sorting by their smallest element,
//! and numeric equality across integer and double representations
//! (integers compare exactly).

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use tokio::sync::RwLock;

use super::store::{DeleteSummary, DocumentCollection, DocumentStore, UpdateSummary};
use super::DbError;

type Collections = HashMap<String, Vec<Document>>;

/// Thread-safe in-memory database
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection> {
        Arc::new(MemoryCollection {
            name: name.to_owned(),
            collections: Arc::clone(&self.collections),
        })
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

struct MemoryCollection {
    name: String,
    collections: Arc<RwLock<Collections>>,
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn find_sorted(&self, sort_key: &str) -> Result<Vec<Document>, DbError> {
        let collections = self.collections.read().await;
        let mut documents = collections.get(&self.name).cloned().unwrap_or_default();
        // stable: equal keys keep insertion order
        documents.sort_by(|a, b| {
            compare_values(sort_operand(a.get(sort_key)), sort_operand(b.get(sort_key)))
        });
        Ok(documents)
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, DbError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&self.name)
            .and_then(|docs| docs.iter().find(|d| matches_filter(d, &filter)))
            .cloned())
    }

    async fn insert_one(&self, document: Document) -> Result<Bson, DbError> {
        // Callers never supply `_id`; the HTTP layer rejects it.
        let id = Bson::ObjectId(ObjectId::new());

        let mut stored = Document::new();
        stored.insert("_id", id.clone());
        for (key, value) in document {
            stored.insert(key, value);
        }

        let mut collections = self.collections.write().await;
        collections.entry(self.name.clone()).or_default().push(stored);
        Ok(id)
    }

    async fn update_one(
        &self,
        filter: Document,
        fields: Document,
    ) -> Result<UpdateSummary, DbError> {
        let mut collections = self.collections.write().await;
        let Some(target) = collections
            .get_mut(&self.name)
            .and_then(|docs| docs.iter_mut().find(|d| matches_filter(d, &filter)))
        else {
            return Ok(UpdateSummary::new(0, 0));
        };

        let mut modified = false;
        for (key, value) in fields {
            if target.get(&key) != Some(&value) {
                target.insert(key, value);
                modified = true;
            }
        }

        Ok(UpdateSummary::new(1, u64::from(modified)))
    }

    async fn delete_one(&self, filter: Document) -> Result<DeleteSummary, DbError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&self.name) else {
            return Ok(DeleteSummary::new(0));
        };

        match docs.iter().position(|d| matches_filter(d, &filter)) {
            Some(index) => {
                docs.remove(index);
                Ok(DeleteSummary::new(1))
            }
            None => Ok(DeleteSummary::new(0)),
        }
    }
}

/// Every filter field must equal the document's field.
fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, expected)| match document.get(key) {
        Some(actual) => values_equal(actual, expected),
        None => matches!(expected, Bson::Null),
    })
}

fn values_equal(a: &Bson, b: &Bson) -> bool {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => compare_numbers(x, y) == Ordering::Equal,
        _ => a == b,
    }
}

/// Numeric value keeping integers exact.
#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

fn as_number(value: &Bson) -> Option<Number> {
    match value {
        Bson::Int32(v) => Some(Number::Int(i64::from(*v))),
        Bson::Int64(v) => Some(Number::Int(*v)),
        Bson::Double(v) => Some(Number::Float(*v)),
        _ => None,
    }
}

/// Integers compare as `i64`; a double on either side compares as `f64`.
fn compare_numbers(a: Number, b: Number) -> Ordering {
    let (x, y) = match (a, b) {
        (Number::Int(x), Number::Int(y)) => return x.cmp(&y),
        (Number::Int(x), Number::Float(y)) => (x as f64, y),
        (Number::Float(x), Number::Int(y)) => (x, y as f64),
        (Number::Float(x), Number::Float(y)) => (x, y),
    };
    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
}

/// What an ascending sort compares: a non-empty array sorts by its
/// smallest element.
fn sort_operand(value: Option<&Bson>) -> Option<&Bson> {
    match value {
        Some(Bson::Array(items)) if !items.is_empty() => items
            .iter()
            .min_by(|a, b| compare_values(Some(*a), Some(*b))),
        other => other,
    }
}

/// Position of a value's type in MongoDB's comparison order.
fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None => 2,
        Some(value) => match value {
            Bson::MinKey => 0,
            // an empty array sorts before null and missing fields
            Bson::Array(items) if items.is_empty() => 1,
            Bson::Null | Bson::Undefined => 2,
            Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => 3,
            Bson::String(_) | Bson::Symbol(_) => 4,
            Bson::Document(_) => 5,
            Bson::Array(_) => 6,
            Bson::Binary(_) => 7,
            Bson::ObjectId(_) => 8,
            Bson::Boolean(_) => 9,
            Bson::DateTime(_) => 10,
            Bson::Timestamp(_) => 11,
            Bson::RegularExpression(_) => 12,
            Bson::MaxKey => 14,
            _ => 13,
        },
    }
}

fn compare_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }

    match (a, b) {
        (Some(a), Some(b)) => {
            if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
                return compare_numbers(x, y);
            }
            match (a, b) {
                (Bson::String(x), Bson::String(y)) => x.cmp(y),
                (Bson::ObjectId(x), Bson::ObjectId(y)) => x.bytes().cmp(&y.bytes()),
                (Bson::Boolean(x), Bson::Boolean(y)) => x.cmp(y),
                (Bson::DateTime(x), Bson::DateTime(y)) => x.cmp(y),
                _ => Ordering::Equal,
            }
        }
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn names(docs: &[Document]) -> Vec<String> {
        docs.iter()
            .map(|d| d.get_str("name").unwrap_or("<none>").to_owned())
            .collect()
    }

    #[tokio::test]
    async fn insert_assigns_object_id_first() {
        let store = MemoryStore::new();
        let clients = store.collection("client");

        let id = clients
            .insert_one(doc! { "id": 1_i64, "name": "Acme" })
            .await
            .unwrap();
        assert!(matches!(id, Bson::ObjectId(_)));

        let stored = clients.find_one(doc! { "_id": id.clone() }).await.unwrap().unwrap();
        assert_eq!(stored.keys().next().map(String::as_str), Some("_id"));
        assert_eq!(stored.get("_id"), Some(&id));
    }

    #[tokio::test]
    async fn sorts_ascending_with_missing_first() {
        let store = MemoryStore::new();
        let clients = store.collection("client");
        for name in ["Zeta", "Acme", "Midway"] {
            clients.insert_one(doc! { "name": name }).await.unwrap();
        }
        clients.insert_one(doc! { "id": 9_i64 }).await.unwrap();

        let sorted = clients.find_sorted("name").await.unwrap();
        assert_eq!(names(&sorted), vec!["<none>", "Acme", "Midway", "Zeta"]);
    }

    #[tokio::test]
    async fn numbers_sort_across_representations() {
        let store = MemoryStore::new();
        let employees = store.collection("employees");
        employees.insert_one(doc! { "salary": 5000.5 }).await.unwrap();
        employees.insert_one(doc! { "salary": 1200_i32 }).await.unwrap();
        employees.insert_one(doc! { "salary": 3000_i64 }).await.unwrap();
        employees.insert_one(doc! { "salary": "n/a" }).await.unwrap();

        let sorted = employees.find_sorted("salary").await.unwrap();
        let salaries: Vec<String> = sorted
            .iter()
            .map(|d| d.get("salary").unwrap().to_string())
            .collect();
        assert_eq!(salaries, vec!["1200", "3000", "5000.5", "\"n/a\""]);
    }

    #[tokio::test]
    async fn numeric_filter_matches_any_width() {
        let store = MemoryStore::new();
        let clients = store.collection("client");
        clients.insert_one(doc! { "id": 7_i32, "name": "Seven" }).await.unwrap();

        let found = clients.find_one(doc! { "id": 7_i64 }).await.unwrap();
        assert!(found.is_some());
        let missing = clients.find_one(doc! { "id": "7" }).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn large_integer_ids_compare_exactly() {
        let store = MemoryStore::new();
        let clients = store.collection("client");
        clients
            .insert_one(doc! { "id": 9_007_199_254_740_993_i64, "name": "Only" })
            .await
            .unwrap();

        let neighbour = clients
            .find_one(doc! { "id": 9_007_199_254_740_992_i64 })
            .await
            .unwrap();
        assert!(neighbour.is_none());

        let exact = clients
            .find_one(doc! { "id": 9_007_199_254_740_993_i64 })
            .await
            .unwrap();
        assert!(exact.is_some());
    }

    #[tokio::test]
    async fn large_integers_sort_exactly() {
        let store = MemoryStore::new();
        let employees = store.collection("employees");
        employees
            .insert_one(doc! { "id": 1_i64, "salary": 9_007_199_254_740_993_i64 })
            .await
            .unwrap();
        employees
            .insert_one(doc! { "id": 2_i64, "salary": 9_007_199_254_740_992_i64 })
            .await
            .unwrap();

        let sorted = employees.find_sorted("salary").await.unwrap();
        let ids: Vec<i64> = sorted.iter().map(|d| d.get_i64("id").unwrap()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn arrays_sort_by_smallest_element() {
        let store = MemoryStore::new();
        let clients = store.collection("client");
        clients.insert_one(doc! { "id": 1_i64, "name": "Midway" }).await.unwrap();
        clients
            .insert_one(doc! { "id": 2_i64, "name": ["Zeta", "Acme"] })
            .await
            .unwrap();
        clients.insert_one(doc! { "id": 3_i64, "name": "Beta" }).await.unwrap();
        clients.insert_one(doc! { "id": 4_i64, "name": [] }).await.unwrap();
        clients.insert_one(doc! { "id": 5_i64 }).await.unwrap();

        let sorted = clients.find_sorted("name").await.unwrap();
        let ids: Vec<i64> = sorted.iter().map(|d| d.get_i64("id").unwrap()).collect();
        assert_eq!(ids, vec![4, 5, 2, 3, 1]);
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let store = MemoryStore::new();
        let clients = store.collection("client");
        let id = clients
            .insert_one(doc! { "id": 1_i64, "name": "Acme", "city": "Lyon" })
            .await
            .unwrap();

        let summary = clients
            .update_one(doc! { "_id": id.clone() }, doc! { "name": "X" })
            .await
            .unwrap();
        assert_eq!(summary, UpdateSummary::new(1, 1));

        let stored = clients.find_one(doc! { "_id": id.clone() }).await.unwrap().unwrap();
        assert_eq!(stored.get_str("name").unwrap(), "X");
        assert_eq!(stored.get_str("city").unwrap(), "Lyon");

        let unchanged = clients
            .update_one(doc! { "_id": id }, doc! { "name": "X" })
            .await
            .unwrap();
        assert_eq!(unchanged, UpdateSummary::new(1, 0));
    }

    #[tokio::test]
    async fn update_without_match_reports_zero() {
        let store = MemoryStore::new();
        let summary = store
            .collection("client")
            .update_one(doc! { "_id": ObjectId::new() }, doc! { "name": "X" })
            .await
            .unwrap();
        assert_eq!(summary, UpdateSummary::new(0, 0));
    }

    #[tokio::test]
    async fn delete_removes_one() {
        let store = MemoryStore::new();
        let clients = store.collection("client");
        let id = clients.insert_one(doc! { "name": "Gone" }).await.unwrap();

        let first = clients.delete_one(doc! { "_id": id.clone() }).await.unwrap();
        assert_eq!(first.deleted_count, 1);
        let second = clients.delete_one(doc! { "_id": id }).await.unwrap();
        assert_eq!(second.deleted_count, 0);
    }

    #[tokio::test]
    async fn unknown_collection_is_empty() {
        let store = MemoryStore::new();
        let docs = store.collection("nope").find_sorted("name").await.unwrap();
        assert!(docs.is_empty());
    }
}
