use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field name to value, in the order the fields were declared.
pub type Record = IndexMap<String, String>;

/// Every submitted record, grouped by category.
///
/// Categories keep first-insertion order, which is also the order the
/// records tables are rendered in. A category whose last record was deleted
/// stays present with an empty sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmittedStore {
    entries: IndexMap<String, Vec<Record>>,
}

impl SubmittedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self, category: &str) -> &[Record] {
        self.entries
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn get(&self, category: &str, index: usize) -> Option<&Record> {
        self.records(category).get(index)
    }

    pub fn push(&mut self, category: &str, record: Record) -> usize {
        let records = self.entries.entry(category.to_string()).or_default();
        records.push(record);
        records.len() - 1
    }

    /// Swap the record at `index`, handing back the previous one.
    pub fn replace(&mut self, category: &str, index: usize, record: Record) -> Option<Record> {
        let slot = self.entries.get_mut(category)?.get_mut(index)?;
        Some(std::mem::replace(slot, record))
    }

    pub fn remove(&mut self, category: &str, index: usize) -> Option<Record> {
        let records = self.entries.get_mut(category)?;
        if index >= records.len() {
            return None;
        }
        Some(records.remove(index))
    }

    /// Put a record back where [`SubmittedStore::remove`] took it from.
    pub(crate) fn insert(&mut self, category: &str, index: usize, record: Record) {
        let records = self.entries.entry(category.to_string()).or_default();
        let index = index.min(records.len());
        records.insert(index, record);
    }

    pub(crate) fn truncate(&mut self, category: &str, len: usize) {
        if let Some(records) = self.entries.get_mut(category) {
            records.truncate(len);
        }
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.entries
            .iter()
            .map(|(category, records)| (category.as_str(), records.as_slice()))
    }

    pub fn total_records(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_records() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn push_creates_category_and_returns_index() {
        let mut store = SubmittedStore::new();
        assert_eq!(store.push("A", record(&[("x", "1")])), 0);
        assert_eq!(store.push("A", record(&[("x", "2")])), 1);
        assert_eq!(store.records("A").len(), 2);
        assert!(store.records("B").is_empty());
    }

    #[test]
    fn remove_shifts_later_records_down() {
        let mut store = SubmittedStore::new();
        for value in ["a", "b", "c"] {
            store.push("A", record(&[("x", value)]));
        }
        let removed = store.remove("A", 1).expect("removed");
        assert_eq!(removed["x"], "b");
        assert_eq!(store.get("A", 1).map(|r| r["x"].as_str()), Some("c"));
        assert!(store.remove("A", 5).is_none());
        assert!(store.remove("Z", 0).is_none());
    }

    #[test]
    fn emptied_category_is_kept() {
        let mut store = SubmittedStore::new();
        store.push("A", record(&[("x", "1")]));
        store.remove("A", 0);
        assert_eq!(store.categories().count(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn serializes_as_plain_mapping() {
        let mut store = SubmittedStore::new();
        store.push("B", record(&[("y", "2")]));
        store.push("A", record(&[("x", "1")]));
        let encoded = serde_json::to_string(&store).expect("encode");
        assert_eq!(encoded, r#"{"B":[{"y":"2"}],"A":[{"x":"1"}]}"#);
    }
}
