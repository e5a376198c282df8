use crate::domain::SubmittedStore;

/// Read-side view of one category's records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTable {
    pub category: String,
    /// Keys of the first record.
    pub headers: Vec<String>,
    /// One row per record, cells aligned with `headers`.
    pub rows: Vec<Vec<String>>,
}

impl RecordTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A table for every category that still holds records, in store order.
pub fn record_tables(store: &SubmittedStore) -> Vec<RecordTable> {
    store
        .categories()
        .filter_map(|(category, records)| {
            let first = records.first()?;
            let headers: Vec<String> = first.keys().cloned().collect();
            let rows = records
                .iter()
                .map(|record| {
                    headers
                        .iter()
                        .map(|key| record.get(key).cloned().unwrap_or_default())
                        .collect()
                })
                .collect();
            Some(RecordTable {
                category: category.to_string(),
                headers,
                rows,
            })
        })
        .collect()
}
