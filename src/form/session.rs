use tracing::debug;

use crate::{
    domain::{Catalog, FieldSchema, Record, SubmittedStore},
    storage::{KeyValueStore, Persistence},
};

use super::{
    error::SessionError,
    feedback::{Feedback, FeedbackKind},
    tables::{RecordTable, record_tables},
    validation::{FormValues, ValidationErrors, accepts_input, validate},
};

/// The stored record currently loaded into the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditCursor {
    pub category: String,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Unselected,
    CategorySelected,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was stored.
    Invalid { issues: usize },
    Created { index: usize },
    Edited { index: usize },
}

/// Drives one form from category selection through commit, edit and delete.
///
/// Every mutation of the record collection is written through the
/// [`Persistence`] gateway before the call returns. A failed write rolls the
/// in-memory collection back and is reported as [`SessionError::Storage`].
#[derive(Debug)]
pub struct FormSession<S> {
    catalog: Catalog,
    persistence: Persistence<S>,
    store: SubmittedStore,
    category: String,
    fields: Vec<FieldSchema>,
    values: FormValues,
    errors: ValidationErrors,
    edit_cursor: Option<EditCursor>,
    feedback: Option<Feedback>,
}

impl<S: KeyValueStore> FormSession<S> {
    /// Load the stored records once and start unselected.
    pub fn new(catalog: Catalog, backend: S) -> Self {
        let persistence = Persistence::new(backend);
        let store = persistence.load();
        Self {
            catalog,
            persistence,
            store,
            category: String::new(),
            fields: Vec::new(),
            values: FormValues::new(),
            errors: ValidationErrors::new(),
            edit_cursor: None,
            feedback: None,
        }
    }

    /// Switch the active category; `""` returns to the unselected state.
    pub fn select_category(&mut self, category: &str) {
        self.activate(category);
        self.values.clear();
        self.errors.clear();
        self.edit_cursor = None;
    }

    /// Replace the value of `field` with `value`. Returns `false` when the
    /// field is unknown or the value was filtered out.
    pub fn input(&mut self, field: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        let Some(schema) = self.fields.iter().find(|schema| schema.name == field) else {
            return false;
        };
        if !accepts_input(schema, &value) {
            return false;
        }
        self.values.insert(field.to_string(), value);
        self.errors.shift_remove(field);
        self.feedback = None;
        true
    }

    /// Percentage of required fields holding a value; 0 without required fields.
    pub fn progress(&self) -> f64 {
        let required: Vec<_> = self.fields.iter().filter(|field| field.required).collect();
        if required.is_empty() {
            return 0.0;
        }
        let completed = required
            .iter()
            .filter(|field| !self.value(&field.name).is_empty())
            .count();
        completed as f64 * 100.0 / required.len() as f64
    }

    pub fn submit(&mut self) -> Result<SubmitOutcome, SessionError> {
        if !self.catalog.contains(&self.category) {
            return Err(SessionError::NoCategorySelected);
        }
        let errors = validate(&self.fields, &self.values);
        if !errors.is_empty() {
            let issues = errors.len();
            debug!(category = %self.category, issues, "submission rejected");
            self.errors = errors;
            return Ok(SubmitOutcome::Invalid { issues });
        }
        self.errors.clear();

        let record = self.snapshot();
        let category = self.category.clone();
        let outcome = match self.edit_cursor.clone() {
            Some(cursor) if cursor.category == category => {
                let previous = self.store.replace(&category, cursor.index, record).ok_or(
                    SessionError::RecordNotFound {
                        category: category.clone(),
                        index: cursor.index,
                    },
                )?;
                if let Err(err) = self.persistence.save(&self.store) {
                    self.store.replace(&category, cursor.index, previous);
                    return Err(err.into());
                }
                self.edit_cursor = None;
                self.feedback = Some(Feedback::new(FeedbackKind::Edited));
                SubmitOutcome::Edited {
                    index: cursor.index,
                }
            }
            _ => {
                let index = self.store.push(&category, record);
                if let Err(err) = self.persistence.save(&self.store) {
                    self.store.truncate(&category, index);
                    return Err(err.into());
                }
                self.edit_cursor = None;
                self.feedback = Some(Feedback::new(FeedbackKind::Created));
                SubmitOutcome::Created { index }
            }
        };
        debug!(category = %category, ?outcome, "record committed");
        self.values.clear();
        Ok(outcome)
    }

    /// Load a stored record into the form for in-place editing.
    pub fn edit(&mut self, category: &str, index: usize) -> Result<(), SessionError> {
        let record = self
            .store
            .get(category, index)
            .cloned()
            .ok_or_else(|| SessionError::RecordNotFound {
                category: category.to_string(),
                index,
            })?;
        // Activate first, then load: switching the schema must not drop the record.
        self.activate(category);
        self.values = record;
        self.errors.clear();
        self.edit_cursor = Some(EditCursor {
            category: category.to_string(),
            index,
        });
        self.feedback = None;
        Ok(())
    }

    pub fn delete(&mut self, category: &str, index: usize) -> Result<(), SessionError> {
        let removed =
            self.store
                .remove(category, index)
                .ok_or_else(|| SessionError::RecordNotFound {
                    category: category.to_string(),
                    index,
                })?;
        if let Err(err) = self.persistence.save(&self.store) {
            self.store.insert(category, index, removed);
            return Err(err.into());
        }
        let cursor_removed = match &mut self.edit_cursor {
            Some(cursor) if cursor.category == category => {
                if cursor.index > index {
                    cursor.index -= 1;
                    false
                } else {
                    cursor.index == index
                }
            }
            _ => false,
        };
        if cursor_removed {
            self.edit_cursor = None;
        }
        debug!(category, index, "record deleted");
        self.feedback = Some(Feedback::new(FeedbackKind::Deleted));
        Ok(())
    }

    pub fn dismiss_feedback(&mut self) {
        self.feedback = None;
    }

    /// Selected category, `None` while unselected.
    pub fn category(&self) -> Option<&str> {
        (!self.category.is_empty()).then_some(self.category.as_str())
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn edit_cursor(&self) -> Option<&EditCursor> {
        self.edit_cursor.as_ref()
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &SubmittedStore {
        &self.store
    }

    pub fn record_tables(&self) -> Vec<RecordTable> {
        record_tables(&self.store)
    }

    pub fn backend(&self) -> &S {
        self.persistence.backend()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.category.is_empty() {
            SessionPhase::Unselected
        } else if self.edit_cursor.is_some() || !self.values.is_empty() || !self.errors.is_empty()
        {
            SessionPhase::Editing
        } else {
            SessionPhase::CategorySelected
        }
    }

    fn activate(&mut self, category: &str) {
        if self.category != category {
            debug!(from = %self.category, to = category, "category changed");
        }
        self.category = category.to_string();
        self.fields = self.catalog.fields(category).to_vec();
    }

    /// Record keyed by every schema field, in schema order.
    fn snapshot(&self) -> Record {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), self.value(&field.name).to_string()))
            .collect()
    }
}
