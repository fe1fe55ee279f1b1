use std::collections::HashMap;

use crate::types::split_path;
use crate::{DataReference, FormDataError};

/// Read-only accessor for form data values.
pub trait FormDataSource {
    /// The raw value at `reference`, or `None` if nothing is stored there.
    fn select(&self, reference: &DataReference) -> Option<serde_json::Value>;
}

impl<F> FormDataSource for F
where
    F: Fn(&DataReference) -> Option<serde_json::Value>,
{
    fn select(&self, reference: &DataReference) -> Option<serde_json::Value> {
        self(reference)
    }
}

/// Form data held as one JSON document per data type.
///
/// Field paths are dot-separated object keys; a segment may carry an array
/// index, as in `people[1].name`.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    models: HashMap<String, serde_json::Value>,
}

impl FormData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the document for `data_type`.
    #[must_use]
    pub fn with_model(mut self, data_type: &str, document: serde_json::Value) -> Self {
        self.insert_model(data_type, document);
        self
    }

    pub fn insert_model(&mut self, data_type: &str, document: serde_json::Value) {
        self.models.insert(data_type.to_owned(), document);
    }

    #[must_use]
    pub fn model(&self, data_type: &str) -> Option<&serde_json::Value> {
        self.models.get(data_type)
    }

    /// Borrowing lookup behind [`FormDataSource::select`].
    #[must_use]
    pub fn get(&self, reference: &DataReference) -> Option<&serde_json::Value> {
        let mut current = self.models.get(&reference.data_type)?;
        for segment in split_path(&reference.field) {
            current = current.get(segment.name)?;
            if let Some(index) = segment.index {
                current = current.get(index)?;
            }
        }
        Some(current)
    }

    /// Largest array index [`set()`](Self::set) will pad up to.
    pub const MAX_INDEX: usize = 65_535;

    /// Write `value` at `reference`, creating intermediate objects and
    /// padding arrays with `null` as needed.
    ///
    /// # Errors
    ///
    /// Returns [`FormDataError::IndexTooLarge`] without writing anything if
    /// an index in the path is above [`MAX_INDEX`](Self::MAX_INDEX).
    pub fn set(
        &mut self,
        reference: &DataReference,
        value: serde_json::Value,
    ) -> Result<(), FormDataError> {
        let segments = split_path(&reference.field);
        if let Some(index) = segments
            .iter()
            .filter_map(|s| s.index)
            .find(|&index| index > Self::MAX_INDEX)
        {
            return Err(FormDataError::IndexTooLarge {
                field: reference.field.clone(),
                index,
                max: Self::MAX_INDEX,
            });
        }

        let mut current = self
            .models
            .entry(reference.data_type.clone())
            .or_insert(serde_json::Value::Null);
        for segment in segments {
            if !current.is_object() {
                *current = serde_json::Value::Object(serde_json::Map::new());
            }
            current = &mut current[segment.name];
            if let Some(index) = segment.index {
                match current.as_array_mut() {
                    Some(items) if items.len() > index => {}
                    Some(items) => items.resize(index + 1, serde_json::Value::Null),
                    None => {
                        *current =
                            serde_json::Value::Array(vec![serde_json::Value::Null; index + 1]);
                    }
                }
                current = &mut current[index];
            }
        }
        *current = value;
        Ok(())
    }
}

impl FormDataSource for FormData {
    fn select(&self, reference: &DataReference) -> Option<serde_json::Value> {
        self.get(reference).cloned()
    }
}
