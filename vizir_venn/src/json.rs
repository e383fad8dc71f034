// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reading set records from JSON rows with configurable field names.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde_json::Value;

use crate::data::SetDatum;

/// Names of the row fields holding each part of a [`SetDatum`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldMapping {
    /// Field with the set list: an array of strings, or one string for a single set.
    pub sets: String,
    /// Field with the numeric size.
    pub size: String,
    /// Field with the optional display label.
    pub label: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            sets: "sets".to_string(),
            size: "size".to_string(),
            label: "label".to_string(),
        }
    }
}

impl FieldMapping {
    /// Creates the default mapping (`sets`, `size`, `label`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name of the set list field.
    pub fn with_sets(mut self, field: impl Into<String>) -> Self {
        self.sets = field.into();
        self
    }

    /// Sets the name of the size field.
    pub fn with_size(mut self, field: impl Into<String>) -> Self {
        self.size = field.into();
        self
    }

    /// Sets the name of the label field.
    pub fn with_label(mut self, field: impl Into<String>) -> Self {
        self.label = field.into();
        self
    }

    /// Converts one row.
    ///
    /// Returns `None` when the row is not an object, the set list is missing or holds
    /// non-strings, or the size is missing or not a number.
    pub fn datum_from_json(&self, row: &Value) -> Option<SetDatum> {
        let sets: Vec<String> = match row.get(&self.sets)? {
            Value::String(set) => alloc::vec![set.clone()],
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(ToString::to_string))
                .collect::<Option<_>>()?,
            _ => return None,
        };
        let size = row.get(&self.size)?.as_f64()?;
        let mut datum = SetDatum::new(sets, size);
        if let Some(label) = row.get(&self.label).and_then(Value::as_str) {
            datum = datum.with_label(label);
        }
        Some(datum)
    }

    /// Converts an array of rows, dropping rows that do not convert.
    ///
    /// Anything other than an array gives no records.
    pub fn data_from_json(&self, rows: &Value) -> Vec<SetDatum> {
        rows.as_array()
            .map(|rows| rows.iter().filter_map(|row| self.datum_from_json(row)).collect())
            .unwrap_or_default()
    }
}
