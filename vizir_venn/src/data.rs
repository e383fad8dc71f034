// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input records.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::trace::debug;

/// Delimiter used to build a single identifier out of a set combination (`"A∩B"`).
pub const SET_ID_DELIMITER: &str = "∩";

/// One input record: a single set (`sets.len() == 1`) or a named intersection (`2+`).
#[derive(Clone, Debug, PartialEq)]
pub struct SetDatum {
    /// Participating set identifiers.
    pub sets: Vec<String>,
    /// Cardinality (or area weight) of the set or intersection.
    pub size: f64,
    /// Optional display label.
    pub label: Option<String>,
    /// Optional weight of this record in the layout loss (defaults to `1.0`).
    pub weight: Option<f64>,
}

impl SetDatum {
    /// Creates a record for the given sets and size.
    pub fn new<S: Into<String>>(sets: impl IntoIterator<Item = S>, size: f64) -> Self {
        Self {
            sets: sets.into_iter().map(Into::into).collect(),
            size,
            label: None,
            weight: None,
        }
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the loss weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Returns `true` for a single-set record.
    pub fn is_single(&self) -> bool {
        self.sets.len() == 1
    }

    /// Returns the identifier of this set combination, e.g. `"A∩B"`.
    pub fn set_id(&self) -> String {
        set_key(&self.sets)
    }

    /// Returns the label to display for this record.
    ///
    /// Falls back to the set identifier.
    pub fn display_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| self.set_id())
    }

    /// Returns the loss weight of this record.
    pub fn weight(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }

    fn is_well_formed(&self) -> bool {
        !self.sets.is_empty() && self.size.is_finite() && self.size > 0.0
    }
}

/// Joins set identifiers with [`SET_ID_DELIMITER`].
pub fn set_key<S: AsRef<str>>(sets: &[S]) -> String {
    let mut out = String::new();
    for (i, set) in sets.iter().enumerate() {
        if i > 0 {
            out.push_str(SET_ID_DELIMITER);
        }
        out.push_str(set.as_ref());
    }
    out
}

/// Returns the records that can take part in a layout, in input order.
///
/// Dropped records:
/// - empty `sets`, non-finite or non-positive `size`,
/// - intersections repeating a set or naming a set without a kept single-set record,
/// - repeated single-set records (the first one wins).
pub fn filter_solvable(data: &[SetDatum]) -> Vec<SetDatum> {
    let mut singles: HashSet<&str> = HashSet::new();
    for datum in data {
        if datum.is_single() && datum.is_well_formed() {
            singles.insert(datum.sets[0].as_str());
        }
    }

    let mut seen_singles: HashSet<&str> = HashSet::new();
    let mut out = Vec::with_capacity(data.len());
    for datum in data {
        if !datum.is_well_formed() {
            debug!("dropping record {:?}: empty sets or non-positive size", datum.sets);
            continue;
        }
        if datum.is_single() {
            if !seen_singles.insert(datum.sets[0].as_str()) {
                debug!("dropping repeated record for set {}", datum.sets[0]);
                continue;
            }
        } else {
            let mut members: HashSet<&str> = HashSet::new();
            let drawable = datum
                .sets
                .iter()
                .all(|s| singles.contains(s.as_str()) && members.insert(s.as_str()));
            if !drawable {
                debug!("dropping intersection {:?}: unknown or repeated set", datum.sets);
                continue;
            }
        }
        out.push(datum.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    #[test]
    fn zero_sized_and_empty_records_are_dropped() {
        let data = vec![
            SetDatum::new(["A"], 6.0),
            SetDatum::new(["B"], 0.0),
            SetDatum::new(Vec::<String>::new(), 3.0),
            SetDatum::new(["C"], f64::NAN),
        ];
        let kept = filter_solvable(&data);
        assert_eq!(kept, vec![SetDatum::new(["A"], 6.0)]);
    }

    #[test]
    fn intersections_need_every_member_set() {
        let data = vec![
            SetDatum::new(["A"], 6.0),
            SetDatum::new(["B"], 0.0),
            SetDatum::new(["A", "B"], 1.0),
            SetDatum::new(["A", "A"], 1.0),
        ];
        let kept = filter_solvable(&data);
        assert_eq!(kept.len(), 1, "only the single A record is drawable");
    }

    #[test]
    fn repeated_single_records_keep_the_first() {
        let data = vec![SetDatum::new(["A"], 6.0), SetDatum::new(["A"], 9.0)];
        let kept = filter_solvable(&data);
        assert_eq!(kept, vec![SetDatum::new(["A"], 6.0)]);
    }

    #[test]
    fn set_ids_and_labels() {
        let ab = SetDatum::new(["A", "B"], 2.0);
        assert_eq!(ab.set_id(), "A∩B");
        assert_eq!(ab.display_label(), "A∩B");
        assert_eq!(ab.clone().with_label("both").display_label(), "both");
        assert_eq!(ab.weight(), 1.0);
        assert_eq!(ab.with_weight(0.5).weight(), 0.5);
    }
}
