use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::next_free_id;
use crate::domain::numeric::lenient;
use crate::domain::option::OptionSet;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u32);

/// Explicit child tagging for cost rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowCategory {
    #[default]
    Standard,
    ChildWithBed,
    ChildNoBed,
}

impl RowCategory {
    /// Infers a category from a free-text label. Only used where no explicit tag exists.
    ///
    /// A label is a child row only if it mentions "child", "cwb" or "cnb"; "no bed"
    /// merely picks the variant of an already-child label.
    pub fn classify(label: &str) -> Self {
        let normalized = label.to_ascii_lowercase();
        let mentions_child = normalized.contains("child");
        if normalized.contains("cnb") || (mentions_child && normalized.contains("no bed")) {
            return Self::ChildNoBed;
        }
        if mentions_child || normalized.contains("cwb") {
            return Self::ChildWithBed;
        }
        Self::Standard
    }

    pub fn is_child(self) -> bool {
        matches!(self, Self::ChildWithBed | Self::ChildNoBed)
    }
}

/// Quantity, rate and multiplier of one row within one option.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowOption {
    #[serde(default, deserialize_with = "lenient::zero")]
    pub quantity: Decimal,
    #[serde(default, deserialize_with = "lenient::zero")]
    pub rate: Decimal,
    #[serde(default = "unit_multiplier", deserialize_with = "lenient::one")]
    pub multiplier: Decimal,
}

fn unit_multiplier() -> Decimal {
    Decimal::ONE
}

impl Default for RowOption {
    fn default() -> Self {
        Self { quantity: Decimal::ZERO, rate: Decimal::ZERO, multiplier: Decimal::ONE }
    }
}

impl RowOption {
    pub fn new(quantity: Decimal, rate: Decimal, multiplier: Decimal) -> Self {
        Self { quantity, rate, multiplier }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RowRecord")]
pub struct Row {
    pub id: RowId,
    pub label: String,
    pub category: RowCategory,
    pub options: OptionSet<RowOption>,
}

impl Row {
    pub fn new(id: RowId, label: impl Into<String>, options: OptionSet<RowOption>) -> Self {
        let label = label.into();
        let category = RowCategory::classify(&label);
        Self { id, label, category, options }
    }

    /// Replaces label and values while keeping the row's identity.
    pub fn overwrite(&mut self, label: impl Into<String>, options: OptionSet<RowOption>) {
        self.label = label.into();
        self.category = RowCategory::classify(&self.label);
        self.options = options;
    }

    /// Returns the row to an empty placeholder in place.
    pub fn reset(&mut self) {
        self.label.clear();
        self.category = RowCategory::Standard;
        self.options = OptionSet::default();
    }
}

/// Wire shape of a row. Older snapshots carry no category, so it is inferred from the label.
#[derive(Deserialize)]
struct RowRecord {
    id: RowId,
    #[serde(default)]
    label: String,
    #[serde(default)]
    category: Option<RowCategory>,
    #[serde(default)]
    options: OptionSet<RowOption>,
}

impl From<RowRecord> for Row {
    fn from(record: RowRecord) -> Self {
        let category = record.category.unwrap_or_else(|| RowCategory::classify(&record.label));
        Self { id: record.id, label: record.label, category, options: record.options }
    }
}

/// Cost rows in their single canonical display order.
///
/// Each row carries its values for all three options, so an option can never be
/// reordered independently of the others.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Row>", into = "Vec<Row>")]
pub struct RowMatrix {
    rows: Vec<Row>,
}

impl RowMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Row>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for row in &rows {
            if !seen.insert(row.id) {
                return Err(DomainError::InvariantViolation(format!(
                    "duplicate row id {} in row matrix",
                    row.id.0
                )));
            }
        }
        Ok(Self { rows })
    }

    /// Zero-valued rows with the given labels, in order.
    pub fn with_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut matrix = Self::new();
        for label in labels {
            matrix.push(label, OptionSet::default());
        }
        matrix
    }

    pub fn next_id(&self) -> RowId {
        RowId(next_free_id(self.rows.iter().map(|row| row.id.0)))
    }

    pub fn push(&mut self, label: impl Into<String>, options: OptionSet<RowOption>) -> RowId {
        let id = self.next_id();
        self.rows.push(Row::new(id, label, options));
        id
    }

    pub fn remove(&mut self, id: RowId) -> Option<Row> {
        let position = self.rows.iter().position(|row| row.id == id)?;
        Some(self.rows.remove(position))
    }

    pub fn get(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn get_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    pub fn at(&self, position: usize) -> Option<&Row> {
        self.rows.get(position)
    }

    pub fn at_mut(&mut self, position: usize) -> Option<&mut Row> {
        self.rows.get_mut(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.rows.iter_mut()
    }

    pub fn ids(&self) -> Vec<RowId> {
        self.rows.iter().map(|row| row.id).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TryFrom<Vec<Row>> for RowMatrix {
    type Error = DomainError;

    fn try_from(rows: Vec<Row>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<RowMatrix> for Vec<Row> {
    fn from(matrix: RowMatrix) -> Self {
        matrix.rows
    }
}

pub const DEFAULT_ROW_LABELS: [&str; 5] =
    ["Hotel", "Transfers", "Sightseeing", "Child With Bed", "Child No Bed"];

pub fn default_rows() -> RowMatrix {
    RowMatrix::with_labels(DEFAULT_ROW_LABELS)
}
