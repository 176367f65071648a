use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::next_free_id;
use crate::domain::numeric::lenient;
use crate::domain::option::OptionSet;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddOnId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddOnCategory {
    Flight,
    Visa,
}

impl AddOnCategory {
    pub const ALL: [AddOnCategory; 2] = [AddOnCategory::Flight, AddOnCategory::Visa];

    /// Case-insensitive parse of an extraction's add-on type.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "flight" | "flights" => Some(Self::Flight),
            "visa" | "visas" => Some(Self::Visa),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flight => "Flight",
            Self::Visa => "Visa",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOnOption {
    #[serde(default, deserialize_with = "lenient::zero")]
    pub quantity: Decimal,
    #[serde(default, deserialize_with = "lenient::zero")]
    pub net_rate: Decimal,
    #[serde(default, deserialize_with = "lenient::zero")]
    pub markup_per_unit: Decimal,
}

impl AddOnOption {
    pub fn new(quantity: Decimal, net_rate: Decimal, markup_per_unit: Decimal) -> Self {
        Self { quantity, net_rate, markup_per_unit }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOnRow {
    pub id: AddOnId,
    pub category: AddOnCategory,
    #[serde(default)]
    pub options: OptionSet<AddOnOption>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AddOnRow>", into = "Vec<AddOnRow>")]
pub struct AddOnMatrix {
    rows: Vec<AddOnRow>,
}

impl AddOnMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<AddOnRow>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for row in &rows {
            if !seen.insert(row.id) {
                return Err(DomainError::InvariantViolation(format!(
                    "duplicate add-on id {} in add-on matrix",
                    row.id.0
                )));
            }
        }
        Ok(Self { rows })
    }

    pub fn push(&mut self, category: AddOnCategory) -> AddOnId {
        let id = AddOnId(next_free_id(self.rows.iter().map(|row| row.id.0)));
        self.rows.push(AddOnRow { id, category, options: OptionSet::default() });
        id
    }

    pub fn remove(&mut self, id: AddOnId) -> Option<AddOnRow> {
        let position = self.rows.iter().position(|row| row.id == id)?;
        Some(self.rows.remove(position))
    }

    pub fn get(&self, id: AddOnId) -> Option<&AddOnRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn get_mut(&mut self, id: AddOnId) -> Option<&mut AddOnRow> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    /// Ids of rows of `category`, in display order.
    pub fn slots(&self, category: AddOnCategory) -> Vec<AddOnId> {
        self.rows.iter().filter(|row| row.category == category).map(|row| row.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AddOnRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TryFrom<Vec<AddOnRow>> for AddOnMatrix {
    type Error = DomainError;

    fn try_from(rows: Vec<AddOnRow>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<AddOnMatrix> for Vec<AddOnRow> {
    fn from(matrix: AddOnMatrix) -> Self {
        matrix.rows
    }
}

/// Two flight rows followed by two visa rows.
pub fn default_add_ons() -> AddOnMatrix {
    let mut matrix = AddOnMatrix::new();
    for category in [
        AddOnCategory::Flight,
        AddOnCategory::Flight,
        AddOnCategory::Visa,
        AddOnCategory::Visa,
    ] {
        matrix.push(category);
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::{default_add_ons, AddOnCategory, AddOnId, AddOnMatrix};

    #[test]
    fn default_matrix_has_two_slots_per_category() {
        let matrix = default_add_ons();
        assert_eq!(matrix.slots(AddOnCategory::Flight), vec![AddOnId(1), AddOnId(2)]);
        assert_eq!(matrix.slots(AddOnCategory::Visa), vec![AddOnId(3), AddOnId(4)]);
    }

    #[test]
    fn push_after_restored_max_id_takes_a_free_id() {
        let mut matrix: AddOnMatrix =
            serde_json::from_str(r#"[{ "id": 4294967295, "category": "Visa" }]"#)
                .expect("restore add-ons");

        assert_eq!(matrix.push(AddOnCategory::Flight), AddOnId(1));
        assert_eq!(matrix.push(AddOnCategory::Flight), AddOnId(2));
    }

    #[test]
    fn parses_extraction_types_case_insensitively() {
        assert_eq!(AddOnCategory::parse(" FLIGHT "), Some(AddOnCategory::Flight));
        assert_eq!(AddOnCategory::parse("visa"), Some(AddOnCategory::Visa));
        assert_eq!(AddOnCategory::parse("insurance"), None);
    }
}
