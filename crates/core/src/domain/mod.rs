pub mod addon;
pub mod block;
pub mod numeric;
pub mod option;
pub mod row;
pub mod vendor;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::WorkspaceDefaults;

use self::{
    addon::{default_add_ons, AddOnMatrix},
    block::{default_configs, BlockConfig},
    option::OptionSet,
    row::{default_rows, RowMatrix},
};

/// Everything the calculation engine prices: three configs, the cost rows and the add-ons.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingMatrices {
    pub configs: OptionSet<BlockConfig>,
    pub rows: RowMatrix,
    pub add_ons: AddOnMatrix,
}

impl PricingMatrices {
    pub fn new(configs: OptionSet<BlockConfig>, rows: RowMatrix, add_ons: AddOnMatrix) -> Self {
        Self { configs, rows, add_ons }
    }

    /// The matrices a freshly opened workspace starts from.
    pub fn with_defaults(defaults: &WorkspaceDefaults) -> Self {
        Self { configs: default_configs(defaults), rows: default_rows(), add_ons: default_add_ons() }
    }
}

/// Next free id: one past the highest in use, or the lowest unused id once the
/// highest is `u32::MAX`. Existing ids are never reused otherwise.
pub(crate) fn next_free_id(taken: impl IntoIterator<Item = u32>) -> u32 {
    let taken: BTreeSet<u32> = taken.into_iter().collect();
    match taken.last() {
        None => 1,
        Some(&highest) => highest
            .checked_add(1)
            .or_else(|| (1..=u32::MAX).find(|candidate| !taken.contains(candidate)))
            .unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::next_free_id;

    #[test]
    fn ids_continue_past_the_highest() {
        assert_eq!(next_free_id(std::iter::empty()), 1);
        assert_eq!(next_free_id([3, 1, 7]), 8);
    }

    #[test]
    fn ids_fill_the_lowest_gap_at_the_ceiling() {
        assert_eq!(next_free_id([u32::MAX]), 1);
        assert_eq!(next_free_id([1, 2, u32::MAX]), 3);
    }
}
