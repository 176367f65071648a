use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// One of the three side-by-side pricing scenarios of a quotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionIndex {
    One,
    Two,
    Three,
}

impl OptionIndex {
    pub const ALL: [OptionIndex; 3] = [OptionIndex::One, OptionIndex::Two, OptionIndex::Three];

    pub fn position(self) -> usize {
        match self {
            OptionIndex::One => 0,
            OptionIndex::Two => 1,
            OptionIndex::Three => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OptionIndex::One => "Option 1",
            OptionIndex::Two => "Option 2",
            OptionIndex::Three => "Option 3",
        }
    }
}

/// Exactly one value per option. Serialized as a three element array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet<T>(pub [T; 3]);

impl<T> OptionSet<T> {
    pub fn from_fn(mut build: impl FnMut(OptionIndex) -> T) -> Self {
        Self([build(OptionIndex::One), build(OptionIndex::Two), build(OptionIndex::Three)])
    }

    pub fn map<U>(&self, mut transform: impl FnMut(OptionIndex, &T) -> U) -> OptionSet<U> {
        OptionSet::from_fn(|option| transform(option, &self[option]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (OptionIndex, &T)> {
        OptionIndex::ALL.into_iter().zip(self.0.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (OptionIndex, &mut T)> {
        OptionIndex::ALL.into_iter().zip(self.0.iter_mut())
    }
}

impl<T: Clone> OptionSet<T> {
    pub fn uniform(value: T) -> Self {
        Self([value.clone(), value.clone(), value])
    }
}

impl<T> Index<OptionIndex> for OptionSet<T> {
    type Output = T;

    fn index(&self, option: OptionIndex) -> &Self::Output {
        &self.0[option.position()]
    }
}

impl<T> IndexMut<OptionIndex> for OptionSet<T> {
    fn index_mut(&mut self, option: OptionIndex) -> &mut Self::Output {
        &mut self.0[option.position()]
    }
}

#[cfg(test)]
mod tests {
    use super::{OptionIndex, OptionSet};

    #[test]
    fn indexes_follow_option_order() {
        let set = OptionSet::from_fn(|option| option.position() * 10);
        assert_eq!(set[OptionIndex::One], 0);
        assert_eq!(set[OptionIndex::Three], 20);
        assert_eq!(OptionIndex::Two.label(), "Option 2");
    }

    #[test]
    fn serializes_as_plain_array() {
        let set = OptionSet::uniform(7_u32);
        assert_eq!(serde_json::to_string(&set).expect("serialize"), "[7,7,7]");
    }
}
