use alloc::string::String;

/// A named, ordered partition of the scrollable content (e.g. a menu category).
///
/// Heights are tracked separately by [`crate::SectionHeightRegistry`], keyed by `index`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    pub index: usize,
    pub name: String,
}

impl Section {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

/// The section currently highlighted in the tab strip.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectedSection {
    pub index: usize,
    pub name: String,
}

impl SelectedSection {
    pub fn is(&self, section: &Section) -> bool {
        self.index == section.index && self.name == section.name
    }
}

impl From<&Section> for SelectedSection {
    fn from(section: &Section) -> Self {
        Self {
            index: section.index,
            name: section.name.clone(),
        }
    }
}
