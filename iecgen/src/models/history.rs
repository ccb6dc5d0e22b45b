//! Bounded, newest-first history of generations.

use serde::{Deserialize, Serialize};

use super::Generation;

/// Maximum number of generations retained.
pub const HISTORY_LIMIT: usize = 10;

/// Ordered list of past generations, newest first.
///
/// The length never exceeds [`HISTORY_LIMIT`]; inserting into a full history
/// drops the oldest entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<Generation>,
}

impl History {
    /// Create an empty history.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a history from entries already ordered newest first.
    /// Anything past the limit is discarded.
    pub fn from_entries(mut entries: Vec<Generation>) -> Self {
        entries.truncate(HISTORY_LIMIT);
        Self { entries }
    }

    /// Prepend a generation, dropping the oldest excess.
    pub fn push_front(&mut self, generation: Generation) {
        self.entries.insert(0, generation);
        self.entries.truncate(HISTORY_LIMIT);
    }

    /// Find a generation by id.
    pub fn find(&self, id: &str) -> Option<&Generation> {
        self.entries.iter().find(|g| g.id == id)
    }

    /// Most recent generation, if any.
    pub fn latest(&self) -> Option<&Generation> {
        self.entries.first()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Generation> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[Generation] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Generation;
    type IntoIter = std::slice::Iter<'a, Generation>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_front_caps_and_drops_oldest() {
        let mut history = History::new();
        for i in 0..=HISTORY_LIMIT {
            history.push_front(Generation::new(format!("prompt {i}"), "code"));
            assert!(history.len() <= HISTORY_LIMIT);
        }

        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.latest().unwrap().prompt, format!("prompt {HISTORY_LIMIT}"));
        assert!(history.iter().all(|g| g.prompt != "prompt 0"));
    }

    #[test]
    fn test_entries_are_newest_first() {
        let mut history = History::new();
        for i in 0..5 {
            history.push_front(Generation::new(format!("p{i}"), "c"));
        }
        let entries = history.entries();
        for pair in entries.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
        assert_eq!(entries[0].prompt, "p4");
    }

    #[test]
    fn test_from_entries_truncates_without_reordering() {
        let entries: Vec<_> = (0..12)
            .map(|i| Generation::new(format!("p{i}"), "c"))
            .collect();
        let history = History::from_entries(entries);
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.entries()[0].prompt, "p0");
        assert_eq!(history.entries()[9].prompt, "p9");
    }

    #[test]
    fn test_find() {
        let mut history = History::new();
        let generation = Generation::new("motor", "code");
        let id = generation.id.clone();
        history.push_front(generation);

        assert_eq!(history.find(&id).map(|g| g.prompt.as_str()), Some("motor"));
        assert!(history.find("missing").is_none());
    }
}
