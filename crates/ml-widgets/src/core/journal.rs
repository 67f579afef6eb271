//! The explanation log that a widget keeps for learners.

use serde::{Deserialize, Serialize};

/// One explained step: a short title and the lines of the calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// A short title, e.g. `Assignment (iteration 2)`.
    pub title: String,
    /// The lines of the explanation, in reading order.
    pub lines: Vec<String>,
}

impl core::fmt::Display for Entry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{}", self.title)?;
        for line in &self.lines {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}

/// A chronological log of explained steps.
///
/// Widgets show the newest entry first; see [`Journal::newest_first`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Journal {
    /// The entries, oldest first.
    entries: Vec<Entry>,
}

impl Journal {
    /// Creates an empty `Journal`.
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Appends an entry.
    pub fn record<S: Into<String>>(&mut self, title: S, lines: Vec<String>) {
        let entry = Entry {
            title: title.into(),
            lines,
        };
        ftlog::trace!("{}", entry.title);
        self.entries.push(entry);
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The entries, newest first.
    pub fn newest_first(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().rev()
    }

    /// The most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&Entry> {
        self.entries.last()
    }

    /// The number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
