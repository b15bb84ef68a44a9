//! The edit/replacement model: `Edit` and `ReplacementSet`.
//!
//! All handlers in this rewriter are pure functions of (node, source) -> a
//! handful of `Edit`s; `ReplacementSet` is the sole mutation channel, and
//! `apply` is the only place a buffer actually changes. This keeps the rest
//! of the engine reimplementable with immutable data flow.

/// A single byte-range replacement, scoped to one logical file.
///
/// `old_length` may be zero only for a pure insertion; `new_text` may be
/// empty (a pure deletion), though that's rare for this rewriter since every
/// handler replaces a name with another name of nonzero length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub source_offset: u32,
    pub old_length: u32,
    pub new_text: String,
}

impl Edit {
    pub fn new(source_offset: u32, old_length: u32, new_text: impl Into<String>) -> Self {
        Edit {
            source_offset,
            old_length,
            new_text: new_text.into(),
        }
    }

    fn end(&self) -> u32 {
        self.source_offset + self.old_length
    }

    fn overlaps(&self, other: &Edit) -> bool {
        self.source_offset < other.end() && other.source_offset < self.end()
    }
}

/// Why an edit insertion was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapConflict {
    pub existing: Edit,
    pub rejected: Edit,
}

/// An ordered collection of edits for one file, with overlap rejection.
///
/// Insertion order is not significant: `apply` always sorts by offset before
/// mutating the buffer, descending, so earlier offsets stay valid while
/// later ones are rewritten first.
#[derive(Debug, Default, Clone)]
pub struct ReplacementSet {
    edits: Vec<Edit>,
}

impl ReplacementSet {
    pub fn new() -> Self {
        ReplacementSet::default()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edit> {
        self.edits.iter()
    }

    /// Insert an edit.
    ///
    /// An exact duplicate (same offset, old_length, new_text) of an already
    /// inserted edit is silently dropped. An edit that overlaps an existing
    /// one with *different* content is rejected and returned as a conflict
    /// rather than panicking: an overlap is a translator bug to
    /// be reported via stats, not a crash.
    pub fn insert(&mut self, edit: Edit) -> Result<(), OverlapConflict> {
        for existing in &self.edits {
            if existing.source_offset == edit.source_offset
                && existing.old_length == edit.old_length
                && existing.new_text == edit.new_text
            {
                return Ok(());
            }
            if existing.overlaps(&edit) {
                return Err(OverlapConflict {
                    existing: existing.clone(),
                    rejected: edit,
                });
            }
        }
        self.edits.push(edit);
        Ok(())
    }

    /// Apply all edits to `buffer`, producing the rewritten text.
    ///
    /// Edits are applied in decreasing offset order so earlier offsets in
    /// the buffer remain valid as later (higher-offset) edits are applied
    /// first. Regions not covered by any edit are byte-identical to the
    /// input.
    pub fn apply(&self, buffer: &[u8]) -> Vec<u8> {
        let mut sorted: Vec<&Edit> = self.edits.iter().collect();
        sorted.sort_by(|a, b| b.source_offset.cmp(&a.source_offset));

        let mut out = buffer.to_vec();
        for edit in sorted {
            let start = edit.source_offset as usize;
            let end = start + edit.old_length as usize;
            if end > out.len() {
                continue;
            }
            out.splice(start..end, edit.new_text.bytes());
        }
        out
    }
}
