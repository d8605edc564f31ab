//! Line index: the correspondence between new-file line numbers and
//! diff positions required by the inline-comment API.

use indexmap::IndexMap;

use crate::models::diff::{DiffLineKind, FilePatch};

/// Lookup tables derived from one file's parsed patch.
///
/// Only added and context lines are commentable — the hosting service
/// refuses anchors on removed lines — so [`LineIndex::position_of`]
/// only answers for those. Building the index is deterministic and
/// side-effect-free.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    /// new-file line number → diff position (commentable lines only).
    by_new_line: IndexMap<u32, u32>,
    /// diff position → new-file line number, for diagnostics.
    by_position: IndexMap<u32, u32>,
}

impl LineIndex {
    /// Build the index for a parsed patch.
    pub fn build(patch: &FilePatch) -> Self {
        let mut by_new_line = IndexMap::new();
        let mut by_position = IndexMap::new();

        for hunk in &patch.hunks {
            for line in &hunk.lines {
                if line.kind == DiffLineKind::Removed {
                    continue;
                }
                if let Some(new_line) = line.new_line {
                    by_new_line.insert(new_line, line.position);
                    by_position.insert(line.position, new_line);
                }
            }
        }

        Self {
            by_new_line,
            by_position,
        }
    }

    /// Diff position anchoring the given new-file line, if commentable.
    pub fn position_of(&self, new_line: u32) -> Option<u32> {
        self.by_new_line.get(&new_line).copied()
    }

    /// New-file line number at a diff position. Diagnostics only.
    pub fn new_line_at(&self, position: u32) -> Option<u32> {
        self.by_position.get(&position).copied()
    }

    /// Number of commentable lines in the index.
    pub fn len(&self) -> usize {
        self.by_new_line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_new_line.is_empty()
    }

    /// Iterate commentable `(new-file line, diff position)` pairs in
    /// patch order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.by_new_line.iter().map(|(&l, &p)| (l, p))
    }
}
