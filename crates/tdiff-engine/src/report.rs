use serde::{Deserialize, Serialize};
use tdiff_types::{ChangeCode, ChangeKind, Direction};

/// Counts of changed leaves in a result tree.
///
/// Every leaf is counted once by kind. Conflicts and pseudo-conflicts are
/// counted again on top of that.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub additions: usize,
    pub deletions: usize,
    pub changes: usize,
    pub conflicts: usize,
    pub pseudo_conflicts: usize,
}

impl DiffSummary {
    pub(crate) fn record(&mut self, code: ChangeCode) {
        match code.kind() {
            ChangeKind::NoChange => return,
            ChangeKind::Addition => self.additions += 1,
            ChangeKind::Deletion => self.deletions += 1,
            ChangeKind::Change => self.changes += 1,
        }
        if code.is_conflict() {
            self.conflicts += 1;
        }
        if code.is_pseudo_conflict() {
            self.pseudo_conflicts += 1;
        }
    }

    /// Number of changed leaves.
    pub fn total(&self) -> usize {
        self.additions + self.deletions + self.changes
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    /// Conflicts whose two sides differ from each other.
    pub fn real_conflicts(&self) -> usize {
        self.conflicts.saturating_sub(self.pseudo_conflicts)
    }
}

/// Serialisable snapshot of a result tree, see
/// [`ResultTree::to_report`](crate::ResultTree::to_report).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    pub summary: DiffSummary,
    pub entries: Vec<ReportEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    pub code: ChangeCode,
    pub kind: ChangeKind,
    pub direction: Direction,
    #[serde(default)]
    pub pseudo_conflict: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ReportEntry>,
}
