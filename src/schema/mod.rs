mod product_columns;

use std::fmt;

use log::{debug, info, warn};

use crate::store::ProductStore;

pub use product_columns::{CATEGORY_COLUMN, OLD_PRICE_COLUMN, PRODUCT_PATCHES, PRODUCT_TABLE};

/// A nullable or defaulted column added to an existing table.
///
/// Only back-compatible definitions belong here: rows that exist before the
/// patch must remain valid after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPatch {
    pub table: &'static str,
    pub column: &'static str,
    pub definition: &'static str,
}

impl ColumnPatch {
    pub const fn new(table: &'static str, column: &'static str, definition: &'static str) -> Self {
        Self {
            table,
            column,
            definition,
        }
    }

    pub fn sql(&self) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            self.table, self.column, self.definition
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchStatus {
    Added,
    AlreadyPresent,
    Failed(String),
}

impl fmt::Display for PatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchStatus::Added => write!(f, "added"),
            PatchStatus::AlreadyPresent => write!(f, "already present"),
            PatchStatus::Failed(msg) => write!(f, "failed ({})", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatchReport {
    pub entries: Vec<(ColumnPatch, PatchStatus)>,
}

impl PatchReport {
    #[cfg(test)]
    pub fn status_of(&self, column: &str) -> Option<&PatchStatus> {
        self.entries
            .iter()
            .find(|(patch, _)| patch.column == column)
            .map(|(_, status)| status)
    }

    pub fn added_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, status)| *status == PatchStatus::Added)
            .count()
    }

    pub fn has_failures(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, status)| matches!(status, PatchStatus::Failed(_)))
    }
}

/// Attempts every patch in order. Never fails: a column that already exists is
/// the expected outcome of a re-run, and any other error is logged and recorded
/// in the report so the seed step still runs.
pub fn apply_patches<S: ProductStore>(store: &mut S, patches: &[ColumnPatch]) -> PatchReport {
    let mut report = PatchReport::default();

    for patch in patches {
        let status = match store.add_column(patch) {
            Ok(()) => {
                info!("Added column {}.{}", patch.table, patch.column);
                PatchStatus::Added
            }
            Err(e) if e.is_duplicate_column() => {
                debug!("Column {}.{} already exists", patch.table, patch.column);
                PatchStatus::AlreadyPresent
            }
            Err(e) => {
                warn!(
                    "Ignoring failure adding column {}.{}: {}",
                    patch.table, patch.column, e
                );
                PatchStatus::Failed(e.to_string())
            }
        };
        report.entries.push((*patch, status));
    }

    info!("Schema patch: {} column(s) added", report.added_count());
    report
}
