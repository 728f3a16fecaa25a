use std::io::Write;

use log::{error, warn};

use crate::schema::{apply_patches, PatchReport, PRODUCT_PATCHES};
use crate::seed::{seed_products, InsertMode};
use crate::store::ProductStore;

pub const SUCCESS_MESSAGE: &str = "Successfully migrated and added new products.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub patch_schema: bool,
    pub seed: bool,
    pub mode: InsertMode,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            patch_schema: true,
            seed: true,
            mode: InsertMode::Append,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedResult {
    Seeded(usize),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub patches: PatchReport,
    pub seed: Option<SeedResult>,
}

impl RunOutcome {
    pub fn is_failure(&self) -> bool {
        self.patches.has_failures() || matches!(self.seed, Some(SeedResult::Failed(_)))
    }
}

/// Writes one console line. A broken console must not abort the run.
pub fn report_line<W: Write>(out: &mut W, line: &str) {
    if let Err(e) = writeln!(out, "{}", line) {
        warn!("Failed to write to console: {}", e);
    }
}

/// Patches the schema, seeds the products, and closes `store`.
///
/// Neither step propagates an error: schema failures are recorded in the
/// report and a failed insert is written to `out` as `Error: ...`. The store
/// is closed exactly once whatever happened before.
pub fn run<S: ProductStore, W: Write>(
    mut store: S,
    options: &RunOptions,
    out: &mut W,
) -> RunOutcome {
    let patches = if options.patch_schema {
        apply_patches(&mut store, &PRODUCT_PATCHES)
    } else {
        PatchReport::default()
    };

    let seed = options.seed.then(|| match seed_products(&mut store, options.mode) {
        Ok(written) => {
            report_line(out, SUCCESS_MESSAGE);
            SeedResult::Seeded(written)
        }
        Err(e) => {
            error!("Seeding failed: {}", e);
            report_line(out, &format!("Error: {}", e));
            SeedResult::Failed(e.to_string())
        }
    });

    if let Err(e) = store.close() {
        warn!("Failed to close database: {}", e);
    }

    RunOutcome { patches, seed }
}
