use super::ColumnPatch;

pub const PRODUCT_TABLE: &str = "Product";
pub const OLD_PRICE_COLUMN: &str = "oldPrice";
pub const CATEGORY_COLUMN: &str = "category";

/// Manual migration for the `Product` table.
///
/// Adds:
///   - `oldPrice REAL`: nullable, the pre-discount price shown struck through.
///   - `category TEXT DEFAULT 'Clothing'`: every row that predates the column
///     reads back as clothing.
///
/// SQLite has no `ADD COLUMN IF NOT EXISTS`, so re-running these statements
/// fails with "duplicate column name"; callers treat that as already applied.
pub const PRODUCT_PATCHES: [ColumnPatch; 2] = [
    ColumnPatch::new(PRODUCT_TABLE, OLD_PRICE_COLUMN, "REAL"),
    ColumnPatch::new(PRODUCT_TABLE, CATEGORY_COLUMN, "TEXT DEFAULT 'Clothing'"),
];
