use crate::error::SeedError;
use crate::product::Product;
use crate::schema::ColumnPatch;
use crate::seed::InsertMode;

/// The operations the seeding procedure needs from a database connection.
///
/// [`crate::database::Database`] is the only production implementation; the
/// procedure in [`crate::runner`] is generic over this trait so a failing
/// store can be substituted in tests.
pub trait ProductStore {
    /// Executes a single `ALTER TABLE ... ADD COLUMN`.
    fn add_column(&mut self, patch: &ColumnPatch) -> Result<(), SeedError>;

    /// Writes `products` as one batch and commits. Returns the number of rows written.
    fn insert_products(&mut self, products: &[Product], mode: InsertMode)
        -> Result<usize, SeedError>;

    /// Releases the connection.
    fn close(self) -> Result<(), SeedError>;
}
