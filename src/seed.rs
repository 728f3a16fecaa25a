use log::{debug, info};
use rusqlite::{params, Connection};

use crate::error::SeedError;
use crate::product::{current_timestamp, Product, SEED_PRODUCTS};
use crate::store::ProductStore;

const INSERT_PRODUCT_SQL: &str = r#"
    INSERT INTO Product (name, brand, price, oldPrice, category, description, imagePath, createdAt, updatedAt)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const PRODUCT_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM Product WHERE name = ?)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertMode {
    /// Insert every row. Re-running duplicates the seed data.
    #[default]
    Append,
    /// Skip rows whose `name` is already present.
    SkipExisting,
}

/// Writes `products` in a single transaction.
///
/// Either the whole batch is committed or nothing is: an error on any row
/// drops the transaction, which rolls back the rows written before it.
pub fn insert_products(
    conn: &mut Connection,
    products: &[Product],
    mode: InsertMode,
) -> Result<usize, SeedError> {
    let tx = conn.transaction()?;
    let mut written = 0;

    {
        let mut insert = tx.prepare(INSERT_PRODUCT_SQL)?;
        let mut exists = tx.prepare(PRODUCT_EXISTS_SQL)?;

        for product in products {
            if mode == InsertMode::SkipExisting
                && exists.query_row([&product.name], |row| row.get::<_, bool>(0))?
            {
                debug!("Skipping existing product '{}'", product.name);
                continue;
            }

            insert.execute(params![
                product.name,
                product.brand,
                product.price,
                product.old_price,
                product.category,
                product.description,
                product.image_path,
                product.created_at,
                product.updated_at,
            ])?;
            written += 1;
        }
    }

    tx.commit()?;
    Ok(written)
}

/// Stamps the seed products with one shared timestamp and writes them.
pub fn seed_products<S: ProductStore>(store: &mut S, mode: InsertMode) -> Result<usize, SeedError> {
    let timestamp = current_timestamp();
    let products: Vec<Product> = SEED_PRODUCTS.iter().map(|p| p.stamp(&timestamp)).collect();

    let written = store.insert_products(&products, mode)?;
    info!(
        "Inserted {} of {} seed products at {}",
        written,
        products.len(),
        timestamp
    );
    Ok(written)
}
