use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rusqlite::{Connection, OpenFlags};

use crate::error::SeedError;
use crate::product::Product;
use crate::schema::{ColumnPatch, PRODUCT_TABLE};
use crate::seed::{self, InsertMode};
use crate::store::ProductStore;

/// One column as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub decl_type: String,
    pub not_null: bool,
    pub default_value: Option<String>,
}

impl ColumnInfo {
    /// The column definition as it would appear in `CREATE TABLE`.
    pub fn definition(&self) -> String {
        let mut definition = self.decl_type.clone();
        if self.not_null {
            definition.push_str(" NOT NULL");
        }
        if let Some(default_value) = &self.default_value {
            definition.push_str(" DEFAULT ");
            definition.push_str(default_value);
        }
        definition
    }
}

/// Owns the single connection used for a run.
///
/// The connection is released either by [`Database::close`], which reports
/// close errors, or by `Drop` on every other exit path.
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    /// Opens an existing database file for reading and writing.
    ///
    /// The file is never created: seeding an empty database can only fail,
    /// and a stray file at a mistyped path hides the mistake.
    pub fn open(path: &Path) -> Result<Self, SeedError> {
        if !path.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Database file '{}' does not exist", path.display()),
            )
            .into());
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        info!("Database opened at: {}", path.display());

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn product_columns(&self) -> Result<Vec<ColumnInfo>, SeedError> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", PRODUCT_TABLE))?;

        let columns = stmt
            .query_map([], |row| {
                Ok(ColumnInfo {
                    name: row.get(1)?,
                    decl_type: row.get(2)?,
                    not_null: row.get::<_, i64>(3)? != 0,
                    default_value: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(columns)
    }

    pub fn product_count(&self) -> Result<i64, SeedError> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", PRODUCT_TABLE),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl ProductStore for Database {
    fn add_column(&mut self, patch: &ColumnPatch) -> Result<(), SeedError> {
        self.conn.execute(&patch.sql(), [])?;
        Ok(())
    }

    fn insert_products(
        &mut self,
        products: &[Product],
        mode: InsertMode,
    ) -> Result<usize, SeedError> {
        seed::insert_products(&mut self.conn, products, mode)
    }

    fn close(self) -> Result<(), SeedError> {
        debug!("Closing database at: {}", self.path.display());
        self.conn.close().map_err(|(_conn, e)| SeedError::DatabaseError(e))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    /// `Product` as it looked before `oldPrice` and `category` existed.
    pub fn create_legacy_product_table(conn: &Connection) {
        conn.execute_batch(
            r#"
            CREATE TABLE Product (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                brand TEXT NOT NULL,
                price REAL NOT NULL,
                description TEXT,
                imagePath TEXT,
                createdAt DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updatedAt DATETIME NOT NULL
            );
            "#,
        )
        .unwrap();
    }

    /// A database file with content but no `Product` table.
    pub fn create_unrelated_table(conn: &Connection) {
        conn.execute_batch("CREATE TABLE Admin (id INTEGER PRIMARY KEY, email TEXT NOT NULL)")
            .unwrap();
    }

    /// Creates `seed.db` in a fresh temp dir and lets `setup` prepare it.
    /// The `TempDir` must be kept alive for as long as the file is used.
    pub fn open_temp_db(setup: impl FnOnce(&Connection)) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seed.db");
        let conn = Connection::open(&path).unwrap();
        setup(&conn);
        conn.close().unwrap();
        (dir, path)
    }

    #[test]
    fn test_open_missing_file_fails_without_creating_it() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.db");

        let result = Database::open(&path);
        assert!(matches!(result, Err(SeedError::IoError(ref e)) if e.kind() == io::ErrorKind::NotFound));
        assert!(!path.exists());
    }

    #[test]
    fn test_product_columns_and_count() {
        let (_dir, path) = open_temp_db(create_legacy_product_table);
        let db = Database::open(&path).unwrap();

        let names: Vec<String> = db
            .product_columns()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(
            names,
            vec!["id", "name", "brand", "price", "description", "imagePath", "createdAt", "updatedAt"]
        );
        assert_eq!(db.product_count().unwrap(), 0);
        assert_eq!(db.path(), path.as_path());
    }

    #[test]
    fn test_column_definition() {
        let (_dir, path) = open_temp_db(|conn| {
            create_legacy_product_table(conn);
            conn.execute_batch("ALTER TABLE Product ADD COLUMN category TEXT DEFAULT 'Clothing'")
                .unwrap();
        });
        let db = Database::open(&path).unwrap();
        let columns = db.product_columns().unwrap();

        let definition = |name: &str| {
            columns
                .iter()
                .find(|c| c.name == name)
                .map(ColumnInfo::definition)
                .unwrap()
        };
        assert_eq!(definition("category"), "TEXT DEFAULT 'Clothing'");
        assert_eq!(definition("price"), "REAL NOT NULL");
        assert_eq!(definition("description"), "TEXT");
    }

    #[test]
    fn test_close_releases_file() {
        let (dir, path) = open_temp_db(create_legacy_product_table);
        let db = Database::open(&path).unwrap();
        db.close().unwrap();

        // With no handle left open the whole directory can be removed.
        dir.close().unwrap();
        assert!(!path.exists());
    }
}
