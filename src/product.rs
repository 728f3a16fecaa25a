use chrono::{DateTime, SecondsFormat, Utc};

/// Category stored for rows that predate the `category` column.
pub const DEFAULT_CATEGORY: &str = "Clothing";

/// A row of the `Product` table as written by this tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub name: String,
    pub brand: String,
    pub price: f64,
    pub old_price: Option<f64>,
    pub category: String,
    pub description: String,
    pub image_path: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Literal seed record. Timestamps are attached at run time by [`SeedProduct::stamp`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedProduct {
    pub name: &'static str,
    pub brand: &'static str,
    pub price: f64,
    pub old_price: Option<f64>,
    pub category: &'static str,
    pub description: &'static str,
    pub image_path: &'static str,
}

impl SeedProduct {
    pub fn stamp(&self, timestamp: &str) -> Product {
        Product {
            name: self.name.to_owned(),
            brand: self.brand.to_owned(),
            price: self.price,
            old_price: self.old_price,
            category: self.category.to_owned(),
            description: self.description.to_owned(),
            image_path: self.image_path.to_owned(),
            created_at: timestamp.to_owned(),
            updated_at: timestamp.to_owned(),
        }
    }
}

pub const SEED_PRODUCTS: [SeedProduct; 2] = [
    SeedProduct {
        name: "Engin Designer Peacoat",
        brand: "Signature",
        price: 245.0,
        old_price: Some(320.0),
        category: DEFAULT_CATEGORY,
        description: "A luxurious, high-end peacoat for the discerning fashionista.",
        image_path: "/pictures/posts/pexels-enginakyurt-1642228.jpg",
    },
    SeedProduct {
        name: "Lumen Silk Blouse",
        brand: "Premium",
        price: 185.0,
        old_price: None,
        category: DEFAULT_CATEGORY,
        description: "Elegant silk blouse with a smooth finish and tailored fit.",
        image_path: "/pictures/posts/pexels-lum3n-44775-322207.jpg",
    },
];

/// Formats `now` the way the backend stores `createdAt`/`updatedAt`:
/// ISO-8601, microsecond precision, `Z` suffix.
pub fn seed_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn current_timestamp() -> String {
    seed_timestamp(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_seed_timestamp_format() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 41, 7).unwrap();
        assert_eq!(seed_timestamp(now), "2026-10-18T09:41:07.000000Z");
    }

    #[test]
    fn test_current_timestamp_parses() {
        let ts = current_timestamp();
        assert!(ts.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_stamp_shares_timestamp() {
        let product = SEED_PRODUCTS[0].stamp("2026-10-18T09:41:07.000000Z");
        assert_eq!(product.created_at, product.updated_at);
        assert_eq!(product.name, "Engin Designer Peacoat");
        assert_eq!(product.old_price, Some(320.0));
    }

    #[test]
    fn test_seed_products_literals() {
        let names: Vec<&str> = SEED_PRODUCTS.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Engin Designer Peacoat", "Lumen Silk Blouse"]);

        let blouse = &SEED_PRODUCTS[1];
        assert_eq!(blouse.brand, "Premium");
        assert_eq!(blouse.price, 185.0);
        assert_eq!(blouse.old_price, None);
        assert!(SEED_PRODUCTS.iter().all(|p| p.category == DEFAULT_CATEGORY));
    }
}
