//! Catalog seeding command.
//!
//! Upserts the launch collection so the command is safe to re-run;
//! existing rows are refreshed in place.

use chrono::Utc;
use sqlx::PgPool;

use raritone_core::{Price, Product, ProductId};
use raritone_storefront::db::ProductRepository;

use super::CommandError;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

/// The launch collection.
fn launch_products() -> Vec<Product> {
    let now = Utc::now();
    vec![
        Product {
            id: ProductId::new("1"),
            name: "Bold vibe Oversize Tshirt".into(),
            description: "Luxury cotton t-shirt with premium finish and exceptional comfort. \
                          Made from 100% organic cotton."
                .into(),
            price: Price::from_cents(69_600),
            image_url: "Raritone Collection/Bold vibe Oversize Tshirt.jpg".into(),
            back_image_url: None,
            category: "Tops".into(),
            stock: 10,
            tags: strings(&["Cotton", "Premium", "Casual"]),
            sizes: Some(strings(&["XS", "S", "M", "L", "XL"])),
            colors: None,
            created_at: now,
        },
        Product {
            id: ProductId::new("2"),
            name: "Raritone Hoodie".into(),
            description: "Crafted from premium materials, this hoodie ensures warmth and \
                          durability while offering a modern, minimalist design perfect for \
                          any wardrobe."
                .into(),
            price: Price::from_cents(104_313),
            image_url: "Raritone Collection/Hoddie1(F).jpg".into(),
            back_image_url: Some("Raritone Collection/Hoddie1(B).jpg".into()),
            category: "Outerwear".into(),
            stock: 5,
            tags: strings(&["Hoddie", "designer", "Cozy"]),
            sizes: Some(strings(&["28", "30", "32", "34", "36"])),
            colors: None,
            created_at: now,
        },
        Product {
            id: ProductId::new("3"),
            name: "Kiss me again Oversize Tshirt".into(),
            description: "Its soft, premium fabric ensures lasting wear, while the chic, \
                          modern design adds a touch of effortless cool."
                .into(),
            price: Price::from_cents(39_920),
            image_url: "Raritone Collection/Kiss me again.jpeg".into(),
            back_image_url: None,
            category: "Tops".into(),
            stock: 8,
            tags: strings(&["Tshirt", "luxury", "comfort"]),
            sizes: Some(strings(&["S", "M", "L", "XL"])),
            colors: None,
            created_at: now,
        },
        Product {
            id: ProductId::new("4"),
            name: "Pop Art tshirt".into(),
            description: "This wearable masterpiece showcases bold, colorful graphics that \
                          pay homage to the iconic Pop Art movement, making it a statement \
                          piece in any wardrobe."
                .into(),
            price: Price::from_cents(43_413),
            image_url: "Raritone Collection/Pop Art tshirt.jpg".into(),
            back_image_url: None,
            category: "Tops".into(),
            stock: 0,
            tags: strings(&["Tshirt", "luxury", "comfort"]),
            sizes: Some(strings(&["XS", "S", "M", "L"])),
            colors: None,
            created_at: now,
        },
        Product {
            id: ProductId::new("5"),
            name: "Raritone David Bowie Hoodie".into(),
            description: "Celebrate the legacy of a music legend. Crafted from premium \
                          materials, this hoodie showcases Bowie's iconic style while \
                          ensuring unparalleled comfort and durability."
                .into(),
            price: Price::from_cents(799_900),
            image_url: "Raritone Collection/David Bowie Hoodie (F).jpg".into(),
            back_image_url: Some("Raritone Collection/David Bowie Hoodie (B).jpg".into()),
            category: "Outerwear".into(),
            stock: 4,
            tags: strings(&["leather", "jacket", "premium"]),
            sizes: Some(strings(&["S", "M", "L", "XL"])),
            colors: Some(strings(&["Black", "Brown"])),
            created_at: now,
        },
    ]
}

/// Seed the catalog with the launch collection.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a write fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to storefront database...");
    let pool = PgPool::connect(&database_url).await?;

    let repo = ProductRepository::new(&pool);
    let products = launch_products();
    let count = products.len();

    for product in &products {
        repo.upsert(product).await?;
        tracing::info!(id = %product.id, name = %product.name, "Seeded product");
    }

    tracing::info!("Seeded {count} products");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_collection_has_stable_ids_and_one_sold_out_item() {
        let products = launch_products();
        assert_eq!(products.len(), 5);

        let ids: Vec<_> = products.iter().map(|p| p.id.as_str().to_owned()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);

        let sold_out: Vec<_> = products.iter().filter(|p| !p.in_stock()).collect();
        assert_eq!(sold_out.len(), 1);
        assert_eq!(sold_out[0].id.as_str(), "4");
    }

    #[test]
    fn prices_are_exact_cents() {
        let products = launch_products();
        assert_eq!(products[0].price.to_decimal().to_string(), "696.00");
        assert_eq!(products[1].price.to_decimal().to_string(), "1043.13");
    }
}
