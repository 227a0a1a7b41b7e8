//! Store initialization and seeding commands.

use rust_decimal::Decimal;
use thiserror::Error;

use gadget_grove_core::{Category, NewProduct};
use gadget_grove_server::repos::{ProductRepository, RepositoryError};
use gadget_grove_server::store::StoreError;

/// Errors that can occur during store commands.
#[derive(Debug, Error)]
pub enum StoreCommandError {
    /// Store initialization or I/O failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// The store already has products; seeding would duplicate them.
    #[error("Products document is not empty, refusing to seed")]
    NotEmpty,
}

/// Create the data directory and empty documents.
pub fn init() -> Result<(), StoreCommandError> {
    let store = super::open_store();
    store.initialize()?;
    tracing::info!(data_dir = %store.data_dir().display(), "Store initialized");
    Ok(())
}

/// Load the built-in demo catalog. Refuses to run against a store that
/// already has products.
pub async fn seed() -> Result<(), StoreCommandError> {
    let store = super::open_store();
    store.initialize()?;

    let products = ProductRepository::new(&store);
    if !products.get_all().await?.is_empty() {
        return Err(StoreCommandError::NotEmpty);
    }

    let catalog = demo_catalog();
    let count = catalog.len();
    for product in catalog {
        products.create(product).await?;
    }

    tracing::info!(count, "Demo catalog seeded");
    Ok(())
}

fn dec(value: &str) -> Decimal {
    value.parse().unwrap_or(Decimal::ZERO)
}

fn demo_catalog() -> Vec<NewProduct> {
    vec![
        NewProduct {
            name: "Aurora Smartwatch".to_owned(),
            description: "Fitness tracking smartwatch with a week of battery life.".to_owned(),
            price: dec("199.99"),
            image: "https://images.gadgetgrove.test/aurora-smartwatch.jpg".to_owned(),
            category: Category::Gadgets,
            subcategory: "wearables".to_owned(),
            stock: 25,
            rating: 4.5,
            reviews: 120,
            brand: Some("Aurora".to_owned()),
            features: vec![
                "GPS".to_owned(),
                "Heart rate monitor".to_owned(),
                "7-day battery".to_owned(),
            ],
        },
        NewProduct {
            name: "Pulse Wireless Earbuds".to_owned(),
            description: "Noise-cancelling earbuds with wireless charging case.".to_owned(),
            price: dec("89.99"),
            image: "https://images.gadgetgrove.test/pulse-earbuds.jpg".to_owned(),
            category: Category::Gadgets,
            subcategory: "audio".to_owned(),
            stock: 60,
            rating: 4.2,
            reviews: 340,
            brand: Some("Pulse".to_owned()),
            features: vec!["ANC".to_owned(), "Wireless charging".to_owned()],
        },
        NewProduct {
            name: "Nimbus Drone Mini".to_owned(),
            description: "Palm-sized camera drone with 4K video and obstacle avoidance."
                .to_owned(),
            price: dec("449.00"),
            image: "https://images.gadgetgrove.test/nimbus-drone.jpg".to_owned(),
            category: Category::Gadgets,
            subcategory: "drones".to_owned(),
            stock: 12,
            rating: 4.7,
            reviews: 85,
            brand: Some("Nimbus".to_owned()),
            features: vec!["4K camera".to_owned(), "Obstacle avoidance".to_owned()],
        },
        NewProduct {
            name: "BrewMaster Coffee Machine".to_owned(),
            description: "Programmable espresso machine with built-in grinder.".to_owned(),
            price: dec("329.50"),
            image: "https://images.gadgetgrove.test/brewmaster.jpg".to_owned(),
            category: Category::HomeAppliances,
            subcategory: "kitchen".to_owned(),
            stock: 18,
            rating: 4.4,
            reviews: 210,
            brand: Some("BrewMaster".to_owned()),
            features: vec!["Built-in grinder".to_owned(), "Programmable".to_owned()],
        },
        NewProduct {
            name: "ZenAir Purifier".to_owned(),
            description: "HEPA air purifier for rooms up to 50 square meters.".to_owned(),
            price: dec("149.00"),
            image: "https://images.gadgetgrove.test/zenair.jpg".to_owned(),
            category: Category::HomeAppliances,
            subcategory: "climate".to_owned(),
            stock: 30,
            rating: 4.1,
            reviews: 95,
            brand: Some("ZenAir".to_owned()),
            features: vec!["HEPA filter".to_owned(), "Quiet mode".to_owned()],
        },
        NewProduct {
            name: "GlideVac Robot Vacuum".to_owned(),
            description: "Self-emptying robot vacuum with room mapping.".to_owned(),
            price: dec("499.99"),
            image: "https://images.gadgetgrove.test/glidevac.jpg".to_owned(),
            category: Category::HomeAppliances,
            subcategory: "cleaning".to_owned(),
            stock: 8,
            rating: 4.6,
            reviews: 150,
            brand: Some("Glide".to_owned()),
            features: vec!["Room mapping".to_owned(), "Self-emptying".to_owned()],
        },
    ]
}
