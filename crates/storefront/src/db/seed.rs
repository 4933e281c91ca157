//! Starting catalog.
//!
//! The storefront boots with this catalog in memory; admin edits are lost on
//! restart.

use rust_decimal::Decimal;

use atelier_core::{CollectionId, Price, PriceError, ProductId};

use crate::models::{Collection, Product};

struct Seed {
    id: u64,
    name: &'static str,
    price: i64,
    description: &'static str,
    category: &'static str,
    images: [&'static str; 2],
    sizes: &'static [&'static str],
    in_stock: bool,
    featured: bool,
    bestseller: bool,
    new_arrival: bool,
    fabric: Option<&'static str>,
    care: Option<&'static str>,
}

const LETTER_SIZES: &[&str] = &["XS", "S", "M", "L", "XL"];
const ONE_SIZE: &[&str] = &["One Size"];

const PRODUCTS: &[Seed] = &[
    Seed {
        id: 1,
        name: "Essential Cashmere Sweater",
        price: 295,
        description: "Luxuriously soft cashmere sweater with a relaxed fit. Perfect for layering or wearing alone.",
        category: "Knitwear",
        images: [
            "/minimal-beige-cashmere-sweater-on-model.jpg",
            "/beige-cashmere-sweater-detail-texture-close-up.jpg",
        ],
        sizes: LETTER_SIZES,
        in_stock: true,
        featured: true,
        bestseller: true,
        new_arrival: false,
        fabric: Some("100% Cashmere"),
        care: Some("Dry clean only"),
    },
    Seed {
        id: 2,
        name: "Tailored Wool Trousers",
        price: 245,
        description: "Classic tailored trousers crafted from premium wool. Timeless silhouette with a modern fit.",
        category: "Trousers",
        images: [
            "/charcoal-grey-wool-trousers-on-model-minimal.jpg",
            "/grey-tailored-trousers-detail-close-up.jpg",
        ],
        sizes: &["28", "30", "32", "34", "36"],
        in_stock: true,
        featured: true,
        bestseller: true,
        new_arrival: false,
        fabric: None,
        care: None,
    },
    Seed {
        id: 3,
        name: "Organic Cotton Tee",
        price: 85,
        description: "Essential crew neck tee made from premium organic cotton. Soft, breathable, and perfectly fitted.",
        category: "Basics",
        images: [
            "/white-cotton-t-shirt-on-model-minimal-clean.jpg",
            "/white-tee-shirt-folded-detail.jpg",
        ],
        sizes: LETTER_SIZES,
        in_stock: true,
        featured: false,
        bestseller: false,
        new_arrival: true,
        fabric: Some("100% Organic Cotton"),
        care: Some("Machine wash cold"),
    },
    Seed {
        id: 4,
        name: "Silk Button-Down Shirt",
        price: 325,
        description: "Elegant silk shirt with mother-of-pearl buttons. Effortlessly sophisticated.",
        category: "Shirts",
        images: [
            "/ivory-silk-shirt-on-model-minimal-elegant.jpg",
            "/silk-shirt-detail-buttons-close-up.jpg",
        ],
        sizes: &["XS", "S", "M", "L"],
        in_stock: true,
        featured: false,
        bestseller: false,
        new_arrival: true,
        fabric: None,
        care: None,
    },
    Seed {
        id: 5,
        name: "Merino Wool Cardigan",
        price: 275,
        description: "Lightweight merino wool cardigan. Versatile layering piece for any season.",
        category: "Knitwear",
        images: [
            "/navy-merino-wool-cardigan-on-model.jpg",
            "/navy-cardigan-detail-texture.jpg",
        ],
        sizes: &["S", "M", "L", "XL"],
        in_stock: true,
        featured: true,
        bestseller: false,
        new_arrival: false,
        fabric: None,
        care: None,
    },
    Seed {
        id: 6,
        name: "Linen Wide-Leg Pants",
        price: 195,
        description: "Flowing wide-leg pants in breathable linen. Relaxed yet refined.",
        category: "Trousers",
        images: [
            "/natural-linen-wide-leg-pants-on-model.jpg",
            "/linen-pants-texture-detail.jpg",
        ],
        sizes: &["XS", "S", "M", "L"],
        in_stock: false,
        featured: false,
        bestseller: false,
        new_arrival: false,
        fabric: None,
        care: None,
    },
    Seed {
        id: 7,
        name: "Leather Minimal Tote",
        price: 425,
        description: "Handcrafted leather tote with clean lines. Spacious interior with magnetic closure.",
        category: "Accessories",
        images: [
            "/tan-leather-tote-bag-minimal.jpg",
            "/leather-bag-detail-stitching.jpg",
        ],
        sizes: ONE_SIZE,
        in_stock: true,
        featured: true,
        bestseller: true,
        new_arrival: false,
        fabric: None,
        care: None,
    },
    Seed {
        id: 8,
        name: "Cashmere Scarf",
        price: 165,
        description: "Soft cashmere scarf in a versatile neutral tone. Essential cold-weather accessory.",
        category: "Accessories",
        images: [
            "/beige-cashmere-scarf-styled.jpg",
            "/placeholder.svg?height=800&width=600",
        ],
        sizes: ONE_SIZE,
        in_stock: true,
        featured: false,
        bestseller: false,
        new_arrival: true,
        fabric: None,
        care: None,
    },
];

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_owned()).collect()
}

/// The starting product catalog.
///
/// # Errors
///
/// Returns `PriceError` if a seeded price is out of range.
pub fn products() -> Result<Vec<Product>, PriceError> {
    PRODUCTS
        .iter()
        .map(|s| {
            Ok(Product {
                id: ProductId::new(s.id),
                name: s.name.to_owned(),
                price: Price::new(Decimal::from(s.price))?,
                description: s.description.to_owned(),
                category: s.category.to_owned(),
                images: to_strings(&s.images),
                sizes: to_strings(s.sizes),
                in_stock: s.in_stock,
                featured: s.featured,
                bestseller: s.bestseller,
                new_arrival: s.new_arrival,
                fabric: s.fabric.map(str::to_owned),
                care: s.care.map(str::to_owned),
                created_at: None,
                updated_at: None,
            })
        })
        .collect()
}

/// The starting collections.
#[must_use]
pub fn collections() -> Vec<Collection> {
    [
        ("essentials", "Essentials", "Timeless pieces for everyday elegance"),
        ("knitwear", "Knitwear", "Luxurious knits for every season"),
        ("tailoring", "Tailoring", "Precision-crafted suiting and trousers"),
    ]
    .into_iter()
    .map(|(id, name, description)| Collection {
        id: CollectionId::new(id),
        name: name.to_owned(),
        description: description.to_owned(),
        image: Some("/placeholder.svg?height=600&width=800".to_owned()),
    })
    .collect()
}

/// Demo shopper account seeded at startup when enabled.
pub const DEMO_USER_EMAIL: &str = "user@example.com";
/// Password for [`DEMO_USER_EMAIL`].
pub const DEMO_USER_PASSWORD: &str = "password123";
