use rrd_api_types::{Bundle, Category, Intensity, Product, QuizDimension, Review};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizOption {
    pub id: String,
    pub text: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizQuestion {
    pub id: u8,
    pub dimension: QuizDimension,
    pub question: String,
    pub options: Vec<QuizOption>,
}

struct Row {
    id: &'static str,
    name: &'static str,
    price: i64,
    notes: [&'static str; 3],
    slug: &'static str,
    featured: bool,
    description: &'static str,
    category: Category,
    intensity: Intensity,
    longevity: &'static str,
}

const ROWS: &[Row] = &[
    Row {
        id: "bol",
        name: "Breath of Life",
        price: 149,
        notes: ["Citrus Zest", "Amberwood", "Musk"],
        slug: "breath-of-life",
        featured: true,
        description: "A clean, invigorating signature with a confident amber\u{2011}musk trail.",
        category: Category::Fresh,
        intensity: Intensity::Medium,
        longevity: "8-10 hours",
    },
    Row {
        id: "dvs",
        name: "Divine Sensation",
        price: 139,
        notes: ["Rose", "Raspberry", "Vanilla"],
        slug: "divine-sensation",
        featured: true,
        description: "Lush florals wrapped in gourmand warmth\u{2014}made for entrances.",
        category: Category::Floral,
        intensity: Intensity::Strong,
        longevity: "10-12 hours",
    },
    Row {
        id: "mkz",
        name: "Maka Zaii",
        price: 129,
        notes: ["Saffron", "Amber", "Tonka Bean"],
        slug: "maka-zaii",
        featured: false,
        description: "Golden, spicy\u{2011}amber radiance with plush depth.",
        category: Category::Oriental,
        intensity: Intensity::Strong,
        longevity: "9-11 hours",
    },
    Row {
        id: "amb",
        name: "Amber Mist",
        price: 129,
        notes: ["Amber", "Cedar", "Vanilla"],
        slug: "amber-mist",
        featured: false,
        description: "Soft amber with a creamy, elegant dry\u{2011}down.",
        category: Category::Oriental,
        intensity: Intensity::Medium,
        longevity: "7-9 hours",
    },
    Row {
        id: "msd",
        name: "Monsoon Desire",
        price: 135,
        notes: ["Jasmine", "Rain Accord", "Patchouli"],
        slug: "monsoon-desire",
        featured: true,
        description: "Dewy florals and a rainy sparkle\u{2014}fresh romance.",
        category: Category::Floral,
        intensity: Intensity::Medium,
        longevity: "8-10 hours",
    },
    Row {
        id: "ryl",
        name: "Royal Arrival",
        price: 145,
        notes: ["Saffron", "Rose", "Oud"],
        slug: "royal-arrival",
        featured: false,
        description: "Regal spice and rose over an opulent base.",
        category: Category::Oriental,
        intensity: Intensity::Strong,
        longevity: "10-12 hours",
    },
    Row {
        id: "vgo",
        name: "Virgin Gold Oud",
        price: 159,
        notes: ["Oud", "Labdanum", "Amber"],
        slug: "virgin-gold-oud",
        featured: true,
        description: "A smooth, luxurious oud with ambered gold warmth.",
        category: Category::Oriental,
        intensity: Intensity::Strong,
        longevity: "12-14 hours",
    },
    Row {
        id: "acf",
        name: "Acqua Di Fruity",
        price: 119,
        notes: ["Green Apple", "Bergamot", "Musk"],
        slug: "acqua-di-fruity",
        featured: false,
        description: "Crisp citrus and juicy fruit with a polished finish.",
        category: Category::Fresh,
        intensity: Intensity::Light,
        longevity: "6-8 hours",
    },
];

pub(crate) fn products() -> Vec<Product> {
    ROWS.iter()
        .map(|row| Product {
            id: row.id.to_owned(),
            name: row.name.to_owned(),
            price: Decimal::from(row.price),
            size: "100 ml".to_owned(),
            notes: row.notes.iter().map(|n| (*n).to_owned()).collect(),
            image: format!("assets/img/bottles/{}.png", row.slug),
            image_webp: format!("assets/img/bottles/{}.webp", row.slug),
            description: row.description.to_owned(),
            category: row.category,
            intensity: row.intensity,
            longevity: row.longevity.to_owned(),
            featured: row.featured,
        })
        .collect()
}

pub(crate) fn reviews() -> HashMap<String, Vec<Review>> {
    let table: &[(&str, &[(u8, &str)])] = &[
        (
            "bol",
            &[
                (5, "Crisp and uplifting, lasts all day"),
                (4, "Clean\u{2011}fresh with a nice amber finish"),
            ],
        ),
        (
            "dvs",
            &[(5, "Date\u{2011}night perfection"), (4, "Gourmand but elegant")],
        ),
        ("mkz", &[(4, "Warm, spicy and cozy")]),
        ("amb", &[(4, "Smooth amber, very wearable")]),
        ("msd", &[(5, "Rainy\u{2011}fresh and romantic")]),
        ("ryl", &[(5, "Regal oud\u{2011}rose vibe")]),
        ("vgo", &[(5, "Luxurious oud without harshness")]),
        ("acf", &[(4, "Citrus\u{2011}fruity compliment magnet")]),
    ];

    table
        .iter()
        .map(|(id, rows)| {
            let reviews = rows
                .iter()
                .map(|(stars, text)| Review {
                    stars: *stars,
                    text: (*text).to_owned(),
                })
                .collect();
            ((*id).to_owned(), reviews)
        })
        .collect()
}

pub(crate) fn bundles() -> Vec<Bundle> {
    let bundle = |id: &str, name: &str, products: [&str; 2], price: i64, savings: i64, description: &str| Bundle {
        id: id.to_owned(),
        name: name.to_owned(),
        products: products.iter().map(|p| (*p).to_owned()).collect(),
        price: Decimal::from(price),
        savings: Decimal::from(savings),
        description: description.to_owned(),
    };

    vec![
        bundle(
            "fresh-duo",
            "Fresh & Clean Duo",
            ["bol", "acf"],
            249,
            19,
            "Perfect for daily wear - crisp citrus meets clean amber",
        ),
        bundle(
            "romance-duo",
            "Romance Collection",
            ["dvs", "msd"],
            259,
            15,
            "Floral romance for special occasions",
        ),
        bundle(
            "luxury-duo",
            "Luxury Oriental Duo",
            ["vgo", "ryl"],
            289,
            15,
            "Opulent oud and regal rose for unforgettable moments",
        ),
    ]
}

pub(crate) fn quiz_questions() -> Vec<QuizQuestion> {
    let option = |id: &str, text: &str, description: &str| QuizOption {
        id: id.to_owned(),
        text: text.to_owned(),
        description: description.to_owned(),
    };

    vec![
        QuizQuestion {
            id: 1,
            dimension: QuizDimension::Intensity,
            question: "What's your preferred scent intensity?".to_owned(),
            options: vec![
                option("light", "Light & Subtle", "Gentle, close-to-skin fragrances"),
                option(
                    "medium",
                    "Balanced",
                    "Moderate projection, noticeable but not overwhelming",
                ),
                option("strong", "Bold & Memorable", "Strong presence, makes an entrance"),
            ],
        },
        QuizQuestion {
            id: 2,
            dimension: QuizDimension::Occasion,
            question: "When do you plan to wear this fragrance?".to_owned(),
            options: vec![
                option("daily", "Daily Wear", "Office, casual outings, everyday use"),
                option(
                    "evening",
                    "Evening & Events",
                    "Dinner dates, parties, special occasions",
                ),
                option("both", "Versatile", "Works for both day and evening"),
            ],
        },
        QuizQuestion {
            id: 3,
            dimension: QuizDimension::Family,
            question: "What's your preferred fragrance family?".to_owned(),
            options: vec![
                option("fresh", "Fresh & Clean", "Citrus, aquatic, clean notes"),
                option("floral", "Floral & Romantic", "Rose, jasmine, romantic blooms"),
                option("oriental", "Oriental & Spicy", "Amber, oud, warm spices"),
            ],
        },
    ]
}
