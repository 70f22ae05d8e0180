//! Static, read-only product catalog.
//!
//! A [`Catalog`] is built once at start-up and shared by reference (or `Rc`)
//! with every other component. Nothing mutates it afterwards.

mod browse;
mod data;
mod rates;
mod recommend;

pub use browse::{CategoryFilter, PriceRange, categories, price_ranges};
pub use data::{QuizOption, QuizQuestion};
pub use rates::RateTable;

use rrd_api_types::{Bundle, Product, QuizAnswers, Review};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("duplicate product id '{0}'")]
    DuplicateProduct(String),
    #[error("product '{0}' has a non-positive price")]
    InvalidPrice(String),
    #[error("bundle '{bundle}' references unknown product '{product}'")]
    UnknownBundleMember { bundle: String, product: String },
    #[error("review for unknown product '{0}'")]
    UnknownReviewedProduct(String),
}

#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    reviews: HashMap<String, Vec<Review>>,
    bundles: Vec<Bundle>,
    quiz: Vec<QuizQuestion>,
    rates: RateTable,
}

impl Catalog {
    pub fn new(
        products: Vec<Product>,
        reviews: HashMap<String, Vec<Review>>,
        bundles: Vec<Bundle>,
        quiz: Vec<QuizQuestion>,
        rates: RateTable,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
            if product.price <= Decimal::ZERO {
                return Err(CatalogError::InvalidPrice(product.id.clone()));
            }
        }

        for bundle in &bundles {
            if let Some(missing) = bundle.products.iter().find(|id| !seen.contains(id.as_str())) {
                return Err(CatalogError::UnknownBundleMember {
                    bundle: bundle.id.clone(),
                    product: missing.clone(),
                });
            }
        }

        if let Some(id) = reviews.keys().find(|id| !seen.contains(id.as_str())) {
            return Err(CatalogError::UnknownReviewedProduct(id.clone()));
        }

        Ok(Self {
            products,
            reviews,
            bundles,
            quiz,
            rates,
        })
    }

    /// The RRD Collection line-up shipped with the storefront.
    pub fn rrd_collection() -> Result<Self, CatalogError> {
        let catalog = Self::new(
            data::products(),
            data::reviews(),
            data::bundles(),
            data::quiz_questions(),
            RateTable::standard(),
        )?;
        info!(
            products = catalog.products.len(),
            featured = catalog.featured().count(),
            currencies = ?catalog.rates.currencies(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn price_of(&self, id: &str) -> Option<Decimal> {
        self.product(id).map(|p| p.price)
    }

    pub fn featured(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.featured)
    }

    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    pub fn bundle(&self, id: &str) -> Option<&Bundle> {
        self.bundles.iter().find(|b| b.id == id)
    }

    pub fn quiz_questions(&self) -> &[QuizQuestion] {
        &self.quiz
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn reviews(&self, id: &str) -> &[Review] {
        self.reviews.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn reviews_count(&self, id: &str) -> usize {
        self.reviews(id).len()
    }

    /// Mean star rating rounded to one decimal; `0.0` when unreviewed.
    pub fn avg_rating(&self, id: &str) -> f64 {
        let reviews = self.reviews(id);
        if reviews.is_empty() {
            return 0.0;
        }
        let sum: u32 = reviews.iter().map(|r| u32::from(r.stars)).sum();
        let mean = f64::from(sum) / reviews.len() as f64;
        (mean * 10.0).round() / 10.0
    }

    /// Up to three recommendations for a finished quiz, in catalog order.
    pub fn recommend(&self, answers: &QuizAnswers) -> Vec<&Product> {
        recommend::recommend(&self.products, answers)
    }

    pub fn by_category(&self, filter: CategoryFilter) -> Vec<&Product> {
        browse::by_category(&self.products, filter)
    }

    pub fn by_price_range(&self, range: Option<&PriceRange>) -> Vec<&Product> {
        browse::by_price_range(&self.products, range)
    }

    /// Category filter intersected with an optional price range.
    pub fn filter(&self, category: CategoryFilter, range: Option<&PriceRange>) -> Vec<&Product> {
        browse::by_category(&self.products, category)
            .into_iter()
            .filter(|p| range.is_none_or(|r| r.contains(p.price)))
            .collect()
    }

    pub fn search(&self, query: &str) -> Vec<&Product> {
        browse::search(&self.products, query)
    }
}

/// Five-glyph star string for a rating, e.g. `4.5` → `★★★★☆`.
pub fn render_stars(rating: f64) -> String {
    let rating = rating.clamp(0.0, 5.0);
    let full = rating.floor() as usize;
    let mut out = "★".repeat(full);
    if rating - rating.floor() >= 0.5 {
        out.push('☆');
    }
    while out.chars().count() < 5 {
        out.push('☆');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rrd_api_types::{Category, Intensity};

    fn sample(id: &str, price: i64) -> Product {
        Product {
            id: id.into(),
            name: id.to_uppercase(),
            price: Decimal::from(price),
            size: "100 ml".into(),
            notes: vec!["Musk".into()],
            image: String::new(),
            image_webp: String::new(),
            description: String::new(),
            category: Category::Fresh,
            intensity: Intensity::Light,
            longevity: "6-8 hours".into(),
            featured: false,
        }
    }

    #[test]
    fn builtin_catalog_is_consistent() -> anyhow::Result<()> {
        let catalog = Catalog::rrd_collection()?;
        assert_eq!(catalog.products().len(), 8);
        assert_eq!(catalog.featured().count(), 4);
        assert_eq!(catalog.price_of("bol"), Some(Decimal::from(149)));
        assert_eq!(catalog.quiz_questions().len(), 3);
        assert!(catalog.bundle("fresh-duo").is_some());
        Ok(())
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Catalog::new(
            vec![sample("a", 10), sample("a", 12)],
            HashMap::new(),
            Vec::new(),
            Vec::new(),
            RateTable::standard(),
        )
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateProduct("a".into()));
    }

    #[test]
    fn rejects_non_positive_price() {
        let err = Catalog::new(
            vec![sample("a", 0)],
            HashMap::new(),
            Vec::new(),
            Vec::new(),
            RateTable::standard(),
        )
        .unwrap_err();
        assert_eq!(err, CatalogError::InvalidPrice("a".into()));
    }

    #[test]
    fn rejects_bundle_with_unknown_member() {
        let bundle = Bundle {
            id: "duo".into(),
            name: "Duo".into(),
            products: vec!["a".into(), "zz".into()],
            price: Decimal::from(15),
            savings: Decimal::from(5),
            description: String::new(),
        };
        let err = Catalog::new(
            vec![sample("a", 10)],
            HashMap::new(),
            vec![bundle],
            Vec::new(),
            RateTable::standard(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnknownBundleMember {
                bundle: "duo".into(),
                product: "zz".into()
            }
        );
    }

    #[test]
    fn average_rating_rounds_to_one_decimal() -> anyhow::Result<()> {
        let catalog = Catalog::rrd_collection()?;
        assert_eq!(catalog.avg_rating("bol"), 4.5);
        assert_eq!(catalog.avg_rating("mkz"), 4.0);
        assert_eq!(catalog.reviews_count("bol"), 2);
        assert_eq!(catalog.avg_rating("missing"), 0.0);
        Ok(())
    }

    #[test]
    fn stars_pad_to_five_glyphs() {
        assert_eq!(render_stars(5.0), "★★★★★");
        assert_eq!(render_stars(4.5), "★★★★☆");
        assert_eq!(render_stars(3.2), "★★★☆☆");
        assert_eq!(render_stars(0.0), "☆☆☆☆☆");
    }
}
