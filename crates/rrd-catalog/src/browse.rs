use rrd_api_types::{Category, Product};
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Featured,
    Family(Category),
}

impl CategoryFilter {
    pub fn id(self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Featured => "featured",
            CategoryFilter::Family(c) => c.as_str(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "All Fragrances",
            CategoryFilter::Featured => "Featured",
            CategoryFilter::Family(Category::Fresh) => "Fresh & Clean",
            CategoryFilter::Family(Category::Floral) => "Floral & Romantic",
            CategoryFilter::Family(Category::Oriental) => "Oriental & Spicy",
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = rrd_api_types::ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(CategoryFilter::All),
            "featured" => Ok(CategoryFilter::Featured),
            other => other.parse().map(CategoryFilter::Family),
        }
    }
}

pub fn categories() -> [CategoryFilter; 5] {
    [
        CategoryFilter::All,
        CategoryFilter::Featured,
        CategoryFilter::Family(Category::Fresh),
        CategoryFilter::Family(Category::Floral),
        CategoryFilter::Family(Category::Oriental),
    ]
}

/// Inclusive price band in the reference currency.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRange {
    pub id: &'static str,
    pub name: &'static str,
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && price <= self.max
    }

    /// Looks up a band by id. `"all"` and unknown ids both mean no band.
    pub fn by_id(id: &str) -> Option<PriceRange> {
        price_ranges().into_iter().find(|r| r.id == id)
    }
}

pub fn price_ranges() -> Vec<PriceRange> {
    let range = |id: &'static str, name: &'static str, min: i64, max: i64| PriceRange {
        id,
        name,
        min: Decimal::from(min),
        max: Decimal::from(max),
    };
    vec![
        range("100-130", "AED 100 - 130", 100, 130),
        range("130-150", "AED 130 - 150", 130, 150),
        range("150+", "AED 150+", 150, 999),
    ]
}

pub(crate) fn by_category(products: &[Product], filter: CategoryFilter) -> Vec<&Product> {
    products
        .iter()
        .filter(|p| match filter {
            CategoryFilter::All => true,
            CategoryFilter::Featured => p.featured,
            CategoryFilter::Family(category) => p.category == category,
        })
        .collect()
}

pub(crate) fn by_price_range<'a>(products: &'a [Product], range: Option<&PriceRange>) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| range.is_none_or(|r| r.contains(p.price)))
        .collect()
}

/// Case-insensitive substring match over name and notes. A blank query
/// matches everything.
pub(crate) fn search<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.iter().collect();
    }
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.notes.iter().any(|n| n.to_lowercase().contains(&needle))
        })
        .collect()
}
