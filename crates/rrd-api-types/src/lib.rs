use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct ParseTagError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseTagError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Aed,
    Inr,
    Usd,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Aed => "AED",
            Currency::Inr => "INR",
            Currency::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AED" => Ok(Currency::Aed),
            "INR" => Ok(Currency::Inr),
            "USD" => Ok(Currency::Usd),
            _ => Err(ParseTagError::new("currency", s)),
        }
    }
}

/// Fragrance family. Doubles as the quiz "family" answer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Fresh,
    Floral,
    Oriental,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Fresh => "fresh",
            Category::Floral => "floral",
            Category::Oriental => "oriental",
        }
    }
}

impl FromStr for Category {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fresh" => Ok(Category::Fresh),
            "floral" => Ok(Category::Floral),
            "oriental" => Ok(Category::Oriental),
            _ => Err(ParseTagError::new("category", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Light,
    Medium,
    Strong,
}

impl Intensity {
    pub fn as_str(self) -> &'static str {
        match self {
            Intensity::Light => "light",
            Intensity::Medium => "medium",
            Intensity::Strong => "strong",
        }
    }
}

impl FromStr for Intensity {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Intensity::Light),
            "medium" => Ok(Intensity::Medium),
            "strong" => Ok(Intensity::Strong),
            _ => Err(ParseTagError::new("intensity", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Occasion {
    Daily,
    Evening,
    Both,
}

impl Occasion {
    pub fn as_str(self) -> &'static str {
        match self {
            Occasion::Daily => "daily",
            Occasion::Evening => "evening",
            Occasion::Both => "both",
        }
    }
}

impl FromStr for Occasion {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Occasion::Daily),
            "evening" => Ok(Occasion::Evening),
            "both" => Ok(Occasion::Both),
            _ => Err(ParseTagError::new("occasion", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Canonical price in the reference currency (AED).
    pub price: Decimal,
    pub size: String,
    pub notes: Vec<String>,
    pub image: String,
    pub image_webp: String,
    pub description: String,
    pub category: Category,
    pub intensity: Intensity,
    pub longevity: String,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    pub stars: u8,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bundle {
    pub id: String,
    pub name: String,
    pub products: Vec<String>,
    pub price: Decimal,
    pub savings: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    pub id: String,
    pub qty: u32,
}

/// On-disk layout of the cart entry in client storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCart {
    #[serde(default)]
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub gift_wrap: bool,
    #[serde(default)]
    pub gift_message: String,
}

impl PersistedCart {
    pub fn empty(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            currency: currency.code().to_owned(),
            gift_wrap: false,
            gift_message: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuizDimension {
    Intensity,
    Occasion,
    Family,
}

/// Recorded quiz answers. `None` means "no preference" and skips that filter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizAnswers {
    pub intensity: Option<Intensity>,
    pub occasion: Option<Occasion>,
    pub family: Option<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsletterSignup {
    pub email: String,
    pub source: String,
    pub timestamp: String,
}
