//! Analytics events and their gtag encoding.
//!
//! Tracking is fire-and-forget: sinks never return errors and callers never
//! wait on them.

use rrd_api_types::{Currency, PersistedCart, Product, QuizAnswers};
use rrd_catalog::Catalog;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::{Value, json};
use std::cell::RefCell;
use tracing::debug;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalyticsItem {
    pub item_id: String,
    pub item_name: String,
    pub item_category: String,
    pub price: f64,
    pub quantity: u32,
}

impl AnalyticsItem {
    fn of(product: &Product, quantity: u32) -> Self {
        Self {
            item_id: product.id.clone(),
            item_name: product.name.clone(),
            item_category: product.category.as_str().to_owned(),
            price: to_number(product.price),
            quantity,
        }
    }

    fn unknown(id: &str, quantity: u32) -> Self {
        Self {
            item_id: id.to_owned(),
            item_name: "Unknown Product".to_owned(),
            item_category: "Unknown".to_owned(),
            price: 0.0,
            quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsEvent {
    PageView {
        page_title: String,
        page_location: String,
    },
    CurrencyChange {
        currency: Currency,
    },
    CartUpdate {
        items: Vec<AnalyticsItem>,
        value: f64,
    },
    ViewItem {
        currency: Currency,
        item: AnalyticsItem,
    },
    AddToCart {
        currency: Currency,
        item: AnalyticsItem,
    },
    BeginCheckout {
        currency: Currency,
        items: Vec<AnalyticsItem>,
        value: f64,
        method: String,
    },
    QuizCompletion {
        answers: QuizAnswers,
    },
    NewsletterSignup,
    WhatsappClick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GtagCommand {
    Config,
    Event,
}

impl GtagCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            GtagCommand::Config => "config",
            GtagCommand::Event => "event",
        }
    }
}

/// Arguments for one `gtag(command, target, params)` call.
#[derive(Debug, Clone, PartialEq)]
pub struct GtagCall {
    pub command: GtagCommand,
    pub target: String,
    pub params: Value,
}

impl AnalyticsEvent {
    pub fn view_item(catalog: &Catalog, product: &Product) -> Self {
        AnalyticsEvent::ViewItem {
            currency: catalog.rates().reference(),
            item: AnalyticsItem::of(product, 1),
        }
    }

    pub fn add_to_cart(catalog: &Catalog, product: &Product, quantity: u32) -> Self {
        AnalyticsEvent::AddToCart {
            currency: catalog.rates().reference(),
            item: AnalyticsItem::of(product, quantity),
        }
    }

    /// `None` for an empty cart; nothing is reported then.
    pub fn cart_update(catalog: &Catalog, cart: &PersistedCart) -> Option<Self> {
        if cart.items.is_empty() {
            debug!("cart is empty, no cart_update");
            return None;
        }
        let (items, value) = cart_items(catalog, cart);
        Some(AnalyticsEvent::CartUpdate { items, value })
    }

    pub fn begin_checkout(catalog: &Catalog, cart: &PersistedCart, method: &str) -> Self {
        let (items, value) = cart_items(catalog, cart);
        AnalyticsEvent::BeginCheckout {
            currency: catalog.rates().reference(),
            items,
            value,
            method: method.to_owned(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::PageView { .. } => "page_view",
            AnalyticsEvent::CurrencyChange { .. } => "currency_change",
            AnalyticsEvent::CartUpdate { .. } => "cart_update",
            AnalyticsEvent::ViewItem { .. } => "view_item",
            AnalyticsEvent::AddToCart { .. } => "add_to_cart",
            AnalyticsEvent::BeginCheckout { .. } => "begin_checkout",
            AnalyticsEvent::QuizCompletion { .. } => "quiz_completion",
            AnalyticsEvent::NewsletterSignup => "newsletter_signup",
            AnalyticsEvent::WhatsappClick => "whatsapp_click",
        }
    }

    /// Page views go out as the `config` call for the measurement id; every
    /// other event is a named `event` call.
    pub fn to_gtag(&self, measurement_id: &str) -> GtagCall {
        let params = match self {
            AnalyticsEvent::PageView {
                page_title,
                page_location,
            } => {
                return GtagCall {
                    command: GtagCommand::Config,
                    target: measurement_id.to_owned(),
                    params: json!({
                        "page_title": page_title,
                        "page_location": page_location,
                        "custom_map": {
                            "custom_dimension_1": "user_type",
                            "custom_dimension_2": "currency",
                        },
                    }),
                };
            }
            AnalyticsEvent::CurrencyChange { currency } => {
                json!({ "currency": currency.code(), "value": 1 })
            }
            AnalyticsEvent::CartUpdate { items, value } => json!({ "items": items, "value": value }),
            AnalyticsEvent::ViewItem { currency, item } | AnalyticsEvent::AddToCart { currency, item } => {
                json!({
                    "currency": currency.code(),
                    "value": item.price * f64::from(item.quantity),
                    "items": [item],
                })
            }
            AnalyticsEvent::BeginCheckout {
                currency,
                items,
                value,
                method,
            } => json!({
                "currency": currency.code(),
                "value": value,
                "items": items,
                "checkout_option": method,
            }),
            AnalyticsEvent::QuizCompletion { answers } => json!({
                "quiz_name": "scent_finder",
                "answers": {
                    "intensity": answers.intensity.map_or("all", |v| v.as_str()),
                    "occasion": answers.occasion.map_or("all", |v| v.as_str()),
                    "family": answers.family.map_or("all", |v| v.as_str()),
                },
                "value": 1,
            }),
            AnalyticsEvent::NewsletterSignup | AnalyticsEvent::WhatsappClick => {
                json!({ "method": "website", "value": 1 })
            }
        };

        GtagCall {
            command: GtagCommand::Event,
            target: self.name().to_owned(),
            params,
        }
    }
}

fn cart_items(catalog: &Catalog, cart: &PersistedCart) -> (Vec<AnalyticsItem>, f64) {
    let mut value = Decimal::ZERO;
    let items = cart
        .items
        .iter()
        .map(|line| match catalog.product(&line.id) {
            Some(product) => {
                value += product.price * Decimal::from(line.qty);
                AnalyticsItem::of(product, line.qty)
            }
            None => AnalyticsItem::unknown(&line.id, line.qty),
        })
        .collect();
    (items, to_number(value))
}

fn to_number(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}

pub trait AnalyticsSink {
    fn track(&self, event: &AnalyticsEvent);
}

/// Keeps every event in memory.
#[derive(Default)]
pub struct RecordingSink {
    events: RefCell<Vec<AnalyticsEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.borrow().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(AnalyticsEvent::name).collect()
    }
}

impl AnalyticsSink for RecordingSink {
    fn track(&self, event: &AnalyticsEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
