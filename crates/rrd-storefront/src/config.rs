use rrd_api_types::Currency;
use rrd_cart::{CartSettings, GIFT_MESSAGE_LIMIT, MAX_QUANTITY};
use rrd_checkout::CheckoutSettings;
use rrd_newsletter::NewsletterSettings;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const GA_MEASUREMENT_ID: &str = "G-2GJXXCKDX8";

/// Storefront settings. Every field has a default, so an empty object (or no
/// config at all) yields the production storefront.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub default_currency: Currency,
    pub gift_wrap_fee: Decimal,
    pub max_quantity: u32,
    pub gift_message_limit: usize,
    pub checkout: CheckoutSettings,
    pub newsletter: NewsletterSettings,
    pub ga_measurement_id: String,
    pub log_level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_currency: Currency::Aed,
            gift_wrap_fee: Decimal::from(10),
            max_quantity: MAX_QUANTITY,
            gift_message_limit: GIFT_MESSAGE_LIMIT,
            checkout: CheckoutSettings::default(),
            newsletter: NewsletterSettings::default(),
            ga_measurement_id: GA_MEASUREMENT_ID.to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl StoreConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn cart_settings(&self) -> CartSettings {
        CartSettings {
            max_quantity: self.max_quantity.max(1),
            gift_wrap_fee: self.gift_wrap_fee,
            gift_message_limit: self.gift_message_limit,
            currency: self.default_currency,
        }
    }
}
