//! Order summary and checkout deep links.
//!
//! There is no payment step: checkout hands a human-readable order to a
//! WhatsApp chat or an email draft and an agent confirms it from there.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rrd_cart::CartStore;
use rrd_catalog::Catalog;
use rrd_currency::{CurrencyError, CurrencyService};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Characters left alone by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error(transparent)]
    Currency(#[from] CurrencyError),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutChannel {
    Whatsapp,
    Email,
}

impl CheckoutChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckoutChannel::Whatsapp => "whatsapp",
            CheckoutChannel::Email => "email",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CheckoutSettings {
    pub whatsapp_phone: String,
    pub sales_email: String,
    pub email_subject: String,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            whatsapp_phone: "971559938295".to_owned(),
            sales_email: "sales@rrd-collection.com".to_owned(),
            email_subject: "Order \u{2014} RRD Collection".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLink {
    pub channel: CheckoutChannel,
    pub url: String,
}

pub struct CheckoutComposer<'a> {
    catalog: &'a Catalog,
    cart: &'a CartStore,
    currency: &'a CurrencyService,
    settings: &'a CheckoutSettings,
}

impl<'a> CheckoutComposer<'a> {
    pub fn new(
        catalog: &'a Catalog,
        cart: &'a CartStore,
        currency: &'a CurrencyService,
        settings: &'a CheckoutSettings,
    ) -> Self {
        Self {
            catalog,
            cart,
            currency,
            settings,
        }
    }

    /// Plain-text order summary in the active currency.
    pub fn summary(&self) -> Result<String, CheckoutError> {
        let cart = self.cart.snapshot();
        if cart.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let code = self.currency.current();
        let mut out = String::from("RRD Collection Order\nItems:\n");
        for line in &cart.items {
            match self.catalog.product(&line.id) {
                Some(p) => out.push_str(&format!("- {} x{} \u{2014} {}\n", p.name, line.qty, p.size)),
                None => {
                    warn!("order line for unknown product '{}'", line.id);
                    out.push_str("- Unknown Product\n");
                }
            }
        }
        out.push('\n');

        if cart.gift_wrap {
            let fee = self
                .currency
                .convert_rounded(self.cart.settings().gift_wrap_fee, code)?;
            out.push_str(&format!("Gift\u{2011}wrap: YES (+{code} {fee:.2})\n"));
        }
        if !cart.gift_message.is_empty() {
            out.push_str(&format!("Gift message: {}\n", cart.gift_message));
        }
        out.push_str("Payment: COD / Prepaid (confirm with agent)\n");

        let subtotal = self
            .currency
            .convert_rounded(self.cart.total_of(&cart), code)?;
        out.push_str(&format!("Subtotal: {code} {subtotal:.2}\n"));
        out.push_str("Name:\nCity:\nNotes:");
        Ok(out)
    }

    /// `https://wa.me/<phone>?text=<summary>`; refuses an empty cart.
    pub fn whatsapp_link(&self) -> Result<CheckoutLink, CheckoutError> {
        let body = self.summary()?;
        let url = format!(
            "https://wa.me/{}?text={}",
            self.settings.whatsapp_phone,
            encode_component(&body)
        );
        info!(channel = "whatsapp", "checkout link composed");
        Ok(CheckoutLink {
            channel: CheckoutChannel::Whatsapp,
            url,
        })
    }

    /// `mailto:<address>?subject=<subject>&body=<summary>`; refuses an empty cart.
    pub fn email_link(&self) -> Result<CheckoutLink, CheckoutError> {
        let body = self.summary()?;
        let url = format!(
            "mailto:{}?subject={}&body={}",
            self.settings.sales_email,
            encode_component(&self.settings.email_subject),
            encode_component(&body)
        );
        info!(channel = "email", "checkout link composed");
        Ok(CheckoutLink {
            channel: CheckoutChannel::Email,
            url,
        })
    }

    pub fn link(&self, channel: CheckoutChannel) -> Result<CheckoutLink, CheckoutError> {
        match channel {
            CheckoutChannel::Whatsapp => self.whatsapp_link(),
            CheckoutChannel::Email => self.email_link(),
        }
    }
}

pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}
