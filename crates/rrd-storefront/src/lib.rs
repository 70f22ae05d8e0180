//! Composition root for the storefront.
//!
//! `Storefront` owns the catalog, currency, cart and analytics sink and turns
//! every user action into at most one [`Notice`]. Nothing here panics or
//! propagates a failure past the notice: a failed action is a no-op plus a
//! message.

use rrd_analytics::{AnalyticsEvent, AnalyticsSink};
use rrd_api_types::{Product, QuizAnswers};
use rrd_cart::{CartError, CartStore};
use rrd_catalog::{Catalog, CatalogError};
use rrd_checkout::{CheckoutChannel, CheckoutComposer, CheckoutError, CheckoutLink};
use rrd_currency::{CurrencyError, CurrencyService};
use rrd_storage::KeyValueStore;
use std::rc::Rc;
use thiserror::Error;
use tracing::{info, warn};

mod config;

pub use config::{GA_MEASUREMENT_ID, StoreConfig};

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("currency: {0}")]
    Currency(#[from] CurrencyError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

impl NoticeKind {
    /// CSS modifier used by the toast.
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeKind::Info => "info",
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }
}

/// Short user-facing message, shown as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NoticeKind::Info,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NoticeKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NoticeKind::Error,
        }
    }
}

pub struct Storefront {
    config: StoreConfig,
    catalog: Rc<Catalog>,
    currency: CurrencyService,
    cart: CartStore,
    analytics: Rc<dyn AnalyticsSink>,
}

impl Storefront {
    pub fn new(
        config: StoreConfig,
        catalog: Rc<Catalog>,
        storage: Rc<dyn KeyValueStore>,
        analytics: Rc<dyn AnalyticsSink>,
    ) -> Result<Self, StorefrontError> {
        let currency = CurrencyService::new(
            catalog.rates().clone(),
            Rc::clone(&storage),
            config.default_currency,
        )?;
        let cart = CartStore::new(Rc::clone(&catalog), storage, config.cart_settings());
        cart.set_currency_snapshot(currency.current());
        Ok(Self {
            config,
            catalog,
            currency,
            cart,
            analytics,
        })
    }

    /// The RRD Collection catalog over the given storage.
    pub fn open(
        config: StoreConfig,
        storage: Rc<dyn KeyValueStore>,
        analytics: Rc<dyn AnalyticsSink>,
    ) -> Result<Self, StorefrontError> {
        let catalog = Rc::new(Catalog::rrd_collection()?);
        let store = Self::new(config, catalog, storage, analytics)?;
        info!(
            products = store.catalog.products().len(),
            featured = store.catalog.featured().count(),
            currencies = ?store.currency.supported(),
            default_currency = %store.config.default_currency,
            "storefront ready"
        );
        Ok(store)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Rc<Catalog> {
        &self.catalog
    }

    pub fn currency(&self) -> &CurrencyService {
        &self.currency
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn track(&self, event: &AnalyticsEvent) {
        self.analytics.track(event);
    }

    pub fn page_view(&self, page_title: &str, page_location: &str) {
        self.track(&AnalyticsEvent::PageView {
            page_title: page_title.to_owned(),
            page_location: page_location.to_owned(),
        });
    }

    /// Returns the product for the detail view and records the view.
    pub fn view_product(&self, product_id: &str) -> Option<&Product> {
        let Some(product) = self.catalog.product(product_id) else {
            warn!("view_product: unknown product '{}'", product_id);
            return None;
        };
        self.track(&AnalyticsEvent::view_item(&self.catalog, product));
        Some(product)
    }

    pub fn add_to_cart(&self, product_id: &str, qty: u32) -> Option<Notice> {
        match self.cart.add_line(product_id, qty) {
            Ok(_) => {
                if let Some(product) = self.catalog.product(product_id.trim()) {
                    self.track(&AnalyticsEvent::add_to_cart(&self.catalog, product, qty.max(1)));
                }
                self.report_cart();
                Some(Notice::info("Added to cart"))
            }
            Err(err) => cart_failure(err, "Error adding to cart"),
        }
    }

    pub fn remove_from_cart(&self, product_id: &str) -> Option<Notice> {
        match self.cart.remove_line(product_id) {
            Ok(()) => {
                self.report_cart();
                None
            }
            Err(err) => cart_failure(err, "Error removing from cart"),
        }
    }

    pub fn set_quantity(&self, product_id: &str, qty: i64) -> Option<Notice> {
        match self.cart.set_quantity(product_id, qty) {
            Ok(true) => {
                self.report_cart();
                None
            }
            Ok(false) => None,
            Err(err) => cart_failure(err, "Error updating quantity"),
        }
    }

    pub fn set_gift_wrap(&self, enabled: bool) -> Option<Notice> {
        match self.cart.set_gift_wrap(enabled) {
            Ok(()) => {
                self.report_cart();
                None
            }
            Err(err) => cart_failure(err, "Error saving cart"),
        }
    }

    pub fn set_gift_message(&self, message: &str) -> Option<Notice> {
        match self.cart.set_gift_message(message) {
            Ok(()) => {
                self.report_cart();
                None
            }
            Err(err) => cart_failure(err, "Error saving cart"),
        }
    }

    /// Add one of each bundle member. Unknown bundle ids are ignored.
    pub fn add_bundle(&self, bundle_id: &str) -> Option<Notice> {
        let Some(bundle) = self.catalog.bundle(bundle_id) else {
            warn!("add_bundle: unknown bundle '{}'", bundle_id);
            return None;
        };
        for member in &bundle.products {
            if let Err(err) = self.cart.add_line(member, 1) {
                return cart_failure(err, "Error adding to cart");
            }
            if let Some(product) = self.catalog.product(member) {
                self.track(&AnalyticsEvent::add_to_cart(&self.catalog, product, 1));
            }
        }
        self.report_cart();
        Some(Notice::success(format!("Added {} to cart!", bundle.name)))
    }

    pub fn set_currency(&self, code: &str) -> Option<Notice> {
        match self.currency.set_currency(code) {
            Ok(currency) => {
                self.cart.set_currency_snapshot(currency);
                self.track(&AnalyticsEvent::CurrencyChange { currency });
                None
            }
            Err(CurrencyError::Unsupported(code)) => {
                Some(Notice::error(format!("Currency {code} is not supported")))
            }
            Err(err) => {
                warn!("currency not saved: {}", err);
                Some(Notice::error("Error saving currency"))
            }
        }
    }

    /// Deep link for the chosen channel, or the notice to show instead.
    pub fn checkout(&self, channel: CheckoutChannel) -> Result<CheckoutLink, Notice> {
        let composer = CheckoutComposer::new(&self.catalog, &self.cart, &self.currency, &self.config.checkout);
        match composer.link(channel) {
            Ok(link) => {
                self.track(&AnalyticsEvent::begin_checkout(
                    &self.catalog,
                    &self.cart.snapshot(),
                    channel.as_str(),
                ));
                Ok(link)
            }
            Err(CheckoutError::EmptyCart) => Err(Notice::error("Cart is empty")),
            Err(err) => {
                warn!("checkout failed: {}", err);
                Err(Notice::error("Error during checkout"))
            }
        }
    }

    /// Records outbound navigation to a WhatsApp chat.
    pub fn outbound_click(&self, href: &str) {
        if href.contains("wa.me") {
            self.track(&AnalyticsEvent::WhatsappClick);
        }
    }

    pub fn quiz_completed(&self, answers: &QuizAnswers) {
        self.track(&AnalyticsEvent::QuizCompletion { answers: *answers });
    }

    pub fn newsletter_signed_up(&self) {
        self.track(&AnalyticsEvent::NewsletterSignup);
    }

    fn report_cart(&self) {
        if let Some(event) = AnalyticsEvent::cart_update(&self.catalog, &self.cart.snapshot()) {
            self.track(&event);
        }
    }
}

/// Input mistakes are logged by the cart and stay silent; persistence
/// failures surface as `message`.
fn cart_failure(err: CartError, message: &str) -> Option<Notice> {
    match err {
        CartError::MissingProductId | CartError::UnknownProduct(_) => None,
        CartError::Persist(err) => {
            warn!("{}: {}", message, err);
            Some(Notice::error(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rrd_analytics::RecordingSink;
    use rrd_api_types::{Currency, Intensity};
    use rrd_storage::InMemoryStore;
    use rust_decimal::Decimal;

    struct Fixture {
        store: Storefront,
        sink: Rc<RecordingSink>,
    }

    fn fixture_with(storage: Rc<dyn KeyValueStore>) -> Fixture {
        let sink = Rc::new(RecordingSink::new());
        let store = Storefront::open(StoreConfig::default(), storage, sink.clone())
            .expect("default storefront opens");
        Fixture { store, sink }
    }

    fn fixture() -> Fixture {
        fixture_with(Rc::new(InMemoryStore::new()))
    }

    #[test]
    fn add_to_cart_confirms_and_tracks() {
        let fx = fixture();
        assert_eq!(fx.store.add_to_cart("bol", 2), Some(Notice::info("Added to cart")));
        assert_eq!(fx.store.cart().total(), Decimal::from(298));
        assert_eq!(fx.sink.names(), vec!["add_to_cart", "cart_update"]);
    }

    #[test]
    fn invalid_product_is_silent_noop() {
        let fx = fixture();
        assert_eq!(fx.store.add_to_cart("", 1), None);
        assert_eq!(fx.store.add_to_cart("nope", 1), None);
        assert!(fx.store.cart().is_empty());
        assert!(fx.sink.events().is_empty());
    }

    #[test]
    fn full_storage_surfaces_error_notice() {
        let fx = fixture_with(Rc::new(InMemoryStore::with_quota(8)));
        assert_eq!(fx.store.add_to_cart("bol", 1), Some(Notice::error("Error adding to cart")));
        assert!(fx.store.cart().is_empty());
    }

    struct ReadsFailAfterSetup {
        inner: InMemoryStore,
        fail: std::cell::Cell<bool>,
    }

    impl KeyValueStore for ReadsFailAfterSetup {
        fn get(&self, key: &str) -> Result<Option<String>, rrd_storage::StorageError> {
            if self.fail.get() {
                return Err(rrd_storage::StorageError::Backend("read refused".into()));
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), rrd_storage::StorageError> {
            self.inner.set(key, value)
        }
    }

    #[test]
    fn unreadable_cart_is_not_overwritten_by_add() {
        let storage = Rc::new(ReadsFailAfterSetup {
            inner: InMemoryStore::new(),
            fail: std::cell::Cell::new(false),
        });
        let fx = fixture_with(storage.clone());
        fx.store.add_to_cart("bol", 3);
        fx.store.add_to_cart("vgo", 2);
        fx.store.set_gift_wrap(true);
        let before = storage.inner.raw(rrd_storage::CART_KEY);

        storage.fail.set(true);
        assert_eq!(fx.store.add_to_cart("acf", 1), Some(Notice::error("Error adding to cart")));
        storage.fail.set(false);

        assert_eq!(storage.inner.raw(rrd_storage::CART_KEY), before);
        assert_eq!(fx.store.cart().count(), 5);
    }

    #[test]
    fn bundle_adds_each_member_once() {
        let fx = fixture();
        let notice = fx.store.add_bundle("fresh-duo").expect("notice");
        assert_eq!(notice.kind, NoticeKind::Success);
        assert!(notice.message.starts_with("Added "));
        assert!(notice.message.ends_with(" to cart!"));

        let bundle = fx.store.catalog().bundle("fresh-duo").expect("bundle");
        assert_eq!(fx.store.cart().count() as usize, bundle.products.len());
        assert_eq!(fx.store.add_bundle("missing"), None);

        let mut expected = vec!["add_to_cart"; bundle.products.len()];
        expected.push("cart_update");
        assert_eq!(fx.sink.names(), expected);
    }

    #[test]
    fn gift_message_reports_cart_update() {
        let fx = fixture();
        fx.store.add_to_cart("bol", 1);
        assert_eq!(fx.store.set_gift_message("Happy birthday"), None);
        assert_eq!(fx.sink.names().last(), Some(&"cart_update"));
        assert_eq!(fx.sink.names().len(), 3);
    }

    #[test]
    fn new_cart_snapshots_the_chosen_currency() -> anyhow::Result<()> {
        let storage = Rc::new(InMemoryStore::new());
        let fx = fixture_with(storage.clone());
        assert_eq!(fx.store.set_currency("USD"), None);
        fx.store.add_to_cart("bol", 1);

        let raw = storage.raw(rrd_storage::CART_KEY).expect("cart written");
        let json: serde_json::Value = serde_json::from_str(&raw)?;
        assert_eq!(json["currency"], "USD");
        Ok(())
    }

    #[test]
    fn empty_checkout_is_refused_with_notice() {
        let fx = fixture();
        let err = fx.store.checkout(CheckoutChannel::Whatsapp).unwrap_err();
        assert_eq!(err, Notice::error("Cart is empty"));
        assert!(!fx.sink.names().contains(&"begin_checkout"));
    }

    #[test]
    fn checkout_tracks_begin_checkout() -> anyhow::Result<()> {
        let fx = fixture();
        fx.store.add_to_cart("vgo", 1);
        let link = fx
            .store
            .checkout(CheckoutChannel::Email)
            .map_err(|n| anyhow::anyhow!(n.message))?;
        assert!(link.url.starts_with("mailto:sales@rrd-collection.com"));
        assert_eq!(fx.sink.names().last(), Some(&"begin_checkout"));
        Ok(())
    }

    #[test]
    fn currency_switch_tracks_and_rejects_unknown() {
        let fx = fixture();
        assert_eq!(fx.store.set_currency("INR"), None);
        assert_eq!(fx.store.currency().current(), Currency::Inr);
        assert_eq!(fx.sink.names(), vec!["currency_change"]);

        let notice = fx.store.set_currency("EUR").expect("rejected");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(fx.store.currency().current(), Currency::Inr);
    }

    #[test]
    fn view_product_records_view_item() {
        let fx = fixture();
        assert!(fx.store.view_product("dvs").is_some());
        assert!(fx.store.view_product("zzz").is_none());
        assert_eq!(fx.sink.names(), vec!["view_item"]);
    }

    #[test]
    fn outbound_clicks_only_count_whatsapp() {
        let fx = fixture();
        fx.store.outbound_click("https://instagram.com/rrd");
        fx.store.outbound_click("https://wa.me/971559938295");
        assert_eq!(fx.sink.names(), vec!["whatsapp_click"]);
    }

    #[test]
    fn quiz_and_newsletter_events() {
        let fx = fixture();
        fx.store.quiz_completed(&QuizAnswers {
            intensity: Some(Intensity::Light),
            ..QuizAnswers::default()
        });
        fx.store.newsletter_signed_up();
        assert_eq!(fx.sink.names(), vec!["quiz_completion", "newsletter_signup"]);
    }

    #[test]
    fn unsupported_default_currency_fails_to_open() {
        let config = StoreConfig {
            default_currency: Currency::Usd,
            ..StoreConfig::default()
        };
        let catalog = Rc::new(Catalog::rrd_collection().expect("valid catalog"));
        let rates = rrd_catalog::RateTable::new(Currency::Aed, vec![(Currency::Aed, Decimal::ONE, "AED")]);
        let catalog = Rc::new(
            Catalog::new(
                catalog.products().to_vec(),
                std::collections::HashMap::new(),
                Vec::new(),
                Vec::new(),
                rates,
            )
            .expect("valid catalog"),
        );
        let result = Storefront::new(
            config,
            catalog,
            Rc::new(InMemoryStore::new()),
            Rc::new(RecordingSink::new()),
        );
        assert!(matches!(result, Err(StorefrontError::Currency(_))));
    }
}
