//! Active display currency and price formatting.
//!
//! Canonical prices live in the rate table's reference currency. The active
//! currency code is persisted under [`CURRENCY_KEY`] and read through on every
//! call, so a change made elsewhere is picked up on the next render.

use rrd_api_types::Currency;
use rrd_catalog::RateTable;
use rrd_events::{Notifier, SubscriptionId};
use rrd_storage::{CURRENCY_KEY, KeyValueStore, StorageError};
use rust_decimal::{Decimal, RoundingStrategy};
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum CurrencyError {
    #[error("unsupported currency '{0}'")]
    Unsupported(String),
    #[error("failed to persist currency: {0}")]
    Persist(#[from] StorageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyEvent {
    Changed { currency: Currency },
}

pub struct CurrencyService {
    rates: RateTable,
    storage: Rc<dyn KeyValueStore>,
    default_currency: Currency,
    notifier: Notifier<CurrencyEvent>,
}

impl CurrencyService {
    pub fn new(
        rates: RateTable,
        storage: Rc<dyn KeyValueStore>,
        default_currency: Currency,
    ) -> Result<Self, CurrencyError> {
        if !rates.supports(default_currency) {
            return Err(CurrencyError::Unsupported(default_currency.code().to_owned()));
        }
        Ok(Self {
            rates,
            storage,
            default_currency,
            notifier: Notifier::new(),
        })
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn supported(&self) -> Vec<Currency> {
        self.rates.currencies()
    }

    /// Persisted currency if it is readable and supported, else the default.
    pub fn current(&self) -> Currency {
        let raw = match self.storage.get(CURRENCY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return self.default_currency,
            Err(err) => {
                warn!("failed to read active currency: {}", err);
                return self.default_currency;
            }
        };

        match raw.parse::<Currency>() {
            Ok(currency) if self.rates.supports(currency) => currency,
            _ => {
                warn!("ignoring unsupported stored currency '{}'", raw);
                self.default_currency
            }
        }
    }

    /// Validate, persist and announce a new active currency.
    pub fn set_currency(&self, code: &str) -> Result<Currency, CurrencyError> {
        let currency = code
            .parse::<Currency>()
            .ok()
            .filter(|c| self.rates.supports(*c))
            .ok_or_else(|| {
                warn!("rejecting unsupported currency '{}'", code);
                CurrencyError::Unsupported(code.to_owned())
            })?;

        self.storage.set(CURRENCY_KEY, currency.code())?;
        debug!("active currency set to {}", currency);
        self.notifier.emit(&CurrencyEvent::Changed { currency });
        Ok(currency)
    }

    /// `amount * rate[target] / rate[reference]`.
    pub fn convert(&self, amount: Decimal, target: Currency) -> Result<Decimal, CurrencyError> {
        let to = self
            .rates
            .rate(target)
            .ok_or_else(|| CurrencyError::Unsupported(target.code().to_owned()))?;
        let reference = self.rates.reference();
        let from = self
            .rates
            .rate(reference)
            .ok_or_else(|| CurrencyError::Unsupported(reference.code().to_owned()))?;
        Ok(amount * to / from)
    }

    /// Converted amount rounded to two places, half away from zero.
    pub fn convert_rounded(&self, amount: Decimal, target: Currency) -> Result<Decimal, CurrencyError> {
        Ok(self
            .convert(amount, target)?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// `"<symbol> <amount to two places>"`, e.g. `"$ 40.23"`.
    pub fn format(&self, amount: Decimal, target: Currency) -> Result<String, CurrencyError> {
        let value = self.convert_rounded(amount, target)?;
        let symbol = self.rates.symbol(target).unwrap_or(target.code());
        Ok(format!("{symbol} {value:.2}"))
    }

    /// Formats in the active currency.
    pub fn display(&self, amount: Decimal) -> String {
        let currency = self.current();
        self.format(amount, currency).unwrap_or_else(|err| {
            warn!("falling back to reference formatting: {}", err);
            format!("{} {:.2}", self.rates.reference(), amount)
        })
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&CurrencyEvent) + 'static,
    {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }
}
