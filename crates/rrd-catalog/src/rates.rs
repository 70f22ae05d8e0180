use rrd_api_types::Currency;
use rust_decimal::Decimal;

/// Static conversion table relative to the reference currency.
///
/// There is no live-update mechanism; rates are fixed at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    reference: Currency,
    entries: Vec<(Currency, Decimal, &'static str)>,
}

impl RateTable {
    /// AED-referenced approximations: AED 1, INR 22.6, USD 0.27.
    pub fn standard() -> Self {
        Self {
            reference: Currency::Aed,
            entries: vec![
                (Currency::Aed, Decimal::ONE, "AED"),
                (Currency::Inr, Decimal::new(226, 1), "\u{20b9}"),
                (Currency::Usd, Decimal::new(27, 2), "$"),
            ],
        }
    }

    pub fn new(reference: Currency, entries: Vec<(Currency, Decimal, &'static str)>) -> Self {
        Self { reference, entries }
    }

    pub fn reference(&self) -> Currency {
        self.reference
    }

    pub fn rate(&self, currency: Currency) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(c, _, _)| *c == currency)
            .map(|(_, rate, _)| *rate)
    }

    pub fn symbol(&self, currency: Currency) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(c, _, _)| *c == currency)
            .map(|(_, _, symbol)| *symbol)
    }

    pub fn supports(&self, currency: Currency) -> bool {
        self.rate(currency).is_some()
    }

    pub fn currencies(&self) -> Vec<Currency> {
        self.entries.iter().map(|(c, _, _)| *c).collect()
    }
}
