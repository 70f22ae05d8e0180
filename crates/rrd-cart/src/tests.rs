use super::*;
use proptest::prelude::*;
use rrd_storage::InMemoryStore;
use std::cell::{Cell, RefCell};

fn catalog() -> Rc<Catalog> {
    Rc::new(Catalog::rrd_collection().expect("built-in catalog is valid"))
}

fn store_with(storage: Rc<InMemoryStore>) -> CartStore {
    CartStore::new(catalog(), storage, CartSettings::default())
}

fn fresh() -> (CartStore, Rc<InMemoryStore>) {
    let storage = Rc::new(InMemoryStore::new());
    (store_with(Rc::clone(&storage)), storage)
}

fn recorded(store: &CartStore) -> Rc<RefCell<Vec<CartChange>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |e| sink.borrow_mut().push(e.change.clone()));
    seen
}

#[test]
fn two_of_breath_of_life_totals_298() -> anyhow::Result<()> {
    let (cart, _) = fresh();
    cart.add_line("bol", 2)?;
    assert_eq!(cart.total(), Decimal::from(298));
    Ok(())
}

#[test]
fn gift_wrap_adds_fee_once() -> anyhow::Result<()> {
    let (cart, _) = fresh();
    cart.add_line("bol", 2)?;
    cart.set_gift_wrap(true)?;
    assert_eq!(cart.total(), Decimal::from(308));

    cart.add_line("acf", 1)?;
    assert_eq!(cart.total(), Decimal::from(298 + 119 + 10));
    Ok(())
}

#[test]
fn total_is_additive_across_lines() -> anyhow::Result<()> {
    let (both, _) = fresh();
    both.set_gift_wrap(true)?;
    both.add_line("dvs", 3)?;
    both.add_line("vgo", 2)?;

    let (only_a, _) = fresh();
    only_a.set_gift_wrap(true)?;
    only_a.add_line("dvs", 3)?;

    let (only_b, _) = fresh();
    only_b.set_gift_wrap(true)?;
    only_b.add_line("vgo", 2)?;

    let fee = CartSettings::default().gift_wrap_fee;
    assert_eq!(both.total(), only_a.total() + only_b.total() - fee);
    Ok(())
}

#[test]
fn add_merges_and_caps_at_ten() -> anyhow::Result<()> {
    let (cart, _) = fresh();
    assert_eq!(cart.add_line("bol", 4)?, 4);
    assert_eq!(cart.add_line("bol", 9)?, 10);
    assert_eq!(cart.add_line("amb", 25)?, 10);

    let lines = cart.lines();
    assert_eq!(
        lines,
        vec![
            CartLine { id: "bol".into(), qty: 10 },
            CartLine { id: "amb".into(), qty: 10 },
        ]
    );
    Ok(())
}

#[test]
fn zero_quantity_add_counts_as_one() -> anyhow::Result<()> {
    let (cart, _) = fresh();
    assert_eq!(cart.add_line("msd", 0)?, 1);
    Ok(())
}

#[test]
fn missing_or_unknown_id_changes_nothing() {
    let (cart, storage) = fresh();
    let seen = recorded(&cart);

    assert!(matches!(cart.add_line("  ", 1), Err(CartError::MissingProductId)));
    assert!(matches!(cart.add_line("nope", 1), Err(CartError::UnknownProduct(id)) if id == "nope"));

    assert!(storage.raw(CART_KEY).is_none());
    assert!(seen.borrow().is_empty());
    assert!(cart.is_empty());
}

#[test]
fn removing_absent_line_still_persists_and_notifies() -> anyhow::Result<()> {
    let (cart, storage) = fresh();
    let seen = recorded(&cart);

    cart.remove_line("bol")?;

    assert!(storage.raw(CART_KEY).is_some());
    assert_eq!(*seen.borrow(), vec![CartChange::LineRemoved { id: "bol".into() }]);
    Ok(())
}

#[test]
fn set_quantity_is_noop_without_line() -> anyhow::Result<()> {
    let (cart, storage) = fresh();
    let seen = recorded(&cart);

    assert!(!cart.set_quantity("bol", 4)?);
    assert!(storage.raw(CART_KEY).is_none());
    assert!(seen.borrow().is_empty());
    Ok(())
}

#[test]
fn set_quantity_clamps_examples() -> anyhow::Result<()> {
    let (cart, _) = fresh();
    cart.add_line("bol", 1)?;

    cart.set_quantity("bol", 15)?;
    assert_eq!(cart.count(), 10);
    cart.set_quantity("bol", -3)?;
    assert_eq!(cart.count(), 1);
    Ok(())
}

#[test]
fn unresolvable_lines_contribute_zero() -> anyhow::Result<()> {
    let storage = Rc::new(InMemoryStore::new());
    storage.set(
        CART_KEY,
        r#"{"items":[{"id":"retired","qty":3},{"id":"acf","qty":1}],"currency":"AED"}"#,
    )?;
    let cart = store_with(storage);

    assert_eq!(cart.total(), Decimal::from(119));
    assert_eq!(cart.count(), 4);
    Ok(())
}

#[test]
fn persisted_state_roundtrips_and_truncates_message() -> anyhow::Result<()> {
    let storage = Rc::new(InMemoryStore::new());
    let long = "x".repeat(200);
    {
        let cart = store_with(Rc::clone(&storage));
        cart.add_line("dvs", 2)?;
        cart.add_line("acf", 1)?;
        cart.set_gift_wrap(true)?;
        cart.set_gift_message(&long)?;
    }

    let reopened = store_with(storage);
    let snapshot = reopened.snapshot();
    assert_eq!(
        snapshot.items,
        vec![
            CartLine { id: "dvs".into(), qty: 2 },
            CartLine { id: "acf".into(), qty: 1 },
        ]
    );
    assert!(snapshot.gift_wrap);
    assert_eq!(snapshot.gift_message, "x".repeat(180));
    Ok(())
}

#[test]
fn gift_message_truncates_on_characters_not_bytes() -> anyhow::Result<()> {
    let (cart, _) = fresh();
    let message = "\u{1f381}".repeat(200);
    cart.set_gift_message(&message)?;
    assert_eq!(cart.snapshot().gift_message.chars().count(), 180);
    Ok(())
}

#[test]
fn failed_write_keeps_previous_state() -> anyhow::Result<()> {
    let storage = Rc::new(InMemoryStore::with_quota(120));
    let cart = store_with(Rc::clone(&storage));
    cart.add_line("bol", 1)?;
    let before = storage.raw(CART_KEY);
    let seen = recorded(&cart);

    let err = cart.set_gift_message(&"long message ".repeat(10)).unwrap_err();
    assert!(matches!(err, CartError::Persist(StorageError::QuotaExceeded { .. })));

    assert_eq!(storage.raw(CART_KEY), before);
    assert!(cart.snapshot().gift_message.is_empty());
    assert!(seen.borrow().is_empty());
    Ok(())
}

#[test]
fn corrupt_entry_reads_as_empty_cart() -> anyhow::Result<()> {
    let storage = Rc::new(InMemoryStore::new());
    storage.set(CART_KEY, "{{{")?;
    let cart = store_with(storage);

    assert!(cart.is_empty());
    cart.add_line("ryl", 1)?;
    assert_eq!(cart.count(), 1);
    Ok(())
}

#[test]
fn hand_edited_entries_are_normalised() -> anyhow::Result<()> {
    let storage = Rc::new(InMemoryStore::new());
    storage.set(
        CART_KEY,
        r#"{"items":[{"id":"bol","qty":40},{"id":"bol","qty":2},{"id":"amb","qty":0}]}"#,
    )?;
    let cart = store_with(storage);

    assert_eq!(
        cart.lines(),
        vec![
            CartLine { id: "bol".into(), qty: 10 },
            CartLine { id: "amb".into(), qty: 1 },
        ]
    );
    Ok(())
}

#[test]
fn clear_empties_everything() -> anyhow::Result<()> {
    let (cart, _) = fresh();
    cart.add_line("bol", 2)?;
    cart.set_gift_wrap(true)?;
    cart.set_gift_message("hi")?;

    cart.clear()?;
    let snapshot = cart.snapshot();
    assert!(snapshot.items.is_empty());
    assert!(!snapshot.gift_wrap);
    assert!(snapshot.gift_message.is_empty());
    assert_eq!(cart.total(), Decimal::ZERO);
    Ok(())
}

#[test]
fn persisted_layout_matches_storage_contract() -> anyhow::Result<()> {
    let (cart, storage) = fresh();
    cart.add_line("bol", 2)?;
    let raw = storage.raw(CART_KEY).expect("cart written");
    let json: serde_json::Value = serde_json::from_str(&raw)?;

    assert_eq!(json["items"][0]["id"], "bol");
    assert_eq!(json["items"][0]["qty"], 2);
    assert_eq!(json["currency"], "AED");
    assert_eq!(json["giftWrap"], false);
    assert_eq!(json["giftMessage"], "");
    Ok(())
}

/// Memory store whose reads can be switched to fail.
struct FlakyReads {
    inner: InMemoryStore,
    fail: Cell<bool>,
}

impl KeyValueStore for FlakyReads {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail.get() {
            return Err(StorageError::Backend("read refused".into()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value)
    }
}

#[test]
fn failed_read_leaves_persisted_cart_untouched() -> anyhow::Result<()> {
    let storage = Rc::new(FlakyReads {
        inner: InMemoryStore::new(),
        fail: Cell::new(false),
    });
    let cart = CartStore::new(catalog(), Rc::clone(&storage) as Rc<dyn KeyValueStore>, CartSettings::default());
    cart.add_line("bol", 3)?;
    cart.add_line("vgo", 2)?;
    cart.set_gift_wrap(true)?;
    let before = storage.inner.raw(CART_KEY);
    let seen = recorded(&cart);

    storage.fail.set(true);
    assert!(matches!(cart.add_line("acf", 1), Err(CartError::Persist(StorageError::Backend(_)))));
    assert!(matches!(cart.set_gift_wrap(false), Err(CartError::Persist(_))));
    assert!(matches!(cart.set_quantity("bol", 1), Err(CartError::Persist(_))));
    assert!(cart.snapshot().items.is_empty());
    storage.fail.set(false);

    assert_eq!(storage.inner.raw(CART_KEY), before);
    assert!(seen.borrow().is_empty());
    assert_eq!(cart.count(), 5);
    assert!(cart.snapshot().gift_wrap);
    Ok(())
}

#[test]
fn new_cart_records_the_active_currency() -> anyhow::Result<()> {
    let (cart, storage) = fresh();
    cart.set_currency_snapshot(Currency::Usd);
    cart.add_line("bol", 1)?;

    let raw = storage.raw(CART_KEY).expect("cart written");
    let json: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(json["currency"], "USD");
    Ok(())
}

#[test]
fn zero_max_quantity_is_treated_as_one() -> anyhow::Result<()> {
    let settings = CartSettings {
        max_quantity: 0,
        ..CartSettings::default()
    };
    let cart = CartStore::new(catalog(), Rc::new(InMemoryStore::new()), settings);

    assert_eq!(cart.settings().max_quantity, 1);
    assert_eq!(cart.add_line("bol", 5)?, 1);
    assert!(cart.set_quantity("bol", 7)?);
    assert_eq!(cart.count(), 1);
    Ok(())
}

const IDS: [&str; 8] = ["bol", "dvs", "mkz", "amb", "msd", "ryl", "vgo", "acf"];

proptest! {
    #[test]
    fn set_quantity_always_lands_in_range(qty in any::<i64>()) {
        let (cart, _) = fresh();
        cart.add_line("bol", 1).unwrap();
        cart.set_quantity("bol", qty).unwrap();
        let count = cart.count();
        prop_assert!((1..=10).contains(&count));
    }

    #[test]
    fn remove_after_add_drops_exactly_that_line(
        existing in proptest::collection::vec((0usize..8, 1u32..=10), 0..6),
        pick in 0usize..8,
        n in 1u32..=10,
    ) {
        let (cart, _) = fresh();
        for (idx, qty) in &existing {
            if *idx != pick {
                cart.add_line(IDS[*idx], *qty).unwrap();
            }
        }
        let before = cart.count();

        cart.add_line(IDS[pick], n).unwrap();
        prop_assert_eq!(cart.count(), before + n);

        cart.remove_line(IDS[pick]).unwrap();
        prop_assert_eq!(cart.count(), before);
        prop_assert!(cart.lines().iter().all(|line| line.id != IDS[pick]));
    }

    #[test]
    fn count_is_sum_of_capped_adds(adds in proptest::collection::vec((0usize..8, 0u32..30), 1..20)) {
        let (cart, _) = fresh();
        let mut expected = [0u32; 8];
        for (idx, qty) in &adds {
            cart.add_line(IDS[*idx], *qty).unwrap();
            expected[*idx] = (expected[*idx] + (*qty).max(1)).min(10);
        }
        prop_assert_eq!(cart.count(), expected.iter().sum::<u32>());
    }
}
