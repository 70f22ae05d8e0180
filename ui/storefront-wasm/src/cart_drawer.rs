//! Cart drawer rendering.
//!
//! Rows are rebuilt on every cart or currency change. The gift extras are
//! built once and then only synced, so typing in the message box keeps focus.

use crate::dom;
use crate::state::App;
use rrd_api_types::PersistedCart;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement, HtmlTextAreaElement};

pub fn render(app: &App) {
    update_count(app);

    let Some(drawer) = &app.els.cart_drawer else {
        debug!("no #cart-drawer on this page");
        return;
    };
    let (Some(list), Some(subtotal), Some(extras)) = (
        dom::query_within(drawer, ".cart-items"),
        dom::query_within(drawer, ".cart-subtotal"),
        dom::query_within(drawer, ".cart-extras"),
    ) else {
        warn!("cart drawer is missing .cart-items, .cart-subtotal or .cart-extras");
        return;
    };

    let cart = app.store.cart().snapshot();
    dom::set_inner_html(&list, &rows_html(app, &cart));
    render_extras(app, &extras, &cart);
    dom::set_text(&subtotal, &app.store.currency().display(app.store.cart().total_of(&cart)));
}

pub fn update_count(app: &App) {
    if let Some(badge) = &app.els.cart_count {
        dom::set_text(badge, &app.store.cart().count().to_string());
    }
}

/// Open, close, or flip (`None`) the drawer.
pub fn toggle(app: &App, open: Option<bool>) {
    let Some(drawer) = &app.els.cart_drawer else {
        warn!("cart drawer element not found");
        return;
    };
    let open = open.unwrap_or_else(|| !dom::has_class(drawer, "open"));
    dom::toggle_class(drawer, "open", open);
    if open {
        render(app);
    }
}

fn rows_html(app: &App, cart: &PersistedCart) -> String {
    let catalog = app.store.catalog();
    let currency = app.store.currency();
    let max = app.store.cart().settings().max_quantity;

    let mut html = String::new();
    for line in &cart.items {
        let Some(p) = catalog.product(&line.id) else {
            warn!("product not found for cart item '{}'", line.id);
            continue;
        };
        let id = dom::escape(&p.id);
        let name = dom::escape(&p.name);
        html.push_str(&format!(
            r#"<div class="cart-row">
  <img src="{image}" alt="{name}" loading="lazy" width="72" height="72">
  <div class="meta">
    <div class="name">{name}</div>
    <div class="size">{size}</div>
    <div class="qty">
      <button class="dec" data-dec="{id}" aria-label="decrease quantity">&minus;</button>
      <input type="number" min="1" max="{max}" value="{qty}" data-qty="{id}" aria-label="quantity">
      <button class="inc" data-inc="{id}" aria-label="increase quantity">+</button>
    </div>
  </div>
  <div class="price">{price}</div>
  <button class="remove" data-remove="{id}" aria-label="remove item">&times;</button>
</div>"#,
            image = dom::escape(&p.image),
            size = dom::escape(&p.size),
            qty = line.qty,
            price = currency.display(p.price),
        ));
    }
    html
}

fn render_extras(app: &App, extras: &Element, cart: &PersistedCart) {
    if dom::query_within(extras, "#giftWrapChk").is_none() {
        let fee = app.store.currency().display(app.store.cart().settings().gift_wrap_fee);
        dom::set_inner_html(
            extras,
            &format!(
                r#"<label class="gift-wrap">
  <input type="checkbox" id="giftWrapChk"> Gift&#8209;wrap (+<span class="gift-fee">{fee}</span>)
</label>
<textarea id="giftMsg" rows="2" maxlength="{limit}" placeholder="Gift message (optional)"></textarea>
<div class="muted">COD available in select cities in India &amp; UAE &mdash; confirm with our agent on WhatsApp.</div>"#,
                fee = dom::escape(&fee),
                limit = app.store.cart().settings().gift_message_limit,
            ),
        );
    } else if let Some(fee) = dom::query_within(extras, ".gift-fee") {
        dom::set_text(&fee, &app.store.currency().display(app.store.cart().settings().gift_wrap_fee));
    }

    if let Some(chk) = dom::query_within(extras, "#giftWrapChk").and_then(|e| e.dyn_into::<HtmlInputElement>().ok()) {
        chk.set_checked(cart.gift_wrap);
    }
    if let Some(msg) = dom::query_within(extras, "#giftMsg").and_then(|e| e.dyn_into::<HtmlTextAreaElement>().ok()) {
        let _ = msg
            .style()
            .set_property("display", if cart.gift_wrap { "block" } else { "none" });
        let focused = dom::document()
            .active_element()
            .is_some_and(|active| active.is_same_node(Some(msg.as_ref())));
        if !focused && msg.value() != cart.gift_message {
            msg.set_value(&cart.gift_message);
        }
    }
}

/// `−`/`+` buttons: step the line's quantity by `delta`.
pub fn step_quantity(app: &App, product_id: &str, delta: i64) {
    let Some(current) = app
        .store
        .cart()
        .lines()
        .into_iter()
        .find(|line| line.id == product_id)
        .map(|line| i64::from(line.qty))
    else {
        debug!("step_quantity ignored for '{}': not in cart", product_id);
        return;
    };
    app.toast.maybe(app.store.set_quantity(product_id, current + delta));
}

/// Quantity input: unparsable text counts as 1.
pub fn input_quantity(app: &App, product_id: &str, raw: &str) {
    let qty = raw.trim().parse::<i64>().unwrap_or(1);
    app.toast.maybe(app.store.set_quantity(product_id, qty));
}
