//! Event binding.
//!
//! Clicks, changes and input are delegated from the document through data
//! attributes, so re-rendered markup needs no rebinding. Store notifications
//! drive the re-renders.

use crate::dom;
use crate::state::App;
use crate::{cart_drawer, nav, newsletter_form, product_grid, quiz_view};
use rrd_checkout::CheckoutChannel;
use std::rc::Rc;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, KeyboardEvent};

/// Attach a listener that lives for the page's lifetime.
macro_rules! listen {
    ($target:expr, $kind:expr, $ty:ty, $cb:expr) => {{
        let cb = Closure::wrap(Box::new($cb) as Box<dyn FnMut($ty)>);
        if let Err(err) = $target.add_event_listener_with_callback($kind, cb.as_ref().unchecked_ref()) {
            warn!("could not bind {} listener: {:?}", $kind, err);
        }
        cb.forget();
    }};
}

/// Bind all UI listeners and store subscriptions. Call once after init.
pub fn bind_events(app: &Rc<App>) {
    let doc = dom::document();

    let a = Rc::clone(app);
    listen!(doc, "click", web_sys::MouseEvent, move |e: web_sys::MouseEvent| {
        on_click(&a, &e);
    });

    let a = Rc::clone(app);
    listen!(doc, "change", Event, move |e: Event| on_change(&a, &e));

    let a = Rc::clone(app);
    listen!(doc, "input", Event, move |e: Event| on_input(&a, &e));

    let a = Rc::clone(app);
    listen!(doc, "keydown", KeyboardEvent, move |e: KeyboardEvent| {
        if e.key() == "Escape" && a.modal.is_open() {
            a.modal.close();
        }
    });

    if let Some(form) = &app.els.newsletter_form {
        let a = Rc::clone(app);
        listen!(form, "submit", Event, move |e: Event| newsletter_form::on_submit(&a, &e));
    }

    subscribe_stores(app);
}

fn attr(el: &Element, name: &str) -> String {
    el.get_attribute(name).unwrap_or_default()
}

fn on_click(app: &Rc<App>, e: &Event) {
    nav::close_on_outside_click(&app.els, e);

    if dom::closest(e, ".mobile-nav-toggle").is_some() {
        nav::toggle(&app.els);
    } else if let Some(el) = dom::closest(e, "[data-add]") {
        app.toast.maybe(app.store.add_to_cart(&attr(&el, "data-add"), 1));
    } else if let Some(el) = dom::closest(e, "[data-details]") {
        product_grid::open_details(app, &attr(&el, "data-details"));
    } else if let Some(el) = dom::closest(e, "[data-bundle]") {
        app.toast.maybe(app.store.add_bundle(&attr(&el, "data-bundle")));
    } else if let Some(el) = dom::closest(e, "[data-checkout]") {
        e.prevent_default();
        checkout(app, &attr(&el, "data-checkout"));
    } else if let Some(el) = dom::closest(e, "[data-cart-toggle]") {
        e.prevent_default();
        let open = match attr(&el, "data-cart-toggle").as_str() {
            "open" => Some(true),
            "close" => Some(false),
            _ => None,
        };
        cart_drawer::toggle(app, open);
    } else if let Some(el) = dom::closest(e, "[data-dec]") {
        cart_drawer::step_quantity(app, &attr(&el, "data-dec"), -1);
    } else if let Some(el) = dom::closest(e, "[data-inc]") {
        cart_drawer::step_quantity(app, &attr(&el, "data-inc"), 1);
    } else if let Some(el) = dom::closest(e, "[data-remove]") {
        app.toast.maybe(app.store.remove_from_cart(&attr(&el, "data-remove")));
    } else if let Some(el) = dom::closest(e, ".quiz-option[data-value]") {
        quiz_view::select_option(app, &attr(&el, "data-value"));
    } else if dom::closest(e, "[data-quiz-prev]").is_some() {
        quiz_view::previous(app);
    } else if dom::closest(e, "[data-quiz-next]").is_some() {
        quiz_view::next(app);
    } else if dom::closest(e, "[data-quiz-reset]").is_some() {
        quiz_view::reset(app);
    } else if dom::closest(e, "[data-modal-close]").is_some() {
        app.modal.close();
    } else if let Some(el) = dom::closest(e, r#"a[href*="wa.me"]"#) {
        app.store.outbound_click(&attr(&el, "href"));
    } else if e
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .is_some_and(|t| dom::has_class(&t, "modal-backdrop"))
    {
        app.modal.close();
    }
}

fn checkout(app: &App, channel: &str) {
    let channel = match channel {
        "whatsapp" => CheckoutChannel::Whatsapp,
        "email" => CheckoutChannel::Email,
        other => {
            warn!("unknown checkout channel '{}'", other);
            return;
        }
    };
    match app.store.checkout(channel) {
        Ok(link) => {
            if channel == CheckoutChannel::Whatsapp {
                app.store.outbound_click(&link.url);
            }
            if let Err(err) = dom::window().location().set_href(&link.url) {
                warn!("navigation to checkout failed: {:?}", err);
            }
        }
        Err(notice) => app.toast.show(&notice),
    }
}

fn on_change(app: &Rc<App>, e: &Event) {
    let Some(target) = e.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return;
    };

    if let Some(id) = target.get_attribute("data-qty") {
        let raw = target
            .dyn_ref::<HtmlInputElement>()
            .map(HtmlInputElement::value)
            .unwrap_or_default();
        cart_drawer::input_quantity(app, &id, &raw);
        return;
    }

    match target.id().as_str() {
        "giftWrapChk" => {
            if let Some(chk) = target.dyn_ref::<HtmlInputElement>() {
                app.toast.maybe(app.store.set_gift_wrap(chk.checked()));
            }
        }
        "currency-select" => {
            if let Some(select) = target.dyn_ref::<HtmlSelectElement>() {
                app.toast.maybe(app.store.set_currency(&select.value()));
            }
        }
        "category-filter" | "price-filter" => product_grid::render_shop(app),
        _ => {}
    }
}

fn on_input(app: &Rc<App>, e: &Event) {
    let Some(target) = e.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return;
    };
    match target.id().as_str() {
        "giftMsg" => {
            if let Some(msg) = target.dyn_ref::<HtmlTextAreaElement>() {
                app.toast.maybe(app.store.set_gift_message(&msg.value()));
            }
        }
        "search" => product_grid::schedule_search(app),
        _ => {}
    }
}

fn subscribe_stores(app: &Rc<App>) {
    let weak = Rc::downgrade(app);
    app.store.cart().subscribe(move |_| {
        if let Some(app) = weak.upgrade() {
            cart_drawer::render(&app);
        }
    });

    let weak = Rc::downgrade(app);
    app.store.currency().subscribe(move |event| {
        let Some(app) = weak.upgrade() else {
            return;
        };
        debug!("re-rendering prices after {:?}", event);
        sync_currency_select(&app);
        cart_drawer::render(&app);
        product_grid::render_shop(&app);
        product_grid::render_featured(&app);
        quiz_view::render(&app);
    });
}

/// Fill the currency dropdown if empty and select the active currency.
pub fn sync_currency_select(app: &App) {
    let Some(select) = &app.els.currency_select else {
        return;
    };
    if select.length() == 0 {
        let options: String = app
            .store
            .currency()
            .supported()
            .into_iter()
            .map(|c| format!(r#"<option value="{0}">{0}</option>"#, c.code()))
            .collect();
        dom::set_inner_html(select, &options);
    }
    select.set_value(app.store.currency().current().code());
}
