//! Newsletter form: inline validation, disabled button while in flight.

use crate::dom;
use crate::state::App;
use rrd_newsletter::{NewsletterError, validate_email};
use rrd_storefront::Notice;
use std::rc::Rc;
use tracing::debug;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlButtonElement, HtmlFormElement};

const EMAIL_INPUT: &str = r#"input[type="email"]"#;

pub fn on_submit(app: &Rc<App>, event: &web_sys::Event) {
    event.prevent_default();
    let Some(form) = app.els.newsletter_form.clone() else {
        return;
    };
    if app.newsletter.is_pending() {
        debug!("newsletter submit ignored while pending");
        return;
    }

    let email = dom::field_value(&form, EMAIL_INPUT).unwrap_or_default();
    if let Err(err) = validate_email(&email) {
        show_field_error(&form, &err.to_string());
        return;
    }
    clear_field_error(&form);

    let button = dom::query_within(&form, r#"button[type="submit"]"#)
        .and_then(|b| b.dyn_into::<HtmlButtonElement>().ok());
    let original = button.as_ref().and_then(|b| b.text_content());
    if let Some(b) = &button {
        b.set_disabled(true);
        dom::set_inner_html(b, r#"<span class="spinner"></span> Subscribing..."#);
    }

    let app = Rc::clone(app);
    wasm_bindgen_futures::spawn_local(async move {
        let timestamp = String::from(js_sys::Date::new_0().to_iso_string());
        match app.newsletter.submit(&email, timestamp).await {
            Ok(_) => {
                app.toast.show(&Notice::success("Thank you for subscribing!"));
                if let Some(f) = form.dyn_ref::<HtmlFormElement>() {
                    f.reset();
                }
                app.store.newsletter_signed_up();
            }
            Err(NewsletterError::Pending) => {}
            Err(_) => app.toast.show(&Notice::error("Subscription failed. Please try again.")),
        }
        if let Some(b) = &button {
            b.set_disabled(false);
            b.set_text_content(original.as_deref());
        }
    });
}

fn show_field_error(form: &Element, message: &str) {
    let Some(input) = dom::query_within(form, EMAIL_INPUT) else {
        return;
    };
    dom::add_class(&input, "error");

    let existing = input
        .parent_element()
        .and_then(|parent| dom::query_within(&parent, ".error-message"));
    let error_el = match existing {
        Some(el) => el,
        None => {
            let Some(el) = dom::create_element("div") else {
                return;
            };
            dom::set_attr(&el, "class", "error-message");
            let _ = input.after_with_node_1(&el);
            el
        }
    };
    dom::set_text(&error_el, message);
    dom::add_class(&error_el, "show");
}

fn clear_field_error(form: &Element) {
    let Some(input) = dom::query_within(form, EMAIL_INPUT) else {
        return;
    };
    dom::remove_class(&input, "error");
    if let Some(el) = input
        .parent_element()
        .and_then(|parent| dom::query_within(&parent, ".error-message"))
    {
        dom::remove_class(&el, "show");
    }
}
