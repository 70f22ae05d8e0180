//! DOM element bindings.
//!
//! Pages share one script but not one layout, so every binding is optional.
//! A view whose target is missing logs and skips its render step.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

// ── Helpers ──

pub fn document() -> Document {
    gloo_utils::document()
}

pub fn window() -> web_sys::Window {
    gloo_utils::window()
}

pub fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query(selector: &str) -> Option<Element> {
    document().query_selector(selector).ok()?
}

pub fn query_within(parent: &Element, selector: &str) -> Option<Element> {
    parent.query_selector(selector).ok()?
}

pub fn query_all_within(parent: &Element, selector: &str) -> Vec<Element> {
    let Ok(nl) = parent.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nl.length())
        .filter_map(|i| nl.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn set_inner_html(el: &Element, html: &str) {
    el.set_inner_html(html);
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn has_class(el: &Element, cls: &str) -> bool {
    el.class_list().contains(cls)
}

pub fn set_attr(el: &Element, name: &str, value: &str) {
    let _ = el.set_attribute(name, value);
}

pub fn create_element(tag: &str) -> Option<Element> {
    document().create_element(tag).ok()
}

/// Nearest ancestor-or-self of the event target matching `selector`.
pub fn closest(event: &web_sys::Event, selector: &str) -> Option<Element> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    target.closest(selector).ok()?
}

/// Escape text for interpolation into `innerHTML`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ── Elements struct ──

/// The shop grid is only ever this id; other `.grid` sections are left alone.
pub const SHOP_GRID_ID: &str = "shopGrid";

/// Storefront DOM references, resolved once at startup.
#[derive(Clone)]
pub struct Elements {
    // Header
    pub cart_count: Option<Element>,
    pub currency_select: Option<HtmlSelectElement>,
    pub main_nav: Option<Element>,
    pub nav_toggle: Option<Element>,

    // Cart drawer
    pub cart_drawer: Option<Element>,

    // Shop
    pub shop_grid: Option<Element>,
    pub featured_grid: Option<Element>,
    pub search: Option<HtmlInputElement>,
    pub category_filter: Option<HtmlSelectElement>,
    pub price_filter: Option<HtmlSelectElement>,

    // Quiz
    pub quiz: Option<Element>,

    // Product detail
    pub pdp_modal: Option<Element>,

    // Newsletter
    pub newsletter_form: Option<Element>,
}

impl Elements {
    /// Resolve all DOM references. Call once after the document has loaded.
    pub fn bind() -> Elements {
        Elements {
            cart_count: by_id("cart-count"),
            currency_select: by_id_typed("currency-select"),
            main_nav: by_id("main-nav"),
            nav_toggle: query(".mobile-nav-toggle"),

            cart_drawer: by_id("cart-drawer"),

            shop_grid: by_id(SHOP_GRID_ID),
            featured_grid: by_id("featured-grid"),
            search: by_id_typed("search"),
            category_filter: by_id_typed("category-filter"),
            price_filter: by_id_typed("price-filter"),

            quiz: query(".quiz"),

            pdp_modal: by_id("pdp-modal"),

            newsletter_form: query(".newsletter form"),
        }
    }
}

/// Trimmed value of an input or textarea found inside `parent`.
pub fn field_value(parent: &Element, selector: &str) -> Option<String> {
    let el = query_within(parent, selector)?;
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return Some(input.value().trim().to_owned());
    }
    el.dyn_ref::<HtmlTextAreaElement>()
        .map(|area| area.value().trim().to_owned())
}

pub fn focus(el: &Element) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.focus();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shop_grid_is_bound_by_id_only() {
        assert_eq!(SHOP_GRID_ID, "shopGrid");
        assert!(!SHOP_GRID_ID.contains(['.', '#', ' ']));
    }

    #[test]
    fn escape_neutralises_markup() {
        assert_eq!(
            escape(r#"<b class="x">Tom & Jerry's</b>"#),
            "&lt;b class=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/b&gt;"
        );
    }
}
