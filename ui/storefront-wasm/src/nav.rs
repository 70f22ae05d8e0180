//! Mobile navigation drawer.

use crate::dom::{self, Elements};
use wasm_bindgen::JsCast;
use web_sys::Node;

fn set_open(els: &Elements, open: bool) {
    let (Some(nav), Some(toggle)) = (&els.main_nav, &els.nav_toggle) else {
        return;
    };
    dom::toggle_class(nav, "open", open);
    dom::toggle_class(toggle, "open", open);
    dom::set_attr(toggle, "aria-expanded", if open { "true" } else { "false" });
}

pub fn toggle(els: &Elements) {
    let Some(nav) = &els.main_nav else {
        tracing::debug!("no #main-nav on this page");
        return;
    };
    let open = dom::has_class(nav, "open");
    set_open(els, !open);
}

/// Close the open menu when a click lands outside both the menu and its toggle.
pub fn close_on_outside_click(els: &Elements, event: &web_sys::Event) {
    let (Some(nav), Some(toggle)) = (&els.main_nav, &els.nav_toggle) else {
        return;
    };
    if !dom::has_class(nav, "open") {
        return;
    }
    let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
    let inside = target
        .as_ref()
        .is_some_and(|node| nav.contains(Some(node)) || toggle.contains(Some(node)));
    if !inside {
        set_open(els, false);
    }
}
