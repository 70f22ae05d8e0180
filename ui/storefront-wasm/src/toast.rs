//! Transient status messages.

use crate::dom;
use gloo_timers::callback::Timeout;
use rrd_storefront::Notice;
use std::cell::RefCell;
use web_sys::Element;

const TOAST_MS: u32 = 3_000;

#[derive(Default)]
pub struct Toast {
    hide: RefCell<Option<Timeout>>,
}

impl Toast {
    /// Show `notice`, replacing whatever is on screen.
    pub fn show(&self, notice: &Notice) {
        let Some(el) = toast_element() else {
            tracing::warn!("no toast element, dropping notice: {}", notice.message);
            return;
        };
        dom::set_text(&el, &notice.message);
        dom::set_attr(&el, "class", &format!("show {}", notice.kind.as_str()));

        let target = el.clone();
        let timeout = Timeout::new(TOAST_MS, move || dom::set_attr(&target, "class", ""));
        // dropping the previous timeout cancels it
        self.hide.replace(Some(timeout));
    }

    pub fn maybe(&self, notice: Option<Notice>) {
        if let Some(notice) = notice {
            self.show(&notice);
        }
    }
}

fn toast_element() -> Option<Element> {
    if let Some(el) = dom::by_id("toast") {
        return Some(el);
    }
    let el = dom::create_element("div")?;
    el.set_id("toast");
    dom::set_attr(&el, "role", "status");
    dom::set_attr(&el, "aria-live", "polite");
    dom::document().body()?.append_child(&el).ok()?;
    Some(el)
}
