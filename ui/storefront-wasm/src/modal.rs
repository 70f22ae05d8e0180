//! Single active modal with focus restore.

use crate::dom;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

const FOCUSABLE: &str = r#"a,button,input,textarea,select,[tabindex]:not([tabindex="-1"])"#;

#[derive(Default)]
pub struct ModalController {
    active: RefCell<Option<Element>>,
    last_focused: RefCell<Option<HtmlElement>>,
}

impl ModalController {
    pub fn open(&self, modal: &Element) {
        let previous = dom::document()
            .active_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        self.last_focused.replace(previous);

        dom::add_class(modal, "open");
        dom::set_attr(modal, "aria-hidden", "false");
        self.active.replace(Some(modal.clone()));

        match dom::query_within(modal, FOCUSABLE) {
            Some(first) => dom::focus(&first),
            None => dom::focus(modal),
        }
    }

    pub fn close(&self) {
        let Some(modal) = self.active.take() else {
            return;
        };
        dom::remove_class(&modal, "open");
        dom::set_attr(&modal, "aria-hidden", "true");

        match self.last_focused.take() {
            Some(el) => {
                let _ = el.focus();
            }
            None => {
                if let Some(body) = dom::document().body() {
                    let _ = body.focus();
                }
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.active.borrow().is_some()
    }
}
