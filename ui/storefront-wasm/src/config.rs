//! Page-supplied storefront settings.
//!
//! Read from an optional
//! `<script id="storefront-config" type="application/json">` block; a missing
//! block, or one that fails to parse, yields the defaults.

use crate::dom;
use rrd_storefront::StoreConfig;

pub const CONFIG_ELEMENT_ID: &str = "storefront-config";

pub fn load() -> StoreConfig {
    let Some(raw) = dom::by_id(CONFIG_ELEMENT_ID).and_then(|el| el.text_content()) else {
        return StoreConfig::default();
    };
    if raw.trim().is_empty() {
        return StoreConfig::default();
    }
    StoreConfig::from_json(&raw).unwrap_or_else(|err| {
        // logging is not up yet; the console is the only channel
        gloo_console::warn!(format!("ignoring #{CONFIG_ELEMENT_ID}: {err}"));
        StoreConfig::default()
    })
}
