//! RRD Collection storefront: browser client.
//!
//! Compiled to WASM and loaded by every page of the static site. The page
//! decides what is shown; each view renders only if its element exists.

mod analytics;
mod api;
mod cart_drawer;
mod config;
mod dom;
mod events;
mod logging;
mod modal;
mod nav;
mod newsletter_form;
mod product_grid;
mod quiz_view;
mod state;
mod storage;
mod toast;

use anyhow::Context;
use rrd_analytics::AnalyticsSink;
use rrd_storefront::Storefront;
use std::rc::Rc;
use tracing::info;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    init().map_err(|err| JsValue::from_str(&format!("{err:#}")))
}

fn init() -> anyhow::Result<()> {
    let config = config::load();
    logging::init(&config.log_level);

    let analytics: Rc<dyn AnalyticsSink> = Rc::new(analytics::GtagSink::new(config.ga_measurement_id.clone()));
    let store = Storefront::open(config, storage::client_storage(), analytics).context("storefront failed to start")?;
    let app = state::App::new(dom::Elements::bind(), store);

    events::sync_currency_select(&app);
    product_grid::populate_filters(&app);
    product_grid::render_shop(&app);
    product_grid::render_featured(&app);
    cart_drawer::render(&app);
    quiz_view::render(&app);
    events::bind_events(&app);

    let doc = dom::document();
    let location = dom::window().location().href().unwrap_or_default();
    app.store.page_view(&doc.title(), &location);

    info!("storefront client initialised");
    Ok(())
}
