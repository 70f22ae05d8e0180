//! Product cards, shop filters, search and the product detail modal.

use crate::dom;
use crate::state::App;
use gloo_timers::callback::Timeout;
use rrd_api_types::Product;
use rrd_catalog::{CategoryFilter, PriceRange, categories, price_ranges, render_stars};
use std::rc::Rc;
use tracing::{debug, warn};
use web_sys::HtmlSelectElement;

const SEARCH_DEBOUNCE_MS: u32 = 300;

pub fn card_html(app: &App, p: &Product) -> String {
    let catalog = app.store.catalog();
    let rating = catalog.avg_rating(&p.id);
    let notes: Vec<&str> = p.notes.iter().take(3).map(String::as_str).collect();
    let id = dom::escape(&p.id);
    let name = dom::escape(&p.name);
    format!(
        r#"<article class="card" id="{id}">
  <picture>
    <source type="image/webp" srcset="{webp}">
    <img src="{image}" alt="{name} bottle">
  </picture>
  <div class="pad">
    <h3>{name}</h3>
    <div class="meta">{notes}</div>
    <div class="meta"><span aria-label="{rating} out of 5 stars" title="{rating}/5">{stars}</span> <span class="muted">({count})</span></div>
    <div class="price">{price}</div>
    <div class="actions">
      <button class="btn" data-add="{id}">Add to cart</button>
      <button class="btn secondary" data-details="{id}">Details</button>
    </div>
  </div>
</article>"#,
        webp = dom::escape(&p.image_webp),
        image = dom::escape(&p.image),
        notes = dom::escape(&notes.join(" \u{2022} ")),
        stars = render_stars(rating),
        count = catalog.reviews_count(&p.id),
        price = app.store.currency().display(p.price),
    )
}

pub fn cards_html<'a>(app: &App, products: impl IntoIterator<Item = &'a Product>) -> String {
    products.into_iter().map(|p| card_html(app, p)).collect()
}

/// Fill empty filter dropdowns from the catalog's categories and bands.
pub fn populate_filters(app: &App) {
    if let Some(select) = &app.els.category_filter {
        if select.length() == 0 {
            let options: String = categories()
                .iter()
                .map(|c| format!(r#"<option value="{}">{}</option>"#, c.id(), dom::escape(c.label())))
                .collect();
            dom::set_inner_html(select, &options);
        }
    }
    if let Some(select) = &app.els.price_filter {
        if select.length() == 0 {
            let mut options = String::from(r#"<option value="all">All Prices</option>"#);
            for range in price_ranges() {
                options.push_str(&format!(
                    r#"<option value="{}">{}</option>"#,
                    dom::escape(range.id),
                    dom::escape(range.name)
                ));
            }
            dom::set_inner_html(select, &options);
        }
    }
}

fn selected(select: Option<&HtmlSelectElement>) -> String {
    select.map(HtmlSelectElement::value).unwrap_or_default()
}

/// Shop grid: category ∩ price band ∩ search text.
pub fn render_shop(app: &App) {
    let Some(grid) = &app.els.shop_grid else {
        debug!("no #{} on this page", dom::SHOP_GRID_ID);
        return;
    };

    let category = selected(app.els.category_filter.as_ref())
        .parse::<CategoryFilter>()
        .unwrap_or(CategoryFilter::All);
    let range = PriceRange::by_id(&selected(app.els.price_filter.as_ref()));
    let query = app
        .els
        .search
        .as_ref()
        .map(|input| input.value())
        .unwrap_or_default();

    let catalog = app.store.catalog();
    let hits = catalog.search(&query);
    let products = catalog
        .filter(category, range.as_ref())
        .into_iter()
        .filter(|p| hits.iter().any(|h| h.id == p.id));
    dom::set_inner_html(grid, &cards_html(app, products));
}

pub fn render_featured(app: &App) {
    if let Some(grid) = &app.els.featured_grid {
        dom::set_inner_html(grid, &cards_html(app, app.store.catalog().featured()));
    }
}

/// Re-render the shop once typing pauses.
pub fn schedule_search(app: &Rc<App>) {
    let weak = Rc::downgrade(app);
    let timer = Timeout::new(SEARCH_DEBOUNCE_MS, move || {
        if let Some(app) = weak.upgrade() {
            render_shop(&app);
        }
    });
    app.search_timer.replace(Some(timer));
}

pub fn open_details(app: &App, product_id: &str) {
    let Some(modal) = &app.els.pdp_modal else {
        warn!("no #pdp-modal on this page");
        return;
    };
    let Some(p) = app.store.view_product(product_id) else {
        return;
    };
    let Some(body) = dom::query_within(modal, ".pdp-body") else {
        warn!("#pdp-modal has no .pdp-body");
        return;
    };

    let catalog = app.store.catalog();
    let reviews: String = catalog
        .reviews(&p.id)
        .iter()
        .map(|r| {
            format!(
                r#"<li><span class="stars">{}</span> {}</li>"#,
                render_stars(f64::from(r.stars)),
                dom::escape(&r.text)
            )
        })
        .collect();
    let id = dom::escape(&p.id);
    dom::set_inner_html(
        &body,
        &format!(
            r#"<picture>
  <source type="image/webp" srcset="{webp}">
  <img src="{image}" alt="{name} bottle">
</picture>
<div class="pdp-info">
  <h2>{name}</h2>
  <div class="meta">{size} &bull; {longevity}</div>
  <div class="meta">{notes}</div>
  <p>{description}</p>
  <div class="price">{price}</div>
  <button class="btn" data-add="{id}">Add to cart</button>
  <ul class="reviews">{reviews}</ul>
</div>"#,
            webp = dom::escape(&p.image_webp),
            image = dom::escape(&p.image),
            name = dom::escape(&p.name),
            size = dom::escape(&p.size),
            longevity = dom::escape(&p.longevity),
            notes = dom::escape(&p.notes.join(" \u{2022} ")),
            description = dom::escape(&p.description),
            price = app.store.currency().display(p.price),
        ),
    );
    app.modal.open(modal);
}
