//! Deal page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use glowglaz_core::{Money, ProductId};
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::{Bundle, Deal};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// A product on a deal page with its discounted price.
#[derive(Clone)]
pub struct DealItem {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub image: String,
    pub price: Money,
    pub deal_price: Money,
    pub in_stock: bool,
}

/// Deal page template.
#[derive(Template, WebTemplate)]
#[template(path = "deals/show.html")]
pub struct DealShowTemplate {
    pub deal: Deal,
    pub discount_label: String,
    pub items: Vec<DealItem>,
    pub bundle: Option<Bundle>,
    pub cart_count: u32,
}

/// Display a deal.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<DealShowTemplate> {
    let catalog = state.catalog();
    let deal = catalog
        .deal(&slug)
        .ok_or_else(|| AppError::NotFound(format!("deal {slug}")))?;

    let items = catalog
        .deal_products(deal)
        .into_iter()
        .map(|product| DealItem {
            id: product.id,
            title: product.title.clone(),
            description: product.description.clone(),
            image: product.primary_image().to_owned(),
            price: product.price,
            deal_price: deal.price_for(product),
            in_stock: product.in_stock,
        })
        .collect();

    let cart = crate::cart::load(&session).await;

    Ok(DealShowTemplate {
        deal: deal.clone(),
        discount_label: deal.discount_label(),
        items,
        bundle: deal.bundle.clone(),
        cart_count: cart.item_count(),
    })
}
