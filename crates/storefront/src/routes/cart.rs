//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use glowglaz_core::ProductId;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{self, Cart, CartLineItem};
use crate::checkout::{self, CheckoutService, OrderSummary};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineItem>,
    pub summary: OrderSummary,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().to_vec(),
            summary: OrderSummary::for_cart(cart),
            item_count: cart.item_count(),
        }
    }
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
    /// Deal slug when adding from a deal page.
    pub deal: Option<String>,
    /// Present when the "Buy Now" button was used.
    pub buy_now: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub cart_count: u32,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid product id: {raw}")))
}

/// Save the cart and keep any checkout snapshot in step with it.
///
/// A gateway order was priced for the old cart, so it is dropped.
async fn persist(state: &AppState, session: &Session, cart: &Cart) -> Result<()> {
    cart::save(session, cart).await?;
    if let Some(mut checkout) = checkout::current(session).await {
        if checkout.gateway_order.take().is_some() {
            checkout::save(session, &checkout).await?;
        }
        CheckoutService::new(state.pool(), state.payments())
            .sync_snapshot(&checkout, cart)
            .await;
    }
    Ok(())
}

/// Cart items fragment with the `cart-updated` trigger.
fn items_fragment(cart: &Cart) -> Response {
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(cart),
        },
    )
        .into_response()
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let cart = cart::load(&session).await;

    CartShowTemplate {
        cart: CartView::from(&cart),
        cart_count: cart.item_count(),
    }
}

/// Add item to cart (HTMX).
///
/// Returns the count badge with an HTMX trigger so other cart views refresh.
/// "Buy Now" redirects straight to checkout instead.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let id = parse_product_id(&form.product_id)?;
    let catalog = state.catalog();
    let Some(product) = catalog.product(id) else {
        return Ok((
            StatusCode::NOT_FOUND,
            Html("<span class=\"cart-error\">Product not found</span>"),
        )
            .into_response());
    };
    if !product.in_stock {
        return Ok((
            StatusCode::CONFLICT,
            Html("<span class=\"cart-error\">Out of stock</span>"),
        )
            .into_response());
    }

    let quantity = form.quantity.unwrap_or(1);
    let line = match form
        .deal
        .as_deref()
        .and_then(|slug| catalog.deal(slug))
        .filter(|deal| deal.covers(id))
    {
        Some(deal) => CartLineItem::from_deal(deal, product, quantity),
        None => CartLineItem::from_product(product, quantity),
    };

    let mut cart = cart::load(&session).await;
    cart.add(line);
    persist(&state, &session, &cart).await?;
    crate::error::add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", form.product_id.as_str())]),
    );

    if form.buy_now.is_some() {
        return Ok(Redirect::to("/checkout").into_response());
    }

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.item_count(),
        },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let id = parse_product_id(&form.product_id)?;
    let mut cart = cart::load(&session).await;
    if cart.update_quantity(id, form.quantity) {
        persist(&state, &session, &cart).await?;
    }
    Ok(items_fragment(&cart))
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let id = parse_product_id(&form.product_id)?;
    let mut cart = cart::load(&session).await;
    if cart.remove(id) {
        persist(&state, &session, &cart).await?;
    }
    Ok(items_fragment(&cart))
}

/// Empty the cart (HTMX).
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Response> {
    let mut cart = cart::load(&session).await;
    cart.clear();
    persist(&state, &session, &cart).await?;
    Ok(items_fragment(&cart))
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    CartCountTemplate {
        count: cart::load(&session).await.item_count(),
    }
}
