//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::{Category, Deal, Product};
use crate::filters;
use crate::state::AppState;

/// Number of products in the featured grid.
const FEATURED_COUNT: usize = 4;

/// Category tile on the home page.
#[derive(Clone)]
pub struct CategoryCard {
    pub slug: &'static str,
    pub name: &'static str,
    pub image: String,
    pub product_count: usize,
}

/// Deal banner on the home page.
#[derive(Clone)]
pub struct DealCard {
    pub slug: String,
    pub title: String,
    pub discount_label: String,
    pub image: String,
}

impl CategoryCard {
    fn new(category: Category, products: &[Product]) -> Self {
        let members: Vec<&Product> = products
            .iter()
            .filter(|p| p.category == category)
            .collect();
        Self {
            slug: category.slug(),
            name: category.name(),
            image: members
                .first()
                .map_or(crate::catalog::PLACEHOLDER_IMAGE, |p| p.primary_image())
                .to_owned(),
            product_count: members.len(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured: Vec<Product>,
    pub categories: Vec<CategoryCard>,
    pub deals: Vec<DealCard>,
    pub cart_count: u32,
}

fn deal_card(state: &AppState, deal: &Deal) -> DealCard {
    let image = state
        .catalog()
        .deal_products(deal)
        .first()
        .map_or(crate::catalog::PLACEHOLDER_IMAGE, |p| p.primary_image())
        .to_owned();
    DealCard {
        slug: deal.slug.clone(),
        title: deal.title.clone(),
        discount_label: deal.discount_label(),
        image,
    }
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let catalog = state.catalog();
    let cart = crate::cart::load(&session).await;

    HomeTemplate {
        featured: catalog
            .products()
            .iter()
            .filter(|p| p.in_stock)
            .take(FEATURED_COUNT)
            .cloned()
            .collect(),
        categories: catalog
            .categories()
            .into_iter()
            .map(|category| CategoryCard::new(category, catalog.products()))
            .collect(),
        deals: catalog
            .deals()
            .iter()
            .map(|deal| deal_card(&state, deal))
            .collect(),
        cart_count: cart.item_count(),
    }
}
