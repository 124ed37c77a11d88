//! Product listing and detail route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use glowglaz_core::ProductId;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::{Category, Product, ProductQuery, SortOption};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Related products shown under a product.
const RELATED_COUNT: usize = 4;

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

/// Category filter choice.
#[derive(Clone)]
pub struct CategoryOption {
    pub slug: &'static str,
    pub name: &'static str,
    pub selected: bool,
}

/// Sort dropdown choice.
#[derive(Clone)]
pub struct SortChoice {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub heading: String,
    pub products: Vec<Product>,
    pub categories: Vec<CategoryOption>,
    pub all_selected: bool,
    pub sort_choices: Vec<SortChoice>,
    pub search: String,
    pub cart_count: u32,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: Product,
    pub category_name: &'static str,
    pub related_products: Vec<Product>,
    pub cart_count: u32,
}

/// Listing heading for the active filters.
fn heading(query: &ProductQuery) -> String {
    match (query.category, query.search_term()) {
        (_, Some(term)) => format!("Results for \u{201c}{term}\u{201d}"),
        (Some(category), None) => category.name().to_owned(),
        (None, None) => "Trending Products".to_owned(),
    }
}

/// Display product listing page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListingQuery>,
) -> impl IntoResponse {
    let query = ProductQuery::from_params(
        params.category.as_deref(),
        params.search.as_deref(),
        params.sort.as_deref(),
    );
    let products: Vec<Product> = state.catalog().query(&query).into_iter().cloned().collect();
    tracing::debug!(results = products.len(), "Product listing");

    let cart = crate::cart::load(&session).await;

    ProductsIndexTemplate {
        heading: heading(&query),
        products,
        categories: state
            .catalog()
            .categories()
            .into_iter()
            .map(|category: Category| CategoryOption {
                slug: category.slug(),
                name: category.name(),
                selected: query.category == Some(category),
            })
            .collect(),
        all_selected: query.category.is_none(),
        sort_choices: SortOption::ALL
            .into_iter()
            .map(|option| SortChoice {
                value: option.value(),
                label: option.label(),
                selected: option == query.sort,
            })
            .collect(),
        search: params.search.unwrap_or_default(),
        cart_count: cart.item_count(),
    }
}

/// Display product detail page.
///
/// Unknown or malformed ids are a 404.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate> {
    let catalog = state.catalog();
    let product = id
        .parse::<ProductId>()
        .ok()
        .and_then(|id| catalog.product(id))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let cart = crate::cart::load(&session).await;

    Ok(ProductShowTemplate {
        product: product.clone(),
        category_name: product.category.name(),
        related_products: catalog
            .related(product, RELATED_COUNT)
            .into_iter()
            .cloned()
            .collect(),
        cart_count: cart.item_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_prefers_search_then_category() {
        let query = ProductQuery::from_params(Some("skin-care"), Some(" Oil "), None);
        assert_eq!(heading(&query), "Results for \u{201c}oil\u{201d}");
        let query = ProductQuery::from_params(Some("joints"), None, None);
        assert_eq!(heading(&query), "Joint Health");
        assert_eq!(heading(&ProductQuery::default()), "Trending Products");
    }
}
