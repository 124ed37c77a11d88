//! Static product catalog.
//!
//! The catalog is a hard-coded table built once at startup and shared
//! read-only through [`AppState`](crate::state::AppState). Listing pages
//! filter and sort it with [`ProductQuery`].

mod data;
mod query;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use glowglaz_core::{Money, ProductId};
use serde::{Deserialize, Serialize};

pub use query::{ProductQuery, SortOption};

/// Image shown when a product has no photos.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.png";

/// Shopping category used for navigation and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    AyurvedicMedicine,
    JointHealth,
    BodySlim,
    SkinCare,
}

impl Category {
    /// All categories in navigation order.
    pub const ALL: [Self; 4] = [
        Self::AyurvedicMedicine,
        Self::JointHealth,
        Self::BodySlim,
        Self::SkinCare,
    ];

    /// URL slug, used in `?category=` query strings.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::AyurvedicMedicine => "ayurvedic-medicine",
            Self::JointHealth => "joint-health",
            Self::BodySlim => "body-slim",
            Self::SkinCare => "skin-care",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AyurvedicMedicine => "Ayurvedic Medicine",
            Self::JointHealth => "Joint Health",
            Self::BodySlim => "Body Slim",
            Self::SkinCare => "Skin Care",
        }
    }

    /// Resolve a slug, accepting the short aliases used by older links.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.trim().to_ascii_lowercase().as_str() {
            "ayurvedic-medicine" => Some(Self::AyurvedicMedicine),
            "joint-health" | "joints" => Some(Self::JointHealth),
            "body-slim" | "slim" => Some(Self::BodySlim),
            "skin-care" | "psorigo" => Some(Self::SkinCare),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for unknown category slugs.
#[derive(Debug, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// A certification or formulation badge ("Ayurvedic", "Paraben-Free").
#[derive(Debug, Clone)]
pub struct ValueBadge {
    pub code: String,
    pub name: String,
}

/// A product in the catalog.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: Money,
    pub images: Vec<String>,
    pub badge: Option<String>,
    pub ingredients: String,
    pub allergens: Vec<String>,
    pub values: Vec<ValueBadge>,
    pub category: Category,
    pub in_stock: bool,
}

impl Product {
    /// First product photo, or the shared placeholder.
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.images.first().map_or(PLACEHOLDER_IMAGE, String::as_str)
    }

    /// Whether `needle` (already lowercased) appears in any searchable field.
    fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.ingredients.to_lowercase().contains(needle)
            || self
                .values
                .iter()
                .any(|value| value.name.to_lowercase().contains(needle))
    }
}

/// Fixed-price bundle attached to a deal.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub price: Money,
    pub original_price: Money,
}

/// A promotional offer on one or more products.
#[derive(Debug, Clone)]
pub struct Deal {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub product_ids: Vec<ProductId>,
    pub discount_percent: u32,
    pub bundle: Option<Bundle>,
}

impl Deal {
    /// Whether the deal covers `product`.
    #[must_use]
    pub fn covers(&self, product: ProductId) -> bool {
        self.product_ids.contains(&product)
    }

    /// The discounted unit price of `product` under this deal.
    #[must_use]
    pub fn price_for(&self, product: &Product) -> Money {
        product.price.discounted(self.discount_percent)
    }

    /// Banner text such as "15% OFF".
    #[must_use]
    pub fn discount_label(&self) -> String {
        format!("{}% OFF", self.discount_percent)
    }
}

/// Read-only product and deal table.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
    deals: Vec<Deal>,
}

impl Catalog {
    /// Build a catalog from product and deal tables.
    ///
    /// Later products with a duplicate id shadow earlier ones in lookups.
    #[must_use]
    pub fn new(products: Vec<Product>, deals: Vec<Deal>) -> Self {
        let index = products
            .iter()
            .enumerate()
            .map(|(position, product)| (product.id, position))
            .collect();
        Self {
            products,
            index,
            deals,
        }
    }

    /// The catalog shipped with the storefront.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(data::products(), data::deals())
    }

    /// Every product in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.index
            .get(&id)
            .and_then(|&position| self.products.get(position))
    }

    /// Categories that have at least one product, in navigation order.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| self.products.iter().any(|p| p.category == *category))
            .collect()
    }

    /// Every active deal.
    #[must_use]
    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    /// Look up a deal by slug.
    #[must_use]
    pub fn deal(&self, slug: &str) -> Option<&Deal> {
        self.deals.iter().find(|deal| deal.slug == slug)
    }

    /// Products covered by a deal, in deal order. Unknown ids are skipped.
    #[must_use]
    pub fn deal_products(&self, deal: &Deal) -> Vec<&Product> {
        deal.product_ids
            .iter()
            .filter_map(|id| self.product(*id))
            .collect()
    }

    /// Other products from the same category.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|other| other.category == product.category && other.id != product.id)
            .take(limit)
            .collect()
    }

    /// Filter and sort products for a listing page.
    #[must_use]
    pub fn query(&self, query: &ProductQuery) -> Vec<&Product> {
        let needle = query.search_term();
        let mut matches: Vec<&Product> = self
            .products
            .iter()
            .filter(|product| query.category.is_none_or(|c| product.category == c))
            .filter(|product| {
                needle
                    .as_deref()
                    .is_none_or(|needle| product.matches_search(needle))
            })
            .collect();
        query.sort.apply(&mut matches);
        matches
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_indexes_every_product() {
        let catalog = Catalog::builtin();
        assert!(!catalog.products().is_empty());
        for product in catalog.products() {
            assert_eq!(catalog.product(product.id).unwrap().title, product.title);
        }
        assert!(catalog.product(ProductId::new(999)).is_none());
    }

    #[test]
    fn category_slugs_round_trip_and_accept_aliases() {
        for category in Category::ALL {
            assert_eq!(Category::from_slug(category.slug()), Some(category));
        }
        assert_eq!(Category::from_slug("joints"), Some(Category::JointHealth));
        assert_eq!(Category::from_slug("Slim"), Some(Category::BodySlim));
        assert_eq!(Category::from_slug("psorigo"), Some(Category::SkinCare));
        assert_eq!(Category::from_slug("all"), None);
    }

    #[test]
    fn filtering_by_category_returns_only_that_category() {
        let catalog = Catalog::builtin();
        for category in Category::ALL {
            let query = ProductQuery {
                category: Some(category),
                ..ProductQuery::default()
            };
            let results = catalog.query(&query);
            assert!(results.iter().all(|p| p.category == category));
            let expected = catalog
                .products()
                .iter()
                .filter(|p| p.category == category)
                .count();
            assert_eq!(results.len(), expected);
        }
    }

    #[test]
    fn search_matches_ingredients_and_badges_case_insensitively() {
        let catalog = Catalog::builtin();
        let by_ingredient = catalog.query(&ProductQuery {
            search: Some("ASHWAGANDHA".to_owned()),
            ..ProductQuery::default()
        });
        assert_eq!(by_ingredient.len(), 1);
        assert_eq!(by_ingredient[0].id, ProductId::new(1));

        let by_badge = catalog.query(&ProductQuery {
            search: Some("paraben".to_owned()),
            ..ProductQuery::default()
        });
        assert!(by_badge.iter().all(|p| p.category == Category::SkinCare));
        assert_eq!(by_badge.len(), 3);
    }

    #[test]
    fn blank_search_is_ignored() {
        let catalog = Catalog::builtin();
        let results = catalog.query(&ProductQuery {
            search: Some("   ".to_owned()),
            ..ProductQuery::default()
        });
        assert_eq!(results.len(), catalog.products().len());
    }

    #[test]
    fn deal_prices_apply_discount() {
        let catalog = Catalog::builtin();
        let deal = catalog.deal("sampoorn-arogya").unwrap();
        let products = catalog.deal_products(deal);
        assert_eq!(products.len(), 1);
        assert_eq!(deal.price_for(products[0]).to_string(), "₹3,391.50");
        assert_eq!(deal.discount_label(), "15% OFF");
    }

    #[test]
    fn related_products_share_category_and_exclude_self() {
        let catalog = Catalog::builtin();
        let lotion = catalog.product(ProductId::new(4)).unwrap();
        let related = catalog.related(lotion, 4);
        assert_eq!(related.len(), 2);
        assert!(related.iter().all(|p| p.category == Category::SkinCare));
        assert!(related.iter().all(|p| p.id != lotion.id));
    }

    #[test]
    fn primary_image_falls_back_to_placeholder() {
        let mut product = Catalog::builtin().products()[0].clone();
        product.images.clear();
        assert_eq!(product.primary_image(), PLACEHOLDER_IMAGE);
    }
}
