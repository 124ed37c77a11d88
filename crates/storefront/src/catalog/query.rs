//! Listing filters and sort orders.

use std::cmp::Ordering;

use super::{Category, Product};

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    /// Catalog order.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl SortOption {
    /// Every option in the order shown in the sort dropdown.
    pub const ALL: [Self; 5] = [
        Self::Default,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::NameAsc,
        Self::NameDesc,
    ];

    /// Parse a `?sort=` value. Unknown values fall back to catalog order.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "name-asc" => Self::NameAsc,
            "name-desc" => Self::NameDesc,
            _ => Self::Default,
        }
    }

    /// Query-string value.
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
        }
    }

    /// Dropdown label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "Featured",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::NameAsc => "Name: A to Z",
            Self::NameDesc => "Name: Z to A",
        }
    }

    /// Sort in place. The sort is stable, so ties keep catalog order.
    pub fn apply(self, products: &mut [&Product]) {
        let compare: fn(&&Product, &&Product) -> Ordering = match self {
            Self::Default => return,
            Self::PriceAsc => |a, b| a.price.cmp(&b.price),
            Self::PriceDesc => |a, b| b.price.cmp(&a.price),
            Self::NameAsc => |a, b| compare_titles(a, b),
            Self::NameDesc => |a, b| compare_titles(b, a),
        };
        products.sort_by(compare);
    }
}

fn compare_titles(a: &Product, b: &Product) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title))
}

/// Filters applied to a product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category: Option<Category>,
    pub search: Option<String>,
    pub sort: SortOption,
}

impl ProductQuery {
    /// Build a query from raw query-string values.
    ///
    /// `category=all` and unknown categories mean "no category filter".
    #[must_use]
    pub fn from_params(category: Option<&str>, search: Option<&str>, sort: Option<&str>) -> Self {
        Self {
            category: category.and_then(Category::from_slug),
            search: search.map(str::to_owned),
            sort: sort.map(SortOption::parse).unwrap_or_default(),
        }
    }

    /// Lowercased search needle, or `None` when the search box is blank.
    #[must_use]
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }
}

#[cfg(test)]
mod tests {
    use glowglaz_core::{Money, ProductId};

    use super::*;
    use crate::catalog::Catalog;

    fn ids(products: &[&Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn unknown_sort_falls_back_to_default() {
        assert_eq!(SortOption::parse("price-asc"), SortOption::PriceAsc);
        assert_eq!(SortOption::parse("cheapest"), SortOption::Default);
        for option in SortOption::ALL {
            assert_eq!(SortOption::parse(option.value()), option);
        }
    }

    #[test]
    fn price_sort_is_stable() {
        let catalog = Catalog::builtin();
        let asc = catalog.query(&ProductQuery {
            sort: SortOption::PriceAsc,
            ..ProductQuery::default()
        });
        // The three ₹1,499 skin care items keep catalog order ahead of the ₹3,990 ones.
        assert_eq!(ids(&asc), vec![4, 5, 6, 1, 2, 3]);

        let desc = catalog.query(&ProductQuery {
            sort: SortOption::PriceDesc,
            ..ProductQuery::default()
        });
        assert_eq!(ids(&desc), vec![1, 2, 3, 4, 5, 6]);
        assert!(desc.windows(2).all(|w| w[0].price >= w[1].price));
    }

    #[test]
    fn name_sort_ignores_case() {
        let catalog = Catalog::builtin();
        let asc = catalog.query(&ProductQuery {
            sort: SortOption::NameAsc,
            ..ProductQuery::default()
        });
        let titles: Vec<String> = asc.iter().map(|p| p.title.to_lowercase()).collect();
        let mut sorted = titles.clone();
        sorted.sort();
        assert_eq!(titles, sorted);

        let desc = catalog.query(&ProductQuery {
            sort: SortOption::NameDesc,
            ..ProductQuery::default()
        });
        let reversed: Vec<ProductId> = asc.iter().rev().map(|p| p.id).collect();
        assert_eq!(desc.iter().map(|p| p.id).collect::<Vec<_>>(), reversed);
    }

    #[test]
    fn from_params_treats_all_as_unfiltered() {
        let query = ProductQuery::from_params(Some("all"), Some("oil"), Some("name-asc"));
        assert_eq!(query.category, None);
        assert_eq!(query.sort, SortOption::NameAsc);
        assert_eq!(query.search_term().as_deref(), Some("oil"));

        let query = ProductQuery::from_params(Some("skin-care"), None, None);
        assert_eq!(query.category, Some(Category::SkinCare));
        assert_eq!(query.sort, SortOption::Default);
    }

    #[test]
    fn combined_category_and_search() {
        let catalog = Catalog::builtin();
        let results = catalog.query(&ProductQuery::from_params(
            Some("skin-care"),
            Some("wash"),
            None,
        ));
        assert_eq!(ids(&results), vec![5]);
        assert_eq!(results[0].price, Money::rupees(1499));
    }
}
