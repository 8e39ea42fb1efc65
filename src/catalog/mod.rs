//! Catalog listing filters.
//!
//! The repository filters by category; everything else a listing can ask for
//! is applied here on the fetched components.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{Category, Component};

/// Listing order for catalog components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

/// Query parameters accepted by `GET /api/components`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentQuery {
    #[serde(default)]
    pub category: Option<String>,
    /// Case-insensitive match against name or description.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub max_price: Option<f64>,
    /// Components without a known weight always pass.
    #[serde(default)]
    pub max_weight: Option<f64>,
    #[serde(default)]
    pub in_stock_only: Option<bool>,
    #[serde(default)]
    pub sort: Option<SortOrder>,
}

impl ComponentQuery {
    /// The requested category, if any.
    pub fn category(&self) -> Result<Option<Category>, AppError> {
        match self.category.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => name
                .parse()
                .map(Some)
                .map_err(|_| AppError::Validation(format!("Unknown category: {}", name))),
        }
    }

    pub fn matches(&self, component: &Component) -> bool {
        if let Some(term) = self.search_term() {
            let hit = component.name.to_lowercase().contains(&term)
                || component.description.to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }

        if let Some(max_price) = self.max_price {
            if component.price > max_price {
                return false;
            }
        }

        if let (Some(max_weight), Some(weight)) = (self.max_weight, component.weight) {
            if weight > max_weight {
                return false;
            }
        }

        if self.in_stock_only.unwrap_or(false) && !component.in_stock {
            return false;
        }

        true
    }

    /// Filter and sort a category listing.
    pub fn apply(&self, components: Vec<Component>) -> Vec<Component> {
        let mut listed: Vec<Component> = components
            .into_iter()
            .filter(|c| self.matches(c))
            .collect();

        match self.sort {
            Some(SortOrder::PriceAsc) => listed.sort_by(|a, b| a.price.total_cmp(&b.price)),
            Some(SortOrder::PriceDesc) => listed.sort_by(|a, b| b.price.total_cmp(&a.price)),
            Some(SortOrder::NameAsc) => listed.sort_by_cached_key(|c| c.name.to_lowercase()),
            Some(SortOrder::NameDesc) => {
                listed.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()))
            }
            None => {}
        }

        listed
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }
}
