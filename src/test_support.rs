//! Shared fixtures for unit tests.

use crate::models::{Category, Component};

/// Build a catalog component with the given tags and no other attributes.
pub fn component(id: i64, name: &str, category: Category, tags: &[&str]) -> Component {
    Component {
        id,
        name: name.to_string(),
        category,
        price: 10.0,
        image: format!("https://images.example.com/{}.jpg", id),
        description: format!("{} for testing", name),
        weight: None,
        in_stock: true,
        specifications: Default::default(),
        compatible_with: tags.iter().map(|t| t.to_string()).collect(),
        purchase_url: None,
    }
}
