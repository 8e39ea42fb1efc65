//! Catalog component model.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use crate::errors::AppError;

/// Tag that makes a component compatible with everything.
pub const TAG_ALL: &str = "all";

/// Component category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Category {
    Drone,
    Goggles,
    Radio,
    Battery,
    Accessory,
}

impl Category {
    /// Categories that occupy exactly one slot in a build.
    pub const SINGULAR: [Category; 4] = [
        Category::Drone,
        Category::Goggles,
        Category::Radio,
        Category::Battery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Drone => "drone",
            Category::Goggles => "goggles",
            Category::Radio => "radio",
            Category::Battery => "battery",
            Category::Accessory => "accessory",
        }
    }

    pub fn is_singular(&self) -> bool {
        !matches!(self, Category::Accessory)
    }

    /// Capitalized name used in user-facing lists.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Drone => "Drone",
            Category::Goggles => "Goggles",
            Category::Radio => "Radio",
            Category::Battery => "Battery",
            Category::Accessory => "Accessory",
        }
    }
}

/// Parses a category name, ignoring case and surrounding whitespace.
/// The plural "accessories" is accepted as well.
impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drone" => Ok(Category::Drone),
            "goggles" => Ok(Category::Goggles),
            "radio" => Ok(Category::Radio),
            "battery" => Ok(Category::Battery),
            "accessory" | "accessories" => Ok(Category::Accessory),
            _ => Err(format!("unknown category: {}", s)),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single free-form specification value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    Bool(bool),
    Number(Number),
    Text(String),
}

impl std::fmt::Display for SpecValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecValue::Bool(b) => write!(f, "{}", if *b { "Yes" } else { "No" }),
            SpecValue::Number(n) => write!(f, "{}", n),
            SpecValue::Text(s) => f.write_str(s),
        }
    }
}

/// Open specification mapping (voltage, protocol, capacity, ...).
pub type Specifications = BTreeMap<String, SpecValue>;

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: i64,
    pub name: String,
    pub category: Category,
    pub price: f64,
    pub image: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub specifications: Specifications,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub compatible_with: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_url: Option<String>,
}

impl Component {
    /// Whether the component carries the wildcard tag.
    pub fn is_universal(&self) -> bool {
        self.compatible_with.iter().any(|t| t == TAG_ALL)
    }
}

fn default_in_stock() -> bool {
    true
}

/// Accept any JSON for a tag list; anything that is not an array of strings
/// contributes no tags.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(tags_from_value(&value))
}

/// Extract the string entries of a JSON array, ignoring everything else.
pub fn tags_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Request body for creating a new component.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComponentRequest {
    pub name: String,
    pub category: Category,
    pub price: f64,
    pub image: String,
    pub description: String,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub specifications: Specifications,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub compatible_with: Vec<String>,
    #[serde(default)]
    pub purchase_url: Option<String>,
}

impl CreateComponentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("Name", &self.name)?;
        require_text("Image URL", &self.image)?;
        require_text("Description", &self.description)?;
        validate_price(self.price)?;
        if let Some(weight) = self.weight {
            validate_weight(weight)?;
        }
        if let Some(url) = &self.purchase_url {
            validate_url(url)?;
        }
        Ok(())
    }
}

/// Request body for updating an existing component.
///
/// `category` is accepted only so that a changed value can be rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComponentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// `null` clears the weight.
    #[serde(default, deserialize_with = "present")]
    pub weight: Option<Option<f64>>,
    #[serde(default)]
    pub in_stock: Option<bool>,
    #[serde(default)]
    pub specifications: Option<Specifications>,
    #[serde(default, deserialize_with = "present_lenient_tags")]
    pub compatible_with: Option<Vec<String>>,
    /// `null` clears the purchase link.
    #[serde(default, deserialize_with = "present")]
    pub purchase_url: Option<Option<String>>,
}

impl UpdateComponentRequest {
    pub fn validate(&self, existing: &Component) -> Result<(), AppError> {
        if let Some(category) = self.category {
            if category != existing.category {
                return Err(AppError::Validation(
                    "Component category cannot be changed".to_string(),
                ));
            }
        }
        if let Some(name) = &self.name {
            require_text("Name", name)?;
        }
        if let Some(image) = &self.image {
            require_text("Image URL", image)?;
        }
        if let Some(description) = &self.description {
            require_text("Description", description)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(Some(weight)) = self.weight {
            validate_weight(weight)?;
        }
        if let Some(Some(url)) = &self.purchase_url {
            validate_url(url)?;
        }
        Ok(())
    }
}

/// Distinguish an explicit `null` (`Some(None)`) from a missing field (`None`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Tags on update follow the create rules; `null` keeps the current tags.
fn present_lenient_tags<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok((!value.is_null()).then(|| tags_from_value(&value)))
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::Validation(
            "Price must be a positive number".to_string(),
        ));
    }
    Ok(())
}

fn validate_weight(weight: f64) -> Result<(), AppError> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(AppError::Validation(
            "Weight must be a positive number".to_string(),
        ));
    }
    Ok(())
}

fn validate_url(url: &str) -> Result<(), AppError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(AppError::Validation("Must be a valid URL".to_string()))
    }
}
