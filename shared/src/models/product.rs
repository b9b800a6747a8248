//! Product Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ingredient::Ingredient;

/// Catalog family a product belongs to
///
/// The cart groups its entries by kind, and the path segment of the cart
/// item routes is the snake_case name (`/api/cart/items/pizza/42`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Pizza,
    Wine,
    Soda,
    Dessert,
    Cocktail,
}

impl ProductKind {
    pub const ALL: [ProductKind; 5] = [
        ProductKind::Pizza,
        ProductKind::Wine,
        ProductKind::Soda,
        ProductKind::Dessert,
        ProductKind::Cocktail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Pizza => "pizza",
            ProductKind::Wine => "wine",
            ProductKind::Soda => "soda",
            ProductKind::Dessert => "dessert",
            ProductKind::Cocktail => "cocktail",
        }
    }

    /// Drinks that carry a bottle/can volume
    pub fn requires_volume(&self) -> bool {
        matches!(self, ProductKind::Wine | ProductKind::Soda)
    }

    /// Drinks that carry an alcohol percentage
    pub fn requires_alcohol(&self) -> bool {
        matches!(self, ProductKind::Wine | ProductKind::Cocktail)
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown product kind: {s}"))
    }
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub kind: ProductKind,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    /// Unit price in cents
    pub price: i64,
    pub stock: i64,
    pub volume_ml: Option<i32>,
    pub alcohol_percent: Option<f64>,
    pub is_spotlight: bool,
    pub is_active: bool,
    /// Set only on custom pizzas: the catalog pizza they derive from
    pub base_pizza_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Product {
    pub fn is_custom(&self) -> bool {
        self.base_pizza_id.is_some()
    }
}

/// Product with its pizza ingredients (empty for other kinds)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub ingredients: Vec<Ingredient>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub kind: ProductKind,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: i64,
    #[serde(default)]
    pub stock: i64,
    pub volume_ml: Option<i32>,
    pub alcohol_percent: Option<f64>,
    #[serde(default)]
    pub is_spotlight: bool,
    /// Pizza ingredient ids (required for pizzas, rejected otherwise)
    #[serde(default)]
    pub ingredient_ids: Vec<i64>,
}

/// Update product payload
///
/// Absent fields keep their value. `ingredient_ids`, when present, replaces
/// the whole ingredient set of a pizza.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<i64>,
    pub volume_ml: Option<i32>,
    pub alcohol_percent: Option<f64>,
    pub is_spotlight: Option<bool>,
    pub is_active: Option<bool>,
    pub ingredient_ids: Option<Vec<i64>>,
}

/// Spotlight toggle payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotlightUpdate {
    pub is_spotlight: bool,
}
