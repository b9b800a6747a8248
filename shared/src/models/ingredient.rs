//! Ingredient Model

use serde::{Deserialize, Serialize};

/// Pizza ingredient
///
/// Ingredients flagged `is_supplement` form the fixed allow-list a customer
/// may add to a pizza, each at `supplement_price` cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub is_supplement: bool,
    pub supplement_price: i64,
}

/// Create ingredient payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientCreate {
    pub name: String,
    #[serde(default)]
    pub is_supplement: bool,
    #[serde(default)]
    pub supplement_price: i64,
}
