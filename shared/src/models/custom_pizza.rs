//! Custom Pizza Model

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{AppError, ErrorCode};

/// Maximum ingredient removals, and separately supplement additions, per pizza
pub const MAX_CUSTOMIZATIONS: usize = 3;

/// Customer request to derive a pizza from a catalog pizza
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomPizzaRequest {
    pub base_pizza_id: i64,
    #[serde(default)]
    pub removed_ingredient_ids: Vec<i64>,
    #[serde(default)]
    pub added_supplement_ids: Vec<i64>,
    /// Quantity to put in the cart (defaults to 1)
    pub quantity: Option<i64>,
}

impl CustomPizzaRequest {
    /// Whether the request changes anything on the base pizza
    pub fn is_unchanged(&self) -> bool {
        self.removed_ingredient_ids.is_empty() && self.added_supplement_ids.is_empty()
    }

    /// Checks that need no catalog lookup: list sizes, duplicates, overlap
    pub fn validate_shape(&self) -> Result<(), AppError> {
        if self.removed_ingredient_ids.len() > MAX_CUSTOMIZATIONS {
            return Err(invalid(format!(
                "At most {MAX_CUSTOMIZATIONS} ingredients can be removed"
            ))
            .with_detail("removed", self.removed_ingredient_ids.len()));
        }
        if self.added_supplement_ids.len() > MAX_CUSTOMIZATIONS {
            return Err(invalid(format!(
                "At most {MAX_CUSTOMIZATIONS} supplements can be added"
            ))
            .with_detail("added", self.added_supplement_ids.len()));
        }

        let removed: HashSet<i64> = self.removed_ingredient_ids.iter().copied().collect();
        if removed.len() != self.removed_ingredient_ids.len() {
            return Err(invalid("Duplicate ingredient in removal list"));
        }
        let added: HashSet<i64> = self.added_supplement_ids.iter().copied().collect();
        if added.len() != self.added_supplement_ids.len() {
            return Err(invalid("Duplicate supplement in addition list"));
        }
        if let Some(id) = removed.intersection(&added).next() {
            return Err(
                invalid("An ingredient cannot be both removed and added").with_detail("id", *id)
            );
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> AppError {
    AppError::with_message(ErrorCode::InvalidCustomization, msg)
}

/// Result of a customization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomPizzaCreated {
    /// Product id to put in the cart
    pub product_id: i64,
    /// False when no product was written: an unchanged request returns the
    /// base pizza id, a repeated customization returns the earlier product
    pub created: bool,
    /// Unit price in cents
    pub price: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(removed: Vec<i64>, added: Vec<i64>) -> CustomPizzaRequest {
        CustomPizzaRequest {
            base_pizza_id: 1,
            removed_ingredient_ids: removed,
            added_supplement_ids: added,
            quantity: None,
        }
    }

    #[test]
    fn test_three_changes_each_way_are_accepted() {
        assert!(request(vec![1, 2, 3], vec![4, 5, 6]).validate_shape().is_ok());
    }

    #[test]
    fn test_fourth_removal_is_rejected() {
        let err = request(vec![1, 2, 3, 4], vec![]).validate_shape().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCustomization);
    }

    #[test]
    fn test_fourth_addition_is_rejected() {
        let err = request(vec![], vec![4, 5, 6, 7]).validate_shape().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCustomization);
    }

    #[test]
    fn test_duplicates_are_rejected() {
        assert!(request(vec![2, 2], vec![]).validate_shape().is_err());
        assert!(request(vec![], vec![5, 5]).validate_shape().is_err());
    }

    #[test]
    fn test_same_id_removed_and_added_is_rejected() {
        let err = request(vec![2], vec![2]).validate_shape().unwrap_err();
        assert!(err.details.unwrap().contains_key("id"));
    }

    #[test]
    fn test_empty_request_is_unchanged() {
        let req = request(vec![], vec![]);
        assert!(req.validate_shape().is_ok());
        assert!(req.is_unchanged());
    }
}
