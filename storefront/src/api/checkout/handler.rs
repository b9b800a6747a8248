//! Checkout Handler

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::cart::view::resolve_session;
use crate::core::ServerState;
use crate::db::procedures::{self, NewOrder, NewOrderLine};
use crate::session::Session;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, card_digits, is_valid_postal_code,
    luhn_valid, validate_optional_text, validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok_with_message};
use shared::models::{CheckoutRequest, DeliveryMode, OrderDetail, PaymentMethod};

/// Checkout fields after validation, ready for [`NewOrder`]
#[derive(Debug, Clone, PartialEq)]
struct ValidatedCheckout {
    street: Option<String>,
    postal_code: Option<String>,
    city: Option<String>,
    payment_reference: Option<String>,
    note: Option<String>,
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn validate_checkout(req: &CheckoutRequest) -> AppResult<ValidatedCheckout> {
    let (street, postal_code, city) = match req.delivery_mode {
        DeliveryMode::Pickup => (None, None, None),
        DeliveryMode::Delivery => {
            let (Some(street), Some(postal_code), Some(city)) =
                (trimmed(&req.street), trimmed(&req.postal_code), trimmed(&req.city))
            else {
                return Err(AppError::with_message(
                    ErrorCode::AddressRequired,
                    "Street, postal code and city are required for delivery",
                ));
            };
            validate_required_text(&street, "street", MAX_ADDRESS_LEN)?;
            validate_required_text(&city, "city", MAX_SHORT_TEXT_LEN)?;
            if !is_valid_postal_code(&postal_code) {
                return Err(AppError::validation("Postal code must have 5 digits")
                    .with_detail("field", "postal_code"));
            }
            (Some(street), Some(postal_code), Some(city))
        }
    };

    let payment_reference = match req.payment_method {
        PaymentMethod::Cash => None,
        PaymentMethod::Card => {
            let digits = req
                .card_number
                .as_deref()
                .and_then(card_digits)
                .filter(|d| luhn_valid(d))
                .ok_or_else(|| AppError::new(ErrorCode::InvalidCardNumber))?;
            let last4: String = digits[digits.len() - 4..]
                .iter()
                .map(|d| d.to_string())
                .collect();
            Some(format!("SIM-{last4}"))
        }
    };

    let note = trimmed(&req.note);
    validate_optional_text(&note, "note", MAX_NOTE_LEN)?;

    Ok(ValidatedCheckout {
        street,
        postal_code,
        city,
        payment_reference,
        note,
    })
}

/// POST /api/checkout - place an order from the session cart
///
/// Products that went off sale since they were added are pruned from the
/// cart and the checkout is refused, so the customer sees the new total
/// before paying.
pub async fn checkout(
    State(state): State<ServerState>,
    user: CurrentUser,
    session: Session,
    Json(req): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let checkout = validate_checkout(&req)?;

    let resolved = resolve_session(state.pool(), &session).await?;
    if resolved.has_stale() {
        let ids: Vec<i64> = resolved.stale.iter().map(|(_, id)| *id).collect();
        return Err(AppError::with_message(
            ErrorCode::ProductUnavailable,
            "Some products are no longer available and were removed from your cart",
        )
        .with_detail("product_ids", ids));
    }
    if resolved.view.is_empty() {
        return Err(AppError::new(ErrorCode::CartEmpty));
    }

    let lines = resolved
        .view
        .lines
        .iter()
        .map(|l| NewOrderLine {
            product_id: l.product.id,
            quantity: l.quantity,
        })
        .collect();

    let order = procedures::create_order(
        state.pool(),
        NewOrder {
            user_id: user.id,
            delivery_mode: req.delivery_mode,
            street: checkout.street,
            postal_code: checkout.postal_code,
            city: checkout.city,
            payment_method: req.payment_method,
            payment_reference: checkout.payment_reference,
            note: checkout.note,
            lines,
        },
    )
    .await?;

    session.update_cart(|cart| cart.clear())?;

    tracing::info!(
        order_id = order.order.id,
        user_id = user.id,
        total = order.order.total,
        status = %order.order.status,
        "Order placed"
    );
    Ok(ok_with_message(order, "Order placed"))
}
