//! Order creation
//!
//! Re-reads every product inside the transaction so prices and availability
//! are the ones in force at commit time, not the ones the cart last saw.

use std::collections::BTreeMap;

use shared::error::ErrorCode;
use shared::models::{DeliveryMode, OrderDetail, OrderStatus, PaymentMethod};
use sqlx::SqlitePool;

use super::product_in_tx;
use crate::db::repository::{RepoError, RepoResult, order};

#[derive(Debug, Clone, Copy)]
pub struct NewOrderLine {
    pub product_id: i64,
    pub quantity: i64,
}

/// Validated checkout ready to be persisted
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub delivery_mode: DeliveryMode,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub payment_method: PaymentMethod,
    pub payment_reference: Option<String>,
    pub note: Option<String>,
    pub lines: Vec<NewOrderLine>,
}

impl NewOrder {
    /// Card payments are settled at checkout, cash on delivery or pickup
    pub fn initial_status(&self) -> OrderStatus {
        match self.payment_method {
            PaymentMethod::Card => OrderStatus::Paid,
            PaymentMethod::Cash => OrderStatus::Pending,
        }
    }
}

pub async fn create_order(pool: &SqlitePool, data: NewOrder) -> RepoResult<OrderDetail> {
    if data.lines.is_empty() {
        return Err(RepoError::business(ErrorCode::CartEmpty, "Cart is empty"));
    }

    let mut tx = pool.begin().await?;

    // (product_id, name, unit_price, quantity)
    let mut snapshot = Vec::with_capacity(data.lines.len());
    // stock holder id -> units demanded; custom pizzas draw on their base
    let mut demand: BTreeMap<i64, i64> = BTreeMap::new();

    for line in &data.lines {
        if line.quantity <= 0 {
            return Err(RepoError::business(
                ErrorCode::InvalidQuantity,
                format!("Invalid quantity {} for product {}", line.quantity, line.product_id),
            ));
        }
        let product = match product_in_tx(&mut tx, line.product_id).await? {
            Some(p) if p.is_active => p,
            _ => {
                return Err(RepoError::business(
                    ErrorCode::ProductUnavailable,
                    format!("Product {} is no longer available", line.product_id),
                ));
            }
        };
        let holder = product.base_pizza_id.unwrap_or(product.id);
        let units = demand.entry(holder).or_default();
        *units = units
            .checked_add(line.quantity)
            .ok_or_else(|| RepoError::Validation("Order quantity is out of range".into()))?;
        snapshot.push((product.id, product.name, product.price, line.quantity));
    }

    let now = shared::util::now_millis();

    for (holder, units) in &demand {
        let rows = sqlx::query(
            "UPDATE product SET stock = stock - ?1, updated_at = ?2 WHERE id = ?3 AND is_active = 1 AND stock >= ?1",
        )
        .bind(units)
        .bind(now)
        .bind(holder)
        .execute(&mut *tx)
        .await?;
        if rows.rows_affected() == 0 {
            let (name, stock) = match product_in_tx(&mut tx, *holder).await? {
                Some(p) if p.is_active => (p.name, p.stock),
                _ => {
                    return Err(RepoError::business(
                        ErrorCode::ProductUnavailable,
                        format!("Product {holder} is no longer available"),
                    ));
                }
            };
            return Err(RepoError::business(
                ErrorCode::InsufficientStock,
                format!("Not enough '{name}' in stock: {units} requested, {stock} left"),
            ));
        }
    }

    let total = snapshot
        .iter()
        .try_fold(0i64, |acc, (_, _, price, qty)| {
            price.checked_mul(*qty).and_then(|line| acc.checked_add(line))
        })
        .ok_or_else(|| RepoError::Validation("Order total is out of range".into()))?;
    let order_id = shared::util::snowflake_id();
    let status = data.initial_status();

    sqlx::query(
        "INSERT INTO customer_order (id, user_id, status, delivery_mode, street, postal_code, city, payment_method, payment_reference, total, note, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
    )
    .bind(order_id)
    .bind(data.user_id)
    .bind(status)
    .bind(data.delivery_mode)
    .bind(&data.street)
    .bind(&data.postal_code)
    .bind(&data.city)
    .bind(data.payment_method)
    .bind(&data.payment_reference)
    .bind(total)
    .bind(&data.note)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for (product_id, name, unit_price, quantity) in &snapshot {
        sqlx::query(
            "INSERT INTO order_line (order_id, product_id, product_name, unit_price, quantity) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(order_id)
        .bind(product_id)
        .bind(name)
        .bind(unit_price)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        order_id,
        user_id = data.user_id,
        status = %status,
        total,
        lines = snapshot.len(),
        "Order created"
    );

    order::find_detail(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::procedures::create_custom_pizza;
    use crate::db::repository::{stock, user};
    use shared::models::{CustomPizzaRequest, UserRole};

    async fn customer(db: &DbService) -> i64 {
        user::create(
            &db.pool,
            user::NewUser {
                email: "luigi@example.com".into(),
                password_hash: "x".into(),
                first_name: "Luigi".into(),
                last_name: "Verdi".into(),
                phone: None,
                role: UserRole::Customer,
            },
        )
        .await
        .unwrap()
        .id
    }

    fn pickup(user_id: i64, payment_method: PaymentMethod, lines: Vec<NewOrderLine>) -> NewOrder {
        NewOrder {
            user_id,
            delivery_mode: DeliveryMode::Pickup,
            street: None,
            postal_code: None,
            city: None,
            payment_method,
            payment_reference: None,
            note: None,
            lines,
        }
    }

    fn line(product_id: i64, quantity: i64) -> NewOrderLine {
        NewOrderLine {
            product_id,
            quantity,
        }
    }

    async fn stock_of(db: &DbService, id: i64) -> i64 {
        stock::find_by_product(&db.pool, id).await.unwrap().unwrap().stock
    }

    #[tokio::test]
    async fn test_order_snapshots_lines_and_decrements_stock() {
        let db = DbService::in_memory().await.unwrap();
        let user_id = customer(&db).await;

        let detail = create_order(
            &db.pool,
            pickup(user_id, PaymentMethod::Cash, vec![line(101, 2), line(301, 3)]),
        )
        .await
        .unwrap();

        assert_eq!(detail.order.status, OrderStatus::Pending);
        assert_eq!(detail.order.total, 2 * 900 + 3 * 300);
        assert_eq!(detail.lines.len(), 2);
        assert_eq!(detail.lines[0].product_name, "Margherita");
        assert_eq!(stock_of(&db, 101).await, 48);
        assert_eq!(stock_of(&db, 301).await, 117);
    }

    #[tokio::test]
    async fn test_card_payment_marks_order_paid() {
        let db = DbService::in_memory().await.unwrap();
        let user_id = customer(&db).await;
        let mut data = pickup(user_id, PaymentMethod::Card, vec![line(401, 1)]);
        data.payment_reference = Some("SIM-1111".into());

        let detail = create_order(&db.pool, data).await.unwrap();
        assert_eq!(detail.order.status, OrderStatus::Paid);
        assert_eq!(detail.order.payment_reference.as_deref(), Some("SIM-1111"));
    }

    #[tokio::test]
    async fn test_insufficient_stock_rolls_back_everything() {
        let db = DbService::in_memory().await.unwrap();
        let user_id = customer(&db).await;
        stock::set(&db.pool, 402, 1).await.unwrap();

        let err = create_order(
            &db.pool,
            pickup(user_id, PaymentMethod::Cash, vec![line(101, 1), line(402, 2)]),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            RepoError::Business(ErrorCode::InsufficientStock, _)
        ));
        assert_eq!(stock_of(&db, 101).await, 50);
        assert!(order::find_by_user(&db.pool, user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_custom_pizza_consumes_base_stock() {
        let db = DbService::in_memory().await.unwrap();
        let user_id = customer(&db).await;
        let custom = create_custom_pizza(
            &db.pool,
            &CustomPizzaRequest {
                base_pizza_id: 104,
                removed_ingredient_ids: vec![10],
                added_supplement_ids: vec![],
                quantity: None,
            },
        )
        .await
        .unwrap();

        create_order(
            &db.pool,
            pickup(
                user_id,
                PaymentMethod::Cash,
                vec![line(custom.product_id, 2), line(104, 1)],
            ),
        )
        .await
        .unwrap();
        assert_eq!(stock_of(&db, 104).await, 27);
    }

    #[tokio::test]
    async fn test_total_overflow_rolls_back() {
        let db = DbService::in_memory().await.unwrap();
        let user_id = customer(&db).await;
        sqlx::query("UPDATE product SET price = ? WHERE id = 101")
            .bind(i64::MAX / 2)
            .execute(&db.pool)
            .await
            .unwrap();

        let err = create_order(
            &db.pool,
            pickup(user_id, PaymentMethod::Cash, vec![line(101, 3)]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
        assert_eq!(stock_of(&db, 101).await, 50);
        assert!(order::find_by_user(&db.pool, user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inactive_product_and_empty_cart() {
        let db = DbService::in_memory().await.unwrap();
        let user_id = customer(&db).await;

        let err = create_order(&db.pool, pickup(user_id, PaymentMethod::Cash, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::CartEmpty, _)));

        crate::db::repository::product::deactivate(&db.pool, 502)
            .await
            .unwrap();
        let err = create_order(
            &db.pool,
            pickup(user_id, PaymentMethod::Cash, vec![line(502, 1)]),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            RepoError::Business(ErrorCode::ProductUnavailable, _)
        ));
    }
}
