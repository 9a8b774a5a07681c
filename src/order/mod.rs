//! Order aggregate: an order header plus its rows, built in memory and
//! written in one transaction.

pub mod builder;
pub mod query;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set};
use tracing::{debug, error, info, warn};

use crate::catalog::product::find_product;
use crate::customer::find_customer;
use crate::entities::{order, order_row};
use crate::error::{Result, StoreError};
use crate::storage;
use crate::validation::positive_quantity;

pub use builder::{OrderBuilder, PendingRow};
pub use query::{
    count_order_rows, count_orders, get_order, list_orders, list_orders_for_customer,
    OrderDetails, OrderLine, OrderSummary,
};

/// Starts an order for an existing customer. The creation time is taken here,
/// once, and not when rows are added or the order is saved.
pub async fn start_order(db: &DatabaseConnection, customer_id: i32) -> Result<OrderBuilder> {
    find_customer(db, customer_id).await?;
    Ok(OrderBuilder::new(customer_id, Utc::now()))
}

/// Appends a row priced at the product's current price. On error the builder
/// is left unchanged.
pub async fn add_row(
    db: &DatabaseConnection,
    builder: &mut OrderBuilder,
    product_id: i32,
    quantity: i32,
) -> Result<PendingRow> {
    positive_quantity(quantity)?;
    let product = find_product(db, product_id).await?;

    let row = builder.push(PendingRow {
        product_id,
        quantity,
        unit_price: product.price,
    });
    Ok(row.clone())
}

/// Writes the order header and all of its rows, or nothing at all.
pub async fn finalize(db: &DatabaseConnection, builder: OrderBuilder) -> Result<OrderDetails> {
    if builder.is_empty() {
        warn!(customer_id = builder.customer_id(), "empty order discarded");
        return Err(StoreError::validation("empty order"));
    }

    let txn = storage::begin(db).await?;
    let result = persist_order(&txn, builder).await;
    match storage::finish(txn, result).await {
        Ok(details) => {
            info!(
                order_id = details.order.id,
                customer_id = details.customer.id,
                rows = details.lines.len(),
                total = %details.total(),
                "order created"
            );
            Ok(details)
        }
        Err(err) => {
            error!(error = %err, "order rolled back");
            Err(err)
        }
    }
}

/// Removes every order row and then every order. Returns the number of
/// orders removed; on failure nothing is removed.
pub async fn clear_all_orders(db: &DatabaseConnection) -> Result<u64> {
    let txn = storage::begin(db).await?;
    let result = remove_all_orders(&txn).await;
    match storage::finish(txn, result).await {
        Ok(orders_removed) => {
            info!(orders_removed, "all orders cleared");
            Ok(orders_removed)
        }
        Err(err) => {
            error!(error = %err, "clearing orders rolled back");
            Err(err)
        }
    }
}

async fn persist_order<C: ConnectionTrait>(db: &C, builder: OrderBuilder) -> Result<OrderDetails> {
    let (customer_id, created_at, rows) = builder.into_parts();
    let customer = find_customer(db, customer_id).await?;

    let order = order::ActiveModel {
        customer_id: Set(customer_id),
        created_at: Set(created_at),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let mut lines = Vec::with_capacity(rows.len());
    for pending in rows {
        let product = find_product(db, pending.product_id).await?;
        let row = order_row::ActiveModel {
            order_id: Set(order.id),
            product_id: Set(pending.product_id),
            quantity: Set(pending.quantity),
            unit_price: Set(pending.unit_price),
            ..Default::default()
        }
        .insert(db)
        .await?;
        lines.push(OrderLine { row, product });
    }

    Ok(OrderDetails {
        order,
        customer,
        lines,
    })
}

async fn remove_all_orders<C: ConnectionTrait>(db: &C) -> Result<u64> {
    let rows = order_row::Entity::delete_many().exec(db).await?;
    let orders = order::Entity::delete_many().exec(db).await?;
    debug!(rows_removed = rows.rows_affected, "order rows removed");
    Ok(orders.rows_affected)
}
