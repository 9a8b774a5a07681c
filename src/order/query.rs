use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeUtc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select,
};
use serde::Serialize;
use tracing::warn;

use crate::customer::find_customer;
use crate::entities::{customer, order, order_row, product};
use crate::error::{Result, StoreError};
use crate::storage;

/// One row of an order together with the product it refers to.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderLine {
    pub row: order_row::Model,
    pub product: product::Model,
}

impl OrderLine {
    pub fn subtotal(&self) -> Decimal {
        self.row.subtotal()
    }
}

/// A stored order with its customer and every line, in insertion order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderDetails {
    pub order: order::Model,
    pub customer: customer::Model,
    pub lines: Vec<OrderLine>,
}

impl OrderDetails {
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(OrderLine::subtotal).sum()
    }
}

/// Order header for listings. Rows are not loaded.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderSummary {
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub customer_id: i32,
    pub customer_first_name: String,
    pub customer_last_name: String,
}

impl OrderSummary {
    fn new(order: order::Model, customer: customer::Model) -> Self {
        Self {
            id: order.id,
            created_at: order.created_at,
            customer_id: customer.id,
            customer_first_name: customer.first_name,
            customer_last_name: customer.last_name,
        }
    }
}

pub async fn get_order(db: &DatabaseConnection, id: i32) -> Result<OrderDetails> {
    // Header, customer and lines come from the same snapshot.
    let txn = storage::begin(db).await?;
    let result = load_order(&txn, id).await;
    storage::finish(txn, result).await
}

pub async fn list_orders(db: &DatabaseConnection) -> Result<Vec<OrderSummary>> {
    summaries(db, order::Entity::find()).await
}

pub async fn list_orders_for_customer(
    db: &DatabaseConnection,
    customer_id: i32,
) -> Result<Vec<OrderSummary>> {
    find_customer(db, customer_id).await?;
    summaries(
        db,
        order::Entity::find().filter(order::Column::CustomerId.eq(customer_id)),
    )
    .await
}

pub async fn count_orders(db: &DatabaseConnection) -> Result<u64> {
    Ok(order::Entity::find().count(db).await?)
}

pub async fn count_order_rows(db: &DatabaseConnection) -> Result<u64> {
    Ok(order_row::Entity::find().count(db).await?)
}

pub(crate) async fn load_order<C: ConnectionTrait>(db: &C, id: i32) -> Result<OrderDetails> {
    let order = order::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::not_found("Order", id))?;
    let customer = find_customer(db, order.customer_id).await?;

    let lines = order_row::Entity::find()
        .filter(order_row::Column::OrderId.eq(id))
        .order_by_asc(order_row::Column::Id)
        .find_also_related(product::Entity)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(row, product)| match product {
            Some(product) => Some(OrderLine { row, product }),
            None => {
                warn!(order_id = id, row_id = row.id, "order row without product skipped");
                None
            }
        })
        .collect();

    Ok(OrderDetails {
        order,
        customer,
        lines,
    })
}

// Newest first; id breaks ties between orders started in the same instant.
async fn summaries<C: ConnectionTrait>(
    db: &C,
    select: Select<order::Entity>,
) -> Result<Vec<OrderSummary>> {
    let orders = select
        .find_also_related(customer::Entity)
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?;

    Ok(orders
        .into_iter()
        .filter_map(|(order, customer)| customer.map(|customer| OrderSummary::new(order, customer)))
        .collect())
}
