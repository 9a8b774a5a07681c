//! Customers. Deleting a customer takes their orders with them.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::{info, warn};
use validator::Validate;

use crate::entities::{customer, order, order_row};
use crate::error::{Result, StoreError};
use crate::storage;
use crate::validation::{not_blank, trimmed};

#[derive(Clone, Debug, Validate)]
pub struct NewCustomer {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub last_name: String,
    #[validate(email, length(max = 200))]
    pub email: String,
    #[validate(length(min = 1), custom(function = "not_blank"))]
    pub password: String,
}

impl NewCustomer {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    fn trimmed(self) -> Self {
        Self {
            first_name: trimmed(self.first_name),
            last_name: trimmed(self.last_name),
            email: trimmed(self.email),
            password: trimmed(self.password),
        }
    }
}

#[derive(Clone, Debug, Default, Validate)]
pub struct CustomerPatch {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub last_name: Option<String>,
    #[validate(email, length(max = 200))]
    pub email: Option<String>,
    #[validate(length(min = 1), custom(function = "not_blank"))]
    pub password: Option<String>,
}

impl CustomerPatch {
    fn trimmed(self) -> Self {
        Self {
            first_name: self.first_name.map(trimmed),
            last_name: self.last_name.map(trimmed),
            email: self.email.map(trimmed),
            password: self.password.map(trimmed),
        }
    }
}

pub(crate) async fn find_customer<C: ConnectionTrait>(db: &C, id: i32) -> Result<customer::Model> {
    customer::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::not_found("Customer", id))
}

pub async fn list_customers(db: &DatabaseConnection) -> Result<Vec<customer::Model>> {
    Ok(customer::Entity::find()
        .order_by_asc(customer::Column::Id)
        .all(db)
        .await?)
}

pub async fn get_customer(db: &DatabaseConnection, id: i32) -> Result<customer::Model> {
    find_customer(db, id).await
}

pub async fn add_customer(db: &DatabaseConnection, input: NewCustomer) -> Result<customer::Model> {
    let input = input.trimmed();
    if let Err(err) = input.validate() {
        warn!(email = %input.email, "rejected customer");
        return Err(err.into());
    }

    let created = customer::ActiveModel {
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        email: Set(input.email),
        password: Set(input.password),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(customer_id = created.id, "customer created");
    Ok(created)
}

pub async fn edit_customer(
    db: &DatabaseConnection,
    id: i32,
    patch: CustomerPatch,
) -> Result<customer::Model> {
    let patch = patch.trimmed();
    if let Err(err) = patch.validate() {
        warn!(customer_id = id, "rejected customer update");
        return Err(err.into());
    }

    let txn = storage::begin(db).await?;
    let result = update_customer(&txn, id, patch).await;
    let updated = storage::finish(txn, result).await?;

    info!(customer_id = id, "customer updated");
    Ok(updated)
}

/// Deletes the customer, all of their orders and the rows of those orders.
/// Asking the user for confirmation is up to the caller.
pub async fn delete_customer(db: &DatabaseConnection, id: i32) -> Result<()> {
    let txn = storage::begin(db).await?;
    let result = remove_customer(&txn, id).await;
    let orders_removed = storage::finish(txn, result).await?;

    info!(customer_id = id, orders_removed, "customer deleted");
    Ok(())
}

async fn update_customer<C: ConnectionTrait>(
    db: &C,
    id: i32,
    patch: CustomerPatch,
) -> Result<customer::Model> {
    let current = find_customer(db, id).await?;
    let mut customer: customer::ActiveModel = current.clone().into();
    let mut changed = false;

    if let Some(first_name) = patch.first_name {
        customer.first_name = Set(first_name);
        changed = true;
    }
    if let Some(last_name) = patch.last_name {
        customer.last_name = Set(last_name);
        changed = true;
    }
    if let Some(email) = patch.email {
        customer.email = Set(email);
        changed = true;
    }
    if let Some(password) = patch.password {
        customer.password = Set(password);
        changed = true;
    }

    if !changed {
        return Ok(current);
    }
    Ok(customer.update(db).await?)
}

// Customer to order and order to row are both cascading edges.
async fn remove_customer<C: ConnectionTrait>(db: &C, id: i32) -> Result<u64> {
    find_customer(db, id).await?;

    let order_ids: Vec<i32> = order::Entity::find()
        .select_only()
        .column(order::Column::Id)
        .filter(order::Column::CustomerId.eq(id))
        .into_tuple()
        .all(db)
        .await?;

    let mut orders_removed = 0;
    if !order_ids.is_empty() {
        order_row::Entity::delete_many()
            .filter(order_row::Column::OrderId.is_in(order_ids.clone()))
            .exec(db)
            .await?;
        orders_removed = order::Entity::delete_many()
            .filter(order::Column::Id.is_in(order_ids))
            .exec(db)
            .await?
            .rows_affected;
    }

    customer::Entity::delete_by_id(id).exec(db).await?;
    Ok(orders_removed)
}
