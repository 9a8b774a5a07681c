use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{info, warn};
use validator::Validate;

use crate::catalog::category::find_category;
use crate::entities::{order_row, product};
use crate::error::{Result, StoreError};
use crate::storage;
use crate::validation::{check_price, not_blank, trimmed};

#[derive(Clone, Debug, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub name: String,
    pub price: Decimal,
    pub category_id: i32,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: Decimal, category_id: i32) -> Self {
        Self {
            name: name.into(),
            price,
            category_id,
        }
    }
}

#[derive(Clone, Debug, Default, Validate)]
pub struct ProductPatch {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<i32>,
}

impl ProductPatch {
    pub fn price(price: Decimal) -> Self {
        Self {
            price: Some(price),
            ..Default::default()
        }
    }

    fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.category_id.is_none()
    }
}

pub(crate) async fn find_product<C: ConnectionTrait>(db: &C, id: i32) -> Result<product::Model> {
    product::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::not_found("Product", id))
}

pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Ok(product::Entity::find()
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?)
}

pub async fn get_product(db: &DatabaseConnection, id: i32) -> Result<product::Model> {
    find_product(db, id).await
}

pub async fn add_product(db: &DatabaseConnection, input: NewProduct) -> Result<product::Model> {
    let input = NewProduct {
        name: trimmed(input.name),
        ..input
    };
    if let Err(err) = input.validate() {
        warn!(name = %input.name, "rejected product");
        return Err(err.into());
    }
    check_price(input.price)?;

    let txn = storage::begin(db).await?;
    let result = insert_product(&txn, input).await;
    let created = storage::finish(txn, result).await?;

    info!(product_id = created.id, category_id = created.category_id, price = %created.price, "product created");
    Ok(created)
}

pub async fn edit_product(
    db: &DatabaseConnection,
    id: i32,
    patch: ProductPatch,
) -> Result<product::Model> {
    let patch = ProductPatch {
        name: patch.name.map(trimmed),
        ..patch
    };
    if let Err(err) = patch.validate() {
        warn!(product_id = id, "rejected product update");
        return Err(err.into());
    }
    if let Some(price) = patch.price {
        check_price(price)?;
    }

    let txn = storage::begin(db).await?;
    let result = update_product(&txn, id, patch).await;
    let updated = storage::finish(txn, result).await?;

    info!(product_id = id, price = %updated.price, "product updated");
    Ok(updated)
}

/// Removes the product and every order row that references it.
pub async fn delete_product(db: &DatabaseConnection, id: i32) -> Result<()> {
    let txn = storage::begin(db).await?;
    let result = remove_product(&txn, id).await;
    storage::finish(txn, result).await?;

    info!(product_id = id, "product deleted");
    Ok(())
}

async fn insert_product<C: ConnectionTrait>(db: &C, input: NewProduct) -> Result<product::Model> {
    find_category(db, input.category_id).await?;
    let created = product::ActiveModel {
        name: Set(input.name),
        price: Set(input.price),
        category_id: Set(input.category_id),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(created)
}

async fn update_product<C: ConnectionTrait>(
    db: &C,
    id: i32,
    patch: ProductPatch,
) -> Result<product::Model> {
    let current = find_product(db, id).await?;
    if patch.is_empty() {
        return Ok(current);
    }

    let mut product: product::ActiveModel = current.into();
    if let Some(name) = patch.name {
        product.name = Set(name);
    }
    if let Some(price) = patch.price {
        product.price = Set(price);
    }
    if let Some(category_id) = patch.category_id {
        find_category(db, category_id).await?;
        product.category_id = Set(category_id);
    }
    Ok(product.update(db).await?)
}

async fn remove_product<C: ConnectionTrait>(db: &C, id: i32) -> Result<()> {
    find_product(db, id).await?;
    purge_products(db, vec![id]).await?;
    Ok(())
}

/// Product to order row is a cascading edge: rows go first, then the products.
/// Returns how many products were removed.
pub(crate) async fn purge_products<C: ConnectionTrait>(db: &C, product_ids: Vec<i32>) -> Result<u64> {
    if product_ids.is_empty() {
        return Ok(0);
    }

    let rows = order_row::Entity::delete_many()
        .filter(order_row::Column::ProductId.is_in(product_ids.clone()))
        .exec(db)
        .await?;
    let products = product::Entity::delete_many()
        .filter(product::Column::Id.is_in(product_ids))
        .exec(db)
        .await?;

    if rows.rows_affected > 0 {
        warn!(rows_removed = rows.rows_affected, "order rows removed with their products");
    }
    Ok(products.rows_affected)
}
