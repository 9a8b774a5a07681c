use std::collections::HashSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{info, warn};
use validator::Validate;

use crate::catalog::product::purge_products;
use crate::entities::{category, product};
use crate::error::{Result, StoreError};
use crate::storage;
use crate::validation::{not_blank, trimmed};

#[derive(Clone, Debug, Validate)]
pub struct NewCategory {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub name: String,
    pub parent_id: Option<i32>,
}

impl NewCategory {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_id: None,
        }
    }

    pub fn child_of(name: impl Into<String>, parent_id: i32) -> Self {
        Self {
            name: name.into(),
            parent_id: Some(parent_id),
        }
    }
}

/// Fields left as `None` keep their stored value. `parent_id: Some(None)`
/// turns the category into a root.
#[derive(Clone, Debug, Default, Validate)]
pub struct CategoryPatch {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub name: Option<String>,
    pub parent_id: Option<Option<i32>>,
}

impl CategoryPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn move_to(parent_id: Option<i32>) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Default::default()
        }
    }
}

pub(crate) async fn find_category<C: ConnectionTrait>(db: &C, id: i32) -> Result<category::Model> {
    category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::not_found("Category", id))
}

pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Ok(category::Entity::find()
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?)
}

pub async fn get_category(db: &DatabaseConnection, id: i32) -> Result<category::Model> {
    find_category(db, id).await
}

pub async fn list_child_categories(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Vec<category::Model>> {
    find_category(db, id).await?;
    Ok(category::Entity::find()
        .filter(category::Column::ParentId.eq(id))
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?)
}

pub async fn list_products_in_category(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Vec<product::Model>> {
    find_category(db, id).await?;
    Ok(product::Entity::find()
        .filter(product::Column::CategoryId.eq(id))
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?)
}

pub async fn add_category(db: &DatabaseConnection, input: NewCategory) -> Result<category::Model> {
    let input = NewCategory {
        name: trimmed(input.name),
        ..input
    };
    if let Err(err) = input.validate() {
        warn!(name = %input.name, "rejected category");
        return Err(err.into());
    }

    let txn = storage::begin(db).await?;
    let result = insert_category(&txn, input).await;
    let created = storage::finish(txn, result).await?;

    info!(category_id = created.id, parent_id = ?created.parent_id, "category created");
    Ok(created)
}

pub async fn edit_category(
    db: &DatabaseConnection,
    id: i32,
    patch: CategoryPatch,
) -> Result<category::Model> {
    let patch = CategoryPatch {
        name: patch.name.map(trimmed),
        ..patch
    };
    if let Err(err) = patch.validate() {
        warn!(category_id = id, "rejected category update");
        return Err(err.into());
    }

    let txn = storage::begin(db).await?;
    let result = update_category(&txn, id, patch).await;
    let updated = storage::finish(txn, result).await?;

    info!(category_id = id, "category updated");
    Ok(updated)
}

async fn insert_category<C: ConnectionTrait>(db: &C, input: NewCategory) -> Result<category::Model> {
    if let Some(parent_id) = input.parent_id {
        find_category(db, parent_id).await?;
    }
    let created = category::ActiveModel {
        name: Set(input.name),
        parent_id: Set(input.parent_id),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(created)
}

async fn update_category<C: ConnectionTrait>(
    db: &C,
    id: i32,
    patch: CategoryPatch,
) -> Result<category::Model> {
    let current = find_category(db, id).await?;
    if patch.name.is_none() && patch.parent_id.is_none() {
        return Ok(current);
    }

    let mut category: category::ActiveModel = current.into();
    if let Some(name) = patch.name {
        category.name = Set(name);
    }
    if let Some(parent_id) = patch.parent_id {
        if let Some(parent_id) = parent_id {
            find_category(db, parent_id).await?;
            ensure_no_cycle(db, id, parent_id).await?;
        }
        category.parent_id = Set(parent_id);
    }
    Ok(category.update(db).await?)
}

/// Walks up from `new_parent_id` and fails if `id` shows up on the way.
async fn ensure_no_cycle<C: ConnectionTrait>(db: &C, id: i32, new_parent_id: i32) -> Result<()> {
    let mut seen = HashSet::new();
    let mut cursor = Some(new_parent_id);
    while let Some(current_id) = cursor {
        if current_id == id {
            return Err(StoreError::Conflict(format!(
                "moving category {id} under {new_parent_id} would create a cycle"
            )));
        }
        if !seen.insert(current_id) {
            break;
        }
        cursor = find_category(db, current_id).await?.parent_id;
    }
    Ok(())
}

/// Fails with `Conflict` while the category still has children. Products in
/// the category are removed together with the rows ordering them.
pub async fn delete_category(db: &DatabaseConnection, id: i32) -> Result<()> {
    let txn = storage::begin(db).await?;
    let result = remove_category(&txn, id).await;

    match storage::finish(txn, result).await {
        Ok(products_removed) => {
            info!(category_id = id, products_removed, "category deleted");
            Ok(())
        }
        Err(err) => {
            warn!(category_id = id, error = %err, "category not deleted");
            Err(err)
        }
    }
}

// Restrict on the tree edge, cascade on the product edge.
async fn remove_category<C: ConnectionTrait>(db: &C, id: i32) -> Result<u64> {
    find_category(db, id).await?;

    let children = category::Entity::find()
        .filter(category::Column::ParentId.eq(id))
        .count(db)
        .await?;
    if children > 0 {
        return Err(StoreError::Conflict(format!(
            "category {id} still has {children} child categories"
        )));
    }

    let product_ids: Vec<i32> = product::Entity::find()
        .filter(product::Column::CategoryId.eq(id))
        .all(db)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    let removed = purge_products(db, product_ids).await?;

    category::Entity::delete_by_id(id).exec(db).await?;
    Ok(removed)
}
