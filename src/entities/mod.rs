pub mod category;
pub mod customer;
pub mod order;
pub mod order_row;
pub mod product;

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};
use tracing::debug;

use crate::entities::{
    category::Entity as Category, customer::Entity as Customer, order::Entity as Order,
    order_row::Entity as OrderRow, product::Entity as Product,
};

/// Creates every table and index that is missing. Existing tables are left
/// untouched, so this is safe to run on every startup.
pub async fn ensure_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    create_table(db, Category).await?;
    create_table(db, Product).await?;
    create_table(db, Customer).await?;
    create_table(db, Order).await?;
    create_table(db, OrderRow).await?;
    Ok(())
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(backend.build(&table)).await?;

    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(backend.build(&index)).await?;
    }

    debug!(table = %entity.table_name(), "table ensured");
    Ok(())
}
