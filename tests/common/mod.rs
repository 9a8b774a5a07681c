#![allow(dead_code)]

use catalog_orders::catalog::{self, NewCategory, NewProduct};
use catalog_orders::customer::{self, NewCustomer};
use catalog_orders::entities::{category, customer as customer_entity, product};
use catalog_orders::order::{self, OrderDetails};
use catalog_orders::{storage, Config};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseConnection};

/// Fresh in-memory database with the schema in place.
pub async fn setup() -> DatabaseConnection {
    storage::connect(&Config::in_memory())
        .await
        .expect("Failed to open test database")
}

pub fn price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub async fn category(db: &DatabaseConnection, name: &str) -> category::Model {
    catalog::add_category(db, NewCategory::root(name))
        .await
        .expect("Failed to create category")
}

pub async fn product(
    db: &DatabaseConnection,
    name: &str,
    cents: i64,
    category_id: i32,
) -> product::Model {
    catalog::add_product(db, NewProduct::new(name, price(cents), category_id))
        .await
        .expect("Failed to create product")
}

pub async fn customer(db: &DatabaseConnection, first_name: &str) -> customer_entity::Model {
    let email = format!("{}@example.com", first_name.to_lowercase());
    customer::add_customer(db, NewCustomer::new(first_name, "Svensson", email, "hunter2"))
        .await
        .expect("Failed to create customer")
}

/// Places an order with one row per `(product_id, quantity)`.
pub async fn place_order(
    db: &DatabaseConnection,
    customer_id: i32,
    rows: &[(i32, i32)],
) -> OrderDetails {
    let mut builder = order::start_order(db, customer_id)
        .await
        .expect("Failed to start order");
    for &(product_id, quantity) in rows {
        order::add_row(db, &mut builder, product_id, quantity)
            .await
            .expect("Failed to add row");
    }
    order::finalize(db, builder)
        .await
        .expect("Failed to finalize order")
}

/// Installs a trigger that aborts every `event` (INSERT/DELETE/UPDATE) on `table`.
pub async fn fail_on(db: &DatabaseConnection, event: &str, table: &str) {
    let sql = format!(
        "CREATE TRIGGER fail_{event}_{table} BEFORE {event} ON {table} \
         BEGIN SELECT RAISE(ABORT, 'forced failure'); END;"
    );
    db.execute_unprepared(&sql)
        .await
        .expect("Failed to install trigger");
}
