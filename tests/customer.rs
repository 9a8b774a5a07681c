mod common;

use catalog_orders::customer::{self, CustomerPatch, NewCustomer};
use catalog_orders::order;
use catalog_orders::StoreError;
use common::{category, customer as create_customer, place_order, product, setup};

#[tokio::test]
async fn test_added_customer_is_retrievable() {
    let db = setup().await;

    let created = customer::add_customer(
        &db,
        NewCustomer::new("Anna", "Svensson", " anna@example.com ", "hunter2"),
    )
    .await
    .expect("Failed to add customer");

    let stored = customer::get_customer(&db, created.id).await.unwrap();
    assert_eq!(stored.first_name, "Anna");
    assert_eq!(stored.last_name, "Svensson");
    assert_eq!(stored.email, "anna@example.com");
    assert_eq!(stored.password, "hunter2");
    assert_eq!(stored.full_name(), "Anna Svensson");
    assert_eq!(customer::list_customers(&db).await.unwrap(), vec![stored]);
}

#[tokio::test]
async fn test_customer_fields_are_required() {
    let db = setup().await;

    let inputs = [
        NewCustomer::new("", "Svensson", "anna@example.com", "pw"),
        NewCustomer::new("Anna", "  ", "anna@example.com", "pw"),
        NewCustomer::new("Anna", "Svensson", "", "pw"),
        NewCustomer::new("Anna", "Svensson", "anna@example.com", ""),
        NewCustomer::new("Anna", "Svensson", "anna.example.com", "pw"),
        NewCustomer::new("a".repeat(101), "Svensson", "anna@example.com", "pw"),
    ];
    for input in inputs {
        let result = customer::add_customer(&db, input.clone()).await;
        assert!(
            matches!(result, Err(StoreError::Validation(_))),
            "{input:?} should be rejected"
        );
    }
    assert!(customer::list_customers(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_customer_keeps_blank_fields() {
    let db = setup().await;
    let anna = create_customer(&db, "Anna").await;

    let updated = customer::edit_customer(
        &db,
        anna.id,
        CustomerPatch {
            last_name: Some("Berg".into()),
            password: Some("correct horse".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.first_name, "Anna");
    assert_eq!(updated.last_name, "Berg");
    assert_eq!(updated.email, anna.email);
    assert_eq!(updated.password, "correct horse");

    let bad_email = customer::edit_customer(
        &db,
        anna.id,
        CustomerPatch {
            email: Some("not-an-email".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(bad_email, Err(StoreError::Validation(_))));
    assert_eq!(customer::get_customer(&db, anna.id).await.unwrap(), updated);

    let missing = customer::edit_customer(&db, 99, CustomerPatch::default()).await;
    assert!(matches!(
        missing,
        Err(StoreError::NotFound { entity: "Customer", id: 99 })
    ));
}

#[tokio::test]
async fn test_delete_customer_removes_their_orders() {
    let db = setup().await;
    let books = category(&db, "Books").await;
    let novel = product(&db, "Novel", 19900, books.id).await;
    let atlas = product(&db, "Atlas", 45000, books.id).await;
    let anna = create_customer(&db, "Anna").await;
    let bo = create_customer(&db, "Bo").await;

    place_order(&db, anna.id, &[(novel.id, 1), (atlas.id, 2)]).await;
    place_order(&db, anna.id, &[(atlas.id, 1)]).await;
    let kept = place_order(&db, bo.id, &[(novel.id, 3)]).await;

    customer::delete_customer(&db, anna.id)
        .await
        .expect("Failed to delete customer");

    let orders = order::list_orders(&db).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, kept.order.id);
    assert_eq!(order::count_order_rows(&db).await.unwrap(), 1);
    assert!(matches!(
        customer::get_customer(&db, anna.id).await,
        Err(StoreError::NotFound { .. })
    ));
    assert_eq!(catalog_orders::catalog::list_products(&db).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_missing_customer_is_not_found() {
    let db = setup().await;
    let result = customer::delete_customer(&db, 3).await;
    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}

#[tokio::test]
async fn test_password_is_not_serialized() {
    let db = setup().await;
    let anna = create_customer(&db, "Anna").await;

    let json = serde_json::to_value(&anna).unwrap();
    assert_eq!(json["email"], "anna@example.com");
    assert!(json.get("password").is_none());
}
