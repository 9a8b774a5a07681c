use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeUtc;
use serde::Serialize;

/// A row waiting to be written. `unit_price` is the product price at the
/// moment the row was added and is never looked up again.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PendingRow {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl PendingRow {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// An order being assembled in memory.
///
/// Nothing is written until the builder is handed to
/// [`finalize`](crate::order::finalize); dropping it instead leaves the
/// database exactly as it was.
#[derive(Clone, Debug)]
pub struct OrderBuilder {
    customer_id: i32,
    created_at: DateTimeUtc,
    rows: Vec<PendingRow>,
}

impl OrderBuilder {
    pub(crate) fn new(customer_id: i32, created_at: DateTimeUtc) -> Self {
        Self {
            customer_id,
            created_at,
            rows: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, row: PendingRow) -> &PendingRow {
        self.rows.push(row);
        &self.rows[self.rows.len() - 1]
    }

    pub(crate) fn into_parts(self) -> (i32, DateTimeUtc, Vec<PendingRow>) {
        (self.customer_id, self.created_at, self.rows)
    }

    pub fn customer_id(&self) -> i32 {
        self.customer_id
    }

    pub fn created_at(&self) -> DateTimeUtc {
        self.created_at
    }

    /// Rows in the order they were added.
    pub fn rows(&self) -> &[PendingRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.rows.iter().map(PendingRow::subtotal).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(product_id: i32, quantity: i32, cents: i64) -> PendingRow {
        PendingRow {
            product_id,
            quantity,
            unit_price: Decimal::new(cents, 2),
        }
    }

    #[test]
    fn new_builder_is_empty() {
        let builder = OrderBuilder::new(3, Utc::now());
        assert!(builder.is_empty());
        assert_eq!(builder.customer_id(), 3);
        assert_eq!(builder.total(), Decimal::ZERO);
    }

    #[test]
    fn rows_keep_insertion_order() {
        let mut builder = OrderBuilder::new(1, Utc::now());
        builder.push(row(9, 1, 100));
        builder.push(row(2, 1, 100));
        builder.push(row(9, 4, 100));

        let ids: Vec<i32> = builder.rows().iter().map(|r| r.product_id).collect();
        assert_eq!(ids, vec![9, 2, 9]);
        assert_eq!(builder.len(), 3);
    }

    #[test]
    fn total_sums_quantity_times_unit_price() {
        let mut builder = OrderBuilder::new(1, Utc::now());
        builder.push(row(1, 2, 1000));
        builder.push(row(2, 1, 500));

        assert_eq!(builder.rows()[0].subtotal(), Decimal::new(2000, 2));
        assert_eq!(builder.total(), Decimal::new(2500, 2));
    }

    #[test]
    fn created_at_is_fixed_at_start() {
        let started = Utc::now();
        let mut builder = OrderBuilder::new(1, started);
        builder.push(row(1, 1, 100));
        assert_eq!(builder.created_at(), started);
    }
}
