//! # Dashboard Summary
//!
//! Headline figures computed from the in-memory collections.
//!
//! Only completed sales count towards revenue; pending and cancelled sales
//! are listed but never summed.

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Customer, Product, Sale, SaleStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardSummary {
    pub today_sales_count: u32,
    pub today_revenue: Money,
    pub total_revenue: Money,
    pub product_count: u32,
    pub low_stock_count: u32,
    pub customer_count: u32,

    /// Credit owed across all customers.
    pub outstanding_credit: Money,
}

impl DashboardSummary {
    /// `today` is the store's local calendar date; sale timestamps are
    /// placed on that calendar through `zone`.
    pub fn compute<Tz: TimeZone>(
        products: &[Product],
        customers: &[Customer],
        sales: &[Sale],
        today: NaiveDate,
        zone: &Tz,
    ) -> Self {
        let completed = sales.iter().filter(|s| s.status == SaleStatus::Completed);

        let mut summary = DashboardSummary {
            product_count: products.len() as u32,
            low_stock_count: products.iter().filter(|p| p.is_low_stock()).count() as u32,
            customer_count: customers.len() as u32,
            outstanding_credit: customers.iter().map(|c| c.outstanding_balance).sum(),
            ..Default::default()
        };

        for sale in completed {
            summary.total_revenue += sale.total;
            if sale.date.with_timezone(zone).date_naive() == today {
                summary.today_sales_count += 1;
                summary.today_revenue += sale.total;
            }
        }

        summary
    }
}

/// Products at or below their reorder level, lowest stock first.
pub fn low_stock_products(products: &[Product]) -> Vec<&Product> {
    let mut low: Vec<&Product> = products.iter().filter(|p| p.is_low_stock()).collect();
    low.sort_by_key(|p| p.quantity);
    low
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CartItem, PaymentMode};
    use chrono::{TimeZone, Utc};

    fn sale(total: i64, day: u32, status: SaleStatus) -> Sale {
        let product = Product::new("TEA", "Tea", Money::from_major(total), 10);
        Sale {
            id: crate::types::new_id(),
            invoice_number: "INV-2026-0001".to_string(),
            customer_id: None,
            customer_name: None,
            items: vec![CartItem::new(product, 1)],
            subtotal: Money::from_major(total),
            discount: Money::zero(),
            tax: Money::zero(),
            total: Money::from_major(total),
            payment_mode: PaymentMode::Cash,
            cashier_id: "c1".to_string(),
            cashier_name: "Ravi".to_string(),
            date: Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap(),
            status,
            loyalty_points_awarded: 0,
        }
    }

    #[test]
    fn test_summary() {
        let mut low = Product::new("RICE", "Rice", Money::from_major(650), 2);
        low.reorder_level = 5;
        let mut fine = Product::new("SALT", "Salt", Money::from_major(20), 50);
        fine.reorder_level = 5;

        let mut meena = Customer::new("Meena", "9800000000");
        meena.outstanding_balance = Money::from_major(1_200);
        let mut arjun = Customer::new("Arjun", "9800000001");
        arjun.outstanding_balance = Money::from_major(300);

        let sales = vec![
            sale(100, 14, SaleStatus::Completed),
            sale(250, 14, SaleStatus::Completed),
            sale(999, 14, SaleStatus::Cancelled),
            sale(400, 13, SaleStatus::Completed),
        ];
        let today = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();

        let summary = DashboardSummary::compute(&[low, fine], &[meena, arjun], &sales, today, &Utc);
        assert_eq!(summary.today_sales_count, 2);
        assert_eq!(summary.today_revenue, Money::from_major(350));
        assert_eq!(summary.total_revenue, Money::from_major(750));
        assert_eq!(summary.low_stock_count, 1);
        assert_eq!(summary.outstanding_credit, Money::from_major(1_500));
    }

    #[test]
    fn test_today_follows_store_zone() {
        let ist = chrono::FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let mut early = sale(120, 13, SaleStatus::Completed);
        // 01:30 on the 14th in India
        early.date = Utc.with_ymd_and_hms(2026, 3, 13, 20, 0, 0).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();

        let local = DashboardSummary::compute(&[], &[], &[early.clone()], today, &ist);
        assert_eq!(local.today_sales_count, 1);
        assert_eq!(local.today_revenue, Money::from_major(120));

        let utc = DashboardSummary::compute(&[], &[], &[early], today, &Utc);
        assert_eq!(utc.today_sales_count, 0);
    }

    #[test]
    fn test_low_stock_sorted() {
        let mut a = Product::new("A", "A", Money::zero(), 3);
        a.reorder_level = 5;
        let mut b = Product::new("B", "B", Money::zero(), 0);
        b.reorder_level = 5;
        let c = Product::new("C", "C", Money::zero(), 10);

        let products = [a, b, c];
        let low = low_stock_products(&products);
        assert_eq!(low.iter().map(|p| p.sku.as_str()).collect::<Vec<_>>(), ["B", "A"]);
    }
}
