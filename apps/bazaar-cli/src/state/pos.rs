//! # POS State
//!
//! The in-memory store: every collection, loaded once, mutated only
//! through the methods below.
//!
//! ## Mutation Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  command ──► PosState::<mutation>(&mut self, ...)                       │
//! │                  │                                                      │
//! │                  ├── validate input (bazaar_core::validation)           │
//! │                  ├── apply business rule (bazaar_core::*)               │
//! │                  ├── update the in-memory collection                    │
//! │                  └── write the collection back (DbState::persist)       │
//! │                          │                                              │
//! │                          └── failure? warn! and keep going              │
//! │                                                                         │
//! │  Products, customers, employees, sales: whole-collection JSON values   │
//! │  Attendance: point upserts, one row per (employee, date)               │
//! │  Invoice counter: its own value, written with every sale               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sale Commit
//! ```text
//! commit_sale(items, pricing, customer, cashier, payment)
//!   │
//!   ├── prepare_sale() ── pure: stock, credit, totals, points, Sale
//!   │        │
//!   │        └── Err ──► nothing changed
//!   │
//!   ├── apply_stock_delta() per line   (same path as adjust_stock)
//!   ├── customer balance / points / last purchase
//!   ├── append sale, advance invoice counter
//!   └── persist products, customers, sales, counter
//! ```

use std::collections::BTreeMap;

use bazaar_core::attendance::{
    compute_daily_counters, compute_monthly_kpis, export_rows, render_csv, roster_rows,
    AttendanceLedger, AttendanceStatus, DailyCounters, MonthlyKpis, YearMonth,
};
use bazaar_core::cart::Pricing;
use bazaar_core::checkout::{
    next_invoice_number, prepare_sale, CheckoutPolicy, CheckoutRequest, InvoiceSequence,
};
use bazaar_core::loyalty::{points_to_monetary_value, redeemable_points};
use bazaar_core::summary::{low_stock_products, DashboardSummary};
use bazaar_core::validation::{
    validate_email, validate_name, validate_payment_amount, validate_phone, validate_price,
    validate_search_query, validate_sku, validate_stock_level, validate_unique_sku,
};
use bazaar_core::{
    CartItem, CoreError, CoreResult, Customer, Employee, EmployeeStatus, Money, PaymentMode,
    Product, Role, Sale, SaleStatus,
};
use bazaar_store::StorageKey;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::ConfigState;
use super::db::DbState;

// =============================================================================
// Inputs
// =============================================================================

/// Editable product fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductInput {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub purchase_price: Money,
    pub selling_price: Money,
    pub quantity: i64,
    pub reorder_level: i64,
    pub supplier: String,
    pub barcode: Option<String>,
}

/// Editable customer fields. Balance and points change only through sales,
/// payments and redemptions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerInput {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Editable employee fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub salary: Money,
    /// Defaults to today.
    #[serde(default)]
    pub joining_date: Option<NaiveDate>,
}

// =============================================================================
// Outcomes
// =============================================================================

/// A committed sale plus the soft credit message, if any.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommittedSale {
    pub sale: Sale,
    /// Set when a credit sale came close to, or (permissive policy) went
    /// past, the credit limit.
    pub credit_warning: Option<String>,
}

/// Result of a loyalty redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub points_redeemed: i64,
    pub value: Money,
    pub points_remaining: i64,
}

// =============================================================================
// PosState
// =============================================================================

#[derive(Debug)]
pub struct PosState {
    db: DbState,
    products: Vec<Product>,
    customers: Vec<Customer>,
    employees: Vec<Employee>,
    sales: Vec<Sale>,
    ledger: AttendanceLedger,
    invoices: InvoiceSequence,
    pricing: Pricing,
    policy: CheckoutPolicy,
    /// Store time zone; "today" and invoice years are read in it.
    zone: FixedOffset,
}

impl PosState {
    /// Reads every collection once. Unreadable collections start empty.
    pub async fn load(db: DbState, config: &ConfigState) -> Self {
        let products: Vec<Product> = db.load_or_default(StorageKey::Products).await;
        let customers: Vec<Customer> = db.load_or_default(StorageKey::Customers).await;
        let employees: Vec<Employee> = db.load_or_default(StorageKey::Employees).await;
        let sales: Vec<Sale> = db.load_or_default(StorageKey::Sales).await;
        let ledger = db.load_ledger().await;

        // Never go backwards: the stored counter may lag the sales (first
        // run on old data) or lead them (sales removed by hand).
        let stored: InvoiceSequence = db.load_or_default(StorageKey::InvoiceSequence).await;
        let seeded = InvoiceSequence::seeded_from(&sales);
        let invoices =
            InvoiceSequence::starting_after(stored.last_issued().max(seeded.last_issued()));

        info!(
            products = products.len(),
            customers = customers.len(),
            employees = employees.len(),
            sales = sales.len(),
            attendance = ledger.len(),
            last_invoice = invoices.last_issued(),
            "POS state loaded"
        );

        PosState {
            db,
            products,
            customers,
            employees,
            sales,
            ledger,
            invoices,
            pricing: config.pricing(),
            policy: config.checkout_policy(),
            zone: config.time_zone(),
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub fn db(&self) -> &DbState {
        &self.db
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn ledger(&self) -> &AttendanceLedger {
        &self.ledger
    }

    pub fn pricing(&self) -> Pricing {
        self.pricing
    }

    pub fn policy(&self) -> CheckoutPolicy {
        self.policy
    }

    pub fn invoice_sequence(&self) -> InvoiceSequence {
        self.invoices
    }

    /// Looks a product up by id or SKU (case-insensitive).
    pub fn product(&self, key: &str) -> CoreResult<&Product> {
        let key = key.trim();
        self.products
            .iter()
            .find(|p| p.id == key || p.sku.eq_ignore_ascii_case(key))
            .ok_or_else(|| CoreError::ProductNotFound(key.to_string()))
    }

    /// Looks a customer up by id or phone number.
    pub fn customer(&self, key: &str) -> CoreResult<&Customer> {
        let key = key.trim();
        self.customers
            .iter()
            .find(|c| c.id == key || c.phone == key)
            .ok_or_else(|| CoreError::CustomerNotFound(key.to_string()))
    }

    pub fn employee(&self, id: &str) -> CoreResult<&Employee> {
        self.employees
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| CoreError::EmployeeNotFound(id.to_string()))
    }

    /// Looks a sale up by id or invoice number.
    pub fn sale(&self, key: &str) -> CoreResult<&Sale> {
        self.sales
            .iter()
            .find(|s| s.id == key || s.invoice_number == key)
            .ok_or_else(|| CoreError::SaleNotFound(key.to_string()))
    }

    /// Name, SKU, barcode or category containing `query`.
    pub fn search_products(&self, query: &str) -> CoreResult<Vec<&Product>> {
        let query = validate_search_query(query)?.to_lowercase();
        Ok(self
            .products
            .iter()
            .filter(|p| {
                query.is_empty()
                    || p.name.to_lowercase().contains(&query)
                    || p.sku.to_lowercase().contains(&query)
                    || p.category.to_lowercase().contains(&query)
                    || p.barcode.as_deref() == Some(query.as_str())
            })
            .collect())
    }

    pub fn low_stock(&self) -> Vec<&Product> {
        low_stock_products(&self.products)
    }

    pub fn dashboard(&self, today: NaiveDate) -> DashboardSummary {
        DashboardSummary::compute(&self.products, &self.customers, &self.sales, today, &self.zone)
    }

    /// The store's calendar date at `instant`.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.zone).date_naive()
    }

    /// Invoice number the next sale will get.
    pub fn next_invoice_number(&self, now: DateTime<Utc>) -> String {
        next_invoice_number(&self.invoices, now.with_timezone(&self.zone))
    }

    pub fn monthly_kpis(&self, employee_id: &str, month: YearMonth) -> CoreResult<MonthlyKpis> {
        let employee = self.employee(employee_id)?;
        let records = self.ledger.load_month(&employee.id, month);
        let days: Vec<NaiveDate> = month.days().collect();
        Ok(compute_monthly_kpis(&records, &days))
    }

    /// One employee's marked days in a month.
    pub fn attendance_month(
        &self,
        employee_id: &str,
        month: YearMonth,
    ) -> CoreResult<BTreeMap<NaiveDate, AttendanceStatus>> {
        let employee = self.employee(employee_id)?;
        Ok(self.ledger.load_month(&employee.id, month))
    }

    /// Head-count for a day across active employees.
    pub fn daily_counters(&self, date: NaiveDate) -> DailyCounters {
        let active: Vec<Employee> = self.employees.iter().filter(|e| e.is_active).cloned().collect();
        compute_daily_counters(&active, &self.ledger, date)
    }

    /// CSV sheet for one employee, or for every active employee.
    pub fn attendance_csv(&self, employee_id: Option<&str>, month: YearMonth) -> CoreResult<String> {
        match employee_id {
            Some(id) => render_csv(export_rows(self.employee(id)?, &self.ledger, month)),
            None => {
                let active: Vec<Employee> =
                    self.employees.iter().filter(|e| e.is_active).cloned().collect();
                render_csv(roster_rows(&active, &self.ledger, month))
            }
        }
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    pub async fn add_product(&mut self, input: ProductInput) -> CoreResult<Product> {
        validate_product(&input)?;
        validate_unique_sku(&self.products, &input.sku, None)?;

        let mut product = Product::new(
            input.sku.trim(),
            input.name.trim(),
            input.selling_price,
            input.quantity,
        );
        apply_product_input(&mut product, input);

        info!(id = %product.id, sku = %product.sku, "Product added");
        self.products.push(product.clone());
        self.save_products().await;
        Ok(product)
    }

    pub async fn update_product(&mut self, id: &str, input: ProductInput) -> CoreResult<Product> {
        validate_product(&input)?;
        validate_unique_sku(&self.products, &input.sku, Some(id))?;

        let product = find_mut(&mut self.products, |p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
        apply_product_input(product, input);
        product.updated_at = Utc::now();
        let updated = product.clone();

        info!(id = %updated.id, sku = %updated.sku, "Product updated");
        self.save_products().await;
        Ok(updated)
    }

    pub async fn delete_product(&mut self, id: &str) -> CoreResult<Product> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
        let removed = self.products.remove(index);

        info!(id = %removed.id, sku = %removed.sku, "Product deleted");
        self.save_products().await;
        Ok(removed)
    }

    /// Manual inventory edit: adds `delta` (negative to remove) to stock.
    pub async fn adjust_stock(&mut self, id: &str, delta: i64) -> CoreResult<Product> {
        let product = self
            .products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;

        if delta < 0 && !self.policy.allow_negative_stock && !product.has_stock_for(-delta) {
            return Err(CoreError::InsufficientStock {
                sku: product.sku.clone(),
                available: product.quantity,
                requested: -delta,
            });
        }

        let updated = apply_stock_delta(&mut self.products, id, delta, Utc::now())?.clone();
        info!(sku = %updated.sku, delta, quantity = updated.quantity, "Stock adjusted");
        self.save_products().await;
        Ok(updated)
    }

    // -------------------------------------------------------------------------
    // Customers
    // -------------------------------------------------------------------------

    pub async fn add_customer(&mut self, input: CustomerInput) -> CoreResult<Customer> {
        validate_customer(&input)?;

        let mut customer = Customer::new(input.name.trim(), input.phone.trim());
        customer.email = input.email;
        customer.address = input.address;

        info!(id = %customer.id, "Customer added");
        self.customers.push(customer.clone());
        self.save_customers().await;
        Ok(customer)
    }

    pub async fn update_customer(&mut self, id: &str, input: CustomerInput) -> CoreResult<Customer> {
        validate_customer(&input)?;

        let customer = find_mut(&mut self.customers, |c| c.id == id)
            .ok_or_else(|| CoreError::CustomerNotFound(id.to_string()))?;
        customer.name = input.name.trim().to_string();
        customer.phone = input.phone.trim().to_string();
        customer.email = input.email;
        customer.address = input.address;
        let updated = customer.clone();

        info!(id = %updated.id, "Customer updated");
        self.save_customers().await;
        Ok(updated)
    }

    /// Records a payment against the customer's outstanding credit.
    pub async fn record_customer_payment(&mut self, id: &str, amount: Money) -> CoreResult<Customer> {
        validate_payment_amount(amount)?;

        let customer = find_mut(&mut self.customers, |c| c.id == id)
            .ok_or_else(|| CoreError::CustomerNotFound(id.to_string()))?;
        if amount > customer.outstanding_balance {
            return Err(CoreError::PaymentExceedsBalance {
                payment: amount,
                balance: customer.outstanding_balance,
            });
        }
        customer.outstanding_balance -= amount;
        let updated = customer.clone();

        info!(id = %updated.id, %amount, balance = %updated.outstanding_balance, "Payment recorded");
        self.save_customers().await;
        Ok(updated)
    }

    /// Redeems up to `requested` points. Asking for more than the balance
    /// redeems the whole balance.
    pub async fn redeem_loyalty_points(&mut self, id: &str, requested: i64) -> CoreResult<Redemption> {
        let customer = find_mut(&mut self.customers, |c| c.id == id)
            .ok_or_else(|| CoreError::CustomerNotFound(id.to_string()))?;

        let points = redeemable_points(customer.loyalty_points, requested);
        customer.loyalty_points -= points;
        let redemption = Redemption {
            points_redeemed: points,
            value: points_to_monetary_value(points),
            points_remaining: customer.loyalty_points,
        };

        info!(id = %id, points, "Loyalty points redeemed");
        self.save_customers().await;
        Ok(redemption)
    }

    // -------------------------------------------------------------------------
    // Employees
    // -------------------------------------------------------------------------

    pub async fn add_employee(&mut self, input: EmployeeInput) -> CoreResult<Employee> {
        validate_employee(&input)?;

        let mut employee = Employee::new(input.name.trim(), input.role);
        employee.joining_date = self.local_date(Utc::now());
        apply_employee_input(&mut employee, input);

        info!(id = %employee.id, role = ?employee.role, "Employee added");
        self.employees.push(employee.clone());
        self.save_employees().await;
        Ok(employee)
    }

    pub async fn update_employee(&mut self, id: &str, input: EmployeeInput) -> CoreResult<Employee> {
        validate_employee(&input)?;

        let employee = find_mut(&mut self.employees, |e| e.id == id)
            .ok_or_else(|| CoreError::EmployeeNotFound(id.to_string()))?;
        apply_employee_input(employee, input);
        let updated = employee.clone();

        info!(id = %updated.id, "Employee updated");
        self.save_employees().await;
        Ok(updated)
    }

    /// Sets the "today" status and the active flag on the employee record.
    pub async fn set_employee_status(
        &mut self,
        id: &str,
        status: EmployeeStatus,
        is_active: bool,
    ) -> CoreResult<Employee> {
        let employee = find_mut(&mut self.employees, |e| e.id == id)
            .ok_or_else(|| CoreError::EmployeeNotFound(id.to_string()))?;
        employee.attendance_status = status;
        employee.is_active = is_active;
        let updated = employee.clone();

        info!(id = %updated.id, status = ?status, is_active, "Employee status set");
        self.save_employees().await;
        Ok(updated)
    }

    // -------------------------------------------------------------------------
    // Sales
    // -------------------------------------------------------------------------

    /// Turns cart lines into a sale and applies every side effect.
    ///
    /// On `Err` nothing has changed. The caller clears its cart on `Ok`.
    pub async fn commit_sale(
        &mut self,
        items: &[CartItem],
        pricing: Pricing,
        customer_id: Option<&str>,
        cashier_id: &str,
        payment_mode: PaymentMode,
        now: DateTime<Utc>,
    ) -> CoreResult<CommittedSale> {
        let customer = customer_id.map(|id| self.customer(id)).transpose()?;
        let cashier = self.employee(cashier_id)?;
        let request = CheckoutRequest {
            payment_mode,
            customer,
            cashier,
        };

        let draft = prepare_sale(
            items,
            &self.products,
            pricing,
            request,
            self.policy,
            self.next_invoice_number(now),
            now,
        )?;

        for decrement in &draft.stock_decrements {
            apply_stock_delta(&mut self.products, &decrement.product_id, -decrement.quantity, now)?;
        }

        if let Some(update) = &draft.customer_update {
            let customer = find_mut(&mut self.customers, |c| c.id == update.customer_id)
                .ok_or_else(|| CoreError::CustomerNotFound(update.customer_id.clone()))?;
            customer.outstanding_balance += update.balance_increase;
            customer.loyalty_points += update.points_awarded;
            customer.last_purchase = Some(update.purchased_at);
        }

        let credit_warning = draft
            .credit_check
            .filter(|check| !check.message.is_empty())
            .map(|check| {
                warn!(invoice = %draft.sale.invoice_number, message = %check.message, "Credit warning");
                check.message
            });

        self.invoices.advance();
        self.sales.push(draft.sale.clone());

        info!(
            invoice = %draft.sale.invoice_number,
            total = %draft.sale.total,
            items = draft.sale.items.len(),
            payment = ?draft.sale.payment_mode,
            "Sale committed"
        );

        self.save_products().await;
        if draft.customer_update.is_some() {
            self.save_customers().await;
        }
        self.save_sales().await;
        self.db
            .persist(StorageKey::InvoiceSequence, &self.invoices)
            .await;

        Ok(CommittedSale {
            sale: draft.sale,
            credit_warning,
        })
    }

    /// Moves a sale to a new status. Items and amounts never change.
    pub async fn update_sale_status(&mut self, key: &str, status: SaleStatus) -> CoreResult<Sale> {
        let sale = find_mut(&mut self.sales, |s| s.id == key || s.invoice_number == key)
            .ok_or_else(|| CoreError::SaleNotFound(key.to_string()))?;

        if !sale.status.can_transition_to(status) {
            return Err(CoreError::InvalidSaleStatus {
                sale_id: sale.invoice_number.clone(),
                current_status: sale.status.to_string(),
            });
        }
        sale.status = status;
        let updated = sale.clone();

        info!(invoice = %updated.invoice_number, %status, "Sale status updated");
        self.save_sales().await;
        Ok(updated)
    }

    // -------------------------------------------------------------------------
    // Attendance
    // -------------------------------------------------------------------------

    /// Sets one (employee, day) cell. Marking twice keeps the latest status.
    pub async fn mark_attendance(
        &mut self,
        employee_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> CoreResult<Option<AttendanceStatus>> {
        let employee_id = self.employee(employee_id)?.id.clone();
        let previous = self.ledger.mark(employee_id.clone(), date, status);

        debug!(employee_id = %employee_id, %date, %status, ?previous, "Attendance marked");
        self.db
            .persist_attendance(&[(employee_id, date, status)])
            .await;
        Ok(previous)
    }

    /// Marks every listed employee present for `date` in one write.
    pub async fn mark_all_present(&mut self, employee_ids: &[String], date: NaiveDate) -> CoreResult<usize> {
        for id in employee_ids {
            self.employee(id)?;
        }

        let count = self.ledger.mark_all_present(employee_ids.iter(), date);
        let records: Vec<_> = employee_ids
            .iter()
            .map(|id| (id.clone(), date, AttendanceStatus::Present))
            .collect();

        info!(%date, count, "Marked all present");
        self.db.persist_attendance(&records).await;
        Ok(count)
    }

    /// Ids of every active employee, for "mark all present".
    pub fn active_employee_ids(&self) -> Vec<String> {
        self.employees
            .iter()
            .filter(|e| e.is_active)
            .map(|e| e.id.clone())
            .collect()
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    async fn save_products(&self) {
        self.db.persist(StorageKey::Products, &self.products).await;
    }

    async fn save_customers(&self) {
        self.db.persist(StorageKey::Customers, &self.customers).await;
    }

    async fn save_employees(&self) {
        self.db.persist(StorageKey::Employees, &self.employees).await;
    }

    async fn save_sales(&self) {
        self.db.persist(StorageKey::Sales, &self.sales).await;
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn find_mut<T>(items: &mut [T], pred: impl Fn(&T) -> bool) -> Option<&mut T> {
    items.iter_mut().find(|item| pred(item))
}

/// The one place stock changes, for sales and manual edits alike.
fn apply_stock_delta<'a>(
    products: &'a mut [Product],
    id: &str,
    delta: i64,
    now: DateTime<Utc>,
) -> CoreResult<&'a Product> {
    let product = find_mut(products, |p| p.id == id)
        .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
    product.quantity += delta;
    product.updated_at = now;
    Ok(product)
}

fn validate_product(input: &ProductInput) -> CoreResult<()> {
    validate_sku(&input.sku)?;
    validate_name("name", &input.name)?;
    validate_price("purchase price", input.purchase_price)?;
    validate_price("selling price", input.selling_price)?;
    validate_stock_level("quantity", input.quantity)?;
    validate_stock_level("reorder level", input.reorder_level)?;
    Ok(())
}

fn apply_product_input(product: &mut Product, input: ProductInput) {
    product.sku = input.sku.trim().to_string();
    product.name = input.name.trim().to_string();
    product.category = input.category;
    product.brand = input.brand;
    product.purchase_price = input.purchase_price;
    product.selling_price = input.selling_price;
    product.quantity = input.quantity;
    product.reorder_level = input.reorder_level;
    product.supplier = input.supplier;
    product.barcode = input.barcode.filter(|b| !b.trim().is_empty());
}

fn validate_customer(input: &CustomerInput) -> CoreResult<()> {
    validate_name("name", &input.name)?;
    validate_phone(&input.phone)?;
    if let Some(email) = &input.email {
        validate_email(email)?;
    }
    Ok(())
}

fn validate_employee(input: &EmployeeInput) -> CoreResult<()> {
    validate_name("name", &input.name)?;
    if !input.phone.trim().is_empty() {
        validate_phone(&input.phone)?;
    }
    validate_email(&input.email)?;
    validate_price("salary", input.salary)?;
    Ok(())
}

fn apply_employee_input(employee: &mut Employee, input: EmployeeInput) {
    employee.name = input.name.trim().to_string();
    employee.role = input.role;
    employee.phone = input.phone.trim().to_string();
    employee.email = input.email.trim().to_string();
    employee.salary = input.salary;
    if let Some(joining_date) = input.joining_date {
        employee.joining_date = joining_date;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_store::{Database, DbConfig};

    async fn state() -> PosState {
        let db = DbState::new(Database::new(DbConfig::in_memory()).await.unwrap());
        PosState::load(db, &ConfigState::default()).await
    }

    fn tea() -> ProductInput {
        ProductInput {
            sku: "TEA-250".to_string(),
            name: "Tea 250g".to_string(),
            selling_price: Money::from_major(250),
            quantity: 10,
            reorder_level: 2,
            ..ProductInput::default()
        }
    }

    fn cashier() -> EmployeeInput {
        EmployeeInput {
            name: "Asha".to_string(),
            role: Role::Cashier,
            phone: String::new(),
            email: String::new(),
            salary: Money::zero(),
            joining_date: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let mut pos = state().await;
        pos.add_product(tea()).await.unwrap();

        let mut dup = tea();
        dup.sku = "tea-250".to_string();
        let err = pos.add_product(dup).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_adjust_stock_guards_negative() {
        let mut pos = state().await;
        let product = pos.add_product(tea()).await.unwrap();

        let err = pos.adjust_stock(&product.id, -11).await.unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { available: 10, .. }));

        let updated = pos.adjust_stock(&product.id, -4).await.unwrap();
        assert_eq!(updated.quantity, 6);
    }

    #[tokio::test]
    async fn test_payment_cannot_exceed_balance() {
        let mut pos = state().await;
        let customer = pos
            .add_customer(CustomerInput {
                name: "Ravi".to_string(),
                phone: "9876543210".to_string(),
                ..CustomerInput::default()
            })
            .await
            .unwrap();

        let err = pos
            .record_customer_payment(&customer.id, Money::from_major(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::PaymentExceedsBalance { .. }));
    }

    #[tokio::test]
    async fn test_sale_status_transitions() {
        let mut pos = state().await;
        let product = pos.add_product(tea()).await.unwrap();
        let cashier = pos.add_employee(cashier()).await.unwrap();
        let items = vec![CartItem::new(product, 1)];

        let committed = pos
            .commit_sale(&items, Pricing::default(), None, &cashier.id, PaymentMode::Cash, Utc::now())
            .await
            .unwrap();
        let invoice = committed.sale.invoice_number;

        let cancelled = pos.update_sale_status(&invoice, SaleStatus::Cancelled).await.unwrap();
        assert_eq!(cancelled.status, SaleStatus::Cancelled);
        // no restock on cancel
        assert_eq!(pos.product("TEA-250").unwrap().quantity, 9);

        let err = pos
            .update_sale_status(&invoice, SaleStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidSaleStatus { .. }));
    }

    #[tokio::test]
    async fn test_failed_commit_changes_nothing() {
        let mut pos = state().await;
        let product = pos.add_product(tea()).await.unwrap();
        let cashier = pos.add_employee(cashier()).await.unwrap();
        let items = vec![CartItem::new(product, 3)];

        let err = pos
            .commit_sale(&items, Pricing::default(), None, &cashier.id, PaymentMode::Credit, Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::CreditRequiresCustomer));
        assert!(pos.sales().is_empty());
        assert_eq!(pos.product("TEA-250").unwrap().quantity, 10);
        assert_eq!(pos.invoice_sequence().last_issued(), 0);
    }

    #[tokio::test]
    async fn test_split_lines_cannot_oversell() {
        let mut pos = state().await;
        let product = pos.add_product(tea()).await.unwrap();
        let cashier = pos.add_employee(cashier()).await.unwrap();
        let items = vec![CartItem::new(product.clone(), 6), CartItem::new(product, 6)];

        let err = pos
            .commit_sale(&items, Pricing::default(), None, &cashier.id, PaymentMode::Cash, Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::InsufficientStock { available: 10, requested: 12, .. }));
        assert_eq!(pos.product("TEA-250").unwrap().quantity, 10);
        assert!(pos.sales().is_empty());
    }

    #[tokio::test]
    async fn test_mark_attendance_unknown_employee() {
        let mut pos = state().await;
        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let err = pos
            .mark_attendance("ghost", day, AttendanceStatus::Present)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::EmployeeNotFound(_)));
        assert!(pos.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_redeem_clamps_to_balance() {
        let mut pos = state().await;
        let mut customer = pos
            .add_customer(CustomerInput {
                name: "Meena".to_string(),
                phone: "9123456780".to_string(),
                ..CustomerInput::default()
            })
            .await
            .unwrap();
        customer.loyalty_points = 7;
        pos.customers[0] = customer.clone();

        let redemption = pos.redeem_loyalty_points(&customer.id, 50).await.unwrap();
        assert_eq!(redemption.points_redeemed, 7);
        assert_eq!(redemption.value, Money::from_major(700));
        assert_eq!(redemption.points_remaining, 0);
    }
}
