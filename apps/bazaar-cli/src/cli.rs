//! # Command Line
//!
//! `bazaar` subcommands and their dispatch onto [`crate::commands`].
//!
//! ```text
//! bazaar [--config FILE] [--db FILE] <command>
//!
//!   status | config | dashboard | low-stock
//!   product    list | show | add | update | delete | stock
//!   customer   list | show | add | update | pay | redeem
//!   employee   list | add | update | status | permissions
//!   sell       --cashier ID --item SKU[:QTY] ... [--customer KEY] [--payment MODE]
//!   sales      list | show | status | next-invoice
//!   attendance mark | all-present | month | kpis | today | export
//!   credit     check | customer
//!   loyalty    preview
//! ```
//!
//! Output is pretty JSON on stdout, except `attendance export` which
//! writes CSV. Errors go to stderr as `{"code": ..., "message": ...}`.

use std::path::PathBuf;
use std::str::FromStr;

use bazaar_core::attendance::{AttendanceStatus, YearMonth};
use bazaar_core::cart::Pricing;
use bazaar_core::{
    DiscountRate, EmployeeStatus, Money, PaymentMode, Role, SaleStatus, TaxRate, ValidationError,
};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::commands;
use crate::error::ApiError;
use crate::state::{AppState, CustomerInput, EmployeeInput, ProductInput};

#[derive(Debug, Parser)]
#[command(name = "bazaar", about = "Bazaar POS back office", version)]
pub struct Cli {
    /// Config file (default: config.toml in the platform config dir)
    #[arg(long, global = true, env = "BAZAAR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database file, overrides the config
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configuration, store health and collection sizes
    Status,
    /// Effective configuration
    Config,
    /// Today's sales, stock and attendance summary
    Dashboard,
    /// Products at or below their reorder level
    LowStock,
    #[command(subcommand)]
    Product(ProductCommand),
    #[command(subcommand)]
    Customer(CustomerCommand),
    #[command(subcommand)]
    Employee(EmployeeCommand),
    /// Ring up and commit a sale
    Sell(SellArgs),
    #[command(subcommand)]
    Sales(SalesCommand),
    #[command(subcommand)]
    Attendance(AttendanceCommand),
    #[command(subcommand)]
    Credit(CreditCommand),
    #[command(subcommand)]
    Loyalty(LoyaltyCommand),
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    List {
        /// Match on name, SKU, category or barcode
        #[arg(long, default_value = "")]
        query: String,
    },
    Show {
        /// Product id or SKU
        key: String,
    },
    Add(ProductArgs),
    Update {
        key: String,
        #[command(flatten)]
        product: ProductArgs,
    },
    Delete {
        key: String,
    },
    /// Add (or with a negative number, remove) stock
    Stock {
        key: String,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
}

#[derive(Debug, Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub sku: String,
    #[arg(long)]
    pub name: String,
    /// Selling price, e.g. 250 or 1,249.50
    #[arg(long)]
    pub price: Money,
    /// Purchase price
    #[arg(long, default_value = "0")]
    pub cost: Money,
    #[arg(long, default_value_t = 0)]
    pub qty: i64,
    #[arg(long, default_value_t = 0)]
    pub reorder_level: i64,
    #[arg(long, default_value = "")]
    pub category: String,
    #[arg(long, default_value = "")]
    pub brand: String,
    #[arg(long, default_value = "")]
    pub supplier: String,
    #[arg(long)]
    pub barcode: Option<String>,
}

impl From<ProductArgs> for ProductInput {
    fn from(args: ProductArgs) -> Self {
        ProductInput {
            sku: args.sku,
            name: args.name,
            category: args.category,
            brand: args.brand,
            purchase_price: args.cost,
            selling_price: args.price,
            quantity: args.qty,
            reorder_level: args.reorder_level,
            supplier: args.supplier,
            barcode: args.barcode,
        }
    }
}

// =============================================================================
// Customers
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum CustomerCommand {
    List,
    Show {
        /// Customer id or phone
        key: String,
    },
    Add(CustomerArgs),
    Update {
        key: String,
        #[command(flatten)]
        customer: CustomerArgs,
    },
    /// Record a payment against outstanding credit
    Pay {
        key: String,
        amount: Money,
    },
    /// Redeem loyalty points
    Redeem {
        key: String,
        points: i64,
    },
}

#[derive(Debug, Args)]
pub struct CustomerArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
}

impl From<CustomerArgs> for CustomerInput {
    fn from(args: CustomerArgs) -> Self {
        CustomerInput {
            name: args.name,
            phone: args.phone,
            email: args.email,
            address: args.address,
        }
    }
}

// =============================================================================
// Employees
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum EmployeeCommand {
    List,
    Add(EmployeeArgs),
    Update {
        id: String,
        #[command(flatten)]
        employee: EmployeeArgs,
    },
    /// Set today's status and the active flag
    Status {
        id: String,
        status: EmployeeStatus,
        #[arg(long)]
        inactive: bool,
    },
    /// Role permission table
    Permissions {
        #[arg(long)]
        role: Option<Role>,
    },
}

#[derive(Debug, Args)]
pub struct EmployeeArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub role: Role,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "0")]
    pub salary: Money,
    /// Joining date, defaults to today
    #[arg(long)]
    pub joined: Option<NaiveDate>,
}

impl From<EmployeeArgs> for EmployeeInput {
    fn from(args: EmployeeArgs) -> Self {
        EmployeeInput {
            name: args.name,
            role: args.role,
            phone: args.phone,
            email: args.email,
            salary: args.salary,
            joining_date: args.joined,
        }
    }
}

// =============================================================================
// Selling
// =============================================================================

#[derive(Debug, Args)]
pub struct SellArgs {
    /// Employee id of the cashier
    #[arg(long)]
    pub cashier: String,

    /// `SKU` or `SKU:QTY`, repeatable
    #[arg(long = "item", required = true)]
    pub items: Vec<LineSpec>,

    /// `SKU:AMOUNT` off one line, repeatable
    #[arg(long = "line-discount")]
    pub line_discounts: Vec<LineDiscount>,

    /// Customer id or phone; omit for a walk-in sale
    #[arg(long)]
    pub customer: Option<String>,

    #[arg(long, default_value = "cash")]
    pub payment: PaymentMode,

    /// Bill discount in percent, overrides the config
    #[arg(long)]
    pub discount: Option<f64>,

    /// Tax rate in percent, overrides the config
    #[arg(long)]
    pub tax: Option<f64>,
}

/// `SKU[:QTY]` from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSpec {
    pub key: String,
    pub quantity: i64,
}

impl FromStr for LineSpec {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, quantity) = match s.rsplit_once(':') {
            Some((key, qty)) => (
                key,
                qty.trim().parse().map_err(|_| ValidationError::InvalidFormat {
                    field: "item".to_string(),
                    reason: format!("'{}' is not SKU:QTY", s),
                })?,
            ),
            None => (s, 1),
        };
        if key.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "item".to_string(),
            });
        }
        Ok(LineSpec {
            key: key.trim().to_string(),
            quantity,
        })
    }
}

/// `SKU:AMOUNT` from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiscount {
    pub key: String,
    pub amount: Money,
}

impl FromStr for LineDiscount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, amount) = s.split_once(':').ok_or_else(|| ValidationError::InvalidFormat {
            field: "line discount".to_string(),
            reason: format!("'{}' is not SKU:AMOUNT", s),
        })?;
        Ok(LineDiscount {
            key: key.trim().to_string(),
            amount: amount.parse()?,
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum SalesCommand {
    List {
        #[arg(long)]
        status: Option<SaleStatus>,
        /// Only sales on this day (yyyy-mm-dd)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Show {
        /// Sale id or invoice number
        key: String,
    },
    /// Move a sale to completed or cancelled
    Status {
        key: String,
        status: SaleStatus,
    },
    /// Invoice number the next sale will get
    NextInvoice,
}

// =============================================================================
// Attendance
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum AttendanceCommand {
    /// Mark one employee for one day
    Mark {
        employee: String,
        date: NaiveDate,
        /// Present, Absent, "On Leave" or Late
        status: AttendanceStatus,
    },
    /// Mark employees present (all active ones by default)
    AllPresent {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long = "employee")]
        employees: Vec<String>,
    },
    /// One employee's marked days (yyyy-MM)
    Month {
        employee: String,
        month: YearMonth,
    },
    /// Monthly KPIs for one employee
    Kpis {
        employee: String,
        month: YearMonth,
    },
    /// Head-count for a day
    Today {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// CSV sheet, one row per day
    Export {
        month: YearMonth,
        /// Only this employee; default is the whole active roster
        #[arg(long)]
        employee: Option<String>,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

// =============================================================================
// Credit & Loyalty
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum CreditCommand {
    /// Run the credit rule on a balance and a purchase
    Check {
        #[arg(long)]
        balance: Money,
        #[arg(long)]
        purchase: Money,
    },
    /// Run the credit rule against a customer's balance
    Customer {
        key: String,
        purchase: Money,
    },
}

#[derive(Debug, Subcommand)]
pub enum LoyaltyCommand {
    /// Points a purchase amount would earn
    Preview { amount: Money },
}

// =============================================================================
// Dispatch
// =============================================================================

/// What a command printed.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Json(serde_json::Value),
    Text(String),
}

fn json<T: Serialize>(value: T) -> Result<Output, ApiError> {
    serde_json::to_value(value)
        .map(Output::Json)
        .map_err(|e| ApiError::internal(format!("Failed to encode output: {}", e)))
}

/// Runs one parsed command against loaded state.
pub async fn dispatch(state: &AppState, command: Command) -> Result<Output, ApiError> {
    let now = Utc::now();
    let today = state.config.local_date(now);

    match command {
        Command::Status => json(commands::config::status(state).await),
        Command::Config => json(commands::config::get_config(state)),
        Command::Dashboard => json(commands::dashboard::dashboard(state, now).await?),
        Command::LowStock => json(commands::product::low_stock(state).await?),

        Command::Product(cmd) => match cmd {
            ProductCommand::List { query } => json(commands::product::search_products(state, &query).await?),
            ProductCommand::Show { key } => json(commands::product::get_product(state, &key).await?),
            ProductCommand::Add(args) => json(commands::product::add_product(state, args.into()).await?),
            ProductCommand::Update { key, product } => {
                json(commands::product::update_product(state, &key, product.into()).await?)
            }
            ProductCommand::Delete { key } => json(commands::product::delete_product(state, &key).await?),
            ProductCommand::Stock { key, delta } => {
                json(commands::product::adjust_stock(state, &key, delta).await?)
            }
        },

        Command::Customer(cmd) => match cmd {
            CustomerCommand::List => json(commands::customer::list_customers(state).await?),
            CustomerCommand::Show { key } => json(commands::customer::get_customer(state, &key).await?),
            CustomerCommand::Add(args) => json(commands::customer::add_customer(state, args.into()).await?),
            CustomerCommand::Update { key, customer } => {
                json(commands::customer::update_customer(state, &key, customer.into()).await?)
            }
            CustomerCommand::Pay { key, amount } => {
                json(commands::customer::record_payment(state, &key, amount).await?)
            }
            CustomerCommand::Redeem { key, points } => {
                json(commands::credit::redeem_points(state, &key, points).await?)
            }
        },

        Command::Employee(cmd) => match cmd {
            EmployeeCommand::List => json(commands::employee::list_employees(state).await?),
            EmployeeCommand::Add(args) => json(commands::employee::add_employee(state, args.into()).await?),
            EmployeeCommand::Update { id, employee } => {
                json(commands::employee::update_employee(state, &id, employee.into()).await?)
            }
            EmployeeCommand::Status { id, status, inactive } => {
                json(commands::employee::set_employee_status(state, &id, status, !inactive).await?)
            }
            EmployeeCommand::Permissions { role } => json(commands::employee::permissions(role)),
        },

        Command::Sell(args) => sell(state, args, now).await,

        Command::Sales(cmd) => match cmd {
            SalesCommand::List { status, date } => json(commands::sale::list_sales(state, status, date).await?),
            SalesCommand::Show { key } => json(commands::sale::get_sale(state, &key).await?),
            SalesCommand::Status { key, status } => {
                json(commands::sale::update_sale_status(state, &key, status).await?)
            }
            SalesCommand::NextInvoice => json(commands::sale::next_invoice_number(state, now).await),
        },

        Command::Attendance(cmd) => match cmd {
            AttendanceCommand::Mark { employee, date, status } => {
                json(commands::attendance::mark_attendance(state, &employee, date, status).await?)
            }
            AttendanceCommand::AllPresent { date, employees } => {
                let ids = (!employees.is_empty()).then_some(employees);
                let count =
                    commands::attendance::mark_all_present(state, ids, date.unwrap_or(today)).await?;
                json(serde_json::json!({ "marked": count }))
            }
            AttendanceCommand::Month { employee, month } => {
                json(commands::attendance::employee_month(state, &employee, month).await?)
            }
            AttendanceCommand::Kpis { employee, month } => {
                json(commands::attendance::monthly_kpis(state, &employee, month).await?)
            }
            AttendanceCommand::Today { date } => {
                json(commands::attendance::daily_counters(state, date.unwrap_or(today)).await?)
            }
            AttendanceCommand::Export { month, employee, output } => {
                let csv = commands::attendance::export_csv(state, employee.as_deref(), month).await?;
                match output {
                    Some(path) => {
                        std::fs::write(&path, &csv).map_err(|e| {
                            ApiError::internal(format!("Cannot write {}: {}", path.display(), e))
                        })?;
                        Ok(Output::Text(format!("Wrote {}", path.display())))
                    }
                    None => Ok(Output::Text(csv)),
                }
            }
        },

        Command::Credit(cmd) => match cmd {
            CreditCommand::Check { balance, purchase } => {
                json(commands::credit::credit_check(balance, purchase))
            }
            CreditCommand::Customer { key, purchase } => {
                json(commands::credit::customer_credit_check(state, &key, purchase).await?)
            }
        },

        Command::Loyalty(LoyaltyCommand::Preview { amount }) => {
            json(commands::credit::loyalty_preview(amount))
        }
    }
}

/// Builds the cart from the arguments, then checks out.
async fn sell(state: &AppState, args: SellArgs, now: chrono::DateTime<Utc>) -> Result<Output, ApiError> {
    commands::cart::clear_cart(state);

    let defaults = state.cart.pricing();
    let pricing = Pricing::new(
        args.discount
            .map(DiscountRate::from_percentage)
            .unwrap_or(defaults.discount_rate),
        args.tax.map(TaxRate::from_percentage).unwrap_or(defaults.tax_rate),
    );
    commands::cart::set_pricing(state, pricing.discount_rate.bps(), pricing.tax_rate.bps())?;

    for line in &args.items {
        commands::cart::add_to_cart(state, &line.key, line.quantity).await?;
    }
    for discount in &args.line_discounts {
        commands::cart::set_line_discount(state, &discount.key, discount.amount).await?;
    }

    let committed = commands::sale::checkout(
        state,
        args.customer.as_deref(),
        &args.cashier,
        args.payment,
        now,
    )
    .await?;
    json(committed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_spec() {
        assert_eq!(
            "TEA-250:3".parse::<LineSpec>().unwrap(),
            LineSpec { key: "TEA-250".to_string(), quantity: 3 }
        );
        assert_eq!("SALT".parse::<LineSpec>().unwrap().quantity, 1);
        assert!("TEA:x".parse::<LineSpec>().is_err());
        assert!(":2".parse::<LineSpec>().is_err());
    }

    #[test]
    fn test_line_discount() {
        let d = "TEA-250:20.50".parse::<LineDiscount>().unwrap();
        assert_eq!(d.amount, Money::from_minor(2050));
        assert!("TEA-250".parse::<LineDiscount>().is_err());
    }

    #[test]
    fn test_parse_sell() {
        let cli = Cli::try_parse_from([
            "bazaar", "sell", "--cashier", "e1", "--item", "TEA-250:2", "--item", "SALT",
            "--payment", "upi", "--discount", "10",
        ])
        .unwrap();

        match cli.command {
            Command::Sell(args) => {
                assert_eq!(args.items.len(), 2);
                assert_eq!(args.payment, PaymentMode::Upi);
                assert_eq!(args.discount, Some(10.0));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_attendance_mark() {
        let cli = Cli::try_parse_from([
            "bazaar", "attendance", "mark", "e1", "2026-03-02", "On Leave",
        ])
        .unwrap();

        match cli.command {
            Command::Attendance(AttendanceCommand::Mark { status, date, .. }) => {
                assert_eq!(status, AttendanceStatus::OnLeave);
                assert_eq!(date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_negative_stock_delta() {
        let cli = Cli::try_parse_from(["bazaar", "product", "stock", "TEA-250", "-4"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Product(ProductCommand::Stock { delta: -4, .. })
        ));
    }
}
