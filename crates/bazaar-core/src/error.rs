//! # Error Types
//!
//! Domain-specific error types for bazaar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bazaar-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  bazaar-store errors (separate crate)                                  │
//! │  └── DbError          - Persistence failures                           │
//! │                                                                         │
//! │  App errors                                                            │
//! │  └── ApiError         - What the caller sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),

    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Insufficient stock to complete the cart operation or sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to Cart (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { sku: "ATTA-5KG", available: 3, requested: 5 }
    /// ```
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    #[error("Product {0} is not in the cart")]
    ItemNotInCart(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A line discount larger than the line itself.
    #[error("Discount {discount} exceeds line amount {line_amount} for {sku}")]
    DiscountExceedsLine {
        sku: String,
        discount: Money,
        line_amount: Money,
    },

    /// Credit sale would push the customer's balance past the limit.
    #[error("{message}")]
    CreditLimitExceeded { customer_id: String, message: String },

    /// Payment received larger than what the customer owes.
    #[error("Payment {payment} exceeds outstanding balance {balance}")]
    PaymentExceedsBalance { payment: Money, balance: Money },

    /// Credit payment with no customer to bill.
    #[error("Credit sales require a registered customer")]
    CreditRequiresCustomer,

    #[error("Sale {sale_id} is {current_status}, cannot perform operation")]
    InvalidSaleStatus {
        sale_id: String,
        current_status: String,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("CSV export failed: {0}")]
    Export(#[from] csv::Error),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            sku: "ATTA-5KG".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for ATTA-5KG: available 3, requested 5"
        );

        let err = CoreError::DiscountExceedsLine {
            sku: "TEA".to_string(),
            discount: Money::from_major(600),
            line_amount: Money::from_major(500),
        };
        assert_eq!(
            err.to_string(),
            "Discount Rs. 600.00 exceeds line amount Rs. 500.00 for TEA"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "Validation error: sku is required");
    }
}
