//! # Customer Commands

use bazaar_core::credit::{credit_limit_warning, remaining_credit, CreditWarning};
use bazaar_core::{Customer, Money};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{AppState, CustomerInput};

/// A customer with their credit position.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub customer: Customer,
    pub remaining_credit: Money,
    pub credit_warning: Option<CreditWarning>,
}

impl From<Customer> for CustomerDetail {
    fn from(customer: Customer) -> Self {
        CustomerDetail {
            remaining_credit: remaining_credit(customer.outstanding_balance),
            credit_warning: credit_limit_warning(customer.outstanding_balance),
            customer,
        }
    }
}

pub async fn list_customers(state: &AppState) -> Result<Vec<CustomerDetail>, ApiError> {
    debug!("list_customers command");
    let pos = state.pos.read().await;
    Ok(pos.customers().iter().cloned().map(CustomerDetail::from).collect())
}

/// Gets a customer by id or phone.
pub async fn get_customer(state: &AppState, key: &str) -> Result<CustomerDetail, ApiError> {
    debug!(key = %key, "get_customer command");
    let pos = state.pos.read().await;
    Ok(pos.customer(key)?.clone().into())
}

pub async fn add_customer(state: &AppState, input: CustomerInput) -> Result<Customer, ApiError> {
    debug!("add_customer command");
    let mut pos = state.pos.write().await;
    Ok(pos.add_customer(input).await?)
}

pub async fn update_customer(
    state: &AppState,
    key: &str,
    input: CustomerInput,
) -> Result<Customer, ApiError> {
    debug!(key = %key, "update_customer command");
    let mut pos = state.pos.write().await;
    let id = pos.customer(key)?.id.clone();
    Ok(pos.update_customer(&id, input).await?)
}

/// Records money received against a customer's credit balance.
pub async fn record_payment(
    state: &AppState,
    key: &str,
    amount: Money,
) -> Result<CustomerDetail, ApiError> {
    debug!(key = %key, %amount, "record_payment command");
    let mut pos = state.pos.write().await;
    let id = pos.customer(key)?.id.clone();
    Ok(pos.record_customer_payment(&id, amount).await?.into())
}
