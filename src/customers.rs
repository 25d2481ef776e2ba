//! Customers

use serde::{Deserialize, Serialize};

use crate::ids::RecordId;

/// Customer identifier
pub type CustomerId = RecordId<Customer>;

/// A registered customer.
///
/// Customers are created through registration and never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer identifier
    pub id: CustomerId,

    /// Customer name
    pub name: String,
}
