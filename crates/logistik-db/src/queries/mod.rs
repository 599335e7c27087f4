//! Database query implementations.

pub mod customers;
pub mod partners;
pub mod shipments;
