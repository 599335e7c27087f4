//! LogistikPro Core Library
//!
//! Domain models and business logic for the LogistikPro freight back office:
//! the milestone catalog, traffic-light derivation and the shipment workflow.

pub mod ampel;
pub mod config;
pub mod contact;
pub mod customer;
pub mod error;
pub mod fields;
pub mod milestone;
pub mod partner;
pub mod shipment;

pub use error::{LogistikError, LogistikResult};
