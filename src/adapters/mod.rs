//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external representations:
//! - `query`: URL query-string intake
//! - `json`: JSON document intake
//! - `fields`: `key=value` argument intake
//! - `report`: Text and JSON presenters
//! - `sanitize`: Clinical-value filtering for logs

pub mod fields;
pub mod json;
pub mod query;
pub mod report;
pub mod sanitize;
