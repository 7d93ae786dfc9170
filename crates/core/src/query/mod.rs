//! Host-facing query surface.

mod cell;
mod query_service;


pub use cell::CellValue;
pub use query_service::{Clock, QueryService};
