//! Round calculation pipeline.
//!
//! Resolves rounds per company, infers missing fields, derives dependent
//! metrics and compounds value appreciation. Each stage takes a table snapshot
//! and returns a new one.

mod calculation_model;
mod calculation_service;
mod calculation_traits;
pub mod company_resolver;
pub mod dependent_metrics;
pub mod field_inference;
pub mod value_appreciation;

pub use calculation_model::*;
pub use calculation_service::*;
pub use calculation_traits::*;
pub use company_resolver::{resolve_companies, CompanyGroup, ResolvedCompanies};
pub use dependent_metrics::apply_dependent_metrics;
pub use field_inference::infer_round;
pub use value_appreciation::{appreciate_company, compute_value_appreciation};
