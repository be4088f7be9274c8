//! Listing-data collaborators: subject lookup, comparable search and tax history.
//!
//! The pipeline only sees the traits below, so tests swap in fakes and the server
//! wires up [`ZillowClient`].

pub mod models;
mod source_error;
pub mod zillow;

use crate::domain::{SearchCriteria, SubjectProperty, Tier};
use serde_json::Value;

pub use source_error::SourceError;
pub use zillow::ZillowClient;

/// One comparable search: where to look, which market, and how strict.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparableQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_miles: f64,
    pub tier: Tier,
    pub criteria: SearchCriteria,
}

pub trait PropertyLookup: Send + Sync {
    /// Resolves an address to a subject record, or `SourceError::NotFound`.
    fn lookup(&self, address: &str) -> Result<SubjectProperty, SourceError>;
}

pub trait ComparableSearch: Send + Sync {
    /// Raw search results. Each item is decoded (or skipped) by the comparable filter.
    fn search(&self, query: &ComparableQuery) -> Result<Vec<Value>, SourceError>;
}

pub trait TaxHistory: Send + Sync {
    /// Most recent annual tax actually paid, if any is on record.
    fn annual_tax(&self, subject: &SubjectProperty) -> Result<Option<f64>, SourceError>;
}
