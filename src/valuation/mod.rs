//! Comparable selection and pricing.
//!
//! `normalize` cleans raw listing fields, `filter` screens candidates, `search` drives
//! the bed/bath relaxation loop and `estimate` turns the accepted set into a price band.

pub mod estimate;
pub mod filter;
pub mod normalize;
pub mod search;

pub use estimate::{estimate_from_comparables, resolve_band};
pub use filter::MIN_COMPARABLES;
pub use search::{search_tier, TierOutcome};
