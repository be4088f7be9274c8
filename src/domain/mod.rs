pub mod band;
pub mod comparable;
pub mod criteria;
pub mod property;
pub mod report_kind;

pub use band::{BandBasis, PriceBand};
pub use comparable::{AcceptedComparable, ComparableGrid, GridRow, ListingTiming, SkipReason, Tier};
pub use criteria::{BathroomTier, SearchCriteria};
pub use property::SubjectProperty;
pub use report_kind::ReportKind;
