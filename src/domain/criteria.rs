// src/domain/criteria.rs

use serde::Serialize;
use std::fmt;

/// Bathroom filter accepted by the listing search ("at least N").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BathroomTier {
    OnePlus,
    TwoPlus,
    ThreePlus,
    FourPlus,
    Any,
}

impl BathroomTier {
    pub fn from_count(count: Option<u32>) -> Self {
        match count {
            Some(1) => BathroomTier::OnePlus,
            Some(2) => BathroomTier::TwoPlus,
            Some(3) => BathroomTier::ThreePlus,
            Some(4) => BathroomTier::FourPlus,
            _ => BathroomTier::Any,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BathroomTier::OnePlus => "OnePlus",
            BathroomTier::TwoPlus => "TwoPlus",
            BathroomTier::ThreePlus => "ThreePlus",
            BathroomTier::FourPlus => "FourPlus",
            BathroomTier::Any => "Any",
        }
    }
}

impl fmt::Display for BathroomTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bed/bath constraints for one comparable search.
///
/// Kept apart from the subject so relaxing a search never touches the subject's own
/// counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchCriteria {
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
}

impl SearchCriteria {
    pub const UNCONSTRAINED: SearchCriteria = SearchCriteria {
        bedrooms: None,
        bathrooms: None,
    };

    /// Both counts lowered by `step`.
    pub fn relaxed(bedrooms: u32, bathrooms: u32, step: u32) -> Self {
        Self {
            bedrooms: Some(bedrooms.saturating_sub(step)),
            bathrooms: Some(bathrooms.saturating_sub(step)),
        }
    }

    pub fn bathroom_tier(&self) -> BathroomTier {
        BathroomTier::from_count(self.bathrooms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bathroom_counts_map_to_tiers() {
        assert_eq!(BathroomTier::from_count(Some(1)), BathroomTier::OnePlus);
        assert_eq!(BathroomTier::from_count(Some(4)), BathroomTier::FourPlus);
        assert_eq!(BathroomTier::from_count(Some(0)), BathroomTier::Any);
        assert_eq!(BathroomTier::from_count(Some(6)), BathroomTier::Any);
        assert_eq!(BathroomTier::from_count(None), BathroomTier::Any);
    }

    #[test]
    fn relaxing_lowers_both_counts() {
        let c = SearchCriteria::relaxed(4, 3, 2);
        assert_eq!(c.bedrooms, Some(2));
        assert_eq!(c.bathrooms, Some(1));
        assert_eq!(c.bathroom_tier(), BathroomTier::OnePlus);
    }
}
