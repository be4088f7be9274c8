// src/domain/band.rs

use crate::valuation::normalize::format_currency;
use serde::Serialize;

/// Where a price band came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BandBasis {
    /// Parsed from the narrative generator's answer.
    Narrative,
    /// Median price-per-unit over the accepted comparables.
    Comparables,
    /// No usable comparable data; the subject's own asking price (or zero).
    AskingPriceFallback,
}

impl BandBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            BandBasis::Narrative => "narrative",
            BandBasis::Comparables => "comparables",
            BandBasis::AskingPriceFallback => "asking_price_fallback",
        }
    }
}

/// Estimated value range for the subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBand {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
    pub basis: BandBasis,
}

impl PriceBand {
    pub fn is_low_confidence(&self) -> bool {
        self.basis == BandBasis::AskingPriceFallback
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.low, self.mid, self.high]
    }

    pub fn formatted(&self) -> [String; 3] {
        self.as_array().map(format_currency)
    }
}
