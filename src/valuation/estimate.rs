// src/valuation/estimate.rs
//
// Price band from comparables: median price per lot sqft, per living sqft and per
// weighted room (beds + half the baths), each projected onto the subject.

use crate::domain::{AcceptedComparable, BandBasis, PriceBand, SubjectProperty};
use regex::Regex;
use std::sync::OnceLock;

/// Low and high never sit further than this from mid.
pub const CLAMP_WINDOW: f64 = 60000.0;

/// Numeric inputs to the estimator for one property.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PropertyMetrics {
    pub price: Option<f64>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub lot_sqft: Option<f64>,
    pub living_sqft: Option<f64>,
}

impl PropertyMetrics {
    pub fn from_subject(subject: &SubjectProperty) -> Self {
        Self {
            price: subject.price,
            bedrooms: subject.bedrooms.map(f64::from),
            bathrooms: subject.bathrooms,
            lot_sqft: subject.lot_sqft(),
            living_sqft: subject.living_sqft(),
        }
    }

    pub fn from_comparable(comp: &AcceptedComparable) -> Self {
        Self {
            price: comp.price,
            bedrooms: comp.bedrooms,
            bathrooms: comp.bathrooms,
            lot_sqft: comp.lot_sqft,
            living_sqft: comp.living_sqft,
        }
    }

    fn weighted_rooms(&self) -> Option<f64> {
        Some(self.bedrooms? + 0.5 * self.bathrooms?)
    }
}

/// Per-unit prices gathered across comparables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitPrices {
    pub per_lot_sqft: Vec<f64>,
    pub per_living_sqft: Vec<f64>,
    pub per_weighted_room: Vec<f64>,
}

impl UnitPrices {
    pub fn collect(comparables: &[PropertyMetrics]) -> Self {
        let mut out = Self::default();
        for comp in comparables {
            let Some(price) = comp.price else { continue };

            let mut push = |bucket: &mut Vec<f64>, denom: Option<f64>| {
                if let Some(d) = denom.filter(|d| *d > 0.0) {
                    let ratio = price / d;
                    if ratio > 0.0 && ratio.is_finite() {
                        bucket.push(ratio);
                    }
                }
            };

            push(&mut out.per_lot_sqft, comp.lot_sqft);
            push(&mut out.per_living_sqft, comp.living_sqft);
            push(&mut out.per_weighted_room, comp.weighted_rooms());
        }
        out
    }

    pub fn extend(&mut self, other: UnitPrices) {
        self.per_lot_sqft.extend(other.per_lot_sqft);
        self.per_living_sqft.extend(other.per_living_sqft);
        self.per_weighted_room.extend(other.per_weighted_room);
    }
}

/// Median; the mean of the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Truncates to whole dollars, then drops the tens and units (floor, not nearest).
pub fn floor_hundred(value: f64) -> f64 {
    let whole = value.trunc() as i64;
    (whole.div_euclid(100) * 100) as f64
}

/// Pulls low and high to within [`CLAMP_WINDOW`] of mid.
pub fn clamp_band(low: f64, mid: f64, high: f64) -> (f64, f64, f64) {
    let low = if low < mid - CLAMP_WINDOW {
        mid - CLAMP_WINDOW
    } else {
        low
    };
    let high = if high > mid + CLAMP_WINDOW {
        mid + CLAMP_WINDOW
    } else {
        high
    };
    (low, mid, high)
}

/// Up to three point estimates for the subject, in lot / living / room order.
pub fn point_estimates(subject: &PropertyMetrics, unit_prices: &UnitPrices) -> Vec<f64> {
    let positive = |v: Option<f64>| v.filter(|v| *v > 0.0 && v.is_finite());

    [
        (median(&unit_prices.per_lot_sqft), positive(subject.lot_sqft)),
        (median(&unit_prices.per_living_sqft), positive(subject.living_sqft)),
        (median(&unit_prices.per_weighted_room), positive(subject.weighted_rooms())),
    ]
    .into_iter()
    .filter_map(|(rate, qty)| Some(rate? * qty?))
    .collect()
}

/// Statistical price band from sold and active comparables.
///
/// Without any usable estimate the subject's asking price (or zero) is returned for
/// all three values, marked [`BandBasis::AskingPriceFallback`].
pub fn estimate_price_band(
    subject: &PropertyMetrics,
    sold: &[PropertyMetrics],
    active: &[PropertyMetrics],
) -> PriceBand {
    let mut unit_prices = UnitPrices::collect(sold);
    unit_prices.extend(UnitPrices::collect(active));

    let estimates = point_estimates(subject, &unit_prices);

    let Some(mid) = median(&estimates) else {
        let fallback = subject
            .price
            .filter(|p| p.is_finite() && *p > 0.0)
            .map(|p| (p * 100.0).round() / 100.0)
            .unwrap_or(0.0);
        return PriceBand {
            low: fallback,
            mid: fallback,
            high: fallback,
            basis: BandBasis::AskingPriceFallback,
        };
    };

    let min = estimates.iter().copied().fold(f64::INFINITY, f64::min);
    let max = estimates.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let (low, mid, high) = clamp_band(floor_hundred(min), floor_hundred(mid), floor_hundred(max));

    PriceBand {
        low,
        mid,
        high,
        basis: BandBasis::Comparables,
    }
}

pub fn estimate_from_comparables(
    subject: &SubjectProperty,
    sold: &[AcceptedComparable],
    active: &[AcceptedComparable],
) -> PriceBand {
    let to_metrics =
        |comps: &[AcceptedComparable]| comps.iter().map(PropertyMetrics::from_comparable).collect::<Vec<_>>();
    estimate_price_band(
        &PropertyMetrics::from_subject(subject),
        &to_metrics(sold),
        &to_metrics(active),
    )
}

fn bold_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("static regex"))
}

fn paren_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\((.*?)\)").expect("static regex"))
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("static regex"))
}

/// Reads a "(low, mid, high)" answer from the narrative generator.
///
/// Looks inside the first `**bold**` span, else the first parenthesised group, else
/// the whole text. Needs three ordered numbers; anything else is `None`.
pub fn parse_narrative_band(text: &str) -> Option<PriceBand> {
    let scope = bold_re()
        .captures(text)
        .or_else(|| paren_re().captures(text))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text)
        .replace(',', "");

    let values: Vec<f64> = number_re()
        .find_iter(&scope)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .take(3)
        .collect();

    let [low, mid, high] = values[..] else {
        return None;
    };
    if !(low <= mid && mid <= high) {
        return None;
    }

    let (low, mid, high) = clamp_band(low, mid, high);
    Some(PriceBand {
        low,
        mid,
        high,
        basis: BandBasis::Narrative,
    })
}

/// The narrative band when it parses, otherwise the statistical one.
pub fn resolve_band<F>(narrative: Option<&str>, fallback: F) -> PriceBand
where
    F: FnOnce() -> PriceBand,
{
    match narrative.and_then(parse_narrative_band) {
        Some(band) => band,
        None => {
            if narrative.is_some() {
                tracing::info!("Narrative price answer unusable; using comparable estimate");
            }
            fallback()
        }
    }
}
