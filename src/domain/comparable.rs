// src/domain/comparable.rs

use crate::domain::property::SubjectProperty;
use crate::valuation::normalize::{format_currency, format_date, format_days_on_market, format_sqft};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Which market a comparable comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tier {
    /// Recently sold.
    Sold,
    /// Currently listed for sale.
    Active,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Sold => "Past Sales",
            Tier::Active => "On Market",
        }
    }

    pub fn price_column(&self) -> &'static str {
        match self {
            Tier::Sold => "Sale Price",
            Tier::Active => "Current price",
        }
    }

    pub fn timing_column(&self) -> &'static str {
        match self {
            Tier::Sold => "Sold Date",
            Tier::Active => "Days on Market",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Sold => f.write_str("sold"),
            Tier::Active => f.write_str("active"),
        }
    }
}

/// When a comparable changed hands, or how long it has been listed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ListingTiming {
    Sold { date: Option<NaiveDate> },
    OnMarket { days: Option<u32>, listed_on: Option<NaiveDate> },
    AlreadySold,
}

impl ListingTiming {
    pub fn grid_label(&self) -> String {
        match self {
            ListingTiming::Sold { date } => date.map(format_date).unwrap_or_else(|| "--".into()),
            ListingTiming::OnMarket { days, .. } => match days {
                Some(_) => format_days_on_market(*days),
                None => "--".into(),
            },
            ListingTiming::AlreadySold => "Already Sold".into(),
        }
    }
}

/// A candidate that passed the comparable filter, with derived fields filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcceptedComparable {
    pub address: String,
    pub property_id: Option<String>,
    /// Sale price (sold tier) or current asking price (active tier).
    pub price: Option<f64>,
    /// Site estimate, shown as the initial asking/list price.
    pub estimate: Option<f64>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub living_sqft: Option<f64>,
    pub lot_sqft: Option<f64>,
    pub year_built: Option<i64>,
    pub assessed_value: Option<f64>,
    pub distance_miles: Option<f64>,
    pub photo_url: String,
    pub listing_url: Option<String>,
    pub timing: ListingTiming,
    pub completeness_score: f64,
}

fn currency_or_dash(v: Option<f64>) -> String {
    v.map(format_currency).unwrap_or_else(|| "--".into())
}

fn count_or_dash(v: Option<f64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_else(|| "--".into())
}

impl AcceptedComparable {
    pub fn price_display(&self) -> String {
        currency_or_dash(self.price)
    }

    /// Initial list price; falls back to the current price when no estimate exists.
    pub fn initial_price_display(&self) -> String {
        currency_or_dash(self.estimate.or(self.price))
    }

    pub fn assessed_value_display(&self) -> String {
        currency_or_dash(self.assessed_value)
    }

    pub fn living_sqft_display(&self) -> String {
        self.living_sqft.map(format_sqft).unwrap_or_else(|| "--".into())
    }

    pub fn lot_sqft_display(&self) -> String {
        self.lot_sqft.map(format_sqft).unwrap_or_else(|| "--".into())
    }

    pub fn distance_display(&self) -> String {
        self.distance_miles
            .map(|d| format!("{d:.2}"))
            .unwrap_or_else(|| "--".into())
    }

    pub fn bedrooms_display(&self) -> String {
        count_or_dash(self.bedrooms)
    }

    pub fn bathrooms_display(&self) -> String {
        count_or_dash(self.bathrooms)
    }

    pub fn year_built_display(&self) -> String {
        self.year_built
            .map(|y| y.to_string())
            .unwrap_or_else(|| "--".into())
    }

    pub fn grid_row(&self) -> GridRow {
        GridRow {
            address: self.address.clone(),
            price: self.price_display(),
            square_footage: self.living_sqft_display(),
            bedrooms: self.bedrooms_display(),
            bathrooms: self.bathrooms_display(),
            distance: self.distance_display(),
            timing: self.timing.grid_label(),
        }
    }

    /// Multi-line summary used in narrative prompts and report bodies.
    pub fn summary(&self, tier: Tier) -> String {
        let mut lines = vec![format!("- Address: {}", self.address)];
        match (tier, &self.timing) {
            (_, ListingTiming::OnMarket { days, listed_on }) => {
                lines.push(format!(
                    "- Initial List Date: {}",
                    listed_on.map(format_date).unwrap_or_else(|| "--".into())
                ));
                lines.push(format!("- Days on Market: {}", format_days_on_market(*days)));
                lines.push(format!("- Initial List Price: {}", self.initial_price_display()));
                lines.push(format!("- Current Price: {}", self.price_display()));
            }
            (Tier::Sold, timing) => {
                lines.push(format!("- Initial Asking Price: {}", self.initial_price_display()));
                lines.push(format!("- Sale Price: {}", self.price_display()));
                lines.push(format!("- Sale Date: {}", timing.grid_label()));
            }
            (Tier::Active, timing) => {
                lines.push(format!("- Current Price: {}", self.price_display()));
                lines.push(format!("- Status: {}", timing.grid_label()));
            }
        }
        lines.push(format!(
            "- Distance from Main Property: {} miles",
            self.distance_display()
        ));
        lines.push(format!(
            "- Specifications: {} bedrooms, {} bathrooms",
            self.bedrooms_display(),
            self.bathrooms_display()
        ));
        lines.push(format!("- Square Footage: {}", self.living_sqft_display()));
        lines.push(format!("- Lot Size: {}", self.lot_sqft_display()));
        lines.push(format!("- Year Built: {}", self.year_built_display()));
        lines.push(format!("- Assessed Value: {}", self.assessed_value_display()));
        lines.join("\n")
    }
}

/// One row of the comparables table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub address: String,
    pub price: String,
    pub square_footage: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub distance: String,
    pub timing: String,
}

impl GridRow {
    pub fn cells(&self) -> [&str; 7] {
        [
            &self.address,
            &self.price,
            &self.square_footage,
            &self.bedrooms,
            &self.bathrooms,
            &self.distance,
            &self.timing,
        ]
    }
}

/// Tabular view of a tier: the subject first, then each accepted comparable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparableGrid {
    pub tier: Tier,
    pub rows: Vec<GridRow>,
}

impl ComparableGrid {
    pub fn for_subject(tier: Tier, subject: &SubjectProperty) -> Self {
        let dash = || "--".to_string();
        let subject_row = GridRow {
            address: subject.address.clone(),
            price: subject.price_display(),
            square_footage: subject
                .living_sqft()
                .map(format_sqft)
                .unwrap_or_else(|| "--".into()),
            bedrooms: subject.bedrooms.map(|c| c.to_string()).unwrap_or_else(dash),
            bathrooms: subject.bathrooms.map(|c| c.to_string()).unwrap_or_else(dash),
            distance: "--".into(),
            timing: "--".into(),
        };
        Self {
            tier,
            rows: vec![subject_row],
        }
    }

    pub fn headers(&self) -> [&'static str; 7] {
        [
            "Address",
            self.tier.price_column(),
            "Square Footage",
            "Bedrooms",
            "Bathrooms",
            "Distance (miles)",
            self.tier.timing_column(),
        ]
    }

    pub fn push(&mut self, row: GridRow) {
        self.rows.push(row);
    }

    /// Rows excluding the subject.
    pub fn comparable_rows(&self) -> &[GridRow] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// Why a candidate was left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SkipReason {
    /// Completeness score over the tier's threshold.
    IncompleteData { score: f64 },
    /// Same address as the subject.
    SelfMatch,
    UnsupportedPhoto(String),
    Malformed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::IncompleteData { score } => write!(f, "too much missing data (score {score})"),
            SkipReason::SelfMatch => write!(f, "same address as the subject"),
            SkipReason::UnsupportedPhoto(url) => write!(f, "unsupported photo format: {url}"),
            SkipReason::Malformed(msg) => write!(f, "malformed record: {msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_labels() {
        let sold = ListingTiming::Sold {
            date: NaiveDate::from_ymd_opt(2024, 3, 9),
        };
        assert_eq!(sold.grid_label(), "03-09-2024");
        let stale = ListingTiming::OnMarket {
            days: Some(400),
            listed_on: None,
        };
        assert_eq!(stale.grid_label(), "Not Available");
        assert_eq!(ListingTiming::AlreadySold.grid_label(), "Already Sold");
    }

    #[test]
    fn subject_row_leads_the_grid() {
        let mut subject = SubjectProperty::new("9 Oak Ct, Dover, DE 19901");
        subject.price = Some(350000.0);
        subject.bedrooms = Some(3);
        let grid = ComparableGrid::for_subject(Tier::Sold, &subject);
        assert_eq!(grid.rows.len(), 1);
        assert!(grid.comparable_rows().is_empty());
        assert_eq!(grid.rows[0].price, "$350,000");
        assert_eq!(grid.rows[0].distance, "--");
        assert_eq!(grid.headers()[1], "Sale Price");
        assert_eq!(grid.headers()[6], "Sold Date");
    }
}
