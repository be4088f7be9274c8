// src/report/trends.rs
//
// "Current Market Trends" section of the buyer report: averages over the accepted
// sold comparables, quoted next to the estimated mid price.

use crate::domain::AcceptedComparable;
use crate::valuation::normalize::format_currency;

#[derive(Debug, Clone, PartialEq)]
pub struct MarketTrends {
    pub mid_price: f64,
    pub average_living_sqft: Option<f64>,
    pub average_lot_sqft: Option<f64>,
    pub average_year_built: Option<f64>,
}

/// Mean of the values present; `None` when there are none.
fn average(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Averages size, lot and age over `comparables`, skipping unknown values.
pub fn market_trends(comparables: &[AcceptedComparable], mid_price: f64) -> MarketTrends {
    MarketTrends {
        mid_price,
        average_living_sqft: average(comparables.iter().filter_map(|c| c.living_sqft)),
        average_lot_sqft: average(comparables.iter().filter_map(|c| c.lot_sqft)),
        average_year_built: average(
            comparables
                .iter()
                .filter_map(|c| c.year_built)
                .map(|y| y as f64),
        ),
    }
}

fn whole_sqft(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.0} sq ft"))
        .unwrap_or_else(|| "N/A".into())
}

impl MarketTrends {
    pub fn pricing_trends(&self) -> String {
        format!(
            "Pricing Trends: The average price of comparable homes is approximately {}. \
             Homes typically have an average size of {} and a lot size of {}.",
            format_currency(self.mid_price),
            whole_sqft(self.average_living_sqft),
            whole_sqft(self.average_lot_sqft),
        )
    }

    pub fn buyer_preferences(&self) -> String {
        let year = self
            .average_year_built
            .map(|y| format!("{y:.0}"))
            .unwrap_or_else(|| "N/A".into());
        format!(
            "Buyer Preferences: Buyers tend to prefer homes built around {year} \
             with spacious lots averaging {}.",
            whole_sqft(self.average_lot_sqft),
        )
    }
}

/// City part of a "street, city, state zip" address, at most two words.
pub fn city_name(address: &str) -> Option<String> {
    let city = address
        .split(',')
        .nth(1)?
        .split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ");
    (!city.is_empty()).then_some(city)
}

pub fn trends_title(address: &str) -> String {
    match city_name(address) {
        Some(city) => format!("Current Market Trends in {city}"),
        None => "Current Market Trends".to_string(),
    }
}
