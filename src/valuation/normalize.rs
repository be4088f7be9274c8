// src/valuation/normalize.rs
//
// Turns loosely-typed listing fields into numbers. Nothing in here fails: input that
// cannot be read becomes `None`, and callers leave that metric out rather than
// counting it as zero.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

pub const SQFT_PER_ACRE: f64 = 43560.0;

/// Lot values below this are taken to be acres.
pub const ACRE_HEURISTIC_LIMIT: f64 = 10.0;

pub const EARTH_RADIUS_MILES: f64 = 3958.8;

const PLACEHOLDERS: [&str; 4] = ["n/a", "na", "--", "none"];

/// Reads a JSON number or a currency/area string ("$1,200,000", "1,850 sq ft").
pub fn parse_currency_or_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_currency_str(s),
        _ => None,
    }
}

pub fn parse_currency_str(raw: &str) -> Option<f64> {
    let cleaned = raw
        .replace('$', "")
        .replace(',', "")
        .replace(" sq ft", "")
        .trim()
        .to_string();

    if cleaned.is_empty() || PLACEHOLDERS.contains(&cleaned.to_ascii_lowercase().as_str()) {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Parses a lot size and converts acreage to square feet.
pub fn normalize_lot_size(value: &Value) -> Option<f64> {
    parse_currency_or_number(value).map(lot_value_to_sqft)
}

pub fn lot_value_to_sqft(value: f64) -> f64 {
    if value < ACRE_HEURISTIC_LIMIT {
        value * SQFT_PER_ACRE
    } else {
        value
    }
}

/// Like [`normalize_lot_size`], but an explicit acreage unit always converts.
pub fn normalize_lot_with_unit(value: &Value, unit: Option<&str>) -> Option<f64> {
    let parsed = parse_currency_or_number(value)?;
    match unit.map(|u| u.trim().to_ascii_lowercase()) {
        Some(u) if u == "acres" || u == "acre" => Some(parsed * SQFT_PER_ACRE),
        _ => Some(lot_value_to_sqft(parsed)),
    }
}

/// Great-circle distance between two points, in miles.
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// "$1,200,000" for whole amounts, "$1,200,000.50" otherwise.
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    let cents = (abs * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);

    if cents % 100 == 0 {
        format!("{sign}${whole}")
    } else {
        format!("{sign}${whole}.{:02}", cents % 100)
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_sqft(value: f64) -> String {
    format!("{value:.2} sq ft")
}

pub fn format_days_on_market(days: Option<u32>) -> String {
    match days {
        Some(d) if d > 365 => "Not Available".to_string(),
        Some(d) => d.to_string(),
        None => "N/A".to_string(),
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%m-%d-%Y").to_string()
}

/// Sold dates arrive as milliseconds since the epoch.
pub fn date_from_millis(millis: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}

/// Public listing page for an address and listing-site property id.
pub fn listing_url(address: &str, property_id: &str) -> String {
    let slug = address
        .to_lowercase()
        .replace(',', "")
        .replace(' ', "-")
        .replace('#', "");
    format!("https://www.zillow.com/homedetails/{slug}/{property_id}_zpid/")
}
