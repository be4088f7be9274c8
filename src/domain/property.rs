// src/domain/property.rs

use crate::valuation::normalize::{
    format_currency, format_days_on_market, format_sqft, lot_value_to_sqft,
};
use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://www.zillowstatic.com/static/images/nophoto_p_c.png";

/// The property a report is written about.
///
/// Built once per request, either from a lookup or from the client's JSON, and never
/// mutated afterwards. Numeric fields accept numbers, currency strings ("$450,000")
/// or placeholders ("N/A"); anything unparsable becomes `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectProperty {
    #[serde(default)]
    pub address: String,

    #[serde(default, deserialize_with = "lenient::number")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub longitude: Option<f64>,

    #[serde(default, deserialize_with = "lenient::count")]
    pub bedrooms: Option<u32>,
    /// As reported; may be fractional ("2.5" for two and a half baths).
    #[serde(default, deserialize_with = "lenient::number")]
    pub bathrooms: Option<f64>,

    /// Living area in square feet.
    #[serde(default, deserialize_with = "lenient::number")]
    pub living_area: Option<f64>,
    /// Lot size as reported; may be acres or square feet.
    #[serde(default, deserialize_with = "lenient::number")]
    pub lot_size: Option<f64>,

    /// List price or estimate.
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub assessed_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub last_sold_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient::count")]
    pub days_on_market: Option<u32>,

    #[serde(default = "placeholder_image")]
    pub main_image_url: String,
    #[serde(default)]
    pub listing_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub year_built: Option<u32>,
}

fn placeholder_image() -> String {
    PLACEHOLDER_IMAGE_URL.to_string()
}

impl SubjectProperty {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            latitude: None,
            longitude: None,
            bedrooms: None,
            bathrooms: None,
            living_area: None,
            lot_size: None,
            price: None,
            assessed_value: None,
            last_sold_price: None,
            days_on_market: None,
            main_image_url: placeholder_image(),
            listing_url: None,
            description: None,
            year_built: None,
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    /// Fields a report cannot be generated without.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.address.trim().is_empty() {
            missing.push("address");
        }
        if self.latitude.is_none() {
            missing.push("latitude");
        }
        if self.longitude.is_none() {
            missing.push("longitude");
        }
        missing
    }

    /// Whole bathrooms, for search criteria.
    pub fn bathroom_count(&self) -> Option<u32> {
        self.bathrooms
            .filter(|n| n.is_finite() && *n >= 0.0 && *n <= u32::MAX as f64)
            .map(|n| n.floor() as u32)
    }

    pub fn lot_sqft(&self) -> Option<f64> {
        self.lot_size.filter(|v| v.is_finite()).map(lot_value_to_sqft)
    }

    pub fn living_sqft(&self) -> Option<f64> {
        self.living_area.filter(|v| v.is_finite())
    }

    pub fn price_display(&self) -> String {
        self.price.map(format_currency).unwrap_or_else(|| "N/A".into())
    }

    pub fn living_area_display(&self) -> String {
        self.living_sqft()
            .map(format_sqft)
            .unwrap_or_else(|| "(square footage Not Available)".into())
    }

    pub fn lot_size_display(&self) -> String {
        self.lot_sqft().map(format_sqft).unwrap_or_else(|| "N/A".into())
    }

    pub fn days_on_market_display(&self) -> String {
        format_days_on_market(self.days_on_market)
    }

    pub fn specifications_display(&self) -> String {
        let na = || "N/A".to_string();
        format!(
            "{} bedrooms, {} bathrooms",
            self.bedrooms.map(|c| c.to_string()).unwrap_or_else(na),
            self.bathrooms.map(|c| c.to_string()).unwrap_or_else(na)
        )
    }
}

/// Deserializers that run raw JSON values through the normalizer instead of failing.
pub(crate) mod lenient {
    use crate::valuation::normalize::parse_currency_or_number;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(parse_currency_or_number(&value))
    }

    pub fn count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(number(deserializer)?
            .filter(|n| *n >= 0.0 && *n <= u32::MAX as f64)
            .map(|n| n.floor() as u32))
    }
}
