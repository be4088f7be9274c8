// zillow.rs
use crate::domain::property::PLACEHOLDER_IMAGE_URL;
use crate::domain::{SubjectProperty, Tier};
use crate::sources::models::{
    PropertyDetails, PropertyLookupResponse, SearchResults, TaxInfoResponse, TaxRecord,
};
use crate::sources::{ComparableQuery, ComparableSearch, PropertyLookup, SourceError, TaxHistory};
use crate::valuation::normalize::parse_currency_or_number;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

const API_HOST: &str = "zillow-working-api.p.rapidapi.com";

/// Bedroom ceiling sent when the subject's count is unknown.
const DEFAULT_BED_MAX: u32 = 5;

const HOME_TYPES: &str =
    "Houses, Townhomes, Multi-family, Condos/Co-ops, Lots-Land, Apartments, Manufactured";

/// RapidAPI listing client. One instance is shared by all server workers.
pub struct ZillowClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl ZillowClient {
    pub fn new(api_key: Option<String>) -> Result<Self, SourceError> {
        Self::with_base_url(api_key, format!("https://{API_HOST}"))
    }

    pub fn with_base_url(
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into(),
        })
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            SourceError::Config("ZILLOW_KEY environment variable not set".into())
        })?;

        let url = url::Url::parse_with_params(&format!("{}{path}", self.base_url), params)
            .map_err(|e| SourceError::Config(format!("bad request url: {e}")))?;

        let start = std::time::Instant::now();
        let resp = self
            .client
            .get(url)
            .header("x-rapidapi-key", api_key)
            .header("x-rapidapi-host", API_HOST)
            .send()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        tracing::debug!("GET {path} -> {status} in {:?}", start.elapsed());

        if !status.is_success() {
            return Err(SourceError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| SourceError::JsonParse(e.to_string()))
    }

    fn search_params(query: &ComparableQuery) -> Vec<(&'static str, String)> {
        let status = match query.tier {
            Tier::Sold => "Sold",
            Tier::Active => "For_Sale",
        };
        let bed_max = query.criteria.bedrooms.unwrap_or(DEFAULT_BED_MAX);

        vec![
            ("latitude", query.latitude.to_string()),
            ("longitude", query.longitude.to_string()),
            ("radius", query.radius_miles.to_string()),
            ("page", "1".into()),
            ("listingStatus", status.into()),
            ("bed_max", bed_max.to_string()),
            ("bathrooms", query.criteria.bathroom_tier().as_str().into()),
            ("homeType", HOME_TYPES.into()),
            ("maxHOA", "Any".into()),
            ("listingType", "By_Agent".into()),
            (
                "listingTypeOptions",
                "Agent listed,New Construction,Fore-closures,Auctions".into(),
            ),
            ("parkingSpots", "Any".into()),
            ("mustHaveBasement", "No".into()),
            ("daysOnZillow", "Any".into()),
            ("soldInLast", "Any".into()),
        ]
    }
}

impl PropertyLookup for ZillowClient {
    fn lookup(&self, address: &str) -> Result<SubjectProperty, SourceError> {
        let resp: PropertyLookupResponse = self
            .get_json("/pro/byaddress", &[("propertyaddress", address.to_string())])
            .map_err(|e| match e {
                SourceError::Api { status: 404, .. } => SourceError::NotFound(address.into()),
                other => other,
            })?;

        subject_from_lookup(address, resp)
    }
}

impl ComparableSearch for ZillowClient {
    fn search(&self, query: &ComparableQuery) -> Result<Vec<Value>, SourceError> {
        let results: SearchResults =
            self.get_json("/search/bycoordinates", &Self::search_params(query))?;
        Ok(results.search_results)
    }
}

impl TaxHistory for ZillowClient {
    fn annual_tax(&self, subject: &SubjectProperty) -> Result<Option<f64>, SourceError> {
        let Some(listing_url) = subject.listing_url.as_deref() else {
            return Ok(None);
        };
        let resp: TaxInfoResponse =
            self.get_json("/taxinfo", &[("byurl", listing_url.to_string())])?;
        Ok(latest_tax_paid(&resp.tax_history))
    }
}

/// First (most recent) record with a readable amount paid.
pub fn latest_tax_paid(history: &[TaxRecord]) -> Option<f64> {
    history
        .iter()
        .find_map(|r| r.tax_paid.as_ref().and_then(parse_currency_or_number))
}

/// Flattens a lookup response into the subject record.
pub fn subject_from_lookup(
    address: &str,
    resp: PropertyLookupResponse,
) -> Result<SubjectProperty, SourceError> {
    let details: PropertyDetails = match resp.property_details {
        None | Some(Value::Null) => return Err(SourceError::NotFound(address.to_string())),
        Some(raw) => serde_json::from_value(raw)
            .map_err(|e| SourceError::UnexpectedShape(format!("propertyDetails: {e}")))?,
    };

    let number = |v: &Option<Value>| v.as_ref().and_then(parse_currency_or_number);
    let count = |v: &Option<Value>| number(v).filter(|n| *n >= 0.0).map(|n| n.floor() as u32);

    let main_image_url = details
        .medium_image_link
        .clone()
        .filter(|s| !s.is_empty() && s != "N/A")
        .or_else(|| {
            details
                .original_photos
                .first()
                .and_then(|p| p.mixed_sources.as_ref())
                .and_then(|m| m.jpeg.first())
                .and_then(|j| j.url.clone())
        })
        .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string());

    // "12 days" -> 12
    let days_on_market = details
        .time_on_zillow
        .as_deref()
        .and_then(|t| t.split_whitespace().next())
        .and_then(|d| d.parse::<u32>().ok());

    Ok(SubjectProperty {
        address: address.to_string(),
        latitude: number(&details.latitude),
        longitude: number(&details.longitude),
        bedrooms: count(&details.bedrooms),
        bathrooms: number(&details.bathrooms).filter(|n| *n >= 0.0),
        living_area: number(&details.living_area),
        lot_size: number(&details.lot_size),
        price: number(&details.price),
        assessed_value: details
            .tax_history
            .first()
            .and_then(|t| t.value.as_ref())
            .and_then(parse_currency_or_number),
        last_sold_price: number(&details.last_sold_price),
        days_on_market,
        main_image_url,
        listing_url: resp.zillow_url.filter(|u| !u.is_empty() && u != "N/A"),
        description: details.description.clone(),
        year_built: count(&details.year_built),
    })
}
