use serde::Deserialize;
use serde_json::Value;

// Shapes returned by the listing API. Numeric leaves stay as raw `Value`s because the
// API mixes numbers, numeric strings and nulls; the normalizer reads them later.
//
// searchResults[]
//  └── property
//       ├── zpid
//       ├── bedrooms / bathrooms / livingArea / yearBuilt
//       ├── lotSizeWithUnit
//       │    ├── lotSize
//       │    └── lotSizeUnit
//       ├── address
//       │    ├── streetAddress
//       │    ├── city
//       │    ├── state
//       │    └── zipcode
//       ├── location { latitude, longitude }
//       ├── media.propertyPhotoLinks.mediumSizeLink
//       ├── price.value
//       ├── estimates.zestimate
//       ├── taxAssessment.taxAssessedValue
//       ├── listing.listingStatus
//       ├── lastSoldDate (epoch millis)
//       └── daysOnZillow

#[derive(Debug, Deserialize)]
pub struct SearchResults {
    #[serde(rename = "searchResults", default)]
    pub search_results: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct SearchHit {
    pub property: RawCandidate,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCandidate {
    pub zpid: Option<Value>,
    pub bedrooms: Option<Value>,
    pub bathrooms: Option<Value>,
    pub living_area: Option<Value>,
    pub year_built: Option<Value>,
    pub lot_size_with_unit: Option<LotSizeWithUnit>,
    pub address: Option<RawAddress>,
    pub location: Option<RawLocation>,
    pub media: Option<Media>,
    pub price: Option<RawPrice>,
    pub estimates: Option<Estimates>,
    pub tax_assessment: Option<TaxAssessment>,
    pub listing: Option<Listing>,
    pub last_sold_date: Option<Value>,
    pub days_on_zillow: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotSizeWithUnit {
    pub lot_size: Option<Value>,
    pub lot_size_unit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAddress {
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
}

impl RawAddress {
    /// "street, city, ST zip", the same layout lookups use for the subject.
    pub fn one_line(&self) -> Option<String> {
        fn part(s: &Option<String>) -> Option<&str> {
            s.as_deref().map(str::trim).filter(|s| !s.is_empty())
        }
        Some(format!(
            "{}, {}, {} {}",
            part(&self.street_address)?,
            part(&self.city)?,
            part(&self.state)?,
            part(&self.zipcode)?
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub property_photo_links: Option<PhotoLinks>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoLinks {
    pub medium_size_link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPrice {
    pub value: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Estimates {
    pub zestimate: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxAssessment {
    pub tax_assessed_value: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub listing_status: Option<String>,
}

impl RawCandidate {
    pub fn photo_link(&self) -> Option<&str> {
        self.media
            .as_ref()?
            .property_photo_links
            .as_ref()?
            .medium_size_link
            .as_deref()
    }

    pub fn lot_value(&self) -> Option<&Value> {
        self.lot_size_with_unit.as_ref()?.lot_size.as_ref()
    }

    pub fn lot_unit(&self) -> Option<&str> {
        self.lot_size_with_unit.as_ref()?.lot_size_unit.as_deref()
    }

    pub fn price_value(&self) -> Option<&Value> {
        self.price.as_ref()?.value.as_ref()
    }

    pub fn is_for_sale(&self) -> bool {
        self.listing
            .as_ref()
            .and_then(|l| l.listing_status.as_deref())
            .is_some_and(|s| s.eq_ignore_ascii_case("forSale"))
    }

    pub fn property_id(&self) -> Option<String> {
        match self.zpid.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

// byaddress
//  ├── zillowURL
//  └── propertyDetails
//       ├── latitude / longitude
//       ├── bedrooms / bathrooms / livingArea / lotSize / yearBuilt
//       ├── price / lastSoldPrice
//       ├── description
//       ├── taxHistory[] { value, taxPaid }
//       ├── mediumImageLink
//       ├── originalPhotos[].mixedSources.jpeg[].url
//       └── timeOnZillow ("12 days")

#[derive(Debug, Deserialize)]
pub struct PropertyLookupResponse {
    #[serde(rename = "zillowURL")]
    pub zillow_url: Option<String>,
    /// Decoded into [`PropertyDetails`] by the lookup adapter.
    #[serde(rename = "propertyDetails")]
    pub property_details: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    pub latitude: Option<Value>,
    pub longitude: Option<Value>,
    pub bedrooms: Option<Value>,
    pub bathrooms: Option<Value>,
    pub price: Option<Value>,
    pub year_built: Option<Value>,
    pub description: Option<String>,
    #[serde(default)]
    pub tax_history: Vec<TaxRecord>,
    pub living_area: Option<Value>,
    pub lot_size: Option<Value>,
    pub last_sold_price: Option<Value>,
    pub medium_image_link: Option<String>,
    #[serde(default)]
    pub original_photos: Vec<OriginalPhoto>,
    pub time_on_zillow: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRecord {
    pub value: Option<Value>,
    pub tax_paid: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalPhoto {
    pub mixed_sources: Option<MixedSources>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MixedSources {
    #[serde(default)]
    pub jpeg: Vec<PhotoSource>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PhotoSource {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxInfoResponse {
    #[serde(default)]
    pub tax_history: Vec<TaxRecord>,
}
