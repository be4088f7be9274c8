// src/valuation/filter.rs

use crate::domain::{
    AcceptedComparable, ComparableGrid, ListingTiming, SkipReason, SubjectProperty, Tier,
};
use crate::sources::models::{RawCandidate, SearchHit};
use crate::valuation::normalize::{
    date_from_millis, haversine_miles, listing_url, normalize_lot_with_unit,
    parse_currency_or_number,
};
use chrono::{Duration, NaiveDate};
use serde_json::Value;

/// Most comparables kept per tier.
pub const MAX_COMPARABLES: usize = 6;

/// A tier counts as satisfied once this many comparables are accepted.
pub const MIN_COMPARABLES: usize = 3;

const SUPPORTED_PHOTO_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".bmp"];

/// Missing-data penalty: 0 means every scored field is present.
pub fn completeness_score(candidate: &RawCandidate) -> f64 {
    let missing = |v: Option<&Value>| v.and_then(parse_currency_or_number).is_none();

    let mut score = 0.0;
    if missing(candidate.bedrooms.as_ref()) {
        score += 0.5;
    }
    if missing(candidate.bathrooms.as_ref()) {
        score += 0.5;
    }
    if missing(candidate.living_area.as_ref()) {
        score += 2.0;
    }
    if missing(candidate.lot_value()) {
        score += 1.0;
    }
    score
}

/// Sold comparables are held to `>= 2.5`, active listings to `> 2.4`.
pub fn is_too_incomplete(tier: Tier, score: f64) -> bool {
    match tier {
        Tier::Sold => score >= 2.5,
        Tier::Active => score > 2.4,
    }
}

pub fn has_supported_photo(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    SUPPORTED_PHOTO_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(ext))
}

/// What the filter needs to know about the subject.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub subject: &'a SubjectProperty,
    pub tier: Tier,
    /// Used to back-date list dates from days on market.
    pub today: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCandidate {
    /// Position in the search results.
    pub index: usize,
    pub reason: SkipReason,
}

/// Result of screening one batch of search results.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredBatch {
    pub tier: Tier,
    pub accepted: Vec<AcceptedComparable>,
    pub grid: ComparableGrid,
    pub skipped: Vec<SkippedCandidate>,
    /// Candidates looked at before the cap was hit.
    pub examined: usize,
}

impl FilteredBatch {
    pub fn empty(ctx: &FilterContext<'_>) -> Self {
        Self {
            tier: ctx.tier,
            accepted: Vec::new(),
            grid: ComparableGrid::for_subject(ctx.tier, ctx.subject),
            skipped: Vec::new(),
            examined: 0,
        }
    }

    /// Adds another attempt's results to this one.
    ///
    /// Accepted comparables keep first-accepted order; an address already present is
    /// not added twice, and nothing is added past [`MAX_COMPARABLES`].
    pub fn absorb(&mut self, other: FilteredBatch) {
        self.examined += other.examined;
        self.skipped.extend(other.skipped);

        for comparable in other.accepted {
            if self.accepted.len() >= MAX_COMPARABLES {
                break;
            }
            let seen = self
                .accepted
                .iter()
                .any(|c| c.address.trim().eq_ignore_ascii_case(comparable.address.trim()));
            if seen {
                continue;
            }
            self.grid.push(comparable.grid_row());
            self.accepted.push(comparable);
        }
    }

    pub fn skip_count(&self, matches: impl Fn(&SkipReason) -> bool) -> usize {
        self.skipped.iter().filter(|s| matches(&s.reason)).count()
    }
}

/// Screens raw search results in order, stopping once [`MAX_COMPARABLES`] are accepted.
///
/// For active listings, once the number of candidates rejected for missing data
/// reaches `total - 3`, further incomplete candidates are kept so small result sets
/// still yield something.
pub fn filter_candidates(raw: &[Value], ctx: &FilterContext<'_>) -> FilteredBatch {
    let mut batch = FilteredBatch::empty(ctx);
    let total = raw.len() as i64;
    let mut incomplete_skips: i64 = 0;

    for (index, item) in raw.iter().enumerate() {
        batch.examined += 1;

        let outcome = match decode_candidate(item) {
            Ok(candidate) => {
                let score = completeness_score(&candidate);
                let keep_anyway = if is_too_incomplete(ctx.tier, score) {
                    match ctx.tier {
                        Tier::Sold => false,
                        Tier::Active => {
                            incomplete_skips += 1;
                            incomplete_skips >= total - 3
                        }
                    }
                } else {
                    true
                };

                if keep_anyway {
                    screen_candidate(&candidate, score, ctx)
                } else {
                    Err(SkipReason::IncompleteData { score })
                }
            }
            Err(reason) => Err(reason),
        };

        match outcome {
            Ok(comparable) => {
                batch.grid.push(comparable.grid_row());
                batch.accepted.push(comparable);
            }
            Err(reason) => {
                match &reason {
                    SkipReason::Malformed(_) => {
                        tracing::warn!(tier = %ctx.tier, "Skipping candidate {index}: {reason}")
                    }
                    _ => tracing::debug!(tier = %ctx.tier, "Skipping candidate {index}: {reason}"),
                }
                batch.skipped.push(SkippedCandidate { index, reason });
            }
        }

        if batch.accepted.len() >= MAX_COMPARABLES {
            break;
        }
    }

    batch
}

fn decode_candidate(item: &Value) -> Result<RawCandidate, SkipReason> {
    serde_json::from_value::<SearchHit>(item.clone())
        .map(|hit| hit.property)
        .map_err(|e| SkipReason::Malformed(e.to_string()))
}

/// Address, photo and derived-field checks for a candidate that passed scoring.
pub fn screen_candidate(
    candidate: &RawCandidate,
    score: f64,
    ctx: &FilterContext<'_>,
) -> Result<AcceptedComparable, SkipReason> {
    let address = candidate
        .address
        .as_ref()
        .and_then(|a| a.one_line())
        .ok_or_else(|| SkipReason::Malformed("missing address".into()))?;

    if address.trim().eq_ignore_ascii_case(ctx.subject.address.trim()) {
        return Err(SkipReason::SelfMatch);
    }

    let photo_url = candidate
        .photo_link()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| SkipReason::Malformed("missing photo link".into()))?;
    if !has_supported_photo(photo_url) {
        return Err(SkipReason::UnsupportedPhoto(photo_url.to_string()));
    }

    let number = |v: Option<&Value>| v.and_then(parse_currency_or_number);

    let distance_miles = match (ctx.subject.coordinates(), candidate.location.as_ref()) {
        (Some((lat, lon)), Some(loc)) => match (loc.latitude, loc.longitude) {
            (Some(clat), Some(clon)) => Some(haversine_miles(lat, lon, clat, clon)),
            _ => None,
        },
        _ => None,
    };

    let property_id = candidate.property_id();
    let listing_url = property_id.as_deref().map(|id| listing_url(&address, id));

    Ok(AcceptedComparable {
        price: number(candidate.price_value()),
        estimate: number(
            candidate
                .estimates
                .as_ref()
                .and_then(|e| e.zestimate.as_ref()),
        ),
        bedrooms: number(candidate.bedrooms.as_ref()),
        bathrooms: number(candidate.bathrooms.as_ref()),
        living_sqft: number(candidate.living_area.as_ref()).filter(|v| *v > 0.0),
        lot_sqft: candidate
            .lot_value()
            .and_then(|v| normalize_lot_with_unit(v, candidate.lot_unit()))
            .filter(|v| *v > 0.0),
        year_built: number(candidate.year_built.as_ref()).map(|y| y as i64),
        assessed_value: number(
            candidate
                .tax_assessment
                .as_ref()
                .and_then(|t| t.tax_assessed_value.as_ref()),
        ),
        distance_miles,
        photo_url: photo_url.to_string(),
        listing_url,
        timing: listing_timing(candidate, ctx.tier, ctx.today),
        completeness_score: score,
        property_id,
        address,
    })
}

fn listing_timing(candidate: &RawCandidate, tier: Tier, today: NaiveDate) -> ListingTiming {
    let days = candidate
        .days_on_zillow
        .as_ref()
        .and_then(parse_currency_or_number)
        .filter(|d| *d >= 0.0)
        .map(|d| d as u32);

    let on_market = || ListingTiming::OnMarket {
        days,
        listed_on: days
            .filter(|d| *d <= 365)
            .and_then(|d| today.checked_sub_signed(Duration::days(d as i64))),
    };

    match (tier, candidate.is_for_sale()) {
        (Tier::Sold, false) => ListingTiming::Sold {
            date: candidate
                .last_sold_date
                .as_ref()
                .and_then(parse_currency_or_number)
                .and_then(|ms| date_from_millis(ms as i64)),
        },
        (Tier::Sold, true) => on_market(),
        (Tier::Active, true) => on_market(),
        (Tier::Active, false) => ListingTiming::AlreadySold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const SUBJECT_ADDRESS: &str = "1 Main St, Teaneck, NJ 07666";

    fn subject() -> SubjectProperty {
        let mut s = SubjectProperty::new(SUBJECT_ADDRESS);
        s.latitude = Some(40.888);
        s.longitude = Some(-74.011);
        s.bedrooms = Some(3);
        s.bathrooms = Some(2.0);
        s
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn candidate(street: &str) -> Value {
        json!({
            "property": {
                "zpid": 1001,
                "bedrooms": 3,
                "bathrooms": 2,
                "livingArea": 1800,
                "lotSizeWithUnit": { "lotSize": 5000, "lotSizeUnit": "sqft" },
                "address": {
                    "streetAddress": street,
                    "city": "Teaneck",
                    "state": "NJ",
                    "zipcode": "07666"
                },
                "location": { "latitude": 40.89, "longitude": -74.02 },
                "media": { "propertyPhotoLinks": { "mediumSizeLink": "https://p.example/house.jpg" } },
                "price": { "value": 510000 },
                "estimates": { "zestimate": 525000 },
                "listing": { "listingStatus": "recentlySold" },
                "lastSoldDate": 1_700_000_000_000i64
            }
        })
    }

    fn without(mut value: Value, fields: &[&str]) -> Value {
        let prop = value["property"].as_object_mut().unwrap();
        for f in fields {
            prop.remove(*f);
        }
        value
    }

    fn ctx(subject: &SubjectProperty, tier: Tier) -> FilterContext<'_> {
        FilterContext {
            subject,
            tier,
            today: today(),
        }
    }

    #[test]
    fn score_weights_missing_fields() {
        let full: SearchHit = serde_json::from_value(candidate("2 Elm St")).unwrap();
        assert_eq!(completeness_score(&full.property), 0.0);

        let sparse: SearchHit = serde_json::from_value(without(
            candidate("2 Elm St"),
            &["bedrooms", "livingArea", "lotSizeWithUnit"],
        ))
        .unwrap();
        assert_eq!(completeness_score(&sparse.property), 3.5);
    }

    #[test]
    fn sold_tier_rejects_missing_area_and_lot() {
        let subject = subject();
        let raw = vec![without(candidate("2 Elm St"), &["livingArea", "lotSizeWithUnit"])];
        let batch = filter_candidates(&raw, &ctx(&subject, Tier::Sold));

        assert!(batch.accepted.is_empty());
        assert_eq!(
            batch.skipped[0].reason,
            SkipReason::IncompleteData { score: 3.0 }
        );
    }

    #[test]
    fn thresholds_differ_by_tier() {
        assert!(!is_too_incomplete(Tier::Sold, 2.0));
        assert!(is_too_incomplete(Tier::Sold, 2.5));
        assert!(is_too_incomplete(Tier::Active, 2.5));
        assert!(!is_too_incomplete(Tier::Active, 2.0));
    }

    #[test]
    fn subject_address_is_never_admitted() {
        let subject = subject();
        let raw = vec![candidate("1 Main St"), candidate("2 Elm St")];
        let batch = filter_candidates(&raw, &ctx(&subject, Tier::Sold));

        assert_eq!(batch.accepted.len(), 1);
        assert_eq!(batch.accepted[0].address, "2 Elm St, Teaneck, NJ 07666");
        assert_eq!(batch.skipped[0].reason, SkipReason::SelfMatch);
    }

    #[test]
    fn accepts_at_most_six_in_order() {
        let subject = subject();
        let raw: Vec<Value> = (1..=10)
            .map(|n| candidate(&format!("{n} Oak Ave")))
            .collect();
        let batch = filter_candidates(&raw, &ctx(&subject, Tier::Sold));

        assert_eq!(batch.accepted.len(), MAX_COMPARABLES);
        assert_eq!(batch.examined, 6);
        assert_eq!(batch.accepted[0].address, "1 Oak Ave, Teaneck, NJ 07666");
        assert_eq!(batch.accepted[5].address, "6 Oak Ave, Teaneck, NJ 07666");
        // Subject row plus one per comparable.
        assert_eq!(batch.grid.rows.len(), 7);
    }

    #[test]
    fn unsupported_photo_is_skipped() {
        let subject = subject();
        let mut raw = candidate("2 Elm St");
        raw["property"]["media"]["propertyPhotoLinks"]["mediumSizeLink"] =
            json!("https://p.example/house.webp");
        let batch = filter_candidates(&[raw], &ctx(&subject, Tier::Sold));

        assert!(matches!(
            batch.skipped[0].reason,
            SkipReason::UnsupportedPhoto(_)
        ));
        assert!(has_supported_photo("https://p.example/HOUSE.JPEG"));
    }

    #[test]
    fn malformed_candidate_does_not_abort_batch() {
        let subject = subject();
        let raw = vec![
            json!({ "property": "not an object" }),
            without(candidate("3 Elm St"), &["address"]),
            candidate("4 Elm St"),
        ];
        let batch = filter_candidates(&raw, &ctx(&subject, Tier::Sold));

        assert_eq!(batch.accepted.len(), 1);
        assert_eq!(batch.skip_count(|r| matches!(r, SkipReason::Malformed(_))), 2);
    }

    #[test]
    fn active_tier_keeps_incomplete_once_pool_runs_low() {
        let subject = subject();
        let sparse = |n: u32| {
            let mut v = without(candidate(&format!("{n} Pine Rd")), &["livingArea", "lotSizeWithUnit"]);
            v["property"]["listing"]["listingStatus"] = json!("forSale");
            v["property"]["daysOnZillow"] = json!(20);
            v
        };
        // 5 candidates, all incomplete: the first skip count that reaches 5 - 3 = 2
        // flips the override, so the 2nd through 5th are kept.
        let raw: Vec<Value> = (1..=5).map(sparse).collect();
        let batch = filter_candidates(&raw, &ctx(&subject, Tier::Active));

        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.accepted.len(), 4);
        assert_eq!(batch.accepted[0].address, "2 Pine Rd, Teaneck, NJ 07666");
    }

    #[test]
    fn active_tier_small_pool_keeps_every_incomplete_candidate() {
        let subject = subject();
        let raw: Vec<Value> = (1..=2)
            .map(|n| {
                let mut v = without(candidate(&format!("{n} Pine Rd")), &["livingArea", "lotSizeWithUnit"]);
                v["property"]["listing"]["listingStatus"] = json!("forSale");
                v
            })
            .collect();
        // 2 - 3 < 1, so the first incomplete candidate already trips the override.
        let batch = filter_candidates(&raw, &ctx(&subject, Tier::Active));

        assert!(batch.skipped.is_empty());
        assert_eq!(batch.accepted.len(), 2);
        assert_eq!(batch.accepted[0].completeness_score, 3.0);
    }

    #[test]
    fn sold_tier_has_no_override() {
        let subject = subject();
        let raw: Vec<Value> = (1..=3)
            .map(|n| without(candidate(&format!("{n} Pine Rd")), &["livingArea", "lotSizeWithUnit"]))
            .collect();
        let batch = filter_candidates(&raw, &ctx(&subject, Tier::Sold));
        assert!(batch.accepted.is_empty());
        assert_eq!(batch.skipped.len(), 3);
    }

    #[test]
    fn derived_fields_are_filled() {
        let subject = subject();
        let mut raw = candidate("2 Elm St");
        raw["property"]["lotSizeWithUnit"] = json!({ "lotSize": 0.5, "lotSizeUnit": "acres" });
        let batch = filter_candidates(&[raw], &ctx(&subject, Tier::Sold));
        let comp = &batch.accepted[0];

        assert_eq!(comp.lot_sqft, Some(21780.0));
        assert_eq!(comp.price_display(), "$510,000");
        assert_eq!(comp.initial_price_display(), "$525,000");
        assert_eq!(
            comp.listing_url.as_deref(),
            Some("https://www.zillow.com/homedetails/2-elm-st-teaneck-nj-07666/1001_zpid/")
        );
        assert!(comp.distance_miles.unwrap() < 1.0);
        assert_eq!(
            comp.timing,
            ListingTiming::Sold {
                date: NaiveDate::from_ymd_opt(2023, 11, 14)
            }
        );
        assert_eq!(batch.grid.rows[1].timing, "11-14-2023");
    }

    #[test]
    fn active_listing_timing_back_dates_list_date() {
        let subject = subject();
        let mut fresh = candidate("2 Elm St");
        fresh["property"]["listing"]["listingStatus"] = json!("forSale");
        fresh["property"]["daysOnZillow"] = json!(10);
        let mut stale = candidate("3 Elm St");
        stale["property"]["listing"]["listingStatus"] = json!("forSale");
        stale["property"]["daysOnZillow"] = json!(500);
        let sold = candidate("4 Elm St");

        let batch = filter_candidates(&[fresh, stale, sold], &ctx(&subject, Tier::Active));
        assert_eq!(
            batch.accepted[0].timing,
            ListingTiming::OnMarket {
                days: Some(10),
                listed_on: NaiveDate::from_ymd_opt(2025, 5, 22)
            }
        );
        assert_eq!(batch.grid.rows[2].timing, "Not Available");
        assert_eq!(batch.accepted[2].timing, ListingTiming::AlreadySold);
    }
}
