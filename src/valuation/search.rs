// src/valuation/search.rs

use crate::domain::{SearchCriteria, SubjectProperty, Tier};
use crate::sources::{ComparableQuery, ComparableSearch};
use crate::valuation::filter::{filter_candidates, FilterContext, FilteredBatch, MIN_COMPARABLES};
use chrono::NaiveDate;

/// How one tier's search ended.
#[derive(Debug, Clone, PartialEq)]
pub struct TierOutcome {
    /// Accumulated sold comparables, or the last attempt's active listings.
    pub batch: FilteredBatch,
    pub attempts: u32,
    /// Criteria of the last attempt, if any search ran.
    pub criteria: Option<SearchCriteria>,
    /// Collaborator failures, one entry per failed attempt.
    pub errors: Vec<String>,
}

impl TierOutcome {
    pub fn tier(&self) -> Tier {
        self.batch.tier
    }

    pub fn is_sufficient(&self) -> bool {
        self.batch.accepted.len() >= MIN_COMPARABLES
    }

    pub fn accepted_count(&self) -> usize {
        self.batch.accepted.len()
    }
}

/// Criteria for each relaxation step, strictest first.
///
/// Step `i` lowers both bed and bath counts by `i`, for `i` in `0..min(beds, baths)`.
/// When either count is unknown a single unconstrained search is made instead.
pub fn relaxation_schedule(subject: &SubjectProperty) -> Vec<SearchCriteria> {
    match (subject.bedrooms, subject.bathroom_count()) {
        (Some(beds), Some(baths)) => (0..beds.min(baths))
            .map(|step| SearchCriteria::relaxed(beds, baths, step))
            .collect(),
        _ => vec![SearchCriteria::UNCONSTRAINED],
    }
}

/// Runs the relaxation loop for one tier.
///
/// Sold comparables accumulate across attempts (deduplicated by address, capped at
/// six) and the loop stops once the running total reaches [`MIN_COMPARABLES`]. Active
/// listings are replaced by each attempt, so exhaustion keeps the last attempt's
/// result, which may be empty. A failed search counts as an empty attempt.
pub fn search_tier(
    subject: &SubjectProperty,
    tier: Tier,
    search: &dyn ComparableSearch,
    radius_miles: f64,
    today: NaiveDate,
) -> TierOutcome {
    let ctx = FilterContext {
        subject,
        tier,
        today,
    };

    let mut outcome = TierOutcome {
        batch: FilteredBatch::empty(&ctx),
        attempts: 0,
        criteria: None,
        errors: Vec::new(),
    };

    let Some((latitude, longitude)) = subject.coordinates() else {
        tracing::warn!(%tier, "Subject has no coordinates; skipping comparable search");
        return outcome;
    };

    for criteria in relaxation_schedule(subject) {
        outcome.attempts += 1;
        outcome.criteria = Some(criteria);

        let query = ComparableQuery {
            latitude,
            longitude,
            radius_miles,
            tier,
            criteria,
        };

        let batch = match search.search(&query) {
            Ok(raw) => filter_candidates(&raw, &ctx),
            Err(e) => {
                tracing::warn!(%tier, attempt = outcome.attempts, "Comparable search failed: {e}");
                outcome.errors.push(e.to_string());
                FilteredBatch::empty(&ctx)
            }
        };

        match tier {
            Tier::Sold => outcome.batch.absorb(batch),
            Tier::Active => outcome.batch = batch,
        }

        tracing::debug!(
            %tier,
            attempt = outcome.attempts,
            beds = ?criteria.bedrooms,
            baths = ?criteria.bathrooms,
            accepted = outcome.batch.accepted.len(),
            skipped = outcome.batch.skipped.len(),
            "Relaxation attempt finished"
        );

        if outcome.is_sufficient() {
            break;
        }
    }

    tracing::info!(
        %tier,
        attempts = outcome.attempts,
        accepted = outcome.accepted_count(),
        "Comparable search complete"
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SourceError;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Returns a scripted response per call and records the queries it saw.
    struct ScriptedSearch {
        responses: Mutex<Vec<Result<Vec<Value>, SourceError>>>,
        seen: Mutex<Vec<ComparableQuery>>,
    }

    impl ScriptedSearch {
        fn new(responses: Vec<Result<Vec<Value>, SourceError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().rev().collect()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<ComparableQuery> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl ComparableSearch for ScriptedSearch {
        fn search(&self, query: &ComparableQuery) -> Result<Vec<Value>, SourceError> {
            self.seen.lock().unwrap().push(query.clone());
            self.responses.lock().unwrap().pop().unwrap_or(Ok(Vec::new()))
        }
    }

    fn comps(n: usize) -> Vec<Value> {
        comps_from(0, n)
    }

    fn comps_from(start: usize, n: usize) -> Vec<Value> {
        (start..start + n)
            .map(|i| {
                json!({
                    "property": {
                        "zpid": 500 + i,
                        "bedrooms": 3,
                        "bathrooms": 2,
                        "livingArea": 1900,
                        "lotSizeWithUnit": { "lotSize": 6000 },
                        "address": {
                            "streetAddress": format!("{} Cedar St", 10 + i),
                            "city": "Teaneck",
                            "state": "NJ",
                            "zipcode": "07666"
                        },
                        "media": { "propertyPhotoLinks": { "mediumSizeLink": "https://p.example/c.png" } },
                        "price": { "value": 480000 }
                    }
                })
            })
            .collect()
    }

    fn subject(beds: Option<u32>, baths: Option<u32>) -> SubjectProperty {
        let mut s = SubjectProperty::new("1 Main St, Teaneck, NJ 07666");
        s.latitude = Some(40.888);
        s.longitude = Some(-74.011);
        s.bedrooms = beds;
        s.bathrooms = baths.map(f64::from);
        s
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn schedule_relaxes_symmetrically() {
        let schedule = relaxation_schedule(&subject(Some(4), Some(2)));
        assert_eq!(
            schedule,
            vec![SearchCriteria::relaxed(4, 2, 0), SearchCriteria::relaxed(4, 2, 1)]
        );
        assert_eq!(schedule[1].bedrooms, Some(3));
        assert_eq!(schedule[1].bathrooms, Some(1));
    }

    #[test]
    fn schedule_for_unknown_counts_is_one_open_search() {
        assert_eq!(
            relaxation_schedule(&subject(None, Some(2))),
            vec![SearchCriteria::UNCONSTRAINED]
        );
        assert!(relaxation_schedule(&subject(Some(0), Some(2))).is_empty());
    }

    #[test]
    fn stops_at_first_attempt_with_enough_comparables() {
        let search = ScriptedSearch::new(vec![Ok(comps(1)), Ok(comps(4)), Ok(comps(6))]);
        let subject = subject(Some(3), Some(3));
        let outcome = search_tier(&subject, Tier::Sold, &search, 1.0, today());

        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.accepted_count(), 4);
        assert!(outcome.is_sufficient());
        let seen = search.seen();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].criteria, SearchCriteria::relaxed(3, 3, 1));
    }

    #[test]
    fn sold_tier_accumulates_across_attempts() {
        let search = ScriptedSearch::new(vec![
            Ok(comps_from(0, 2)),
            Ok(comps_from(2, 2)),
            Ok(Vec::new()),
        ]);
        let subject = subject(Some(3), Some(3));
        let outcome = search_tier(&subject, Tier::Sold, &search, 1.0, today());

        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.accepted_count(), 4);
        assert_eq!(outcome.batch.accepted[0].address, "10 Cedar St, Teaneck, NJ 07666");
        assert_eq!(outcome.batch.accepted[3].address, "13 Cedar St, Teaneck, NJ 07666");
        assert_eq!(outcome.batch.grid.rows.len(), 5);
        assert_eq!(search.seen().len(), 2);
    }

    #[test]
    fn sold_tier_merge_skips_repeats_and_caps_at_six() {
        let search = ScriptedSearch::new(vec![Ok(comps_from(0, 2)), Ok(comps_from(0, 8))]);
        let subject = subject(Some(3), Some(3));
        let outcome = search_tier(&subject, Tier::Sold, &search, 1.0, today());

        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.accepted_count(), 6);
        assert_eq!(outcome.batch.accepted[2].address, "12 Cedar St, Teaneck, NJ 07666");
    }

    #[test]
    fn exhaustion_keeps_last_attempt() {
        let search = ScriptedSearch::new(vec![Ok(comps(2)), Ok(comps(1))]);
        let subject = subject(Some(2), Some(5));
        let outcome = search_tier(&subject, Tier::Active, &search, 1.0, today());

        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.accepted_count(), 1);
        assert!(!outcome.is_sufficient());
    }

    #[test]
    fn failed_search_is_recorded_and_loop_continues() {
        let search = ScriptedSearch::new(vec![
            Err(SourceError::Network("timeout".into())),
            Ok(comps(3)),
        ]);
        let subject = subject(Some(2), Some(2));
        let outcome = search_tier(&subject, Tier::Sold, &search, 1.0, today());

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.accepted_count(), 3);
    }

    #[test]
    fn subject_counts_are_untouched() {
        let search = ScriptedSearch::new(vec![Ok(Vec::new()), Ok(Vec::new()), Ok(Vec::new())]);
        let subject = subject(Some(3), Some(3));
        let before = subject.clone();
        let outcome = search_tier(&subject, Tier::Sold, &search, 1.0, today());

        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.accepted_count(), 0);
        assert_eq!(subject, before);
        assert_eq!(outcome.batch.grid.rows[0].bedrooms, "3");
    }

    #[test]
    fn no_coordinates_means_no_search() {
        let search = ScriptedSearch::new(vec![Ok(comps(3))]);
        let mut subject = subject(Some(3), Some(2));
        subject.latitude = None;
        let outcome = search_tier(&subject, Tier::Sold, &search, 1.0, today());

        assert_eq!(outcome.attempts, 0);
        assert!(search.seen().is_empty());
    }
}
