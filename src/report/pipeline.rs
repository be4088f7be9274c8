// src/report/pipeline.rs

use crate::domain::{ReportKind, SubjectProperty, Tier};
use crate::narrative::{
    complete_or, NarrativeGenerator, PromptSet, CONSIDERATIONS_PLACEHOLDER,
    RECOMMENDATION_PLACEHOLDER,
};
use crate::report::ReportData;
use crate::sources::{ComparableSearch, PropertyLookup, TaxHistory};
use crate::valuation::{estimate_from_comparables, resolve_band, search_tier};
use chrono::NaiveDate;
use std::sync::Arc;

/// External services a report run talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub lookup: Arc<dyn PropertyLookup>,
    pub search: Arc<dyn ComparableSearch>,
    pub tax: Arc<dyn TaxHistory>,
    pub narrative: Arc<dyn NarrativeGenerator>,
}

#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub radius_miles: f64,
    pub today: NaiveDate,
}

/// Runs the whole valuation for one subject. Only the search collaborator is required
/// to succeed for useful output; every other failure degrades to a fallback.
pub fn build_report_data(
    kind: ReportKind,
    subject: SubjectProperty,
    collab: &Collaborators,
    settings: PipelineSettings,
) -> ReportData {
    tracing::info!(%kind, address = %subject.address, "Building report");

    let sold = search_tier(
        &subject,
        Tier::Sold,
        collab.search.as_ref(),
        settings.radius_miles,
        settings.today,
    );
    let active = search_tier(
        &subject,
        Tier::Active,
        collab.search.as_ref(),
        settings.radius_miles,
        settings.today,
    );

    let prompts = PromptSet::build(kind, &subject, &sold.batch.grid, &active.batch.grid);

    let pricing_answer = match collab.narrative.complete(&prompts.pricing) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!("Narrative pricing failed: {e}");
            None
        }
    };
    let band = resolve_band(pricing_answer.as_deref(), || {
        estimate_from_comparables(&subject, &sold.batch.accepted, &active.batch.accepted)
    });
    tracing::info!(
        low = band.low,
        mid = band.mid,
        high = band.high,
        basis = band.basis.as_str(),
        "Price band settled"
    );

    let annual_tax = match collab.tax.annual_tax(&subject) {
        Ok(tax) => tax,
        Err(e) => {
            tracing::warn!("Tax history lookup failed: {e}");
            None
        }
    };

    let recommendation = complete_or(
        collab.narrative.as_ref(),
        &prompts.recommendation,
        RECOMMENDATION_PLACEHOLDER,
    );
    let considerations = complete_or(
        collab.narrative.as_ref(),
        &prompts.considerations,
        CONSIDERATIONS_PLACEHOLDER,
    );

    ReportData {
        kind,
        subject,
        sold,
        active,
        band,
        annual_tax,
        recommendation,
        considerations,
        generated_on: settings.today,
    }
}
