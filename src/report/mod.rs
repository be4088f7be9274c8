//! Report generation: run both comparable tiers, settle on a price band, gather the
//! narrative text and hand everything to a [`ReportAssembler`].

pub mod assembler;
pub mod pipeline;
pub mod trends;

use crate::domain::{PriceBand, ReportKind, SubjectProperty, Tier};
use crate::valuation::normalize::format_currency;
use crate::valuation::{TierOutcome, MIN_COMPARABLES};
use chrono::NaiveDate;

pub use assembler::{HtmlReportAssembler, ReportArtifacts, ReportAssembler};
pub use pipeline::{build_report_data, Collaborators, PipelineSettings};
pub use trends::{market_trends, trends_title, MarketTrends};

/// Everything the assembler needs for one report.
#[derive(Debug, Clone)]
pub struct ReportData {
    pub kind: ReportKind,
    pub subject: SubjectProperty,
    pub sold: TierOutcome,
    pub active: TierOutcome,
    pub band: PriceBand,
    pub annual_tax: Option<f64>,
    pub recommendation: String,
    pub considerations: String,
    pub generated_on: NaiveDate,
}

impl ReportData {
    pub fn outcome(&self, tier: Tier) -> &TierOutcome {
        match tier {
            Tier::Sold => &self.sold,
            Tier::Active => &self.active,
        }
    }

    pub fn annual_tax_display(&self) -> String {
        self.annual_tax
            .map(format_currency)
            .unwrap_or_else(|| "N/A".into())
    }

    pub fn assessed_value_display(&self) -> String {
        self.subject
            .assessed_value
            .map(format_currency)
            .unwrap_or_else(|| "N/A".into())
    }

    /// Trends over the sold comparables, against the band's mid price.
    pub fn market_trends(&self) -> MarketTrends {
        market_trends(&self.sold.batch.accepted, self.band.mid)
    }

    /// A sentence for each tier that came back with fewer than the minimum.
    pub fn shortfall_notes(&self) -> Vec<String> {
        [Tier::Sold, Tier::Active]
            .into_iter()
            .filter_map(|tier| shortfall_note(self.outcome(tier)))
            .collect()
    }
}

fn shortfall_note(outcome: &TierOutcome) -> Option<String> {
    let found = outcome.accepted_count();
    if found >= MIN_COMPARABLES {
        return None;
    }
    let what = match outcome.tier() {
        Tier::Sold => "recently sold",
        Tier::Active => "currently listed",
    };
    Some(match found {
        0 => format!("No comparable {what} properties were found nearby."),
        1 => format!("Only 1 comparable {what} property was found nearby."),
        n => format!("Only {n} comparable {what} properties were found nearby."),
    })
}
