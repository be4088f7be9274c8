// src/narrative/prompts.rs

use crate::domain::{ComparableGrid, ReportKind, SubjectProperty};
use crate::narrative::{NarrativePrompt, PromptKind};

const PRICING_INSTRUCTIONS: &str = "Above is the data provided by the property API for the \
address the user entered, along with comparable listings in the area. Assess the home value \
from the comparables, taking beds, baths and size into account. First work out the price per \
square foot, then compare it to estimate the home value. Return low, mid and high integer sale \
prices for the base property only, separated by commas in this exact format: \
(lowprice, midprice, highprice). Send only the values, nothing else.";

/// The three prompts a report needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSet {
    pub pricing: NarrativePrompt,
    pub recommendation: NarrativePrompt,
    pub considerations: NarrativePrompt,
}

impl PromptSet {
    pub fn build(
        kind: ReportKind,
        subject: &SubjectProperty,
        sold: &ComparableGrid,
        active: &ComparableGrid,
    ) -> Self {
        let base = base_property_block(subject);
        let market = format!(
            "Base Property:\n{base}\n\nPast Sales:\n{}\n\nOn Market:\n{}",
            grid_block(sold),
            grid_block(active)
        );

        let pricing = match kind {
            ReportKind::Buyer => format!("{PRICING_INSTRUCTIONS}\n{market}"),
            ReportKind::Seller => {
                format!("Suppose you are an appraisal expert. {PRICING_INSTRUCTIONS}\n{market}")
            }
        };

        let recommendation = match kind {
            ReportKind::Buyer => format!(
                "{market}\nI am thinking of buying this property. All values come from Zillow \
                 and will be used as a basis for the price to offer. Based on the price trend \
                 of the sold market and the supply and demand of the current market, tell me \
                 in 2 lines what the asking price for this property should be. No price has \
                 been set yet, so use the word recommendation instead of \"your asking price\"."
            ),
            ReportKind::Seller => format!(
                "{market}\nI am selling this property. All values come from Zillow and nothing \
                 has been set up yet. This will be the basis for the price I am going to \
                 charge. Based on past trends, the current market, supply and demand, what \
                 pricing would you recommend? Answer in 2 or 3 lines."
            ),
        };

        let intent = match kind {
            ReportKind::Buyer => "buying",
            ReportKind::Seller => "selling",
        };
        let considerations = format!(
            "Base Property:\n{base}\nI am thinking of {intent} this property. In 2 lines tell \
             me what the additional considerations for this property are."
        );

        Self {
            pricing: NarrativePrompt::new(PromptKind::Pricing, pricing),
            recommendation: NarrativePrompt::new(PromptKind::Recommendation, recommendation),
            considerations: NarrativePrompt::new(PromptKind::Considerations, considerations),
        }
    }
}

fn base_property_block(subject: &SubjectProperty) -> String {
    let na = || "N/A".to_string();
    format!(
        "address: {}, asking_price: {}, beds: {}, baths: {}, lot_size: {}, sqft: {}",
        subject.address,
        subject.price_display(),
        subject.bedrooms.map(|c| c.to_string()).unwrap_or_else(na),
        subject.bathrooms.map(|c| c.to_string()).unwrap_or_else(na),
        subject.lot_size_display(),
        subject.living_area_display(),
    )
}

fn grid_block(grid: &ComparableGrid) -> String {
    let headers = grid.headers().join(" | ");
    let rows = grid
        .rows
        .iter()
        .map(|row| row.cells().join(" | "))
        .collect::<Vec<_>>();
    format!("{headers}\n{}", rows.join("\n"))
}
