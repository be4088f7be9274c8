// templates/pages/report.rs

use crate::domain::{ReportKind, Tier};
use crate::report::{trends_title, ReportData};
use crate::templates::components::{card, comparable_card, grid_table, notice, price_band};
use crate::templates::desktop_layout;
use crate::valuation::normalize::format_date;
use maud::{html, Markup};

const DISCLAIMER: &str = "This report is based on publicly available data and market trends. \
    It is intended for informational purposes only and does not constitute professional real \
    estate advice. Buyers should consult a licensed real estate attorney or professional for \
    specific guidance.";

/// Closing section title and text for each report variant.
fn closing(kind: ReportKind) -> (&'static str, &'static str) {
    match kind {
        ReportKind::Buyer => (
            "Ready to Explore More Options?",
            "Visit www.SaveOnYourHome.com for additional tools and guidance to help you \
             confidently navigate the home-buying process.",
        ),
        ReportKind::Seller => (
            "Ready to Sell?",
            "List your home for FREE on www.SaveOnYourHome.com and explore the tools and \
             guidance we provide to make your selling experience as efficient and successful \
             as possible.",
        ),
    }
}

pub fn report_page(data: &ReportData) -> Markup {
    let subject = &data.subject;

    desktop_layout(
        &format!("{}: {}", data.kind.title(), subject.address),
        html! {
            h1 { (data.kind.title()) }
            p { "Prepared " (format_date(data.generated_on)) }

            (card("Property", html! {
                div class="comparable" {
                    img src=(subject.main_image_url) alt=(subject.address);
                    ul {
                        li { "Address: " (subject.address) }
                        @if data.kind == ReportKind::Buyer {
                            li { "Days on Market: " (subject.days_on_market_display()) }
                            li { "Pricing: " (subject.price_display()) }
                        }
                        li { "Specifications: " (subject.specifications_display()) ", approximately " (subject.living_area_display()) }
                        li { "Lot Size: " (subject.lot_size_display()) }
                        li { "Current Annual Tax: " (data.annual_tax_display()) }
                        li { "Assessed Value: " (data.assessed_value_display()) }
                        @if data.kind == ReportKind::Seller {
                            @let [low, mid, _] = data.band.formatted();
                            li { "Estimated Property Pricing: " (low) " - " (mid) " (based on comparables)" }
                        }
                    }
                }
            }))

            (card("Estimated Value", price_band(&data.band)))

            @if data.kind == ReportKind::Buyer {
                @let trends = data.market_trends();
                (card(&trends_title(&subject.address), html! {
                    p { (trends.buyer_preferences()) }
                    p { (trends.pricing_trends()) }
                }))
            }

            @for note in data.shortfall_notes() {
                (notice(&note))
            }

            @for tier in [Tier::Sold, Tier::Active] {
                (tier_section(data, tier))
            }

            (card("Recommendation", html! { p { (data.recommendation) } }))
            (card("Additional Considerations", html! { p { (data.considerations) } }))
            (card("Disclaimer", html! { p { (DISCLAIMER) } }))
            @let ending = closing(data.kind);
            (card(ending.0, html! { p { (ending.1) } }))
        },
    )
}

fn tier_section(data: &ReportData, tier: Tier) -> Markup {
    let outcome = data.outcome(tier);
    html! {
        section {
            h2 { (tier.label()) }
            @if outcome.batch.accepted.is_empty() {
                p { "No comparables to show." }
            }
            @for comp in &outcome.batch.accepted {
                (comparable_card(comp, tier))
            }
            h3 { (tier.label()) " Data" }
            (grid_table(&outcome.batch.grid))
        }
    }
}
