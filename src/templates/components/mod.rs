use crate::domain::{AcceptedComparable, ComparableGrid, PriceBand, Tier};
use maud::{html, Markup};

pub mod error;

pub use error::html_error_response;

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        section class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

pub fn notice(text: &str) -> Markup {
    html! {
        p class="notice" { (text) }
    }
}

pub fn price_band(band: &PriceBand) -> Markup {
    let [low, mid, high] = band.formatted();
    html! {
        p class="band" {
            "Low: " strong { (low) } " · Mid: " strong { (mid) } " · High: " strong { (high) }
        }
        @if band.is_low_confidence() {
            (notice("Not enough comparable data was available; this figure repeats the property's own asking price and should be treated as low confidence."))
        }
    }
}

pub fn comparable_card(comp: &AcceptedComparable, tier: Tier) -> Markup {
    html! {
        div class="card comparable" {
            img src=(comp.photo_url) alt=(comp.address);
            div {
                pre { (comp.summary(tier)) }
                @if let Some(url) = &comp.listing_url {
                    p { a href=(url) { "View listing" } }
                }
            }
        }
    }
}

pub fn grid_table(grid: &ComparableGrid) -> Markup {
    html! {
        table class="grid" {
            thead {
                tr {
                    @for header in grid.headers() {
                        th { (header) }
                    }
                }
            }
            tbody {
                @for (i, row) in grid.rows.iter().enumerate() {
                    tr class=[(i == 0).then_some("subject")] {
                        @for cell in row.cells() {
                            td { (cell) }
                        }
                    }
                }
            }
        }
    }
}
