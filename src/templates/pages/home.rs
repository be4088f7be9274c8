// templates/pages/home.rs

use crate::templates::{components::card, desktop_layout};
use maud::{html, Markup};

pub fn home_page() -> Markup {
    desktop_layout(
        "Comparable Market Analysis",
        html! {
            h1 { "Comparable Market Analysis" }

            (card("Look up a property", html! {
                form method="get" action="/property-info" {
                    label for="lookup-address" { "Address" }
                    input type="text" id="lookup-address" name="address"
                        placeholder="22 Oak Ave, Teaneck, NJ 07666" required;
                    button type="submit" { "Look up" }
                }
            }))

            (card("Generate a report", html! {
                form method="get" action="/generate-report" {
                    label for="report_type" { "Report type" }
                    select id="report_type" name="report_type" {
                        option value="buyer" { "Buyer" }
                        option value="seller" { "Seller" }
                    }
                    label for="address" { "Address" }
                    input type="text" id="address" name="address" required;
                    label for="latitude" { "Latitude" }
                    input type="text" id="latitude" name="latitude" required;
                    label for="longitude" { "Longitude" }
                    input type="text" id="longitude" name="longitude" required;
                    label for="bedrooms" { "Bedrooms" }
                    input type="number" id="bedrooms" name="bedrooms" min="0";
                    label for="bathrooms" { "Bathrooms" }
                    input type="number" id="bathrooms" name="bathrooms" min="0";
                    label for="living_area" { "Living area (sq ft)" }
                    input type="text" id="living_area" name="living_area";
                    label for="lot_size" { "Lot size (sq ft or acres)" }
                    input type="text" id="lot_size" name="lot_size";
                    label for="price" { "Asking price" }
                    input type="text" id="price" name="price";
                    button type="submit" { "Generate" }
                }
                p { "Reports already generated are listed at " a href="/reports" { "/reports" } "." }
            }))
        },
    )
}
