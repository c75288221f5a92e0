use crate::domain::deal::{Deal, StatusKind};
use chrono::NaiveDate;
use maud::{html, Markup};

fn date_value(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Add/edit form. `deal` is `None` for a new deal.
pub fn deal_form(deal: Option<&Deal>) -> Markup {
    let action = match deal {
        Some(d) => format!("/deals/{}", d.id),
        None => "/deals".to_string(),
    };
    let current = deal
        .and_then(|d| d.status.kind())
        .unwrap_or(StatusKind::Listed);

    html! {
        form method="post" action=(action) class="deal-form" {
            label for="address" { "Property Address" }
            input type="text" id="address" name="address" required
                value=[deal.map(|d| d.address.as_str())];

            div class="grid" {
                div {
                    label for="listing_price" { "Listing Price ($)" }
                    input type="number" id="listing_price" name="listing_price"
                        min="0" step="any" required
                        value=[deal.map(|d| d.listing_price)];
                }
                div {
                    label for="commission_rate" { "Commission Rate (%)" }
                    input type="number" id="commission_rate" name="commission_rate"
                        min="0" step="any"
                        value=(deal.map(|d| d.commission_rate).unwrap_or(3.0));
                }
                div {
                    label for="my_share" { "My Share (%)" }
                    input type="number" id="my_share" name="my_share"
                        min="0" max="100" step="any"
                        value=(deal.map(|d| d.my_share).unwrap_or(40.0));
                }
            }

            label for="status" { "Status" }
            select id="status" name="status" {
                @for kind in StatusKind::ALL {
                    option value=(kind.as_str()) selected[kind == current] { (kind.label()) }
                }
            }

            div class="grid" {
                div {
                    label for="estimated_close_date" { "Estimated Close" }
                    input type="date" id="estimated_close_date" name="estimated_close_date"
                        value=(date_value(deal.and_then(|d| d.estimated_close_date)));
                }
                div {
                    label for="actual_close_date" { "Actual Close" }
                    input type="date" id="actual_close_date" name="actual_close_date"
                        value=(date_value(deal.and_then(|d| d.status.actual_close_date())));
                }
                div {
                    label for="paid_date" { "Paid" }
                    input type="date" id="paid_date" name="paid_date"
                        value=(date_value(deal.and_then(|d| d.status.paid_date())));
                }
            }

            label for="notes" { "Notes" }
            textarea id="notes" name="notes" rows="3" {
                (deal.and_then(|d| d.notes.as_deref()).unwrap_or_default())
            }

            div class="form-actions" {
                a href="/dashboard" class="button secondary" { "Cancel" }
                button type="submit" class="primary" {
                    @if deal.is_some() { "Save Changes" } @else { "Add Deal" }
                }
            }
        }
    }
}
