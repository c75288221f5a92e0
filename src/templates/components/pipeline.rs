use crate::domain::commission::CommissionCalculator;
use crate::domain::deal::Deal;
use crate::domain::format::{format_currency, format_date};
use crate::domain::pipeline::StageColumn;
use chrono::NaiveDate;
use maud::{html, Markup};

pub fn deal_card(deal: &Deal, calc: &CommissionCalculator, today: NaiveDate) -> Markup {
    let open = deal.status.kind().is_some_and(|k| !k.is_terminal());
    let badge = match deal.close_urgency(today) {
        Some(urgency) if open => format!("badge {}", urgency.css_class()),
        _ => "badge".to_string(),
    };

    html! {
        a class="deal-card" href=(format!("/deals/{}/edit", deal.id)) {
            h4 class="deal-address" { (deal.address) }

            p class="muted small" { "Est. Commission" }
            p class="deal-commission" { (format_currency(deal.commission(calc))) }

            div class="deal-footer" {
                span class="mono small" { (format_currency(deal.listing_price)) }
                @if let Some(close) = deal.estimated_close_date {
                    span class=(badge) {
                        (format_date(close))
                    }
                }
            }
        }
    }
}

pub fn pipeline_column(
    column: &StageColumn<'_>,
    calc: &CommissionCalculator,
    today: NaiveDate,
) -> Markup {
    html! {
        section class="column" data-stage=(column.stage.as_str()) {
            header class="column-header" {
                h3 { (column.label()) }
                span class="count" { (column.count()) }
            }
            p class="muted small" { (format_currency(column.commission_total)) }

            div class="column-body" {
                @if column.deals.is_empty() {
                    p class="empty" { "No deals" }
                } @else {
                    @for deal in &column.deals {
                        (deal_card(deal, calc, today))
                    }
                }
            }
        }
    }
}
