use crate::domain::format::{bar_width_percent, format_currency};
use crate::domain::monthly::ProjectionSummary;
use maud::{html, Markup};

/// One analytics section: a horizontal bar per month, scaled to the largest.
pub fn month_bars(summary: &ProjectionSummary) -> Markup {
    let p = summary.projection;

    html! {
        section class="card projection" {
            div class="projection-head" {
                div {
                    h3 { (p.title()) }
                    p class="muted small" { (p.subtitle()) }
                }
                p class="projection-total" { (format_currency(summary.total)) }
            }

            @if summary.buckets.is_empty() {
                div class="empty-state" {
                    p { (p.empty_message()) }
                }
            } @else {
                @for bucket in &summary.buckets {
                    div class="month-row" {
                        div class="month-labels" {
                            span { (bucket.label) }
                            strong { (format_currency(bucket.total)) }
                        }
                        div class="bar-track" {
                            div
                                class="bar"
                                style=(format!("width: {:.1}%;", bar_width_percent(bucket.total, summary.max_total)))
                            {}
                            span class="bar-count" {
                                (bucket.count) " deal" @if bucket.count != 1 { "s" }
                            }
                        }
                    }
                }
            }
        }
    }
}
