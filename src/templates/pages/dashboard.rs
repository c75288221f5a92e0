use crate::auth::CurrentAgent;
use crate::domain::commission::CommissionCalculator;
use crate::domain::format::format_currency;
use crate::domain::pipeline::PipelineBoard;
use crate::templates::components::{metrics_card, pipeline_column};
use crate::templates::desktop_layout;
use chrono::NaiveDate;
use maud::{html, Markup};

pub fn dashboard_page(
    agent: &CurrentAgent,
    board: &PipelineBoard<'_>,
    calc: &CommissionCalculator,
    today: NaiveDate,
) -> Markup {
    let m = &board.metrics;

    desktop_layout(
        "Pipeline",
        Some(agent),
        html! {
            main class="container wide" {
                div class="page-head" {
                    h1 { "Pipeline" }
                    a href="/deals/new" class="button primary" { "+ Add Deal" }
                }

                div class="metrics" {
                    (metrics_card("Total Deals", &m.total_deals.to_string(), "neutral"))
                    (metrics_card("Active", &m.active_deals.to_string(), "blue"))
                    (metrics_card("Pipeline Value", &format_currency(m.total_pipeline_value), "indigo"))
                    (metrics_card("Under Contract", &format_currency(m.total_under_contract_value), "amber"))
                    (metrics_card("Total Commission", &format_currency(m.total_closed_value), "green"))
                }

                @if m.unrecognized_deals > 0 {
                    p class="notice warning" {
                        (m.unrecognized_deals)
                        @if m.unrecognized_deals == 1 { " deal has" } @else { " deals have" }
                        " a status the board does not recognize and "
                        @if m.unrecognized_deals == 1 { "is" } @else { "are" }
                        " not shown below."
                    }
                }

                div class="board" {
                    @for column in &board.columns {
                        (pipeline_column(column, calc, today))
                    }
                }
            }
        },
    )
}
