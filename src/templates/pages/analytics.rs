use crate::auth::CurrentAgent;
use crate::domain::monthly::ProjectionSummary;
use crate::templates::components::month_bars;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn analytics_page(agent: &CurrentAgent, sections: &[ProjectionSummary]) -> Markup {
    desktop_layout(
        "Analytics",
        Some(agent),
        html! {
            main class="container" {
                h1 { "Commission Analytics" }
                @for summary in sections {
                    (month_bars(summary))
                }
            }
        },
    )
}
