use crate::auth::CurrentAgent;
use crate::domain::commission::CommissionCalculator;
use crate::domain::deal::Deal;
use crate::domain::format::{format_currency, format_percent};
use crate::templates::components::deal_form;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn deal_form_page(
    agent: &CurrentAgent,
    deal: Option<&Deal>,
    calc: &CommissionCalculator,
) -> Markup {
    let title = if deal.is_some() { "Edit Deal" } else { "Add New Deal" };

    desktop_layout(
        title,
        Some(agent),
        html! {
            main class="container narrow" {
                h1 { (title) }

                @if let Some(raw) = deal.and_then(|d| d.status.kind().is_none().then(|| d.status.as_str())) {
                    p class="notice warning" {
                        "Stored status " strong { (raw) } " is not a pipeline stage. "
                        "Saving will replace it with the status selected below."
                    }
                }

                @if let Some(d) = deal {
                    p class="muted" {
                        "Est. commission: " strong { (format_currency(d.commission(calc))) }
                        " at " (format_percent(d.commission_rate))
                        ", your share " (format_percent(d.my_share))
                    }
                }

                (deal_form(deal))

                @if let Some(d) = deal {
                    form
                        method="post"
                        action=(format!("/deals/{}/delete", d.id))
                        class="danger-zone"
                        onsubmit="return confirm('Delete this deal?')"
                    {
                        button type="submit" class="danger" { "Delete Deal" }
                    }
                }
            }
        },
    )
}
