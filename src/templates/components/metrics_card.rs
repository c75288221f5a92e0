use maud::{html, Markup};

pub fn metrics_card(title: &str, value: &str, tone: &str) -> Markup {
    html! {
        div class=(format!("metric {tone}")) {
            p class="metric-title" { (title) }
            p class="metric-value" { (value) }
        }
    }
}
