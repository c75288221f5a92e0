use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn error_page(status: u16, message: &str) -> Markup {
    desktop_layout(
        "Error",
        None,
        html! {
            main class="container narrow" {
                h1 { (status) }
                p class="lead" { (message) }
                a href="/dashboard" { "Back to pipeline" }
            }
        },
    )
}
