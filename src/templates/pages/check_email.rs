use maud::{html, Markup};

/// Swapped into `#auth-result` after a link is requested.
pub fn check_email_content(email: &str) -> Markup {
    html! {
        div class="notice success" {
            h3 { "Check your email" }
            p {
                "We sent a sign-in link to "
                strong { (email) }
                ". It expires in 15 minutes."
            }
            a href="/login" { "Try with a different email" }
        }
    }
}
