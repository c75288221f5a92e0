use crate::auth::CurrentAgent;
use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, agent: Option<&CurrentAgent>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Crest Pipeline" }
                link rel="stylesheet" href="/static/main.css";
                script src="https://unpkg.com/htmx.org@1.9.12" defer {}
            }
            body {
                header class="topbar" {
                    a href="/dashboard" class="brand" { "Crest Pipeline" }
                    @if let Some(agent) = agent {
                        nav {
                            ul {
                                li { a href="/dashboard" { "Pipeline" } }
                                li { a href="/analytics" { "Analytics" } }
                                li { a href="/export" { "Export" } }
                            }
                        }
                        div class="session" {
                            span class="muted" { (agent.email) }
                            form method="post" action="/logout" class="inline" {
                                button type="submit" class="link" { "Sign out" }
                            }
                        }
                    } @else {
                        a href="/login" { "Sign in" }
                    }
                }
                (content)
            }
        }
    }
}
