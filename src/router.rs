use crate::auth::sessions::{
    clear_session_cookie, create_session, load_agent_from_session, revoke_session,
    session_cookie, session_token_from_cookies,
};
use crate::auth::{CurrentAgent, MagicLinkService};
use crate::db::{Database, DealStore};
use crate::domain::commission::CommissionCalculator;
use crate::domain::deal::{local_date, DealPatch, DealRecord};
use crate::domain::monthly::{project, Projection};
use crate::domain::pipeline::{aggregate_pipeline, PIPELINE_STAGES};
use crate::errors::{ResultResp, ServerError};
use crate::forms::{parse_deal_form, FormFields};
use crate::responses::{html_response, json_response, redirect};
use crate::spreadsheets::export_deals_xlsx;
use crate::templates::pages;
use astra::{Body, Request, ResponseBuilder};
use chrono::{DateTime, FixedOffset, Utc};
use std::io::Read;

const MAIN_CSS: &str = include_str!("../static/main.css");

/// Everything a request handler needs, shared across worker threads.
pub struct App {
    pub db: Database,
    pub deals: Box<dyn DealStore>,
    pub calc: CommissionCalculator,
    pub magic: MagicLinkService,
    pub secure_cookies: bool,
    pub utc_offset: FixedOffset,
}

pub fn handle(req: Request, app: &App) -> ResultResp {
    let now = Utc::now();
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => redirect("/dashboard", None),
        ("GET", "/static/main.css") => ResponseBuilder::new()
            .status(200)
            .header("Content-Type", mime::TEXT_CSS_UTF_8.as_ref())
            .body(Body::from(MAIN_CSS))
            .map_err(|_| ServerError::InternalError),

        ("GET", "/login") => html_response(pages::login_page()),
        ("POST", "/auth/request-link") => request_link(req, app, now),
        ("GET", "/auth/magic") => redeem_link(&req, app, now),
        ("POST", "/logout") => logout(&req, app, now),

        _ => {
            let Some(agent) = current_agent(&req, app, now)? else {
                return redirect("/login", None);
            };
            deal_routes(req, app, &agent, &method, &path, now)
        }
    }
}

/// Routes that need a signed-in agent.
fn deal_routes(
    req: Request,
    app: &App,
    agent: &CurrentAgent,
    method: &str,
    path: &str,
    now: DateTime<Utc>,
) -> ResultResp {
    let today = local_date(now, app.utc_offset);

    match (method, path) {
        ("GET", "/dashboard") => {
            let deals = app.deals.list(agent.id)?;
            let board = aggregate_pipeline(&deals, &PIPELINE_STAGES, &app.calc);
            html_response(pages::dashboard_page(agent, &board, &app.calc, today))
        }
        ("GET", "/analytics") => {
            let deals = app.deals.list(agent.id)?;
            let sections: Vec<_> = Projection::ALL
                .iter()
                .map(|&p| project(&deals, p, &app.calc))
                .collect();
            html_response(pages::analytics_page(agent, &sections))
        }
        ("GET", "/api/deals") => {
            let deals = app.deals.list(agent.id)?;
            let records: Vec<DealRecord> = deals.iter().map(DealRecord::from).collect();
            json_response(&records)
        }
        ("GET", "/export") => {
            let deals = app.deals.list(agent.id)?;
            export_deals_xlsx(&deals, &app.calc, today)
        }
        ("GET", "/deals/new") => html_response(pages::deal_form_page(agent, None, &app.calc)),
        ("POST", "/deals") => {
            let draft = parse_deal_form(&read_form(req)?)?;
            let deal = app.deals.insert(agent.id, draft, now)?;
            tracing::info!(agent = agent.id, deal = %deal.id, status = deal.status.as_str(), "deal created");
            redirect("/dashboard", None)
        }
        _ => {
            let Some((id, action)) = deal_path(path) else {
                return Err(ServerError::NotFound);
            };

            match (method, action) {
                ("GET", Some("edit")) => {
                    let deal = app
                        .deals
                        .get(agent.id, id)?
                        .ok_or(ServerError::NotFound)?;
                    html_response(pages::deal_form_page(agent, Some(&deal), &app.calc))
                }
                ("POST", None) => {
                    let patch = DealPatch::from(parse_deal_form(&read_form(req)?)?);
                    app.deals
                        .update(agent.id, id, patch, now)?
                        .ok_or(ServerError::NotFound)?;
                    tracing::info!(agent = agent.id, deal = id, "deal updated");
                    redirect("/dashboard", None)
                }
                ("POST", Some("delete")) => {
                    if !app.deals.delete(agent.id, id)? {
                        return Err(ServerError::NotFound);
                    }
                    tracing::info!(agent = agent.id, deal = id, "deal deleted");
                    redirect("/dashboard", None)
                }
                _ => Err(ServerError::NotFound),
            }
        }
    }
}

fn request_link(req: Request, app: &App, now: DateTime<Utc>) -> ResultResp {
    let form = read_form(req)?;
    let email = form
        .text("email")
        .ok_or_else(|| ServerError::BadRequest("email is required".into()))?;

    let issued = app
        .db
        .with_conn(|conn| app.magic.request_link(conn, email, now.timestamp()))?;

    // No mail transport here; the link goes to the log.
    tracing::info!(email = %issued.email, link = %issued.link, "magic link issued");

    html_response(pages::check_email_content(&issued.email))
}

fn redeem_link(req: &Request, app: &App, now: DateTime<Utc>) -> ResultResp {
    let query = FormFields::from_query(req.uri().query());
    let token = query.text("token").unwrap_or_default();

    let session_token = app.db.with_conn(|conn| {
        let redeemed = app.magic.redeem(conn, token, now.timestamp())?;
        tracing::info!(agent = redeemed.agent_id, email = %redeemed.email, "signed in");
        create_session(conn, redeemed.agent_id, now.timestamp())
    })?;

    redirect(
        "/dashboard",
        Some(session_cookie(&session_token, app.secure_cookies)),
    )
}

fn logout(req: &Request, app: &App, now: DateTime<Utc>) -> ResultResp {
    if let Some(token) = cookie_token(req) {
        app.db
            .with_conn(|conn| revoke_session(conn, token, now.timestamp()))?;
    }
    redirect("/login", Some(clear_session_cookie()))
}

fn cookie_token(req: &Request) -> Option<&str> {
    req.headers()
        .get("Cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(session_token_from_cookies)
}

fn current_agent(
    req: &Request,
    app: &App,
    now: DateTime<Utc>,
) -> Result<Option<CurrentAgent>, ServerError> {
    let Some(token) = cookie_token(req) else {
        return Ok(None);
    };
    app.db
        .with_conn(|conn| load_agent_from_session(conn, token, now.timestamp()))
}

fn read_form(req: Request) -> Result<FormFields, ServerError> {
    let mut raw = Vec::new();
    req.into_body()
        .reader()
        .read_to_end(&mut raw)
        .map_err(|e| ServerError::BadRequest(format!("unreadable body: {e}")))?;
    Ok(FormFields::parse(&raw))
}

/// `/deals/{id}` → `(id, None)`, `/deals/{id}/edit` → `(id, Some("edit"))`.
fn deal_path(path: &str) -> Option<(&str, Option<&str>)> {
    let rest = path.strip_prefix("/deals/")?;
    let mut parts = rest.split('/');
    let id = parts.next().filter(|id| !id.is_empty())?;
    let action = parts.next();
    if parts.next().is_some() {
        return None;
    }
    Some((id, action))
}
