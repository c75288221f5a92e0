use crate::auth::sessions::create_session;
use crate::auth::{MagicLinkConfig, MagicLinkService};
use crate::db::auth::get_or_create_agent;
use crate::db::connection::tests::temp_db;
use crate::db::{DealStore, JsonFileDealStore, SqliteDealStore};
use crate::domain::commission::CommissionCalculator;
use crate::router::App;
use astra::{Body, Request, Response};
use http::Method;
use std::io::Read;

/// Fresh on-disk database with the production schema, deals in SQLite.
pub fn test_app() -> App {
    let db = temp_db("router_test");
    app_with_store(db.clone(), Box::new(SqliteDealStore::new(db)))
}

/// Same, but deals go to a JSON file in the temp dir.
pub fn json_test_app() -> App {
    let path = std::env::temp_dir().join(format!(
        "router_test_{}.json",
        uuid::Uuid::new_v4().simple()
    ));
    app_with_store(temp_db("router_test"), Box::new(JsonFileDealStore::new(path)))
}

fn app_with_store(db: crate::db::Database, deals: Box<dyn DealStore>) -> App {
    App {
        db,
        deals,
        calc: CommissionCalculator::default(),
        magic: MagicLinkService::new(MagicLinkConfig::default()),
        secure_cookies: false,
        utc_offset: chrono::FixedOffset::east_opt(0).unwrap(),
    }
}

pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Creates the agent and a live session; returns `(agent_id, cookie header)`.
pub fn sign_in(app: &App, email: &str) -> (i64, String) {
    app.db
        .with_conn(|conn| {
            let agent = get_or_create_agent(conn, email, now_unix())?;
            let token = create_session(conn, agent, now_unix())?;
            Ok((agent, format!("session={token}")))
        })
        .unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request {
    let mut builder = http::Request::builder().method(Method::GET).uri(uri);
    if let Some(c) = cookie {
        builder = builder.header("Cookie", c);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, cookie: Option<&str>, form: &str) -> Request {
    let mut builder = http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
        builder = builder.header("Cookie", c);
    }
    builder.body(Body::from(form.as_bytes().to_vec())).unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn location(resp: &Response) -> &str {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
