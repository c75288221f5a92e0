use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, get, location, now_unix, post_form, sign_in, test_app};

#[test]
fn login_page_loads_successfully() {
    let app = test_app();

    let resp = handle(get("/login", None), &app).expect("Failed to handle request");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Sign in"));
    assert!(body.contains("/auth/request-link"));
}

#[test]
fn root_redirects_to_dashboard() {
    let app = test_app();
    let resp = handle(get("/", None), &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/dashboard");
}

#[test]
fn request_link_returns_partial_html_for_htmx() {
    let app = test_app();

    let resp = handle(
        post_form("/auth/request-link", None, "email=Agent%40Example.com"),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Check your email"));
    assert!(body.contains("agent@example.com"));

    // partial only, so htmx can swap it in
    assert!(!body.contains("<!DOCTYPE html>"));
    assert!(!body.contains("<html"));
}

#[test]
fn request_link_rejects_bad_email() {
    let app = test_app();
    for form in ["", "email=nobody"] {
        match handle(post_form("/auth/request-link", None, form), &app) {
            Err(ServerError::BadRequest(_)) => {}
            other => panic!("expected BadRequest for {form:?}, got {other:?}"),
        }
    }
}

#[test]
fn magic_link_starts_a_session_once() {
    let app = test_app();
    let issued = app
        .db
        .with_conn(|conn| app.magic.request_link(conn, "flow@example.com", now_unix()))
        .unwrap();

    let resp = handle(get(&issued.link, None), &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/dashboard");

    let set_cookie = resp
        .headers()
        .get("Set-Cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("session="));
    assert!(set_cookie.contains("HttpOnly"));

    let cookie = set_cookie.split(';').next().unwrap();
    let dash = handle(get("/dashboard", Some(cookie)), &app).unwrap();
    assert_eq!(dash.status(), 200);
    assert!(body_string(dash).contains("flow@example.com"));

    match handle(get(&issued.link, None), &app) {
        Err(ServerError::Unauthorized(_)) => {}
        other => panic!("expected Unauthorized on reuse, got {other:?}"),
    }
}

#[test]
fn magic_link_without_token_is_rejected() {
    let app = test_app();
    match handle(get("/auth/magic", None), &app) {
        Err(ServerError::BadRequest(_)) => {}
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

#[test]
fn logout_revokes_the_session() {
    let app = test_app();
    let (_, cookie) = sign_in(&app, "bye@example.com");

    let resp = handle(post_form("/logout", Some(&cookie), ""), &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");

    let cleared = resp.headers().get("Set-Cookie").unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));

    let after = handle(get("/dashboard", Some(&cookie)), &app).unwrap();
    assert_eq!(after.status(), 302);
    assert_eq!(location(&after), "/login");
}
