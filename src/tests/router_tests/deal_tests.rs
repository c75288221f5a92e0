use crate::domain::deal::DealRecord;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{
    body_string, get, json_test_app, location, post_form, sign_in, test_app,
};
use crate::router::App;

fn api_deals(app: &App, cookie: &str) -> Vec<DealRecord> {
    let resp = handle(get("/api/deals", Some(cookie)), app).unwrap();
    assert_eq!(resp.status(), 200);
    serde_json::from_str(&body_string(resp)).unwrap()
}

#[test]
fn new_deal_form_has_defaults() {
    let app = test_app();
    let (_, cookie) = sign_in(&app, "form@example.com");

    let body = body_string(handle(get("/deals/new", Some(&cookie)), &app).unwrap());
    assert!(body.contains("Add New Deal"));
    assert!(body.contains(r#"name="commission_rate""#));
    assert!(body.contains(r#"value="3""#));
    assert!(body.contains(r#"value="40""#));
    assert!(!body.contains("Delete Deal"));
}

#[test]
fn create_edit_and_delete_a_deal() {
    let app = test_app();
    let (_, cookie) = sign_in(&app, "crud@example.com");

    let resp = handle(
        post_form(
            "/deals",
            Some(&cookie),
            "address=12+Crest+Rd&listing_price=%24500%2C000&status=listed&estimated_close_date=2025-03-15",
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/dashboard");

    let deals = api_deals(&app, &cookie);
    assert_eq!(deals.len(), 1);
    let id = deals[0].id.clone();
    assert_eq!(deals[0].listing_price, 500_000.0);
    assert_eq!(deals[0].commission_rate, 3.0);
    assert_eq!(deals[0].status, "listed");

    let edit = body_string(handle(get(&format!("/deals/{id}/edit"), Some(&cookie)), &app).unwrap());
    assert!(edit.contains("Edit Deal"));
    assert!(edit.contains("12 Crest Rd"));
    assert!(edit.contains("2025-03-15"));
    assert!(edit.contains("Delete Deal"));

    let resp = handle(
        post_form(
            &format!("/deals/{id}"),
            Some(&cookie),
            "address=12+Crest+Rd&listing_price=500000&status=closed-won&actual_close_date=2025-03-20",
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);

    let deals = api_deals(&app, &cookie);
    assert_eq!(deals[0].status, "closed-won");
    assert_eq!(deals[0].actual_close_date.map(|d| d.to_string()).as_deref(), Some("2025-03-20"));
    // estimated date was blank on the edit form, so it is cleared
    assert_eq!(deals[0].estimated_close_date, None);

    let resp = handle(post_form(&format!("/deals/{id}/delete"), Some(&cookie), ""), &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert!(api_deals(&app, &cookie).is_empty());

    match handle(get(&format!("/deals/{id}/edit"), Some(&cookie)), &app) {
        Err(ServerError::NotFound) => {}
        other => panic!("expected NotFound after delete, got {other:?}"),
    }
}

#[test]
fn invalid_deal_form_is_a_bad_request() {
    let app = test_app();
    let (_, cookie) = sign_in(&app, "bad@example.com");

    for form in [
        "listing_price=100",
        "address=x&listing_price=-1",
        "address=x&listing_price=1&status=pending",
    ] {
        match handle(post_form("/deals", Some(&cookie), form), &app) {
            Err(ServerError::BadRequest(_)) => {}
            other => panic!("expected BadRequest for {form:?}, got {other:?}"),
        }
    }
    assert!(api_deals(&app, &cookie).is_empty());
}

#[test]
fn agents_only_see_their_own_deals() {
    let app = test_app();
    let (_, alice) = sign_in(&app, "alice@example.com");
    let (_, bob) = sign_in(&app, "bob@example.com");

    handle(post_form("/deals", Some(&alice), "address=Alice+House&listing_price=1"), &app).unwrap();
    let id = api_deals(&app, &alice)[0].id.clone();

    assert!(api_deals(&app, &bob).is_empty());
    for result in [
        handle(get(&format!("/deals/{id}/edit"), Some(&bob)), &app),
        handle(post_form(&format!("/deals/{id}"), Some(&bob), "address=Mine&listing_price=1"), &app),
        handle(post_form(&format!("/deals/{id}/delete"), Some(&bob), ""), &app),
    ] {
        assert!(matches!(result, Err(ServerError::NotFound)));
    }
    assert_eq!(api_deals(&app, &alice)[0].address, "Alice House");
}

#[test]
fn json_file_backend_serves_the_same_routes() {
    let app = json_test_app();
    let (_, cookie) = sign_in(&app, "json@example.com");

    handle(
        post_form("/deals", Some(&cookie), "address=7+File+Ln&listing_price=200000&status=under-contract"),
        &app,
    )
    .unwrap();

    let deals = api_deals(&app, &cookie);
    assert_eq!(deals.len(), 1);
    assert_eq!(deals[0].status, "under-contract");

    let body = body_string(handle(get("/dashboard", Some(&cookie)), &app).unwrap());
    assert!(body.contains("7 File Ln"));
}

#[test]
fn export_returns_a_spreadsheet() {
    let app = test_app();
    let (_, cookie) = sign_in(&app, "xlsx@example.com");
    handle(post_form("/deals", Some(&cookie), "address=1+A+St&listing_price=100000"), &app).unwrap();

    let resp = handle(get("/export", Some(&cookie)), &app).unwrap();
    assert_eq!(resp.status(), 200);
    let content_type = resp.headers().get("Content-Type").unwrap().to_str().unwrap();
    assert!(content_type.contains("spreadsheetml"));
    let disposition = resp.headers().get("Content-Disposition").unwrap().to_str().unwrap();
    assert!(disposition.contains("pipeline_"));
}

#[test]
fn unknown_routes_are_not_found() {
    let app = test_app();
    let (_, cookie) = sign_in(&app, "lost@example.com");
    for uri in ["/nope", "/deals/abc/archive", "/deals/a/b/c"] {
        assert!(matches!(
            handle(get(uri, Some(&cookie)), &app),
            Err(ServerError::NotFound)
        ));
    }
}
