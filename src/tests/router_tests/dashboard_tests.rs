use crate::router::handle;
use crate::tests::utils::{body_string, get, location, post_form, sign_in, test_app};

#[test]
fn protected_pages_redirect_to_login() {
    let app = test_app();

    for uri in ["/dashboard", "/analytics", "/deals/new", "/api/deals", "/export"] {
        let resp = handle(get(uri, None), &app).unwrap();
        assert_eq!(resp.status(), 302, "{uri}");
        assert_eq!(location(&resp), "/login", "{uri}");
    }

    let resp = handle(get("/dashboard", Some("session=not-a-real-token")), &app).unwrap();
    assert_eq!(location(&resp), "/login");
}

#[test]
fn empty_dashboard_shows_every_stage() {
    let app = test_app();
    let (_, cookie) = sign_in(&app, "dash@example.com");

    let resp = handle(get("/dashboard", Some(&cookie)), &app).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("dash@example.com"));
    for label in ["Listed", "Under Contract", "Closed Won", "Lost", "Paid"] {
        assert!(body.contains(label), "missing column {label}");
    }
    assert!(body.contains("No deals"));
    assert!(body.contains("$0"));
}

#[test]
fn dashboard_totals_follow_the_deals() {
    let app = test_app();
    let (_, cookie) = sign_in(&app, "totals@example.com");

    for form in [
        "address=1+Oak+St&listing_price=500000&commission_rate=3&my_share=40&status=under-contract",
        "address=2+Elm+St&listing_price=400000&commission_rate=3&my_share=50&status=closed-won",
    ] {
        let resp = handle(post_form("/deals", Some(&cookie), form), &app).unwrap();
        assert_eq!(resp.status(), 302);
    }

    let body = body_string(handle(get("/dashboard", Some(&cookie)), &app).unwrap());
    assert!(body.contains("1 Oak St"));
    assert!(body.contains("2 Elm St"));
    // both come to $4,500: 500000 * 3% * 75% * 40% and 400000 * 3% * 75% * 50%.
    // One is open, one is won, so no metric adds them together.
    assert!(body.contains("$4,500"));
    assert!(!body.contains("$9,000"));
}

#[test]
fn unknown_status_is_reported_not_hidden() {
    let app = test_app();
    let (agent, cookie) = sign_in(&app, "legacy@example.com");

    app.db
        .with_conn(|conn| {
            conn.execute(
                "insert into deals (id, owner_id, address, listing_price, commission_rate, my_share,
                                    status, created_at, updated_at)
                 values ('old-1', ?, '9 Old Rd', 100000, 3, 40, 'archived',
                         '2024-01-01 00:00:00+00:00', '2024-01-01 00:00:00+00:00')",
                rusqlite::params![agent],
            )?;
            Ok(())
        })
        .unwrap();

    let body = body_string(handle(get("/dashboard", Some(&cookie)), &app).unwrap());
    assert!(body.contains("not shown below"));
    assert!(!body.contains("9 Old Rd"));

    let edit = body_string(handle(get("/deals/old-1/edit", Some(&cookie)), &app).unwrap());
    assert!(edit.contains("9 Old Rd"));
    assert!(edit.contains("<strong>archived</strong> is not a pipeline stage"));
}

#[test]
fn stylesheet_is_served() {
    let app = test_app();
    let resp = handle(get("/static/main.css", None), &app).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains(".board"));
}
