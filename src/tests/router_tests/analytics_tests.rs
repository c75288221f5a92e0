use crate::router::handle;
use crate::tests::utils::{body_string, get, post_form, sign_in, test_app};

#[test]
fn empty_analytics_shows_each_section_message() {
    let app = test_app();
    let (_, cookie) = sign_in(&app, "empty@example.com");

    let resp = handle(get("/analytics", Some(&cookie)), &app).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Monthly Projections"));
    assert!(body.contains("No deals with projected dates found."));
    assert!(body.contains("No closed deals yet."));
    assert!(body.contains("No paid deals yet."));
}

#[test]
fn months_are_listed_in_order_with_scaled_bars() {
    let app = test_app();
    let (_, cookie) = sign_in(&app, "months@example.com");

    for form in [
        // 4500
        "address=A&listing_price=500000&status=listed&estimated_close_date=2025-04-02",
        // 2250
        "address=B&listing_price=250000&status=under-contract&estimated_close_date=2025-02-10",
        // lost deals are never projected
        "address=C&listing_price=900000&status=lost&estimated_close_date=2025-01-05",
        "address=D&listing_price=500000&status=closed-won&actual_close_date=2025-03-15",
    ] {
        handle(post_form("/deals", Some(&cookie), form), &app).unwrap();
    }

    let body = body_string(handle(get("/analytics", Some(&cookie)), &app).unwrap());

    let feb = body.find("February 2025").expect("February bucket");
    let apr = body.find("April 2025").expect("April bucket");
    assert!(feb < apr);
    assert!(!body.contains("January 2025"));

    assert!(body.contains("March 2025"));
    assert!(body.contains("width: 100.0%;"));
    assert!(body.contains("width: 50.0%;"));
    assert!(body.contains("$6,750"));
    assert!(body.contains("No paid deals yet."));
}
