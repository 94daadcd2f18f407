mod common;

use anyhow::Result;
use axum::http::StatusCode;

use common::{TestApp, ORG_A, ORG_B, SHIFT_A, SHIFT_B};

#[tokio::test]
async fn returns_only_the_requested_organization() -> Result<()> {
    let app = TestApp::new()?;

    let (status, body) = app.get("/api/get-work-time?organizationID=org123", None).await?;

    assert_eq!(status, StatusCode::OK);
    let shifts = body.as_array().expect("bare array of shifts");
    assert_eq!(shifts.len(), 1);
    assert_eq!(shifts[0]["id"], SHIFT_A);
    assert_eq!(shifts[0]["organization_id"], ORG_A);
    Ok(())
}

#[tokio::test]
async fn no_listing_crosses_tenants() -> Result<()> {
    let app = TestApp::new()?;

    for (tenant, own_shift) in [(ORG_A, SHIFT_A), (ORG_B, SHIFT_B)] {
        let (status, body) = app
            .get(&format!("/api/get-work-time?organizationID={}", tenant), None)
            .await?;
        assert_eq!(status, StatusCode::OK);

        let shifts = body.as_array().unwrap();
        assert!(!shifts.is_empty());
        assert!(shifts.iter().all(|s| s["organization_id"] == tenant));
        assert!(shifts.iter().any(|s| s["id"] == own_shift));
    }
    Ok(())
}

#[tokio::test]
async fn unknown_organization_is_an_empty_list() -> Result<()> {
    let app = TestApp::new()?;

    let (status, body) = app.get("/api/get-work-time?organizationID=org999", None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
    Ok(())
}

#[tokio::test]
async fn missing_organization_is_bad_request() -> Result<()> {
    let app = TestApp::new()?;

    for uri in [
        "/api/get-work-time",
        "/api/get-work-time?organizationID=",
        "/api/get-work-time?organizationID=%20%20",
        "/api/get-work-time?organizationId=org123",
    ] {
        let (status, body) = app.get(uri, None).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body.get("error").is_some(), "{}", uri);
        assert!(body.get("data").is_none(), "{}", uri);
    }
    Ok(())
}

#[tokio::test]
async fn padded_organization_is_not_an_alias() -> Result<()> {
    let app = TestApp::new()?;

    for uri in [
        "/api/get-work-time?organizationID=%20org123%20",
        "/api/get-work-time?organizationID=org123%20",
    ] {
        let (status, body) = app.get(uri, None).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["code"], "MISSING_TENANT", "{}", uri);
        assert!(body.get("data").is_none(), "{}", uri);
    }
    Ok(())
}

#[tokio::test]
async fn storage_failure_is_generic_500_and_logged() -> Result<()> {
    let app = TestApp::new()?;
    app.store.fail_with("connection to 10.0.0.7:5432 refused").await;
    let (logs, _guard) = common::capture_logs();

    let (status, body) = app.get("/api/get-work-time?organizationID=org123", None).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("error").is_some());
    assert!(body.get("data").is_none());
    assert!(!body.to_string().contains("10.0.0.7"));
    assert!(logs.contents().contains("connection to 10.0.0.7:5432 refused"));
    Ok(())
}

#[tokio::test]
async fn strict_binding_requires_own_organization() -> Result<()> {
    let app = TestApp::with_security(|s| s.strict_tenant_binding = true)?;
    let own = common::token("user_a", Some(ORG_A));

    let (status, body) = app.get("/api/get-work-time?organizationID=org123", Some(&own)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app.get("/api/get-work-time?organizationID=org456", Some(&own)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.get("data").is_none());

    let (status, _) = app.get("/api/get-work-time?organizationID=org123", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
