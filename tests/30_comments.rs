mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

async fn post_comment(
    base_url: &str,
    token: &str,
    request_id: &str,
    text: &str,
) -> Result<reqwest::Response> {
    let client = reqwest::Client::new();
    Ok(client
        .post(format!("{}/api/requests/{}/comments", base_url, request_id))
        .bearer_auth(token)
        .json(&json!({ "comment": text }))
        .send()
        .await?)
}

#[tokio::test]
async fn submitter_and_handler_can_discuss_a_request() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_ready(server).await {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }

    let submitter = common::register(&server.base_url, "Ola Berg").await?;
    let staff = common::register(&server.base_url, "Max Desk").await?;
    common::become_handler(&server.base_url, &staff).await?;

    let created = common::create_request(
        &server.base_url,
        &submitter,
        json!({ "title": "door handle loose", "description": "main entrance, left door" }),
    )
    .await?;
    let id = created["id"].as_str().unwrap();

    let res = post_comment(&server.base_url, &submitter.token, id, "any update?").await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["data"]["user_name"], "Ola Berg");
    assert_eq!(body["data"]["request_id"], id);

    let res = post_comment(&server.base_url, &staff.token, id, "scheduled for tomorrow").await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    // both entries come back oldest first, for either participant
    let client = reqwest::Client::new();
    for token in [&submitter.token, &staff.token] {
        let res = client
            .get(format!("{}/api/requests/{}/comments", server.base_url, id))
            .bearer_auth(token)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = res.json().await?;
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["comment"], "any update?");
        assert_eq!(rows[1]["comment"], "scheduled for tomorrow");
    }

    Ok(())
}

#[tokio::test]
async fn strangers_can_neither_read_nor_write_comments() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_ready(server).await {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }

    let submitter = common::register(&server.base_url, "Ira Holt").await?;
    let stranger = common::register(&server.base_url, "Uma Nosy").await?;

    let created = common::create_request(
        &server.base_url,
        &submitter,
        json!({ "title": "flickering light", "description": "corridor B" }),
    )
    .await?;
    let id = created["id"].as_str().unwrap();

    // neither owns the parent request nor holds the handler role
    let res = post_comment(&server.base_url, &stranger.token, id, "me too").await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/api/requests/{}/comments", server.base_url, id))
        .bearer_auth(&stranger.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn empty_comments_are_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_ready(server).await {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }

    let submitter = common::register(&server.base_url, "Vic Moss").await?;
    let created = common::create_request(
        &server.base_url,
        &submitter,
        json!({ "title": "coffee machine", "description": "out of order again" }),
    )
    .await?;

    let res = post_comment(
        &server.base_url,
        &submitter.token,
        created["id"].as_str().unwrap(),
        "   ",
    )
    .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn comments_on_missing_requests_are_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_ready(server).await {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }

    let session = common::register(&server.base_url, "Gil Void").await?;
    // valid UUID, no such row; the policy SELECT matches nothing
    let res = post_comment(
        &server.base_url,
        &session.token,
        "00000000-0000-0000-0000-000000000000",
        "hello?",
    )
    .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    Ok(())
}
