//! Integration tests for the HTTP API

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use leadflow::{
    api::AppState,
    extractor::{ContactExtractor, DocumentProcessor},
    lead::{Lead, LeadSource, LeadStatus},
    server::build_router,
    storage::Storage,
    workflow::Workflow,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

/// Helper to create an app over an empty in-memory store
fn create_test_app() -> Router {
    let state = AppState {
        storage: Storage::in_memory(),
        documents: DocumentProcessor::new(Arc::new(ContactExtractor::default())),
        simulator: None,
    };
    build_router(state)
}

/// Send a request and decode the JSON body (Null when the body is empty)
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    content_type: &str,
    body: impl Into<Body>,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", content_type)
        .body(body.into())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, method, uri, "application/json", body.to_string()).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, "application/json", Body::empty()).await
}

async fn create_lead(app: &Router, body: Value) -> Lead {
    let (status, value) = send_json(app, "POST", "/api/leads", body).await;
    assert_eq!(status, StatusCode::CREATED);
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_test_app();
    let request = Request::builder()
        .uri("/healthz")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn test_create_lead_applies_defaults() {
    let app = create_test_app();
    let lead = create_lead(
        &app,
        json!({ "name": "Asha Rao", "email": "asha@example.com" }),
    )
    .await;

    assert!(lead.id > 0);
    assert_eq!(lead.phone, "N/A");
    assert_eq!(lead.status, LeadStatus::New);
    assert_eq!(lead.source, LeadSource::Manual);

    let (status, fetched) = get(&app, &format!("/api/leads/{}", lead.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["createdAt"], json!(lead.created_at));
}

#[tokio::test]
async fn test_create_lead_missing_email_names_field() {
    let app = create_test_app();
    let (status, body) = send_json(&app, "POST", "/api/leads", json!({ "name": "Asha Rao" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid lead data");
    let paths: Vec<&Value> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|error| &error["path"][0])
        .collect();
    assert_eq!(paths, vec![&json!("email")]);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = create_test_app();
    let (status, body) = send(&app, "POST", "/api/leads", "application/json", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid lead data");
}

#[tokio::test]
async fn test_list_leads_newest_first_with_filter() {
    let app = create_test_app();
    let first = create_lead(&app, json!({ "name": "First Lead", "email": "first@example.com" })).await;
    let second = create_lead(
        &app,
        json!({ "name": "Second Lead", "email": "second@example.com", "status": "Contacted" }),
    )
    .await;

    let (status, all) = get(&app, "/api/leads").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|lead| lead["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let (_, contacted) = get(&app, "/api/leads?status=Contacted").await;
    assert_eq!(contacted.as_array().unwrap().len(), 1);
    assert_eq!(contacted[0]["id"], json!(second.id));

    let (_, everything) = get(&app, "/api/leads?status=all").await;
    assert_eq!(everything.as_array().unwrap().len(), 2);

    let (status, _) = get(&app, "/api/leads?status=Lost").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_lead() {
    let app = create_test_app();
    let lead = create_lead(
        &app,
        json!({ "name": "Asha Rao", "email": "asha@example.com", "phone": "9876543210" }),
    )
    .await;
    let uri = format!("/api/leads/{}", lead.id);

    let (status, updated) = send_json(&app, "PATCH", &uri, json!({ "status": "Contacted" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Contacted");
    assert_eq!(updated["name"], "Asha Rao");
    assert_eq!(updated["phone"], "9876543210");

    let (status, _) = send_json(&app, "PATCH", &uri, json!({ "status": "Lost" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(&app, "PATCH", "/api/leads/999", json!({ "status": "Contacted" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Lead not found");
}

#[tokio::test]
async fn test_delete_lead_twice() {
    let app = create_test_app();
    let lead = create_lead(&app, json!({ "name": "Asha Rao", "email": "asha@example.com" })).await;
    let uri = format!("/api/leads/{}", lead.id);

    let (status, body) = send(&app, "DELETE", &uri, "application/json", Body::empty()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, "DELETE", &uri, "application/json", Body::empty()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let app = create_test_app();
    let (status, _) = get(&app, "/api/leads/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_interact_with_lead() {
    let app = create_test_app();
    let lead = create_lead(&app, json!({ "name": "Asha Rao", "email": "asha@example.com" })).await;
    let uri = format!("/api/leads/{}/interact", lead.id);

    let (status, body) = send_json(&app, "POST", &uri, json!({ "message": "Draft a FOLLOW-UP" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "Email Asha Rao at asha@example.com.");

    let (_, body) = send_json(&app, "POST", &uri, json!({ "message": "hello" })).await;
    assert_eq!(body["reply"], "Ask about follow-up or details.");

    let (status, _) = send_json(&app, "POST", &uri, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(&app, "POST", "/api/leads/999/interact", json!({ "message": "details" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, greeting) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert!(greeting["reply"].as_str().unwrap().contains("Asha Rao"));
}

#[tokio::test]
async fn test_workflow_lifecycle() {
    let app = create_test_app();
    let nodes = json!([
        { "id": "trigger", "type": "input", "data": { "label": "🚀 Lead Created" } },
        { "id": "action-1", "type": "actionNode", "data": { "label": "Send Email", "action": "Send Email" } }
    ])
    .to_string();

    let (status, created) = send_json(
        &app,
        "POST",
        "/api/workflows",
        json!({ "name": "Welcome", "nodes": nodes, "edges": "[]" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let workflow: Workflow = serde_json::from_value(created).unwrap();
    assert_eq!(workflow.nodes, nodes);

    let (status, listed) = get(&app, "/api/workflows").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let uri = format!("/api/workflows/{}", workflow.id);
    let (status, renamed) = send_json(&app, "PATCH", &uri, json!({ "name": "Onboarding" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Onboarding");
    assert_eq!(renamed["edges"], "[]");

    let (status, _) = send(&app, "DELETE", &uri, "application/json", Body::empty()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Workflow not found");
}

#[tokio::test]
async fn test_workflow_requires_string_graph() {
    let app = create_test_app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/workflows",
        json!({ "name": "Welcome", "nodes": [], "edges": "[]" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["path"][0], "nodes");
}

#[tokio::test]
async fn test_document_upload_creates_document_lead() {
    let app = create_test_app();
    let text = "Priya Sharma\npriya.sharma@example.com\n+91 9123456789\nSenior Data Analyst";

    let (status, preview) = send(&app, "POST", "/api/documents/extract", "text/plain", text).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["name"], "Priya Sharma");
    assert_eq!(preview["email"], "priya.sharma@example.com");

    // Previewing never stores anything
    let (_, leads) = get(&app, "/api/leads").await;
    assert!(leads.as_array().unwrap().is_empty());

    let (status, created) = send(&app, "POST", "/api/documents", "text/plain; charset=utf-8", text).await;
    assert_eq!(status, StatusCode::CREATED);
    let lead: Lead = serde_json::from_value(created).unwrap();
    assert_eq!(lead.name, "Priya Sharma");
    assert_eq!(lead.phone, "+91 9123456789");
    assert_eq!(lead.source, LeadSource::Document);
    assert_eq!(lead.status, LeadStatus::New);
}

#[tokio::test]
async fn test_document_without_contact_is_unprocessable() {
    let app = create_test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/documents",
        "text/plain",
        "SKILLS\nEDUCATION\nCOMPUTER SCIENCE",
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().starts_with("Could not extract"));

    let (_, leads) = get(&app, "/api/leads").await;
    assert!(leads.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unsupported_documents() {
    let app = create_test_app();

    let (status, _) = send(&app, "POST", "/api/documents", "image/png", vec![0x89u8, 0x50, 0x4e, 0x47]).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let (status, _) = send(&app, "POST", "/api/documents/extract", "application/zip", vec![0x50u8, 0x4b]).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

/// One-page PDF whose text layer is a single Courier line
fn one_page_pdf(line: &str) -> Vec<u8> {
    use lopdf::{
        content::{Content, Operation},
        dictionary, Document, Object, Stream,
    };

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(line)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[tokio::test]
async fn test_pdf_upload_creates_document_lead() {
    let app = create_test_app();
    let pdf = one_page_pdf("Priya Sharma priya@example.com 9123456789");

    let (status, created) = send(&app, "POST", "/api/documents", "application/pdf", pdf).await;
    assert_eq!(status, StatusCode::CREATED);
    let lead: Lead = serde_json::from_value(created).unwrap();
    assert_eq!(lead.name, "Priya Sharma");
    assert_eq!(lead.email, "priya@example.com");
    assert_eq!(lead.phone, "9123456789");
    assert_eq!(lead.source, LeadSource::Document);
    assert_eq!(lead.status, LeadStatus::New);

    let (_, leads) = get(&app, "/api/leads").await;
    assert_eq!(leads.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_corrupt_pdf_is_unprocessable() {
    let app = create_test_app();
    let (status, _) = send(&app, "POST", "/api/documents/extract", "application/pdf", "not a pdf").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
