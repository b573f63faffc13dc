//! Router tests: in-memory SQLite, in-memory media, and a mock chat endpoint.

use std::{
  collections::HashMap,
  convert::Infallible,
  future::Future,
  sync::{Arc, Mutex},
};

use argon2::{
  Algorithm, Argon2, Params, PasswordHasher, Version, password_hash::SaltString,
};
use axum::{
  Router,
  body::{Body, to_bytes},
  http::{Method, Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use growlog_core::{
  Journal,
  fact::MediaRef,
  media::{MediaStore, PhotoUpload},
  owner::{NewOwner, Owner},
};
use growlog_guide::{ChatGuide, GuideConfig};
use growlog_store_sqlite::SqliteStore;
use rand_core::OsRng;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;
use wiremock::{
  Mock, MockServer, ResponseTemplate,
  matchers::{method, path},
};

use crate::{DEFAULT_MAX_UPLOAD_BYTES, api_router};

// ─── Fixtures ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryMedia {
  files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryMedia {
  fn paths(&self) -> Vec<String> {
    let mut paths: Vec<_> = self.files.lock().unwrap().keys().cloned().collect();
    paths.sort();
    paths
  }
}

impl MediaStore for MemoryMedia {
  type Error = Infallible;

  fn save(
    &self,
    plant_id: Uuid,
    position: u32,
    upload: PhotoUpload,
  ) -> impl Future<Output = Result<MediaRef, Self::Error>> + Send + '_ {
    async move {
      let path = format!("plant_{plant_id}_fact_{position}_{}", upload.filename);
      self.files.lock().unwrap().insert(path.clone(), upload.bytes);
      Ok(MediaRef {
        path,
        content_hash: "00".repeat(32),
        media_type: upload.content_type.unwrap_or_else(|| "image/jpeg".into()),
      })
    }
  }

  fn remove<'a>(
    &'a self,
    media: &'a MediaRef,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a {
    async move {
      self.files.lock().unwrap().remove(&media.path);
      Ok(())
    }
  }
}

type TestJournal = Journal<SqliteStore, ChatGuide, MemoryMedia>;

struct Harness {
  app:     Router,
  journal: Arc<TestJournal>,
  media:   Arc<MemoryMedia>,
  server:  MockServer,
}

const PASSWORD: &str = "hunter2";

/// Argon2 with minimal cost so tests stay fast; verification reads the
/// parameters back out of the PHC string.
fn cheap_hash(password: &str) -> String {
  let params = Params::new(1024, 1, 1, None).unwrap();
  let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
  let salt = SaltString::generate(&mut OsRng);
  argon.hash_password(password.as_bytes(), &salt).unwrap().to_string()
}

async fn harness() -> Harness { harness_with("test-key", DEFAULT_MAX_UPLOAD_BYTES).await }

async fn harness_with(api_key: &str, max_upload_bytes: usize) -> Harness {
  let server = MockServer::start().await;
  let guide = ChatGuide::new(GuideConfig {
    base_url: server.uri(),
    api_key: api_key.into(),
    ..Default::default()
  })
  .unwrap();

  let store = SqliteStore::open_in_memory().await.unwrap();
  let media = Arc::new(MemoryMedia::default());
  let journal = Arc::new(Journal::new(Arc::new(store), Arc::new(guide), media.clone()));
  let app = api_router(journal.clone(), max_upload_bytes);

  let h = Harness { app, journal, media, server };
  h.owner("admin", true).await;
  h.owner("ada", false).await;
  h
}

impl Harness {
  async fn owner(&self, name: &str, is_admin: bool) -> Owner {
    self
      .journal
      .register_owner(NewOwner {
        name: name.into(),
        password_hash: cheap_hash(PASSWORD),
        is_admin,
      })
      .await
      .unwrap()
  }

  async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
    let res = self.app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
  }

  async fn call(&self, user: &str, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
      .method(method)
      .uri(uri)
      .header(header::AUTHORIZATION, basic(user, PASSWORD));
    let req = match body {
      Some(b) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(b.to_string())),
      None => builder.body(Body::empty()),
    };
    self.send(req.unwrap()).await
  }

  async fn plant(&self, user: &str, number: i64, name: &str) -> String {
    let (status, body) = self
      .call(user, Method::POST, "/plants", Some(json!({ "number": number, "name": name })))
      .await;
    assert_eq!(status, StatusCode::CREATED);
    body["plant_id"].as_str().unwrap().to_owned()
  }

  async fn fact(&self, plant: &str, label: &str, value: &str) -> Value {
    let (status, body) = self
      .call(
        "ada",
        Method::POST,
        &format!("/plants/{plant}/facts"),
        Some(json!({ "label": label, "value": value, "kind": "short_text" })),
      )
      .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
  }

  /// Labels of a plant's facts, checking positions run 0..n.
  async fn labels(&self, plant: &str) -> Vec<String> {
    let (status, view) = self.call("ada", Method::GET, &format!("/plants/{plant}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let facts = view["facts"].as_array().unwrap();
    for (i, f) in facts.iter().enumerate() {
      assert_eq!(f["position"], json!(i));
    }
    facts.iter().map(|f| f["label"].as_str().unwrap().to_owned()).collect()
  }

  fn mock_completion(&self, status: u16, content: &str) -> Mock {
    Mock::given(method("POST"))
      .and(path("/chat/completions"))
      .respond_with(ResponseTemplate::new(status).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }],
      })))
  }
}

fn basic(user: &str, pass: &str) -> String {
  format!("Basic {}", B64.encode(format!("{user}:{pass}")))
}

const BOUNDARY: &str = "growlog-test-boundary";

fn multipart(fields: &[(&str, &str)], photo: Option<(&str, &[u8])>) -> Vec<u8> {
  let mut body = Vec::new();
  for (name, value) in fields {
    body.extend_from_slice(
      format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
      )
      .as_bytes(),
    );
  }
  if let Some((filename, bytes)) = photo {
    body.extend_from_slice(
      format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"{filename}\"\r\nContent-Type: image/jpeg\r\n\r\n"
      )
      .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
  }
  body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
  body
}

fn multipart_request(plant: &str, body: Vec<u8>) -> Request<Body> {
  Request::builder()
    .method(Method::POST)
    .uri(format!("/plants/{plant}/facts"))
    .header(header::AUTHORIZATION, basic("ada", PASSWORD))
    .header(
      header::CONTENT_TYPE,
      format!("multipart/form-data; boundary={BOUNDARY}"),
    )
    .body(Body::from(body))
    .unwrap()
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_or_wrong_credentials_are_unauthorized() {
  let h = harness().await;

  let req = Request::builder().uri("/me").body(Body::empty()).unwrap();
  let res = h.app.clone().oneshot(req).await.unwrap();
  assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
  assert!(res.headers().contains_key(header::WWW_AUTHENTICATE));

  let req = Request::builder()
    .uri("/me")
    .header(header::AUTHORIZATION, basic("ada", "nope"))
    .body(Body::empty())
    .unwrap();
  assert_eq!(h.send(req).await.0, StatusCode::UNAUTHORIZED);

  let req = Request::builder()
    .uri("/me")
    .header(header::AUTHORIZATION, basic("nobody", PASSWORD))
    .body(Body::empty())
    .unwrap();
  assert_eq!(h.send(req).await.0, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_hides_the_password_hash() {
  let h = harness().await;
  let (status, body) = h.call("ada", Method::GET, "/me", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["name"], "ada");
  assert_eq!(body["is_admin"], false);
  assert!(body.get("password_hash").is_none());
}

// ─── Plants ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn other_owners_plants_are_not_found() {
  let h = harness().await;
  h.owner("bob", false).await;
  let plant = h.plant("ada", 1, "Basil").await;

  let (status, _) = h.call("bob", Method::GET, &format!("/plants/{plant}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = h.call("bob", Method::DELETE, &format!("/plants/{plant}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = h.call("admin", Method::GET, &format!("/plants/{plant}"), None).await;
  assert_eq!(status, StatusCode::OK);

  let (_, listed) = h.call("bob", Method::GET, "/plants", None).await;
  assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn list_searches_by_name_or_number() {
  let h = harness().await;
  h.plant("ada", 12, "Sweet Basil").await;
  h.plant("ada", 3, "Chives").await;

  let (_, all) = h.call("ada", Method::GET, "/plants", None).await;
  let names: Vec<_> = all.as_array().unwrap().iter().map(|p| p["name"].clone()).collect();
  assert_eq!(names, [json!("Chives"), json!("Sweet Basil")]);

  let (_, hits) = h.call("ada", Method::GET, "/plants?q=basil", None).await;
  assert_eq!(hits.as_array().unwrap().len(), 1);

  let (_, hits) = h.call("ada", Method::GET, "/plants?q=3", None).await;
  assert_eq!(hits[0]["name"], "Chives");
}

#[tokio::test]
async fn only_admins_reassign_plants() {
  let h = harness().await;
  let bob = h.owner("bob", false).await;
  let plant = h.plant("ada", 1, "Basil").await;
  let uri = format!("/plants/{plant}");

  let (status, _) = h
    .call("ada", Method::PUT, &uri, Some(json!({ "owner_id": bob.owner_id })))
    .await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, _) = h
    .call("ada", Method::PUT, &uri, Some(json!({ "name": "Thai Basil" })))
    .await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = h
    .call("admin", Method::PUT, &uri, Some(json!({ "owner_id": bob.owner_id })))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["owner_id"], json!(bob.owner_id));
  assert_eq!(body["name"], "Thai Basil");
}

#[tokio::test]
async fn deleting_a_plant_removes_its_photos() {
  let h = harness().await;
  let plant = h.plant("ada", 1, "Basil").await;
  let body = multipart(&[("label", "Leaf"), ("kind", "photo")], Some(("leaf.jpg", b"jpeg".as_slice())));
  assert_eq!(h.send(multipart_request(&plant, body)).await.0, StatusCode::CREATED);
  assert_eq!(h.media.paths().len(), 1);

  let (status, _) = h.call("ada", Method::DELETE, &format!("/plants/{plant}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert!(h.media.paths().is_empty());

  let (status, _) = h.call("ada", Method::GET, &format!("/plants/{plant}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Facts ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn facts_append_in_order() {
  let h = harness().await;
  let plant = h.plant("ada", 1, "Basil").await;
  for (i, label) in ["a", "b", "c"].iter().enumerate() {
    let fact = h.fact(&plant, label, "x").await;
    assert_eq!(fact["position"], json!(i));
  }
  assert_eq!(h.labels(&plant).await, ["a", "b", "c"]);
}

#[tokio::test]
async fn invalid_fact_input_is_rejected() {
  let h = harness().await;
  let plant = h.plant("ada", 1, "Basil").await;
  let uri = format!("/plants/{plant}/facts");

  for body in [
    json!({ "label": "Colour", "value": "green", "kind": "colour" }),
    json!({ "label": "Height", "kind": "integer" }),
    json!({ "value": "green", "kind": "short_text" }),
    json!({ "label": "Leaf", "value": "x", "kind": "photo" }),
  ] {
    let (status, err) = h.call("ada", Method::POST, &uri, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].is_string());
  }
  assert!(h.labels(&plant).await.is_empty());
}

#[tokio::test]
async fn structured_values_are_stored_as_json_text() {
  let h = harness().await;
  let plant = h.plant("ada", 1, "Basil").await;
  let (status, fact) = h
    .call(
      "ada",
      Method::POST,
      &format!("/plants/{plant}/facts"),
      Some(json!({ "label": "Soil", "value": { "ph": 6.5 }, "value_type": "long_text" })),
    )
    .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(fact["value"], r#"{"ph":6.5}"#);
  assert_eq!(fact["kind"], "long_text");
}

#[tokio::test]
async fn photo_without_file_is_rejected() {
  let h = harness().await;
  let plant = h.plant("ada", 1, "Basil").await;

  let body = multipart(&[("label", "Leaf"), ("kind", "photo")], None);
  let (status, err) = h.send(multipart_request(&plant, body)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(err["error"], "no photo uploaded");

  let body = multipart(&[("label", "Leaf"), ("kind", "photo")], Some(("", b"".as_slice())));
  let (status, err) = h.send(multipart_request(&plant, body)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(err["error"], "no photo selected");

  assert!(h.labels(&plant).await.is_empty());
  assert!(h.media.paths().is_empty());
}

#[tokio::test]
async fn photo_upload_is_stored_and_becomes_cover() {
  let h = harness().await;
  let plant = h.plant("ada", 1, "Basil").await;
  h.fact(&plant, "Plant Type", "basil").await;

  let body = multipart(&[("label", "Leaf")], Some(("leaf.jpg", b"\xff\xd8jpeg".as_slice())));
  let (status, fact) = h.send(multipart_request(&plant, body)).await;
  assert_eq!(status, StatusCode::CREATED, "{fact}");
  assert_eq!(fact["kind"], "photo");
  assert_eq!(fact["value"], "Photo");
  assert_eq!(fact["position"], 1);

  let expected = format!("plant_{plant}_fact_1_leaf.jpg");
  assert_eq!(fact["media"]["path"], expected.as_str());
  assert_eq!(h.media.paths(), [expected.clone()]);

  let (_, listed) = h.call("ada", Method::GET, "/plants", None).await;
  assert_eq!(listed[0]["cover"]["path"], expected.as_str());
}

#[tokio::test]
async fn phone_sized_photos_are_accepted() {
  let h = harness().await;
  let plant = h.plant("ada", 1, "Basil").await;

  let photo = vec![0xa5; 3 * 1024 * 1024];
  let body = multipart(&[("label", "Leaf")], Some(("leaf.jpg", photo.as_slice())));
  let (status, fact) = h.send(multipart_request(&plant, body)).await;
  assert_eq!(status, StatusCode::CREATED, "{fact}");
  assert_eq!(fact["kind"], "photo");
  assert_eq!(h.media.paths().len(), 1);
}

#[tokio::test]
async fn uploads_over_the_limit_are_too_large() {
  let h = harness_with("test-key", 64 * 1024).await;
  let plant = h.plant("ada", 1, "Basil").await;

  let photo = vec![0xa5; 128 * 1024];
  let body = multipart(&[("label", "Leaf")], Some(("leaf.jpg", photo.as_slice())));
  let (status, err) = h.send(multipart_request(&plant, body)).await;
  assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
  assert!(err["error"].is_string(), "{err}");

  assert!(h.labels(&plant).await.is_empty());
  assert!(h.media.paths().is_empty());
}

#[tokio::test]
async fn multipart_text_fact_is_accepted() {
  let h = harness().await;
  let plant = h.plant("ada", 1, "Basil").await;
  let body = multipart(&[("label", "Sown"), ("kind", "date"), ("value", "2024-04-01")], None);
  let (status, fact) = h.send(multipart_request(&plant, body)).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(fact["kind"], "date");
  assert_eq!(fact["value"], "2024-04-01");
}

#[tokio::test]
async fn update_changes_only_the_value() {
  let h = harness().await;
  let plant = h.plant("ada", 1, "Basil").await;
  h.fact(&plant, "a", "x").await;
  let before = h.fact(&plant, "Height", "10").await;
  let id = before["fact_id"].as_str().unwrap();
  tokio::time::sleep(std::time::Duration::from_millis(5)).await;

  let (status, after) = h
    .call("ada", Method::PUT, &format!("/facts/{id}"), Some(json!({ "value": "42" })))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(after["value"], "42");
  assert_ne!(after["updated_at"], before["updated_at"]);
  for field in ["label", "kind", "position", "created_at", "plant_id"] {
    assert_eq!(after[field], before[field], "{field} changed");
  }
}

#[tokio::test]
async fn photo_kind_cannot_be_toggled() {
  let h = harness().await;
  let plant = h.plant("ada", 1, "Basil").await;
  let fact = h.fact(&plant, "a", "x").await;
  let id = fact["fact_id"].as_str().unwrap();

  let (status, _) = h
    .call("ada", Method::PUT, &format!("/facts/{id}"), Some(json!({ "kind": "photo" })))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn move_swaps_and_stops_at_the_ends() {
  let h = harness().await;
  let plant = h.plant("ada", 1, "Basil").await;
  let mut ids = Vec::new();
  for label in ["a", "b", "c"] {
    ids.push(h.fact(&plant, label, "x").await["fact_id"].as_str().unwrap().to_owned());
  }
  let mv = |id: &str| format!("/facts/{id}/move");

  let (status, body) = h
    .call("ada", Method::POST, &mv(&ids[2]), Some(json!({ "direction": "up" })))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "new_position": 1 }));
  assert_eq!(h.labels(&plant).await, ["a", "c", "b"]);

  let (_, body) = h
    .call("ada", Method::POST, &mv(&ids[0]), Some(json!({ "direction": "up" })))
    .await;
  assert_eq!(body, json!({ "new_position": 0 }));

  let (_, body) = h
    .call("ada", Method::POST, &mv(&ids[1]), Some(json!({ "direction": "down" })))
    .await;
  assert_eq!(body, json!({ "new_position": 2 }));
  assert_eq!(h.labels(&plant).await, ["a", "c", "b"]);

  let (status, err) = h
    .call("ada", Method::POST, &mv(&ids[0]), Some(json!({ "direction": "sideways" })))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(err["error"].as_str().unwrap().contains("direction"), "{err}");
  assert_eq!(h.labels(&plant).await, ["a", "c", "b"]);
}

#[tokio::test]
async fn malformed_bodies_get_json_errors() {
  let h = harness().await;
  let plant = h.plant("ada", 1, "Basil").await;
  let fact = h.fact(&plant, "a", "x").await;
  let fact_uri = format!("/facts/{}", fact["fact_id"].as_str().unwrap());

  for (method, uri) in [
    (Method::POST, "/plants".to_owned()),
    (Method::PUT, format!("/plants/{plant}")),
    (Method::POST, format!("/plants/{plant}/facts")),
    (Method::PUT, fact_uri.clone()),
    (Method::POST, format!("{fact_uri}/move")),
    (Method::POST, "/owners".to_owned()),
  ] {
    let req = Request::builder()
      .method(method)
      .uri(&uri)
      .header(header::AUTHORIZATION, basic("admin", PASSWORD))
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{not json"))
      .unwrap();
    let (status, err) = h.send(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    assert!(err["error"].is_string(), "{uri}: {err}");
  }

  let (status, err) = h.call("ada", Method::POST, "/plants", Some(json!({ "name": "Mint" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(err["error"].as_str().unwrap().contains("number"), "{err}");
}

#[tokio::test]
async fn delete_in_the_middle_keeps_positions_contiguous() {
  let h = harness().await;
  let plant = h.plant("ada", 1, "Basil").await;
  h.fact(&plant, "a", "x").await;
  let b = h.fact(&plant, "b", "x").await;
  h.fact(&plant, "c", "x").await;
  let id = b["fact_id"].as_str().unwrap();

  let (status, _) = h.call("ada", Method::DELETE, &format!("/facts/{id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert_eq!(h.labels(&plant).await, ["a", "c"]);

  let (status, _) = h.call("ada", Method::GET, &format!("/facts/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Guidelines ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn generation_requires_a_plant_type() {
  let h = harness().await;
  h.mock_completion(200, "unused").expect(0).mount(&h.server).await;
  let plant = h.plant("ada", 1, "Basil").await;
  h.fact(&plant, "Sown", "spring").await;

  let (status, err) = h
    .call("ada", Method::POST, &format!("/plants/{plant}/guidelines"), None)
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(err["error"].as_str().unwrap().contains("Plant Type"));
  assert_eq!(h.labels(&plant).await, ["Sown"]);
}

#[tokio::test]
async fn generated_guidelines_are_appended_at_the_tail() {
  let h = harness().await;
  h.mock_completion(200, "Water basil regularly, keep in full sun.")
    .expect(1)
    .mount(&h.server)
    .await;
  let plant = h.plant("ada", 1, "Basil").await;
  h.fact(&plant, "Plant Type", "basil").await;
  h.fact(&plant, "Sown", "spring").await;

  let (status, fact) = h
    .call(
      "ada",
      Method::POST,
      &format!("/plants/{plant}/facts"),
      Some(json!({ "label": "Care", "kind": "derived_text" })),
    )
    .await;
  assert_eq!(status, StatusCode::CREATED, "{fact}");
  assert_eq!(fact["value"], "Water basil regularly, keep in full sun.");
  assert_eq!(fact["kind"], "derived_text");
  assert_eq!(fact["position"], 2);
  assert_eq!(h.labels(&plant).await, ["Plant Type", "Sown", "Care"]);
}

#[tokio::test]
async fn guidelines_route_uses_default_label() {
  let h = harness().await;
  h.mock_completion(200, "Keep moist.").mount(&h.server).await;
  let plant = h.plant("ada", 1, "Basil").await;
  h.fact(&plant, "Plant Type", "basil").await;

  let (status, fact) = h
    .call("ada", Method::POST, &format!("/plants/{plant}/guidelines"), None)
    .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(fact["label"], "Care Guidelines");
  assert_eq!(fact["value"], "Keep moist.");
}

#[tokio::test]
async fn generator_failure_persists_nothing() {
  let h = harness().await;
  h.mock_completion(500, "boom").mount(&h.server).await;
  let plant = h.plant("ada", 1, "Basil").await;
  h.fact(&plant, "Plant Type", "basil").await;

  let (status, err) = h
    .call("ada", Method::POST, &format!("/plants/{plant}/guidelines"), None)
    .await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(err["error"].is_string());
  assert_eq!(h.labels(&plant).await, ["Plant Type"]);
}

#[tokio::test]
async fn generation_without_api_key_fails_and_persists_nothing() {
  let h = harness_with("", DEFAULT_MAX_UPLOAD_BYTES).await;
  h.mock_completion(200, "unused").expect(0).mount(&h.server).await;
  let plant = h.plant("ada", 1, "Basil").await;
  h.fact(&plant, "Plant Type", "basil").await;

  let (status, err) = h
    .call("ada", Method::POST, &format!("/plants/{plant}/guidelines"), None)
    .await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(err["error"].as_str().unwrap().contains("API key"), "{err}");
  assert_eq!(h.labels(&plant).await, ["Plant Type"]);

  // The rest of the journal keeps working.
  h.fact(&plant, "Sown", "spring").await;
  assert_eq!(h.labels(&plant).await, ["Plant Type", "Sown"]);
}

// ─── Owners ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn owner_administration_is_admin_only() {
  let h = harness().await;

  let (status, _) = h.call("ada", Method::GET, "/owners", None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let new = json!({ "name": "bob", "password": "pw" });
  let (status, _) = h.call("ada", Method::POST, "/owners", Some(new.clone())).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, bob) = h.call("admin", Method::POST, "/owners", Some(new.clone())).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(bob["is_admin"], false);

  let (status, _) = h.call("admin", Method::POST, "/owners", Some(new)).await;
  assert_eq!(status, StatusCode::CONFLICT);

  let (_, owners) = h.call("admin", Method::GET, "/owners", None).await;
  assert_eq!(owners.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn owners_can_be_promoted_and_deleted_but_not_self_deleted() {
  let h = harness().await;
  let (_, me) = h.call("admin", Method::GET, "/me", None).await;
  let admin_id = me["owner_id"].as_str().unwrap().to_owned();
  let (_, ada) = h.call("ada", Method::GET, "/me", None).await;
  let ada_id = ada["owner_id"].as_str().unwrap().to_owned();
  let plant = h.plant("ada", 1, "Basil").await;

  let (status, promoted) = h
    .call("admin", Method::PUT, &format!("/owners/{ada_id}"), Some(json!({ "is_admin": true })))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(promoted["is_admin"], true);
  assert_eq!(promoted["name"], "ada");

  let (status, _) = h.call("admin", Method::DELETE, &format!("/owners/{admin_id}"), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = h.call("admin", Method::DELETE, &format!("/owners/{ada_id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, _) = h.call("admin", Method::GET, &format!("/plants/{plant}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
