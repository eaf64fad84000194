use actix_web::{dev::Service, http::StatusCode, test, web, App};
use async_trait::async_trait;
use rthumb::{
    server::{self, session, AppState},
    AssetStore, ImageAcquirer, ImageProvider, ImageRequest, MemoryRecordStore, RecordStore,
    Result, Thumbnail, ThumbnailError, ThumbnailService,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const CDN_PREFIX: &str = "https://res.cloudinary.com/demo/image/upload/";

struct FakeProvider {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

#[async_trait]
impl ImageProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(5)
    }

    async fn fetch(&self, request: &ImageRequest) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ThumbnailError::ResponseError("fake returned 429".into()));
        }
        Ok(format!("{}x{}", request.width, request.height).into_bytes())
    }
}

#[derive(Default)]
struct FakeCdn {
    uploads: Mutex<Vec<Vec<u8>>>,
}

#[async_trait]
impl AssetStore for FakeCdn {
    async fn upload(&self, bytes: &[u8]) -> Result<String> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(bytes.to_vec());
        Ok(format!("{}thumbnail-{}.png", CDN_PREFIX, uploads.len()))
    }
}

struct Harness {
    records: Arc<MemoryRecordStore>,
    provider_calls: Arc<AtomicUsize>,
    cdn: Arc<FakeCdn>,
    state: web::Data<AppState>,
}

impl Harness {
    fn new(provider_fails: bool) -> Self {
        let records = Arc::new(MemoryRecordStore::new());
        let provider_calls = Arc::new(AtomicUsize::new(0));
        let provider: Arc<dyn ImageProvider> = Arc::new(FakeProvider {
            calls: provider_calls.clone(),
            fail: provider_fails,
        });
        let cdn = Arc::new(FakeCdn::default());
        let service = ThumbnailService::new(
            records.clone(),
            ImageAcquirer::new(vec![provider], Duration::from_millis(1)),
            cdn.clone(),
        );

        Self {
            records,
            provider_calls,
            cdn,
            state: web::Data::new(AppState::new(service)),
        }
    }
}

macro_rules! app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data($harness.state.clone())
                .wrap_fn(|req, srv| {
                    session::attach_from_header(&req, "X-User-Id");
                    srv.call(req)
                })
                .configure(server::configure),
        )
        .await
    };
}

fn cat_body() -> Value {
    json!({
        "title": "Test",
        "style": "Minimalist",
        "aspect_ratio": "1:1",
        "color_scheme": "pastel",
        "prompt": "a cat"
    })
}

async fn seed(records: &MemoryRecordStore, owner: &str) -> Thumbnail {
    let mut thumbnail = Thumbnail::pending(owner, &Default::default());
    thumbnail.succeed(format!("{}seeded.png", CDN_PREFIX));
    records.create(&thumbnail).await.unwrap();
    thumbnail
}

#[actix_web::test]
async fn generate_end_to_end() {
    let harness = Harness::new(false);
    let app = app!(harness);

    let req = test::TestRequest::post()
        .uri("/thumbnails")
        .insert_header(("X-User-Id", "alice"))
        .set_json(cat_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Thumbnail generated");
    let thumbnail = &body["thumbnail"];
    assert_eq!(thumbnail["isGenerating"], false);
    assert_eq!(thumbnail["style"], "Minimalist");
    assert_eq!(thumbnail["aspect_ratio"], "1:1");
    assert_eq!(thumbnail["color_scheme"], "pastel");
    assert_eq!(thumbnail["title"], "Test");
    assert_eq!(thumbnail["prompt_used"], "a cat");
    assert_eq!(thumbnail["text_overlay"], true);
    assert_eq!(thumbnail["user_id"], "alice");
    assert!(thumbnail["image_url"].as_str().unwrap().starts_with(CDN_PREFIX));
    assert!(thumbnail.get("error").is_none());

    assert_eq!(harness.provider_calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.cdn.uploads.lock().unwrap()[0], b"1024x1024");

    let id = thumbnail["id"].as_str().unwrap();
    let stored = harness.records.find_by_id(id).await.unwrap().unwrap();
    assert!(!stored.is_generating);
    assert_eq!(stored.image_url.as_deref(), thumbnail["image_url"].as_str());
}

#[actix_web::test]
async fn generate_with_empty_body_uses_defaults() {
    let harness = Harness::new(false);
    let app = app!(harness);

    let req = test::TestRequest::post()
        .uri("/thumbnails")
        .insert_header(("X-User-Id", "alice"))
        .set_json(json!({}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["thumbnail"]["style"], "Bold & Graphic");
    assert_eq!(body["thumbnail"]["aspect_ratio"], "16:9");
    assert_eq!(body["thumbnail"]["color_scheme"], "vibrant");
    assert_eq!(harness.cdn.uploads.lock().unwrap()[0], b"1024x576");
}

#[actix_web::test]
async fn generate_requires_session() {
    let harness = Harness::new(false);
    let app = app!(harness);

    let req = test::TestRequest::post()
        .uri("/thumbnails")
        .set_json(cat_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "You are not logged in");

    assert!(harness.records.is_empty().await);
    assert_eq!(harness.provider_calls.load(Ordering::SeqCst), 0);
    assert!(harness.cdn.uploads.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn generate_failure_returns_partial_record() {
    let harness = Harness::new(true);
    let app = app!(harness);

    let req = test::TestRequest::post()
        .uri("/thumbnails")
        .insert_header(("X-User-Id", "alice"))
        .set_json(cat_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Failed to generate thumbnail");
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("fake returned 429"), "{}", error);
    assert_eq!(body["thumbnail"]["isGenerating"], false);
    assert_eq!(body["thumbnail"]["error"], error);
    assert!(body["thumbnail"].get("image_url").is_none());

    let stored = harness.records.list_by_owner("alice").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].error.as_deref(), Some(error));
    assert!(harness.cdn.uploads.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn delete_other_users_record_is_not_found() {
    let harness = Harness::new(false);
    let app = app!(harness);
    let thumbnail = seed(&harness.records, "alice").await;

    let req = test::TestRequest::delete()
        .uri(&format!("/thumbnails/{}", thumbnail.id))
        .insert_header(("X-User-Id", "mallory"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let stored = harness.records.find_by_id(&thumbnail.id).await.unwrap();
    assert_eq!(stored, Some(thumbnail));
}

#[actix_web::test]
async fn delete_owned_record() {
    let harness = Harness::new(false);
    let app = app!(harness);
    let thumbnail = seed(&harness.records, "alice").await;

    let req = test::TestRequest::delete()
        .uri(&format!("/thumbnails/{}", thumbnail.id))
        .insert_header(("X-User-Id", "alice"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Thumbnail deleted successfully");

    assert!(harness.records.find_by_id(&thumbnail.id).await.unwrap().is_none());

    let again = test::TestRequest::delete()
        .uri(&format!("/thumbnails/{}", thumbnail.id))
        .insert_header(("X-User-Id", "alice"))
        .to_request();
    assert_eq!(
        test::call_service(&app, again).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn delete_requires_session() {
    let harness = Harness::new(false);
    let app = app!(harness);
    let thumbnail = seed(&harness.records, "alice").await;

    let req = test::TestRequest::delete()
        .uri(&format!("/thumbnails/{}", thumbnail.id))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert!(harness.records.find_by_id(&thumbnail.id).await.unwrap().is_some());
}

#[actix_web::test]
async fn reads_are_owner_scoped() {
    let harness = Harness::new(false);
    let app = app!(harness);
    let mine = seed(&harness.records, "alice").await;
    seed(&harness.records, "bob").await;

    let req = test::TestRequest::get()
        .uri("/thumbnails")
        .insert_header(("X-User-Id", "alice"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let listed = body["thumbnails"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], mine.id.as_str());

    let req = test::TestRequest::get()
        .uri(&format!("/thumbnails/{}", mine.id))
        .insert_header(("X-User-Id", "bob"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::get()
        .uri(&format!("/thumbnails/{}", mine.id))
        .insert_header(("X-User-Id", "alice"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["thumbnail"]["id"], mine.id.as_str());
}

#[actix_web::test]
async fn health_reports_backend() {
    let harness = Harness::new(false);
    let app = app!(harness);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}
