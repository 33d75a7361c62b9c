//! Text-to-image passthrough.

use actix_web::{HttpResponse, web};

use quill_core::ports::ImageRequest;
use quill_shared::ApiResponse;
use quill_shared::dto::{GenerateImageRequest, GeneratedImageResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/generate-image
pub async fn generate_image(
    state: web::Data<AppState>,
    body: web::Json<GenerateImageRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let Some(prompt) = req.prompt.filter(|p| !p.trim().is_empty()) else {
        return Err(AppError::BadRequest("prompt is required".to_string()));
    };

    let Some(images) = &state.images else {
        return Err(AppError::ServiceUnavailable(
            "Image generation is not configured".to_string(),
        ));
    };

    let image_url = images
        .generate(ImageRequest {
            prompt,
            aspect_ratio: req.aspect_ratio,
            n: req.n,
        })
        .await?;

    tracing::debug!(%image_url, "Image generated");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(GeneratedImageResponse { image_url })))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use actix_web::{http::StatusCode, test};
    use async_trait::async_trait;
    use serde_json::{Value, json};

    use quill_core::ports::{ImageGenerator, ImageRequest, IntegrationError};

    use crate::handlers::test_support::memory_state;

    /// Records the last request and answers with a fixed outcome.
    struct StubGenerator {
        fail: bool,
        seen: Mutex<Option<ImageRequest>>,
    }

    impl StubGenerator {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                seen: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl ImageGenerator for StubGenerator {
        async fn generate(&self, request: ImageRequest) -> Result<String, IntegrationError> {
            *self.seen.lock().unwrap() = Some(request);
            if self.fail {
                Err(IntegrationError::Upstream("HTTP 500".to_string()))
            } else {
                Ok("https://img.example/cat.png".to_string())
            }
        }
    }

    fn generate(body: Value) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/generate-image")
            .set_json(body)
    }

    #[actix_web::test]
    async fn test_generates_url() {
        let stub = StubGenerator::new(false);
        let mut state = memory_state();
        state.images = Some(stub.clone());
        let app = test_app!(state);

        let res = test::call_service(&app, generate(json!({ "prompt": "a cat" })).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["imageUrl"], "https://img.example/cat.png");

        let seen = stub.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.prompt, "a cat");
        assert_eq!(seen.aspect_ratio, "1:1");
        assert_eq!(seen.n, 1);
    }

    #[actix_web::test]
    async fn test_prompt_required() {
        let mut state = memory_state();
        state.images = Some(StubGenerator::new(false));
        let app = test_app!(state);

        for body in [json!({}), json!({ "prompt": "  " })] {
            let res = test::call_service(&app, generate(body).to_request()).await;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[actix_web::test]
    async fn test_not_configured() {
        let app = test_app!(memory_state());

        let res = test::call_service(&app, generate(json!({ "prompt": "a cat" })).to_request()).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Image generation is not configured");
    }

    #[actix_web::test]
    async fn test_upstream_failure_is_generic() {
        let mut state = memory_state();
        state.images = Some(StubGenerator::new(true));
        let app = test_app!(state);

        let res = test::call_service(&app, generate(json!({ "prompt": "a cat" })).to_request()).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Internal server error");
    }
}
