//! HTTP handlers and route configuration.

/// Test service with the full route table over `$state`.
#[cfg(test)]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .configure(crate::handlers::configure_routes),
        )
        .await
    };
}

mod health;
mod images;
mod posts;
mod weather;

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::Method, web};

use crate::middleware::error::{AppError, json_error, query_error};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                // Posts, selected by ?slug= or by path
                .service(
                    web::resource("/posts")
                        .route(web::get().to(posts::list_or_get))
                        .route(web::post().to(posts::create))
                        .route(web::put().to(posts::update))
                        .route(web::delete().to(posts::delete))
                        .default_service(web::to(unsupported_method)),
                )
                .service(
                    web::resource("/posts/{slug}")
                        .route(web::get().to(posts::get_by_path))
                        .route(web::put().to(posts::update_by_path))
                        .route(web::delete().to(posts::delete_by_path))
                        .default_service(web::to(unsupported_method)),
                )
                // Integrations
                .service(
                    web::resource("/generate-image")
                        .route(web::post().to(images::generate_image))
                        .default_service(web::to(unsupported_method)),
                )
                .service(
                    web::resource("/weather")
                        .route(web::get().to(weather::current_weather))
                        .default_service(web::to(unsupported_method)),
                )
                .default_service(web::to(api_not_found)),
        );
}

/// Answers CORS preflights; any other unrouted method is a 405.
async fn unsupported_method(req: HttpRequest) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        HttpResponse::Ok().finish()
    } else {
        AppError::MethodNotAllowed.error_response()
    }
}

async fn api_not_found() -> HttpResponse {
    AppError::NotFound("API not found".to_string()).error_response()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use quill_core::PostService;
    use quill_core::domain::PostDefaults;
    use quill_infra::storage::InMemoryPostRepository;

    use crate::state::AppState;

    /// State over an empty in-memory repository.
    pub fn memory_state() -> AppState {
        let posts = PostService::new(
            Arc::new(InMemoryPostRepository::new()),
            PostDefaults {
                author: "Owner".to_string(),
            },
        );
        AppState::new(posts, "北京")
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::Value;

    use super::test_support::memory_state;

    #[actix_web::test]
    async fn test_health() {
        let app = test_app!(memory_state());
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn test_unknown_api_path() {
        let app = test_app!(memory_state());
        let req = test::TestRequest::get().uri("/api/nope").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "API not found");
    }

    #[actix_web::test]
    async fn test_method_not_allowed_and_preflight() {
        let app = test_app!(memory_state());

        let req = test::TestRequest::patch().uri("/api/posts").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Method not allowed");

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/api/posts")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
