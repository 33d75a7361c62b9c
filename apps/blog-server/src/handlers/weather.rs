//! Current weather passthrough.

use actix_web::{HttpResponse, web};

use quill_shared::ApiResponse;
use quill_shared::dto::WeatherQuery;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/weather?city=
///
/// Falls back to the configured default city.
pub async fn current_weather(
    state: web::Data<AppState>,
    query: web::Query<WeatherQuery>,
) -> AppResult<HttpResponse> {
    let city = query
        .into_inner()
        .city
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| state.default_city.clone());

    let Some(weather) = &state.weather else {
        return Err(AppError::ServiceUnavailable(
            "Weather lookup is not configured".to_string(),
        ));
    };

    let report = weather.current(&city).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(report)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test};
    use async_trait::async_trait;
    use serde_json::Value;

    use quill_core::ports::{IntegrationError, WeatherProvider, WeatherReport};

    use crate::handlers::test_support::memory_state;

    /// Knows exactly one city.
    struct StubWeather;

    #[async_trait]
    impl WeatherProvider for StubWeather {
        async fn current(&self, city: &str) -> Result<WeatherReport, IntegrationError> {
            if city != "北京" {
                return Err(IntegrationError::NotFound(format!("city {city}")));
            }
            Ok(WeatherReport {
                city: "北京市".to_string(),
                weather: "晴".to_string(),
                temperature: "21".to_string(),
                temperature_float: "21.0".to_string(),
                wind_direction: "北".to_string(),
                wind_power: "≤3".to_string(),
                humidity: "30".to_string(),
                humidity_float: "30.0".to_string(),
                report_time: "2024-05-01 12:00:00".to_string(),
                update_time: "2024-05-01 12:00:00".to_string(),
            })
        }
    }

    #[actix_web::test]
    async fn test_default_city() {
        let mut state = memory_state();
        state.weather = Some(Arc::new(StubWeather));
        let app = test_app!(state);

        let req = test::TestRequest::get().uri("/api/weather").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["city"], "北京市");
        assert_eq!(body["data"]["windDirection"], "北");
        assert_eq!(body["data"]["temperatureFloat"], "21.0");
    }

    #[actix_web::test]
    async fn test_unknown_city() {
        let mut state = memory_state();
        state.weather = Some(Arc::new(StubWeather));
        let app = test_app!(state);

        let req = test::TestRequest::get()
            .uri("/api/weather?city=Atlantis")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn test_not_configured() {
        let app = test_app!(memory_state());

        let req = test::TestRequest::get().uri("/api/weather").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
