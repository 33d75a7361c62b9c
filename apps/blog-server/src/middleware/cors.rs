//! Permissive CORS headers for browser clients.

use actix_web::middleware::DefaultHeaders;

use crate::observability::REQUEST_ID_HEADER;

/// Headers added to every response.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "Content-Type, Authorization"))
        .add(("Access-Control-Expose-Headers", REQUEST_ID_HEADER))
}
