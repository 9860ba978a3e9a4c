#![forbid(unsafe_code)]

use std::any::Any;

use log::error;
use poem::error::NotFoundError;
use poem::http::StatusCode;
use poem::middleware::{CatchPanic, Cors};
use poem::web::Json as WebJson;
use poem::{Endpoint, EndpointExt, IntoResponse, Route};
use poem_openapi::{Object, OpenApiService};
use serde_json::json;

use crate::api::greeting_get::GreetingApi;
use crate::api::health::HealthApi;
use crate::api::languages_list::LanguagesApi;
use crate::api::timezones_list::TimezonesApi;
use crate::api::version::VersionApi;

pub mod greeting_get;
pub mod health;
pub mod languages_list;
pub mod timezones_list;
pub mod version;

// ***************************************************************************
//                                Constants
// ***************************************************************************
pub const SERVICE_NAME   : &str = "Dynamic Greeting API";
pub const SERVER_VERSION : &str = env!("CARGO_PKG_VERSION");

const NOT_FOUND_MSG      : &str = "Endpoint not found";
const INTERNAL_ERROR_MSG : &str = "Internal server error";

// ***************************************************************************
//                            Shared Response Types
// ***************************************************************************
/// Body of every 4xx/5xx response produced by an endpoint.
#[derive(Object, Debug)]
pub struct RespError
{
    error: String,
}

impl RespError {
    pub fn new(error: String) -> Self {
        Self { error }
    }

    /// The only message clients ever see for unexpected failures.
    pub fn internal() -> Self {
        Self::new(INTERNAL_ERROR_MSG.to_string())
    }
}

// ***************************************************************************
//                               Route Table
// ***************************************************************************
// ---------------------------------------------------------------------------
// build_app:
// ---------------------------------------------------------------------------
/** Assemble all endpoints into one poem endpoint.  Unmatched paths get the
 * endpoint directory, handler panics become a generic 500 and every response
 * carries CORS headers that allow any origin.
 */
pub fn build_app(title: &str, server_url: &str) -> impl Endpoint {
    let endpoints = (HealthApi, GreetingApi, TimezonesApi, LanguagesApi, VersionApi);
    let api_service =
        OpenApiService::new(endpoints, title, SERVER_VERSION).server(server_url);

    // Allow the generated openapi spec to be retrieved from the server.
    let spec = api_service.spec_endpoint();

    Route::new()
        .nest("/", api_service)
        .at("/spec", spec)
        .catch_error(not_found)
        .with(CatchPanic::new().with_handler(internal_error))
        .with(Cors::new())
}

// ***************************************************************************
//                             Error Handlers
// ***************************************************************************
// ---------------------------------------------------------------------------
// not_found:
// ---------------------------------------------------------------------------
async fn not_found(_: NotFoundError) -> impl IntoResponse {
    let body = json!({
        "error": NOT_FOUND_MSG,
        "available_endpoints": {
            "/": "Health check",
            "/health": "Health check",
            "/greeting": "Dynamic greeting message",
            "/timezones": "List of common timezones",
            "/languages": "List of supported languages",
        }
    });
    (StatusCode::NOT_FOUND, WebJson(body))
}

// ---------------------------------------------------------------------------
// internal_error:
// ---------------------------------------------------------------------------
fn internal_error(panic: Box<dyn Any + Send + 'static>) -> impl IntoResponse {
    let detail = panic.downcast_ref::<&str>().map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    error!("Request handler panicked: {}", detail);
    (StatusCode::INTERNAL_SERVER_ERROR, WebJson(json!({ "error": INTERNAL_ERROR_MSG })))
}
