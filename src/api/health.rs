#![forbid(unsafe_code)]

use poem_openapi::{ OpenApi, payload::Json, Object };

use crate::api::{SERVER_VERSION, SERVICE_NAME};
use crate::utils::greeting_utils::{timestamp_utc, timestamp_utc_to_str};

// Reported while the process can answer requests at all.
const STATUS_HEALTHY: &str = "healthy";

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct HealthApi;

#[derive(Object, Debug)]
pub struct RespHealth
{
    status: String,
    service: String,
    timestamp: String,
    version: String,
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl HealthApi {
    /// Health check for deployment monitoring.
    #[oai(path = "/", method = "get")]
    async fn get_root_api(&self) -> Json<RespHealth> {
        Json(RespHealth::process())
    }

    /// Health check for deployment monitoring.
    #[oai(path = "/health", method = "get")]
    async fn get_health_api(&self) -> Json<RespHealth> {
        Json(RespHealth::process())
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl RespHealth {
    fn process() -> Self {
        Self {
            status: STATUS_HEALTHY.to_string(),
            service: SERVICE_NAME.to_string(),
            timestamp: timestamp_utc_to_str(timestamp_utc()),
            version: SERVER_VERSION.to_string(),
        }
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use poem::test::TestClient;

    use crate::api::build_app;
    use crate::api::tests::json_body;

    #[tokio::test]
    async fn both_paths_report_health() {
        let cli = TestClient::new(build_app("Greeting Server", "http://localhost:5000"));
        for path in ["/", "/health"] {
            let resp = cli.get(path).send().await;
            resp.assert_status_is_ok();
            let body = json_body(resp).await;
            assert_eq!(body["status"], "healthy");
            assert_eq!(body["service"], "Dynamic Greeting API");
            assert_eq!(body["version"], "1.0.0");
            assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
        }
    }
}
