#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use poem::Request;
use poem_openapi::{ OpenApi, payload::{Json, PlainText}, param::Query, Object, ApiResponse };
use log::{error, info};

use crate::engine::greeting::{self, GreetingQuery, GreetingRequest, GreetingResult, ResponseFormat};
use crate::utils::errors::GreetingError;
use crate::utils::greeting_utils::{self, RequestDebug};
use crate::api::RespError;

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct GreetingApi;

struct ReqGreeting
{
    query: GreetingQuery,
}

#[derive(Object, Debug)]
pub struct RespGreeting
{
    greeting: String,
    message: String,
    name: String,
    day: String,
    date: String,
    time: String,
    timestamp: String,
    timezone: String,
    language: String,
    greeting_type: String,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqGreeting {
    type Req = ReqGreeting;
    fn get_request_info(&self) -> String {
        let none = "None".to_string();
        let mut s = String::with_capacity(255);
        s.push_str("  Request parameters:");
        s.push_str("\n    name: ");
        s.push_str(self.query.name.as_ref().unwrap_or(&none));
        s.push_str("\n    timezone: ");
        s.push_str(self.query.timezone.as_ref().unwrap_or(&none));
        s.push_str("\n    format: ");
        s.push_str(self.query.format.as_ref().unwrap_or(&none));
        s.push_str("\n    language: ");
        s.push_str(self.query.language.as_ref().unwrap_or(&none));
        s.push('\n');
        s
    }
}

// ------------------- HTTP Status Codes -------------------
// Both 200 variants share a status; the format parameter picks the payload.
#[derive(ApiResponse)]
enum GreetingResponse {
    #[oai(status = 200)]
    Http200Json(Json<RespGreeting>),
    #[oai(status = 200)]
    Http200Text(PlainText<String>),
    #[oai(status = 400)]
    Http400(Json<RespError>),
    #[oai(status = 500)]
    Http500(Json<RespError>),
}

fn make_http_200_json(resp: RespGreeting) -> GreetingResponse {
    GreetingResponse::Http200Json(Json(resp))
}
fn make_http_200_text(msg: String) -> GreetingResponse {
    GreetingResponse::Http200Text(PlainText(msg))
}
fn make_http_400(msg: String) -> GreetingResponse {
    GreetingResponse::Http400(Json(RespError::new(msg)))
}
fn make_http_500() -> GreetingResponse {
    GreetingResponse::Http500(Json(RespError::internal()))
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl GreetingApi {
    /// Greet someone according to the time of day in a timezone.
    #[oai(path = "/greeting", method = "get")]
    async fn get_greeting_api(&self, http_req: &Request,
                              name: Query<Option<String>>,
                              timezone: Query<Option<String>>,
                              format: Query<Option<String>>,
                              language: Query<Option<String>>,
                             ) -> GreetingResponse {
        // Package the request parameters.
        let req = ReqGreeting {
            query: GreetingQuery { name: name.0, timezone: timezone.0,
                                   format: format.0, language: language.0 },
        };

        // -------------------- Process Request ----------------------
        match RespGreeting::process(http_req, &req, greeting_utils::timestamp_utc()) {
            Ok(r) => r,
            Err(e) => {
                // Details stay in the log.
                error!("ERROR: {}", e);
                make_http_500()
            }
        }
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl RespGreeting {
    /// Create a new response from the engine's result.
    fn new(result: GreetingResult) -> Self {
        Self {
            greeting: result.greeting_phrase.to_string(),
            message: result.full_message,
            name: result.resolved_name,
            day: result.day_name,
            date: result.date_string,
            time: result.time_string,
            timestamp: result.iso_timestamp,
            timezone: result.timezone_name,
            language: result.language_used.code().to_string(),
            greeting_type: result.bucket.as_str().to_string(),
        }
    }

    /// Process the request.  Validation failures become 400 responses, only
    /// unexpected failures are returned as errors.
    fn process(http_req: &Request, req: &ReqGreeting, now: DateTime<Utc>)
    -> Result<GreetingResponse, GreetingError> {
        // Conditional logging depending on log level.
        greeting_utils::debug_request(http_req, req);

        let result = GreetingRequest::from_query(&req.query)
            .and_then(|greeting_req| {
                greeting::compute(&greeting_req, now).map(|r| (greeting_req.format, r))
            });

        match result {
            Ok((ResponseFormat::Text, r)) => Ok(make_http_200_text(r.full_message)),
            Ok((ResponseFormat::Json, r)) => Ok(make_http_200_json(Self::new(r))),
            Err(e) if e.is_validation() => {
                info!("Rejected greeting request: {}", e);
                Ok(make_http_400(e.to_string()))
            },
            Err(e) => Err(e),
        }
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use poem::http::StatusCode;
    use poem::test::TestClient;

    use crate::api::build_app;
    use crate::api::tests::json_body;
    use crate::engine::phrase_table::Language;
    use crate::engine::time_bucket::TimeBucket;
    use crate::engine::greeting::{GreetingQuery, GreetingRequest, compute};
    use super::RespGreeting;

    fn client() -> TestClient<impl poem::Endpoint> {
        TestClient::new(build_app("Greeting Server", "http://localhost:5000"))
    }

    #[test]
    fn response_fields_follow_the_result() {
        let query = GreetingQuery { name: Some("Ana".to_string()), timezone: None,
                                    format: None, language: Some("es".to_string()) };
        let req = GreetingRequest::from_query(&query).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).single().unwrap();
        let resp = RespGreeting::new(compute(&req, now).unwrap());
        assert_eq!(resp.greeting, "Buenas tardes");
        assert_eq!(resp.greeting_type, "afternoon");
        assert_eq!(resp.language, "es");
        assert_eq!(resp.timezone, "UTC");
        assert_eq!(resp.day, "Monday");
        assert_eq!(resp.date, "January 15, 2024");
        assert_eq!(resp.time, "14:30");
        assert_eq!(resp.timestamp, "2024-01-15T14:30:00.000000+00:00");
    }

    #[tokio::test]
    async fn json_greeting_with_defaults() {
        let resp = client().get("/greeting").send().await;
        resp.assert_status_is_ok();
        let body = json_body(resp).await;

        assert_eq!(body["name"], "World");
        assert_eq!(body["timezone"], "UTC");
        assert_eq!(body["language"], "en");

        // Whatever the hour, the phrase must match the reported bucket.
        let bucket = TimeBucket::ALL.into_iter()
            .find(|b| body["greeting_type"] == b.as_str())
            .expect("known bucket");
        assert_eq!(body["greeting"], Language::En.phrase(bucket));

        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with(&format!("{}, World! Today is ", Language::En.phrase(bucket))));
        assert!(message.ends_with(" in UTC."));
        for field in ["day", "date", "time", "timestamp"] {
            assert!(body[field].is_string(), "missing {}", field);
        }
    }

    #[tokio::test]
    async fn unknown_language_falls_back_to_english() {
        let resp = client().get("/greeting?language=zz&name=%20%20Bo%20").send().await;
        resp.assert_status_is_ok();
        let body = json_body(resp).await;
        assert_eq!(body["language"], "en");
        assert_eq!(body["name"], "Bo");
    }

    #[tokio::test]
    async fn text_format() {
        let resp = client().get("/greeting?name=Ana&format=TEXT&timezone=Europe/London").send().await;
        resp.assert_status_is_ok();
        resp.assert_content_type("text/plain; charset=utf-8");
        let text = resp.0.into_body().into_string().await.unwrap();
        assert!(text.contains(", Ana! Today is "));
        assert!(text.ends_with(" in Europe/London."));
    }

    #[tokio::test]
    async fn long_names_are_truncated() {
        let uri = format!("/greeting?name={}", "x".repeat(80));
        let body = json_body(client().get(uri).send().await).await;
        assert_eq!(body["name"].as_str().unwrap().chars().count(), 50);
    }

    #[tokio::test]
    async fn invalid_format_is_400() {
        let resp = client().get("/greeting?format=xml").send().await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body = json_body(resp).await;
        assert_eq!(body["error"], "Invalid format. Use \"json\" or \"text\"");
    }

    #[tokio::test]
    async fn invalid_timezone_is_400() {
        let resp = client().get("/greeting?timezone=Not/AZone").send().await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body = json_body(resp).await;
        let msg = body["error"].as_str().unwrap();
        assert!(msg.starts_with("Invalid timezone: Not/AZone."));
        assert_eq!(body.as_object().map(|o| o.len()), Some(1));
    }
}
