#![forbid(unsafe_code)]

use poem_openapi::{ OpenApi, payload::Json, Object };

// ***************************************************************************
//                                Constants
// ***************************************************************************
/// Commonly requested zones.  Any name in the IANA database is accepted.
pub const COMMON_TIMEZONES: [&str; 24] = [
    "UTC",
    "US/Eastern", "US/Central", "US/Mountain", "US/Pacific",
    "Europe/London", "Europe/Paris", "Europe/Berlin", "Europe/Rome",
    "Asia/Tokyo", "Asia/Shanghai", "Asia/Kolkata", "Asia/Dubai",
    "Australia/Sydney", "Australia/Melbourne",
    "America/New_York", "America/Chicago", "America/Denver", "America/Los_Angeles",
    "America/Toronto", "America/Vancouver",
    "Asia/Singapore", "Asia/Bangkok", "Asia/Jakarta",
];

const TIMEZONES_NOTE: &str =
    "This is a subset of available timezones. You can use any valid IANA timezone name.";

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct TimezonesApi;

#[derive(Object, Debug)]
pub struct RespTimezones
{
    timezones: Vec<String>,
    note: String,
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl TimezonesApi {
    /// List commonly used timezones.
    #[oai(path = "/timezones", method = "get")]
    async fn list_timezones_api(&self) -> Json<RespTimezones> {
        Json(RespTimezones::process())
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl RespTimezones {
    fn process() -> Self {
        Self {
            timezones: COMMON_TIMEZONES.iter().map(|tz| tz.to_string()).collect(),
            note: TIMEZONES_NOTE.to_string(),
        }
    }
}
