#![forbid(unsafe_code)]

use poem_openapi::{ OpenApi, payload::Json, Object };

use crate::api::SERVER_VERSION;

// From cargo.toml.
const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct VersionApi;

#[derive(Object, Debug)]
pub struct RespVersion
{
    result_code: String,
    result_msg: String,
    server_version: String,
    package_name: String,
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl VersionApi {
    /// Report the running server's version.
    #[oai(path = "/version", method = "get")]
    async fn get_version(&self) -> Json<RespVersion> {
        Json(RespVersion::new("0", "success", SERVER_VERSION, PACKAGE_NAME))
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl RespVersion {
    fn new(result_code: &str, result_msg: &str, version: &str, package: &str) -> Self {
        Self {result_code: result_code.to_string(),
              result_msg: result_msg.to_string(),
              server_version: version.to_string(),
              package_name: package.to_string(),
        }
    }
}
