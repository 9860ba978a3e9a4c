#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use poem_openapi::{ OpenApi, payload::Json, Object };

use crate::engine::phrase_table::{Language, DEFAULT_LANGUAGE};

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct LanguagesApi;

#[derive(Object, Debug)]
pub struct RespLanguages
{
    supported_languages: BTreeMap<String, String>,
    default: String,
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl LanguagesApi {
    /// List the greeting languages by code.
    #[oai(path = "/languages", method = "get")]
    async fn list_languages_api(&self) -> Json<RespLanguages> {
        Json(RespLanguages::process())
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl RespLanguages {
    fn process() -> Self {
        let supported_languages = Language::ALL.iter()
            .map(|l| (l.code().to_string(), l.display_name().to_string()))
            .collect();
        Self { supported_languages, default: DEFAULT_LANGUAGE.code().to_string() }
    }
}
