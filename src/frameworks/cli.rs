use clap::Parser;
use reqwest::Method;
use serde_json::Value;

/// One API call requested on the command line.
#[derive(Debug, PartialEq, Parser)]
#[command(name = "tour_frontend")]
#[command(about = "Issue one call against the tour API", long_about = None)]
pub struct CliRequest {
    /// HTTP method: GET, POST, PUT, PATCH or DELETE (any case)
    #[arg(value_parser = parse_method)]
    pub method: Method,

    /// Path below API_BASE_URL, e.g. /excursions
    pub path: String,

    /// Request body as JSON
    #[arg(value_parser = parse_body)]
    pub body: Option<Value>,
}

fn parse_method(raw: &str) -> Result<Method, String> {
    match raw.to_ascii_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "PATCH" => Ok(Method::PATCH),
        "DELETE" => Ok(Method::DELETE),
        _ => Err(format!("unsupported method {raw:?}")),
    }
}

fn parse_body(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|err| format!("body is not valid json: {err}"))
}
