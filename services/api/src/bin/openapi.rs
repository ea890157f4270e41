//! services/api/src/bin/openapi.rs
//!
//! Dumps the email assistant's OpenAPI document, for client generation.
//!
//! Usage: `openapi [PATH]` (defaults to `openapi.json`).

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    let document = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(&path, document)?;
    println!("Wrote OpenAPI document for {} to {}", env!("CARGO_PKG_NAME"), path);
    Ok(())
}
