//! Request module - handles HTTP requests for both WASM and no-WASM environments
//!
//! This module provides a unified interface for making HTTP requests while
//! supporting different implementations for WASM (gloo_net) and no-WASM (reqwest) environments.

use crate::error::{ErrorKind, Result};
use serde_json::Value;

#[cfg(feature = "no-wasm")]
pub mod request;

#[cfg(feature = "wasm")]
pub mod gloo;

/// Shared body handling: non-2xx, non-JSON and `{"error": ...}` bodies are failures.
pub(crate) fn parse_json_body(status: u16, ok: bool, text: &str) -> Result<Value> {
    if !ok {
        // The API reports missing rows as 404 with an error object; surface its message.
        if let Ok(json) = serde_json::from_str::<Value>(text) {
            if let Some(error) = json.get("error") {
                return Err(ErrorKind::ServerError(error_message(error)).into());
            }
        }
        return Err(ErrorKind::HttpStatus(status, text.to_string()).into());
    }

    let json = serde_json::from_str::<Value>(text)?;
    if let Some(error) = json.get("error") {
        return Err(ErrorKind::ServerError(error_message(error)).into());
    }
    Ok(json)
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

fn error_message(error: &Value) -> String {
    match error.as_str() {
        Some(message) => message.to_string(),
        None => error.to_string(),
    }
}
