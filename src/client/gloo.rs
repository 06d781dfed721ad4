//! WASM HTTP client implementation using gloo_net
//!
//! This module provides HTTP functionality for WASM environments
//! using the gloo_net crate for making HTTP requests via the browser's fetch API.

use crate::config::ApiConfig;
use crate::error::Result;
use gloo_net::http::{Request, RequestBuilder};
use serde_json::Value;
use web_sys::{RequestCredentials, RequestMode};

use super::{join_url, parse_json_body};
use crate::interface::{CollegeApi, HttpClient};
use crate::model::dtos::{CascadeParams, Endpoint};

/// HTTP client for WASM environments using gloo_net
#[derive(Debug, Clone)]
pub struct WasmClient {
    base_url: String,
}

impl HttpClient for WasmClient {
    async fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.base_url.clone(),
        })
    }
}

impl WasmClient {
    /// Build a request with common headers and settings
    fn build_request(url: &str) -> RequestBuilder {
        // Session cookies authenticate the lookup routes
        Request::get(url)
            .mode(RequestMode::Cors)
            .credentials(RequestCredentials::SameOrigin)
            .header("Accept", "application/json")
    }

    /// Handle JSON response with error checking
    async fn handle_json_response(resp: gloo_net::http::Response) -> Result<Value> {
        let status = resp.status();
        let ok = resp.ok();
        let text = resp.text().await?;

        log::debug!("{} -> {} ({} bytes)", resp.url(), status, text.len());

        parse_json_body(status, ok, &text)
    }

    async fn get_json(&self, endpoint: Endpoint<'_>) -> Result<Value> {
        let url = join_url(&self.base_url, &endpoint.path()?);
        log::debug!("GET {url}");

        let resp = Self::build_request(&url).send().await?;
        Self::handle_json_response(resp).await
    }
}

impl CollegeApi for WasmClient {
    async fn get_college_years(&self, college_id: &str) -> Result<Value> {
        self.get_json(Endpoint::CollegeYears { college_id }).await
    }

    async fn get_college_structure(&self, college_id: &str) -> Result<Value> {
        self.get_json(Endpoint::CollegeStructure { college_id })
            .await
    }

    async fn get_terms(&self, params: CascadeParams) -> Result<Value> {
        self.get_json(Endpoint::Terms {
            college_id: &params.college_id,
            year: &params.year,
        })
        .await
    }

    async fn get_modules(&self, params: CascadeParams) -> Result<Value> {
        self.get_json(Endpoint::Modules {
            college_id: &params.college_id,
            year: &params.year,
        })
        .await
    }
}
