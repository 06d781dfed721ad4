//! No-WASM HTTP client implementation using reqwest
//!
//! This module provides HTTP functionality for non-WASM environments
//! using the reqwest crate for making HTTP requests.

use crate::config::ApiConfig;
use crate::error::{ErrorKind, Result};
use reqwest::{header::ACCEPT, Client};
use serde_json::Value;

use super::{join_url, parse_json_body};
use crate::interface::{CollegeApi, HttpClient};
use crate::model::dtos::{CascadeParams, Endpoint};

/// HTTP client for no-WASM environments using reqwest
#[derive(Debug, Clone)]
pub struct NoWasmClient {
    client: Client,
    base_url: String,
}

impl HttpClient for NoWasmClient {
    async fn new(config: &ApiConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(ErrorKind::ConfigError(
                "a base URL is required outside the browser".to_string(),
            )
            .into());
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

impl NoWasmClient {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, endpoint: Endpoint<'_>) -> Result<Value> {
        let url = join_url(&self.base_url, &endpoint.path()?);
        log::debug!("GET {url}");

        let resp = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        log::debug!("GET {url} -> {} ({} bytes)", status.as_u16(), text.len());

        parse_json_body(status.as_u16(), status.is_success(), &text)
    }
}

impl CollegeApi for NoWasmClient {
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
