#![allow(async_fn_in_trait)] // 允许在内部 trait 中使用 async fn

use crate::config::ApiConfig;
use crate::error::Result;
use crate::model::dtos::CascadeParams;
use serde_json::Value;

/// Common trait for HTTP client functionality
pub trait HttpClient {
    /// Create a new HTTP client instance
    async fn new(config: &ApiConfig) -> Result<Self>
    where
        Self: Sized;
}

/// Common interface for the college lookup endpoints
pub trait CollegeApi {
    /// List the years configured for a college
    async fn get_college_years(&self, college_id: &str) -> Result<Value>;

    /// Get the structure descriptor (`term` or `module`) of a college
    async fn get_college_structure(&self, college_id: &str) -> Result<Value>;

    /// List the terms of a college year
    async fn get_terms(&self, params: CascadeParams) -> Result<Value>;

    /// List the modules of a college year
    async fn get_modules(&self, params: CascadeParams) -> Result<Value>;
}

impl<T: CollegeApi> CollegeApi for &T {
    async fn get_college_years(&self, college_id: &str) -> Result<Value> {
        (**self).get_college_years(college_id).await
    }

    async fn get_college_structure(&self, college_id: &str) -> Result<Value> {
        (**self).get_college_structure(college_id).await
    }

    async fn get_terms(&self, params: CascadeParams) -> Result<Value> {
        (**self).get_terms(params).await
    }

    async fn get_modules(&self, params: CascadeParams) -> Result<Value> {
        (**self).get_modules(params).await
    }
}
