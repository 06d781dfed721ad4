pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod interface;
pub mod model;
pub mod state;

#[cfg(feature = "wasm")]
pub mod dom;

#[cfg(feature = "no-wasm")]
pub use client::request::NoWasmClient;
#[cfg(feature = "no-wasm")]
pub use tokio;
