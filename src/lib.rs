//! Tutorly client library
//!
//! A typed client for the Tutorly learning-management REST API: generic
//! resource clients for every entity, headless list and form controllers
//! driven by URL query state, sign-in with locally stored tokens, and local
//! quiz and spaced-repetition review flows.

pub mod api;
pub mod auth;
pub mod config;
pub mod form;
pub mod list;
pub mod models;
pub mod notice;
pub mod params;
pub mod quiz_run;
pub mod review;
pub mod storage;

pub use api::{ApiClient, ApiError};
pub use config::Config;
