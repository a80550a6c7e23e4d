//! Response envelope shared by every API endpoint

use serde::{Deserialize, Serialize};

use super::error::ApiError;

/// The `{ isSuccess, message, result }` wrapper around every response body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub is_success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(result: T) -> Self {
        Self {
            is_success: true,
            message: None,
            result: Some(result),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            message: Some(message.into()),
            result: None,
        }
    }

    /// Unwrap the payload, turning `isSuccess: false` into a business error
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.is_success {
            return Err(ApiError::Business {
                message: self.message,
            });
        }
        self.result.ok_or(ApiError::MissingResult)
    }

    /// Check success without requiring a payload (used by delete/logout)
    pub fn into_ack(self) -> Result<Option<String>, ApiError> {
        if self.is_success {
            Ok(self.message)
        } else {
            Err(ApiError::Business {
                message: self.message,
            })
        }
    }
}

/// One page of a list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    pub current_page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
    #[serde(default)]
    pub has_previous_page: bool,
    #[serde(default)]
    pub has_next_page: bool,
}

/// Pagination metadata of a page, without the rows
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> Page<T> {
    pub fn meta(&self) -> PageMeta {
        PageMeta {
            current_page: self.current_page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
        }
    }

    /// Split into rows and metadata
    pub fn into_parts(self) -> (Vec<T>, PageMeta) {
        let meta = self.meta();
        (self.data, meta)
    }

    /// Keep only rows matching `keep`, leaving the server's counts alone
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.data.retain(keep);
    }
}
