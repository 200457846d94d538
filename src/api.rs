// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Backend REST client.
//!
//! This module maps each controller intent to one HTTP call against the
//! photo-triage server. It carries no business logic: every mutating call
//! reports success or failure only, and the controller decides what that
//! means for navigation state.

use crate::models::category::{Category, CategoryCounts};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single backend call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never completed (connection refused, DNS, timeout).
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status; `message` is the
    /// response body text.
    #[error("{message} (HTTP {status})")]
    Backend { status: u16, message: String },
}

/// One method per backend endpoint.
///
/// The controller and its tests talk to this trait; the real server is
/// behind [`HttpBackend`].
pub trait PhotoBackend {
    /// `GET /api/count`
    fn total_photos(&self) -> Result<usize, ApiError>;

    /// `GET /api/selectedCount`
    fn selected_count(&self) -> Result<usize, ApiError>;

    /// `GET /api/isSelected/{idx}`
    fn is_selected(&self, index: usize) -> Result<bool, ApiError>;

    /// URL the image for `index` is served from. Used for error reporting;
    /// the bytes themselves come from [`PhotoBackend::fetch_image`].
    fn image_url(&self, index: usize) -> String;

    /// `GET /api/image/{idx}` — raw image bytes.
    fn fetch_image(&self, index: usize) -> Result<Vec<u8>, ApiError>;

    /// `POST /api/select/{idx}` — copy into the selected bucket.
    fn select(&self, index: usize) -> Result<(), ApiError>;

    /// `DELETE /api/selected/{idx}` — remove from the selected bucket.
    fn unselect(&self, index: usize) -> Result<(), ApiError>;

    /// `POST /api/copyTo/{category}/{idx}`
    fn copy_to(&self, category: Category, index: usize) -> Result<(), ApiError>;

    /// `DELETE /api/deleteFrom/{category}/{idx}`
    fn remove_from(&self, category: Category, index: usize) -> Result<(), ApiError>;

    /// `GET /api/categoryCounts`
    fn category_counts(&self) -> Result<CategoryCounts, ApiError>;

    /// `GET /api/isInCategory/{category}/{idx}`
    fn is_in_category(&self, category: Category, index: usize) -> Result<bool, ApiError>;
}

/// Blocking HTTP implementation of [`PhotoBackend`].
pub struct HttpBackend {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    /// Create a client for the server at `base_url` (no trailing slash).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-2xx response into `ApiError::Backend` with the body text.
    fn check(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let mut message = response.text().unwrap_or_default();
        if message.is_empty() {
            message = status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string();
        }
        Err(ApiError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.url(path)).send()?;
        Ok(Self::check(response)?.json()?)
    }

    fn post(&self, path: &str) -> Result<(), ApiError> {
        let response = self.client.post(self.url(path)).send()?;
        Self::check(response)?;
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.client.delete(self.url(path)).send()?;
        Self::check(response)?;
        Ok(())
    }
}

impl PhotoBackend for HttpBackend {
    fn total_photos(&self) -> Result<usize, ApiError> {
        self.get_json("/api/count")
    }

    fn selected_count(&self) -> Result<usize, ApiError> {
        self.get_json("/api/selectedCount")
    }

    fn is_selected(&self, index: usize) -> Result<bool, ApiError> {
        self.get_json(&format!("/api/isSelected/{}", index))
    }

    fn image_url(&self, index: usize) -> String {
        self.url(&format!("/api/image/{}", index))
    }

    fn fetch_image(&self, index: usize) -> Result<Vec<u8>, ApiError> {
        let response = self.client.get(self.image_url(index)).send()?;
        let bytes = Self::check(response)?.bytes()?;
        Ok(bytes.to_vec())
    }

    fn select(&self, index: usize) -> Result<(), ApiError> {
        self.post(&format!("/api/select/{}", index))
    }

    fn unselect(&self, index: usize) -> Result<(), ApiError> {
        self.delete(&format!("/api/selected/{}", index))
    }

    fn copy_to(&self, category: Category, index: usize) -> Result<(), ApiError> {
        self.post(&format!("/api/copyTo/{}/{}", category.slug(), index))
    }

    fn remove_from(&self, category: Category, index: usize) -> Result<(), ApiError> {
        self.delete(&format!("/api/deleteFrom/{}/{}", category.slug(), index))
    }

    fn category_counts(&self) -> Result<CategoryCounts, ApiError> {
        self.get_json("/api/categoryCounts")
    }

    fn is_in_category(&self, category: Category, index: usize) -> Result<bool, ApiError> {
        self.get_json(&format!(
            "/api/isInCategory/{}/{}",
            category.slug(),
            index
        ))
    }
}
