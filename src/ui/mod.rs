// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the photo-triage application.

pub mod categories;
pub mod toolbar;
pub mod viewer;
