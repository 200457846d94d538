// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Category data structures.
//!
//! This module defines the fixed set of wedding-event categories a photo
//! can be copied into, plus the per-photo membership cache and the
//! aggregate per-category counts reported by the backend.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One of the fixed wedding-event categories.
///
/// The set is closed: every backend endpoint that takes a category takes
/// one of these eight values, addressed by its lowercase slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Haldi,
    Mehendi,
    Tilak,
    Jaimala,
    Shaadi,
    Vidai,
    Barat,
    Matkor,
}

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 8;

    /// All categories, in display order.
    pub const ALL: [Category; Category::COUNT] = [
        Category::Haldi,
        Category::Mehendi,
        Category::Tilak,
        Category::Jaimala,
        Category::Shaadi,
        Category::Vidai,
        Category::Barat,
        Category::Matkor,
    ];

    /// URL path segment used by the backend for this category.
    pub fn slug(self) -> &'static str {
        match self {
            Category::Haldi => "haldi",
            Category::Mehendi => "mehendi",
            Category::Tilak => "tilak",
            Category::Jaimala => "jaimala",
            Category::Shaadi => "shaadi",
            Category::Vidai => "vidai",
            Category::Barat => "barat",
            Category::Matkor => "matkor",
        }
    }

    /// Human-readable label for buttons and the counts summary.
    pub fn label(self) -> &'static str {
        match self {
            Category::Haldi => "Haldi",
            Category::Mehendi => "Mehendi",
            Category::Tilak => "Tilak",
            Category::Jaimala => "Jaimala",
            Category::Shaadi => "Shaadi",
            Category::Vidai => "Vidai",
            Category::Barat => "Barat",
            Category::Matkor => "Matkor",
        }
    }

    /// Stable position of this category in [`Category::ALL`].
    fn index(self) -> usize {
        self as usize
    }
}

/// Per-photo category membership flags.
///
/// Rebuilt wholesale on every photo load; never patched incrementally, so
/// a stale flag cannot survive a navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Memberships([bool; Category::COUNT]);

impl Memberships {
    /// Whether the current photo is in the given category.
    pub fn contains(&self, category: Category) -> bool {
        self.0[category.index()]
    }

    /// Set the membership flag for one category.
    pub fn set(&mut self, category: Category, member: bool) {
        self.0[category.index()] = member;
    }
}

/// Aggregate photo counts per category, as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryCounts(HashMap<Category, u32>);

impl CategoryCounts {
    /// Count for one category; categories the backend omitted count as zero.
    pub fn get(&self, category: Category) -> u32 {
        self.0.get(&category).copied().unwrap_or(0)
    }

    /// Total photos across all categories.
    pub fn total(&self) -> u32 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

impl From<HashMap<Category, u32>> for CategoryCounts {
    fn from(map: HashMap<Category, u32>) -> Self {
        Self(map)
    }
}
