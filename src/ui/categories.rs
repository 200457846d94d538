// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Category panel: one toggle button per category plus the counts summary.
//!
//! Each button is a two-state toggle derived from the membership cache of
//! the current photo: not a member yet means "copy into", member means
//! "remove from". The cache is rebuilt on every photo load, so the labels
//! are never stale.

use crate::models::category::{Category, CategoryCounts, Memberships};

/// Result of category panel interaction.
pub enum CategoryAction {
    None,
    /// Copy the current photo into a category.
    Copy(Category),
    /// Remove the current photo from a category.
    Remove(Category),
}

/// Display the category buttons and the per-category counts.
///
/// `enabled` is false outside the viewing phase (and while a request is
/// in flight would be handled by the controller anyway).
pub fn show(
    ui: &mut egui::Ui,
    memberships: &Memberships,
    counts: &CategoryCounts,
    enabled: bool,
) -> CategoryAction {
    let mut action = CategoryAction::None;

    ui.heading("Categories");
    ui.separator();

    for category in Category::ALL {
        let member = memberships.contains(category);
        let label = if member {
            format!("➖ Remove from {}", category.label())
        } else {
            format!("➕ Copy to {}", category.label())
        };

        let button = egui::Button::new(label).min_size(egui::vec2(ui.available_width(), 0.0));
        if ui.add_enabled(enabled, button).clicked() {
            action = if member {
                CategoryAction::Remove(category)
            } else {
                CategoryAction::Copy(category)
            };
        }
    }

    ui.separator();
    ui.label(egui::RichText::new("Photos per category").italics().weak());
    for category in Category::ALL {
        ui.horizontal(|ui| {
            ui.label(category.label());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(counts.get(category).to_string());
            });
        });
    }
    ui.separator();
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Total").strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(egui::RichText::new(counts.total().to_string()).strong());
        });
    });

    action
}
