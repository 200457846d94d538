// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Photo display area.
//!
//! Fits the current photo texture into the available space, applies the
//! fade-in tint on photo change, and falls back to the alt text when the
//! image could not be loaded.

/// Display the central photo area.
///
/// `fade` is the fade-in opacity in `0.0..=1.0`; `done` replaces the
/// photo with the terminal message.
pub fn show(
    ui: &mut egui::Ui,
    texture: &Option<egui::TextureHandle>,
    alt_text: Option<&str>,
    done: bool,
    fade: f32,
) {
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);
    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        if done {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new("All photos done ✅")
                        .size(24.0)
                        .color(egui::Color32::WHITE),
                );
            });
            return;
        }

        if let Some(texture) = texture {
            let size = texture.size_vec2();
            let available = ui.available_size();
            let img_aspect = size.x / size.y;
            let available_aspect = available.x / available.y;

            let (display_width, display_height) = if img_aspect > available_aspect {
                // Image is wider - fit to width
                let width = available.x;
                (width, width / img_aspect)
            } else {
                // Image is taller - fit to height
                let height = available.y;
                (height * img_aspect, height)
            };

            // Center the image
            let x_offset = (available.x - display_width) / 2.0;
            let y_offset = (available.y - display_height) / 2.0;
            let image_rect = egui::Rect::from_min_size(
                ui.min_rect().min + egui::vec2(x_offset, y_offset),
                egui::vec2(display_width, display_height),
            );

            ui.painter().image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE.gamma_multiply(fade.clamp(0.0, 1.0)),
            );
        } else if let Some(alt) = alt_text {
            // The accessible stand-in for a broken image.
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new(alt).color(egui::Color32::LIGHT_RED),
                );
            });
        } else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new("Loading photo...")
                        .color(egui::Color32::WHITE),
                );
            });
        }
    });
}
