// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Status line, jump-to-photo input, and the delete button.
//!
//! Pure projection: reads controller state, reports what the user asked
//! for, and never touches the backend itself.

/// Result of toolbar interaction.
pub enum ToolbarAction {
    None,
    /// Submit the jump input (button click or Enter).
    Jump,
    /// Remove the current photo from the selected bucket.
    DeleteSelected,
}

/// Display the toolbar row.
///
/// `jump_error` draws the transient red flash around the jump input after
/// rejected input.
pub fn show(
    ui: &mut egui::Ui,
    status: &str,
    delete_visible: bool,
    jump_text: &mut String,
    jump_error: bool,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label(egui::RichText::new(status).strong());

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if delete_visible && ui.button("🗑 Remove from selected").clicked() {
                action = ToolbarAction::DeleteSelected;
            }

            if ui.button("Go").clicked() {
                action = ToolbarAction::Jump;
            }

            let response = ui.add(
                egui::TextEdit::singleline(jump_text)
                    .desired_width(64.0)
                    .hint_text("photo #"),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                action = ToolbarAction::Jump;
            }
            if jump_error {
                ui.painter().rect_stroke(
                    response.rect.expand(1.0),
                    2.0,
                    egui::Stroke::new(1.5, egui::Color32::RED),
                );
            }

            ui.label("Jump to:");
        });
    });

    action
}
