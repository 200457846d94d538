// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application shell and egui App implementation.
//!
//! This module wires raw UI events to controller intents, runs backend
//! requests on worker threads, and feeds completions back into the
//! controller. All triage semantics live in [`crate::controller`]; this
//! layer only translates and paints.

use crate::api::HttpBackend;
use crate::controller::{self, Controller, Intent, Phase, Request, Response};
use crate::ui::{categories, toolbar, viewer};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Duration of the fade-in after a photo change.
const FADE_IN: Duration = Duration::from_millis(200);

/// Main application state.
pub struct TriageApp {
    controller: Controller,
    backend: Arc<HttpBackend>,

    /// Completions from worker threads.
    responses: Receiver<Response>,
    response_tx: Sender<Response>,

    /// Texture for the current photo, re-uploaded when the controller's
    /// image revision moves.
    texture: Option<egui::TextureHandle>,
    texture_revision: u64,

    /// Contents of the jump input box.
    jump_text: String,
}

impl TriageApp {
    /// Create the application and kick off the initial count fetch.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        backend: HttpBackend,
        deep_link: Option<usize>,
    ) -> Self {
        let (response_tx, responses) = channel();
        let mut app = Self {
            controller: Controller::new(deep_link),
            backend: Arc::new(backend),
            responses,
            response_tx,
            texture: None,
            texture_revision: 0,
            jump_text: String::new(),
        };

        let first = app.controller.start();
        app.submit(first, &cc.egui_ctx);
        app
    }

    /// Run one request on a worker thread; the completion comes back over
    /// the channel and triggers a repaint.
    fn submit(&self, request: Request, ctx: &egui::Context) {
        let backend = Arc::clone(&self.backend);
        let tx = self.response_tx.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let outcome = controller::execute(backend.as_ref(), &request.op);
            let _ = tx.send(Response {
                generation: request.generation,
                outcome,
            });
            ctx.request_repaint();
        });
    }

    /// Hand an intent to the controller and run whatever it asks for.
    fn intend(&mut self, intent: Intent, ctx: &egui::Context) {
        if let Some(request) = self.controller.dispatch(intent, Instant::now()) {
            self.submit(request, ctx);
        }
    }

    /// Dispatch table from keyboard input to controller intents.
    fn keyboard_intent(ctx: &egui::Context) -> Option<Intent> {
        // A focused text field (the jump box) owns the keyboard.
        if ctx.wants_keyboard_input() {
            return None;
        }
        ctx.input(|i| {
            if i.key_pressed(egui::Key::ArrowRight) {
                Some(Intent::NextPhoto)
            } else if i.key_pressed(egui::Key::ArrowLeft) {
                Some(Intent::PrevPhoto)
            } else if i.key_pressed(egui::Key::Space) {
                Some(Intent::SelectCurrent)
            } else {
                None
            }
        })
    }

    /// Fade-in opacity for the current photo.
    fn fade(&self, now: Instant) -> f32 {
        match self.controller.loaded_at() {
            Some(loaded) => {
                let elapsed = now.saturating_duration_since(loaded);
                (elapsed.as_secs_f32() / FADE_IN.as_secs_f32()).clamp(0.0, 1.0)
            }
            None => 1.0,
        }
    }

    /// Re-upload the photo texture if the controller has a newer image.
    fn sync_texture(&mut self, ctx: &egui::Context) {
        if self.texture_revision == self.controller.image_revision() {
            return;
        }
        self.texture = self.controller.image().map(|img| {
            let size = [img.width as usize, img.height as usize];
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &img.pixels);
            ctx.load_texture("photo", color_image, egui::TextureOptions::LINEAR)
        });
        self.texture_revision = self.controller.image_revision();
    }
}

impl eframe::App for TriageApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Apply completed backend work; follow-up loads go straight back
        // to a worker.
        while let Ok(response) = self.responses.try_recv() {
            if let Some(follow_up) = self.controller.apply(response, Instant::now()) {
                self.submit(follow_up, ctx);
            }
        }

        self.sync_texture(ctx);

        if let Some(intent) = Self::keyboard_intent(ctx) {
            self.intend(intent, ctx);
        }

        let jump_error = self.controller.jump_flash_active(now);

        // Toolbar: status line, jump input, delete button.
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    self.controller.status(),
                    self.controller.delete_visible(),
                    &mut self.jump_text,
                    jump_error,
                )
            })
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::Jump => {
                let raw = self.jump_text.clone();
                self.intend(Intent::Jump(raw), ctx);
            }
            toolbar::ToolbarAction::DeleteSelected => {
                self.intend(Intent::UnselectCurrent, ctx);
            }
            toolbar::ToolbarAction::None => {}
        }

        // Category panel (right side).
        let viewing = self.controller.phase() == Phase::Viewing;
        let category_action = egui::SidePanel::right("categories")
            .default_width(230.0)
            .show(ctx, |ui| {
                categories::show(
                    ui,
                    self.controller.memberships(),
                    self.controller.counts(),
                    viewing,
                )
            })
            .inner;

        match category_action {
            categories::CategoryAction::Copy(category) => {
                self.intend(Intent::CopyToCategory(category), ctx);
            }
            categories::CategoryAction::Remove(category) => {
                self.intend(Intent::RemoveFromCategory(category), ctx);
            }
            categories::CategoryAction::None => {}
        }

        // Photo display (center).
        let done = matches!(self.controller.phase(), Phase::NoPhotos | Phase::AllDone);
        let fade = self.fade(now);
        egui::CentralPanel::default().show(ctx, |ui| {
            viewer::show(ui, &self.texture, self.controller.image_alt(), done, fade);
        });

        // Keep painting while the fade runs or the error flash is live.
        if fade < 1.0 || jump_error {
            ctx.request_repaint_after(Duration::from_millis(30));
        }
    }
}
