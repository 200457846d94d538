// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Photo Triage - desktop client for sorting a photo collection.
//!
//! Presents photos from the triage backend one at a time and lets the
//! user copy each into the selected bucket (Space) or a wedding-event
//! category, navigate with the arrow keys, jump to a photo by number,
//! and undo a classification.

mod api;
mod app;
mod controller;
mod models;
mod ui;

use anyhow::Result;
use app::TriageApp;
use clap::Parser;

/// Command line options.
#[derive(Parser)]
#[command(name = "photo-triage")]
#[command(about = "Triage photos into the selected bucket and wedding-event categories")]
struct Args {
    /// Base URL of the photo-triage backend
    #[arg(long, default_value = "http://localhost:8080")]
    server: String,

    /// 1-based photo number to open first (deep link)
    #[arg(long)]
    photo: Option<usize>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    let backend = api::HttpBackend::new(&args.server)?;
    let deep_link = args.photo;

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Photo Triage"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Photo Triage",
        options,
        Box::new(move |cc| Ok(Box::new(TriageApp::new(cc, backend, deep_link)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
