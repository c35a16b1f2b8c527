//! Surface Controller
//!
//! The top-level eframe application: wires pointer events to stroke
//! capture, completed strokes to region extraction and the recognition
//! worker, and settled outcomes to the overlay store. Also owns resize
//! reflow of the surface and the existing overlays.

use eframe::egui;
use egui::{
    Align2, Color32, CursorIcon, FontId, Pos2, Rect, Rounding, Sense, TextureHandle,
    TextureOptions, Vec2,
};
use image::Rgba;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::canvas::{extract_region, InkSurface, PaintSettings, Point, StrokeBounds, StrokePath};
use crate::config::{AppConfig, CanvasSettings};
use crate::overlay::{OverlayStore, TextOverlay};
use crate::recognition::{RecognitionJob, RecognitionWorker};

/// Stroke-capture lifecycle of the whiteboard
enum ControllerState {
    /// Waiting for a pointer-down over the canvas
    Idle,
    /// A stroke is active; samples accumulate in the path
    Stroking(StrokePath),
    /// A completed stroke is out for recognition; new strokes are deferred
    /// until the outcome settles
    Recognizing,
}

/// The whiteboard application
pub struct WhiteboardApp {
    config: AppConfig,
    state: ControllerState,
    surface: InkSurface,
    overlays: OverlayStore,
    worker: RecognitionWorker,
    ink_texture: Option<TextureHandle>,
    surface_dirty: bool,
}

impl WhiteboardApp {
    pub fn new(config: AppConfig, worker: RecognitionWorker) -> Self {
        let surface = InkSurface::new(
            config.window.width as u32,
            config.window.height as u32,
            paint_settings(&config.canvas),
        );

        Self {
            config,
            state: ControllerState::Idle,
            surface,
            overlays: OverlayStore::new(),
            worker,
            ink_texture: None,
            surface_dirty: true,
        }
    }

    pub fn options(config: &AppConfig) -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([config.window.width, config.window.height])
                .with_min_inner_size([320.0, 240.0])
                .with_title("Scribeboard"),
            ..Default::default()
        }
    }

    fn ink_color(&self) -> Color32 {
        let [r, g, b] = self.config.canvas.ink_color;
        Color32::from_rgb(r, g, b)
    }

    fn background_color(&self) -> Color32 {
        let [r, g, b] = self.config.canvas.background;
        Color32::from_rgb(r, g, b)
    }

    fn surface_size(&self) -> (f32, f32) {
        let (width, height) = self.surface.dimensions();
        (width as f32, height as f32)
    }

    /// Apply settled recognition outcomes from the worker.
    ///
    /// A non-empty result appends an overlay and clears the drawn ink; a
    /// failure or empty result is logged and leaves the ink in place. The
    /// controller returns to `Idle` either way.
    fn drain_outcomes(&mut self) {
        while let Some(outcome) = self.worker.try_recv() {
            match outcome.result {
                Ok(text) if !text.is_empty() => {
                    // The surface may have resized while the request was in
                    // flight; reflow the placement to the current size.
                    let bounds = outcome.bounds.rescaled(outcome.surface_size, self.surface_size());
                    self.overlays
                        .append(TextOverlay::from_recognition(text.clone(), bounds));
                    info!(text = %text, overlays = self.overlays.len(), "recognition succeeded");
                    self.surface.clear();
                    self.surface_dirty = true;
                }
                Ok(_) => debug!("recognition returned no discernible content"),
                Err(err) => warn!("recognition failed: {err}"),
            }
            if matches!(self.state, ControllerState::Recognizing) {
                self.state = ControllerState::Idle;
            }
        }
    }

    /// Keep the ink raster in sync with the canvas rect, reflowing overlays
    /// on any size change.
    fn sync_surface_size(&mut self, rect: Rect) {
        let new = (
            rect.width().round().max(1.0) as u32,
            rect.height().round().max(1.0) as u32,
        );
        let old = self.surface.dimensions();
        if new == old {
            return;
        }

        debug!(?old, ?new, "surface resized");
        self.surface.resize(new.0, new.1);
        self.overlays.rescale(
            (old.0 as f32, old.1 as f32),
            (new.0 as f32, new.1 as f32),
        );

        // An in-progress path is in stale coordinates; drop it
        if matches!(self.state, ControllerState::Stroking(_)) {
            self.state = ControllerState::Idle;
        }
        self.surface_dirty = true;
    }

    fn handle_pointer(&mut self, response: &egui::Response, rect: Rect) {
        let to_local = |pos: Pos2| Point::new(pos.x - rect.min.x, pos.y - rect.min.y);

        if response.drag_started() {
            // Pointer-down while Recognizing is ignored: single-flight
            if matches!(self.state, ControllerState::Idle) {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.state = ControllerState::Stroking(StrokePath::begin(to_local(pos)));
                }
            }
        } else if response.dragged() {
            if let ControllerState::Stroking(path) = &mut self.state {
                if let Some(pos) = response.interact_pointer_pos() {
                    let point = to_local(pos);
                    let prev = path.last().unwrap_or(point);
                    path.extend(point);
                    self.surface.paint_segment(prev, point);
                    self.surface_dirty = true;
                }
            }
        }

        // A stroke ends on pointer-up, or when the pointer leaves the canvas
        let pointer_left = matches!(self.state, ControllerState::Stroking(_))
            && response
                .ctx
                .input(|i| i.pointer.latest_pos())
                .map_or(true, |pos| !rect.contains(pos));

        if response.drag_stopped() || pointer_left {
            self.finish_stroke();
        }
    }

    /// Finalize the active stroke and hand it to the recognition worker
    fn finish_stroke(&mut self) {
        let ControllerState::Stroking(path) =
            std::mem::replace(&mut self.state, ControllerState::Idle)
        else {
            return;
        };

        if path.is_empty() {
            return;
        }
        let points = path.end();
        let Some(bounds) = StrokeBounds::around(&points) else {
            return;
        };

        let surface_size = self.surface_size();
        match extract_region(&self.surface, &bounds) {
            Ok(png) => {
                debug!(?bounds, bytes = png.len(), "submitting stroke for recognition");
                self.worker.submit(RecognitionJob {
                    png,
                    bounds,
                    surface_size,
                });
                self.state = ControllerState::Recognizing;
            }
            Err(err) => warn!("failed to rasterize stroke region: {err}"),
        }
    }

    /// Upload the ink raster as an egui texture when it changed
    fn update_ink_texture(&mut self, ctx: &egui::Context) {
        if !self.surface_dirty && self.ink_texture.is_some() {
            return;
        }

        let (width, height) = self.surface.dimensions();
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [width as usize, height as usize],
            self.surface.image().as_raw(),
        );
        match &mut self.ink_texture {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => {
                self.ink_texture = Some(ctx.load_texture("ink-surface", image, TextureOptions::LINEAR))
            }
        }
        self.surface_dirty = false;
    }

    fn paint_busy_indicator(&self, painter: &egui::Painter, rect: Rect) {
        let badge = Rect::from_min_size(
            Pos2::new(rect.max.x - 132.0, rect.min.y + 12.0),
            Vec2::new(120.0, 28.0),
        );
        painter.rect_filled(badge, Rounding::same(6.0), Color32::from_rgb(59, 130, 246));
        painter.text(
            badge.center(),
            Align2::CENTER_CENTER,
            "Processing...",
            FontId::proportional(14.0),
            Color32::WHITE,
        );
    }
}

impl eframe::App for WhiteboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(self.background_color()))
            .show(ctx, |ui| {
                let rect = ui.available_rect_before_wrap();
                if rect.width() < 1.0 || rect.height() < 1.0 {
                    return;
                }

                self.sync_surface_size(rect);
                self.drain_outcomes();

                let response = ui
                    .allocate_rect(rect, Sense::drag())
                    .on_hover_cursor(CursorIcon::Crosshair);
                self.handle_pointer(&response, rect);
                self.update_ink_texture(ui.ctx());

                let painter = ui.painter_at(rect);
                if let Some(texture) = &self.ink_texture {
                    painter.image(
                        texture.id(),
                        rect,
                        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }
                if !self.overlays.is_empty() {
                    self.overlays.paint(&painter, rect.min, self.ink_color());
                }

                if matches!(self.state, ControllerState::Recognizing) {
                    self.paint_busy_indicator(&painter, rect);
                    // Keep polling the worker while a job is outstanding
                    ctx.request_repaint_after(Duration::from_millis(100));
                }
            });
    }
}

fn paint_settings(canvas: &CanvasSettings) -> PaintSettings {
    let [ir, ig, ib] = canvas.ink_color;
    let [br, bg, bb] = canvas.background;
    PaintSettings {
        stroke_width: canvas.stroke_width,
        ink: Rgba([ir, ig, ib, 255]),
        background: Rgba([br, bg, bb, 255]),
    }
}

/// Run the whiteboard window (blocking)
pub fn run_whiteboard(config: AppConfig, worker: RecognitionWorker) -> Result<(), eframe::Error> {
    let options = WhiteboardApp::options(&config);
    let app = WhiteboardApp::new(config, worker);
    eframe::run_native("Scribeboard", options, Box::new(|_cc| Ok(Box::new(app))))
}
