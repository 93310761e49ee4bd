//! Debug panel window

use crossbeam_channel::Receiver;
use egui::RichText;
use tracing::{info, warn};

use crate::bridge::Transport;
use crate::config::WindowSettings;
use crate::panel::input::{escape_gesture, suppress_escape};
use crate::panel::state::FORM_TITLE;
use crate::panel::{Gesture, GestureEvent, PanelController, PanelPhase};
use crate::protocol::InboundEvent;
use crate::window::theme::{self, color_with_alpha, ThemeColors, ThemeSettings};

/// The panel window: drains host events, renders the form, forwards gestures
pub struct DebugPanelApp<T: Transport> {
    controller: PanelController<T>,
    inbound: Receiver<InboundEvent>,
    theme_applied: bool,
}

impl<T: Transport> DebugPanelApp<T> {
    pub fn new(controller: PanelController<T>, inbound: Receiver<InboundEvent>) -> Self {
        Self {
            controller,
            inbound,
            theme_applied: false,
        }
    }

    /// Create eframe options for the panel window
    pub fn options(settings: &WindowSettings) -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([settings.width, settings.height])
                .with_min_inner_size([360.0, 160.0])
                .with_title(settings.title.clone()),
            ..Default::default()
        }
    }

    /// Process queued host events in delivery order
    fn process_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.inbound.try_recv() {
            self.controller.handle_event(event);
        }

        for payload in self.controller.take_themes() {
            match ThemeSettings::from_payload(&payload) {
                Ok(settings) => {
                    info!("Applying host theme");
                    theme::apply_theme(ctx, &settings);
                }
                Err(e) => {
                    warn!("Unreadable theme payload, using default theme: {}", e);
                    theme::apply_theme(ctx, &ThemeSettings::default());
                }
            }
        }
    }

    fn gesture(&mut self, gesture: Gesture) {
        self.controller.handle_gesture(&mut GestureEvent::new(gesture));
    }

    fn render_form(&mut self, ui: &mut egui::Ui) {
        ui.heading(FORM_TITLE);
        ui.add_space(6.0);
        ui.label("LaTeX could not compile the item. Check the log file for details.");

        let state = self.controller.ui_state().clone();
        if !state.info_text.is_empty() {
            ui.add_space(8.0);
            ui.label(&state.info_text);
        }

        if let Some(mismatch) = self.controller.token_mismatch() {
            ui.add_space(8.0);
            egui::Frame::none()
                .fill(color_with_alpha(ThemeColors::ACCENT_WARNING, 40))
                .inner_margin(6.0)
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(format!(
                            "Plug-in build {} does not match panel build {}",
                            mismatch.received, mismatch.expected
                        ))
                        .small()
                        .color(ThemeColors::ACCENT_WARNING),
                    );
                });
        }

        ui.add_space(12.0);
        ui.separator();
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            if ui
                .add_enabled(state.confirm_enabled, egui::Button::new(&state.confirm_label))
                .clicked()
            {
                self.gesture(Gesture::Confirm);
            }
            if ui.button("Open log").clicked() {
                self.gesture(Gesture::OpenLog);
            }
            if ui.button("Create debug files").clicked() {
                self.gesture(Gesture::CreateDebug);
            }
            if ui.button(&state.cancel_label).clicked() {
                self.gesture(Gesture::Cancel);
            }
        });
    }
}

impl<T: Transport> eframe::App for DebugPanelApp<T> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            theme::apply_theme(ctx, &ThemeSettings::default());
            self.theme_applied = true;
        }

        self.process_events(ctx);

        if let Some(mut event) = escape_gesture(ctx) {
            self.controller.handle_gesture(&mut event);
            if event.is_default_prevented() {
                suppress_escape(ctx);
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::none().inner_margin(12.0).show(ui, |ui| {
                self.render_form(ui);
            });
        });

        if self.controller.phase() == PanelPhase::Closing {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

/// Run the panel window until it is closed
pub fn run_panel<T: Transport + 'static>(
    settings: &WindowSettings,
    create: impl FnOnce(&egui::Context) -> DebugPanelApp<T> + 'static,
) -> Result<(), eframe::Error> {
    eframe::run_native(
        &settings.title,
        DebugPanelApp::<T>::options(settings),
        Box::new(move |cc| Ok(Box::new(create(&cc.egui_ctx)))),
    )
}
