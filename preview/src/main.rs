//! Desktop preview app for myrtio-signal-light
//!
//! Draws the three lamps, emulates the buttons and the brightness knob, and
//! shows the status stream. All state changes go through the intent channel.

use std::collections::VecDeque;
use std::time::Instant as StdInstant;

use eframe::egui::{self};
use myrtio_signal_light::{
    BrightnessInput, Instant, IntentChannel, IntentSender, Light, OutputDriver, Override,
    RAW_INPUT_MAX, SignalConfig, SignalController, StatusSink,
};

/// Intent channel size
const INTENT_CHANNEL_SIZE: usize = 8;

/// Number of status lines kept on screen
const STATUS_LOG_LINES: usize = 12;

/// Lamp radius in pixels
const LAMP_RADIUS: f32 = 36.0;

/// Static intent channel for communication between UI and controller
static INTENTS_CHANNEL: IntentChannel<INTENT_CHANNEL_SIZE> =
    IntentChannel::<INTENT_CHANNEL_SIZE>::new();

/// Lamp intensities as last written by the controller
#[derive(Default)]
struct PreviewLamps {
    levels: [u8; 3],
}

impl OutputDriver for PreviewLamps {
    fn write(&mut self, light: Light, intensity: u8) {
        self.levels[light.index()] = intensity;
    }
}

/// Simulated potentiometer
struct Knob {
    raw: u16,
}

impl BrightnessInput for Knob {
    fn read(&mut self) -> u16 {
        self.raw
    }
}

/// Most recent status lines, newest last
#[derive(Default)]
struct StatusLog {
    lines: VecDeque<String>,
}

impl StatusSink for StatusLog {
    fn emit(&mut self, line: &str) {
        if self.lines.len() == STATUS_LOG_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(line.to_string());
    }
}

type PreviewController =
    SignalController<'static, PreviewLamps, Knob, StatusLog, INTENT_CHANNEL_SIZE>;

fn main() -> eframe::Result<()> {
    let controller = match SignalController::new(
        INTENTS_CHANNEL.receiver(),
        &SignalConfig::DEFAULT,
        PreviewLamps::default(),
        Knob { raw: RAW_INPUT_MAX },
        StatusLog::default(),
        Instant::from_millis(0),
    ) {
        Ok(controller) => controller,
        Err(err) => {
            eprintln!("invalid signal config: {err}");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 520.0])
            .with_title("Signal Light Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "myrtio-signal-light-preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new(controller)))),
    )
}

struct PreviewApp {
    controller: PreviewController,
    intent_sender: IntentSender<'static, INTENT_CHANNEL_SIZE>,
    /// Synthetic time in milliseconds
    t_ms: u64,
    /// Wall-clock reference for delta time
    last_frame: StdInstant,
    /// Time scale multiplier (1.0 = realtime)
    time_scale: f32,
    /// Knob position mirrored into the controller's input
    knob: u16,
}

impl PreviewApp {
    fn new(controller: PreviewController) -> Self {
        Self {
            controller,
            intent_sender: INTENTS_CHANNEL.sender(),
            t_ms: 0,
            last_frame: StdInstant::now(),
            time_scale: 1.0,
            knob: RAW_INPUT_MAX,
        }
    }

    /// Emulate a button edge
    fn press(&self, which: Override) {
        let _ = self.intent_sender.toggle(which);
    }

    /// Update synthetic time based on wall clock and time scale
    fn update_time(&mut self) {
        let now = StdInstant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        let delta_ms_f64 = delta.as_secs_f64() * 1000.0 * f64::from(self.time_scale);
        let delta_ms_f64 = if delta_ms_f64.is_finite() {
            #[allow(clippy::cast_precision_loss)]
            delta_ms_f64.clamp(0.0, u64::MAX as f64)
        } else {
            0.0
        };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let delta_ms = delta_ms_f64 as u64;
        self.t_ms = self.t_ms.saturating_add(delta_ms);
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_time();
        self.controller.input_mut().raw = self.knob;
        self.controller.poll(Instant::from_millis(self.t_ms));

        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                let secs = self.t_ms / 1000;
                let ms = self.t_ms % 1000;
                ui.label(format!("Time: {secs}.{ms:03}s"));

                ui.add_space(16.0);

                ui.label("Speed:");
                ui.add(egui::Slider::new(&mut self.time_scale, 0.1..=5.0).logarithmic(true));
            });

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.button("Blink all").clicked() {
                    self.press(Override::BlinkAll);
                }
                if ui.button("Red only").clicked() {
                    self.press(Override::RedOnly);
                }
                if ui.button("All off").clicked() {
                    self.press(Override::AllOff);
                }

                ui.add_space(16.0);

                ui.label("Knob:");
                ui.add(egui::Slider::new(&mut self.knob, 0..=RAW_INPUT_MAX));
            });

            ui.add_space(16.0);

            // === Signal head ===
            let levels = self.controller.output().levels;
            let pitch = LAMP_RADIUS * 2.0 + 16.0;
            let (response, painter) = ui.allocate_painter(
                egui::vec2(pitch * 3.0, pitch),
                egui::Sense::hover(),
            );
            let origin = response.rect.min;

            #[allow(clippy::cast_precision_loss)]
            for light in Light::ALL {
                let center = egui::pos2(
                    origin.x + pitch * (light.index() as f32 + 0.5),
                    origin.y + pitch * 0.5,
                );
                let lit = light.lit_color(levels[light.index()]);
                painter.circle_filled(center, LAMP_RADIUS, egui::Color32::from_rgb(lit.r, lit.g, lit.b));
                painter.circle_stroke(
                    center,
                    LAMP_RADIUS,
                    egui::Stroke::new(2.0, egui::Color32::DARK_GRAY),
                );
            }

            ui.add_space(16.0);

            // === Status stream ===
            ui.label(format!(
                "Mode: {}  Brightness: {}",
                self.controller.state().mode().as_str(),
                self.controller.brightness()
            ));
            ui.separator();
            for line in &self.controller.status_sink().lines {
                ui.monospace(line);
            }
        });
    }
}
