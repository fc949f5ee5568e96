//! Application window

use eframe::egui;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::biometric::FprintdGate;
use crate::capture::CommandImageSource;
use crate::screen::theme;
use crate::screen::views::{
    render_fallback_view, render_gate_view, render_menu_view, render_result_view,
    render_unsupported_view,
};
use crate::screen::ScreenCommand;
use crate::vision::TesseractRecognizer;
use crate::workflow::{Alert, Presentation, WorkflowController};

/// Controller wired to the desktop backends
pub type DesktopController = WorkflowController<FprintdGate, CommandImageSource, TesseractRecognizer>;

/// How often to repaint while background work runs
const BUSY_REPAINT: Duration = Duration::from_millis(50);

/// The application
pub struct ScannerApp {
    controller: Arc<DesktopController>,
    runtime: Handle,
    /// Workflow operations still running
    tasks: Vec<JoinHandle<()>>,
    /// Alert currently on screen
    alert: Option<Alert>,
    theme_applied: bool,
}

impl ScannerApp {
    /// Create the app and start the one-shot biometric check
    pub fn new(controller: Arc<DesktopController>, runtime: Handle, ctx: &egui::Context) -> Self {
        let mut app = Self {
            controller,
            runtime,
            tasks: Vec::new(),
            alert: None,
            theme_applied: false,
        };

        app.spawn(ctx, |c| async move {
            c.initialize().await;
        });

        app
    }

    /// Create eframe options for the window
    pub fn options(title: &str) -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([480.0, 800.0])
                .with_min_inner_size([360.0, 560.0])
                .with_title(title),
            ..Default::default()
        }
    }

    /// Run a workflow operation on the runtime and repaint when it settles
    fn spawn<F, Fut>(&mut self, ctx: &egui::Context, operation: F)
    where
        F: FnOnce(Arc<DesktopController>) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let ctx = ctx.clone();
        let work = operation(Arc::clone(&self.controller));
        self.tasks.push(self.runtime.spawn(async move {
            work.await;
            ctx.request_repaint();
        }));
    }

    fn dispatch(&mut self, ctx: &egui::Context, command: ScreenCommand) {
        debug!("Screen command: {:?}", command);
        match command {
            ScreenCommand::Camera => self.spawn(ctx, |c| async move {
                c.recognize_from_camera(None).await;
            }),
            ScreenCommand::Gallery => self.spawn(ctx, |c| async move {
                c.recognize_from_picker(None).await;
            }),
            ScreenCommand::RetryAuthentication => self.spawn(ctx, |c| async move {
                c.retry_authentication().await;
            }),
            ScreenCommand::Back => {
                self.controller.clear_selection();
            }
            ScreenCommand::EnterAnyway => {
                self.controller.enter_anyway();
            }
            ScreenCommand::CancelAuthentication => {
                self.controller.cancel_authentication();
            }
        }
    }

    /// Modal alert; returns true once dismissed
    fn show_alert(ctx: &egui::Context, alert: &Alert, dismiss: &str) -> bool {
        let mut dismissed = false;
        egui::Window::new(&alert.title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&alert.message);
                ui.add_space(8.0);
                if ui.button(dismiss).clicked() {
                    dismissed = true;
                }
            });
        dismissed
    }
}

impl eframe::App for ScannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            theme::apply_theme(ctx);
            self.theme_applied = true;
        }

        self.tasks.retain(|task| !task.is_finished());
        if !self.tasks.is_empty() {
            ctx.request_repaint_after(BUSY_REPAINT);
        }

        if self.alert.is_none() {
            self.alert = self.controller.take_alert();
        }

        let strings = self.controller.strings();
        let state = self.controller.snapshot();
        let modal = self.alert.is_some();

        let command = egui::CentralPanel::default()
            .show(ctx, |ui| {
                ui.add_enabled_ui(!modal, |ui| match state.presentation() {
                    Presentation::AuthenticationGate { prompting, can_retry } => render_gate_view(
                        ui,
                        strings,
                        &self.controller.auth_config(),
                        prompting,
                        can_retry,
                    ),
                    Presentation::Fallback => render_fallback_view(ui, strings),
                    Presentation::UnsupportedMethod(method) => {
                        render_unsupported_view(ui, strings, method);
                        None
                    }
                    Presentation::MainMenu => render_menu_view(ui, strings, state.triggers_enabled()),
                    Presentation::Result {
                        uri,
                        loading,
                        progress,
                        text,
                    } => render_result_view(ui, strings, &uri, loading, progress, &text),
                })
                .inner
            })
            .inner;

        if let Some(alert) = &self.alert {
            if Self::show_alert(ctx, alert, strings.alert_dismiss) {
                self.alert = None;
            }
        }

        if let Some(command) = command {
            self.dispatch(ctx, command);
        }
    }
}

/// Run the application window (blocking)
pub fn run_app(controller: Arc<DesktopController>, runtime: Handle) -> Result<(), eframe::Error> {
    let title = controller.strings().window_title;
    eframe::run_native(
        title,
        ScannerApp::options(title),
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(ScannerApp::new(controller, runtime, &cc.egui_ctx)))
        }),
    )
}
