use std::time::Duration;

use client_core::{
    controller::{begin_file_upload, begin_text_from_draft, complete},
    render_transcript, ClientError, SessionState, SubmissionTicket,
};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use eframe::egui;
use egui::RichText;
use shared::domain::{FileHandle, TurnStatus, ACCEPTED_EXTENSIONS};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{failure_status, UiEvent},
    orchestration::dispatch_backend_command,
};
use crate::ui::transcript_view;

const SEND_BUTTON_WIDTH: f32 = 72.0;

pub struct AssistantApp {
    session: SessionState,
    /// Held while the backend worker performs the matching remote call.
    pending: Option<SubmissionTicket>,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    service_url: String,
    status: String,
}

impl AssistantApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, service_url: String) -> Self {
        let status = match dispatch_backend_command(&cmd_tx, BackendCommand::CheckHealth) {
            Ok(()) => "Checking assistant service...".to_string(),
            Err(reason) => reason,
        };
        Self {
            session: SessionState::new(),
            pending: None,
            cmd_tx,
            ui_rx,
            service_url,
            status,
        }
    }

    fn process_ui_events(&mut self) {
        loop {
            match self.ui_rx.try_recv() {
                Ok(event) => self.handle_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.pending.is_some() {
                        self.finish(Err(ClientError::WorkerUnavailable(
                            "backend worker stopped before answering".to_string(),
                        )));
                    }
                    break;
                }
            }
        }
    }

    fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => self.status = message,
            UiEvent::SubmissionFinished(outcome) => self.finish(outcome),
            UiEvent::HealthChecked(Ok(status)) => {
                self.status = format!("Assistant service status: {status}");
            }
            UiEvent::HealthChecked(Err(reason)) => {
                self.status = format!("Assistant service check failed: {reason}");
            }
        }
    }

    fn finish(&mut self, outcome: Result<serde_json::Value, ClientError>) {
        let Some(ticket) = self.pending.take() else {
            tracing::warn!("submission result arrived with nothing pending");
            return;
        };
        let turn = complete(&mut self.session, ticket, outcome);
        self.status = match turn.status() {
            TurnStatus::Completed => "Ready".to_string(),
            TurnStatus::Failed(failure) => failure_status(failure.kind).to_string(),
        };
    }

    fn start(&mut self, ticket: SubmissionTicket) {
        let cmd = BackendCommand::Submit(ticket.submission().clone());
        match dispatch_backend_command(&self.cmd_tx, cmd) {
            Ok(()) => self.pending = Some(ticket),
            Err(reason) => {
                complete(
                    &mut self.session,
                    ticket,
                    Err(ClientError::WorkerUnavailable(reason.clone())),
                );
                self.status = reason;
            }
        }
    }

    fn send_draft(&mut self) {
        match begin_text_from_draft(&mut self.session) {
            Ok(ticket) => self.start(ticket),
            Err(rejected) => self.status = format!("Not sent: {rejected}"),
        }
    }

    fn upload(&mut self, file: Option<FileHandle>) {
        match begin_file_upload(&mut self.session, file) {
            Ok(Some(ticket)) => self.start(ticket),
            Ok(None) => {}
            Err(rejected) => self.status = format!("Not uploaded: {rejected}"),
        }
    }

    fn pick_and_upload(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Insurance document", ACCEPTED_EXTENSIONS)
            .pick_file();
        self.upload(picked.and_then(FileHandle::from_path));
    }

    fn show_history_panel(&self, ctx: &egui::Context) {
        egui::SidePanel::left("history_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Chat History");
                ui.separator();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    if self.session.transcript().is_empty() {
                        ui.weak("No questions yet");
                    }
                    for label in self.session.transcript().labels() {
                        ui.horizontal_wrapped(|ui| {
                            ui.label(RichText::new("Q:").strong());
                            ui.label(label);
                        });
                    }
                });
            });
    }

    fn show_upload_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("upload_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.heading("Healthcare Helper");
            ui.label("Please upload your health insurance document (PDF, JPG, or PNG).");
            ui.horizontal(|ui| {
                let can_pick = self.session.can_pick_file();
                if ui
                    .add_enabled(can_pick, egui::Button::new("Choose file…"))
                    .clicked()
                {
                    self.pick_and_upload();
                }
                match self.session.selected_file() {
                    Some(file) => ui.label(file.name.as_str()),
                    None => ui.weak("No file chosen"),
                };
            });
            ui.horizontal(|ui| {
                ui.small(self.service_url.as_str());
                ui.separator();
                ui.small(self.status.as_str());
            });
            ui.add_space(4.0);
        });
    }

    fn show_composer(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("composer_panel").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let in_flight = self.session.is_submitting();
                let input_width = (ui.available_width() - SEND_BUTTON_WIDTH).max(120.0);
                let response = ui.add_enabled(
                    !in_flight,
                    egui::TextEdit::singleline(&mut self.session.draft_query)
                        .hint_text("Type your question...")
                        .desired_width(input_width),
                );
                let enter_pressed =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let can_send = self.session.can_submit_text();
                let clicked_send = ui
                    .add_enabled(can_send, egui::Button::new("Send"))
                    .clicked();
                if can_send && (enter_pressed || clicked_send) {
                    self.send_draft();
                    response.request_focus();
                }
            });
            ui.add_space(6.0);
        });
    }

    fn show_transcript(&self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for view in render_transcript(self.session.transcript()) {
                        transcript_view::user_bubble(ui, &view.label);
                        transcript_view::assistant_bubble(ui, &view);
                    }
                    if self.session.is_submitting() {
                        transcript_view::thinking_bubble(ui);
                    }
                });
        });
    }
}

impl eframe::App for AssistantApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_history_panel(ctx);
        self.show_upload_bar(ctx);
        self.show_composer(ctx);
        self.show_transcript(ctx);

        if self.session.is_submitting() {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
