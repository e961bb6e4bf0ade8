//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{controller::perform, AssistantClient};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(
    client: Arc<dyn AssistantClient>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::Info(format!(
                    "Backend worker startup failure: {err}"
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Submit(submission) => {
                        let outcome = perform(client.as_ref(), &submission).await;
                        // Blocking send: the UI is waiting on this result to release its lock.
                        if ui_tx.send(UiEvent::SubmissionFinished(outcome)).is_err() {
                            break;
                        }
                    }
                    BackendCommand::CheckHealth => {
                        let result = client
                            .health()
                            .await
                            .map(|health| health.status)
                            .map_err(|err| err.to_string());
                        let _ = ui_tx.try_send(UiEvent::HealthChecked(result));
                    }
                }
            }
            tracing::debug!("backend worker exiting: command queue closed");
        });
    })
}
