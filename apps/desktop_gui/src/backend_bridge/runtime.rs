//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::DirectoryApi;
use crossbeam_channel::{Receiver, Sender};
use tokio::task::JoinSet;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::app::decode_photo;

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    api: Arc<dyn DirectoryApi>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(serve_commands(cmd_rx, ui_tx, api));
    })
}

/// Runs queued lookups and submissions one at a time until the UI side hangs
/// up. Photo fetches run as separate tasks so a slow image never holds up the
/// next lookup.
pub async fn serve_commands(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    api: Arc<dyn DirectoryApi>,
) {
    let _ = ui_tx.try_send(UiEvent::Info("Ready".to_string()));
    let mut photo_tasks = JoinSet::new();

    while let Ok(cmd) = cmd_rx.recv() {
        while photo_tasks.try_join_next().is_some() {}

        let event = match cmd {
            BackendCommand::Lookup { code } => {
                tracing::info!(code = %code, "backend: lookup");
                let result = api.lookup(code).await.map_err(|err| {
                    tracing::warn!(code = %code, "backend: lookup failed: {err}");
                    UiError::from_message(UiErrorContext::Lookup, err.to_string())
                });
                UiEvent::LookupFinished { code, result }
            }
            BackendCommand::SubmitRecord { request } => {
                tracing::info!(abbreviation = %request.abbreviation, "backend: submit_record");
                let result = api.submit_request(&request).await.map_err(|err| {
                    tracing::error!(
                        abbreviation = %request.abbreviation,
                        "backend: submit_record failed: {err}"
                    );
                    UiError::from_message(UiErrorContext::Submission, err.to_string())
                });
                UiEvent::SubmissionFinished(result)
            }
            BackendCommand::FetchPhoto { url } => {
                tracing::debug!(%url, "backend: fetch_photo");
                let api = Arc::clone(&api);
                let ui_tx = ui_tx.clone();
                photo_tasks.spawn(async move {
                    let event = fetch_photo_event(api.as_ref(), url).await;
                    if ui_tx.try_send(event).is_err() {
                        tracing::debug!("ui event queue unavailable; dropping photo");
                    }
                });
                continue;
            }
        };

        if ui_tx.send(event).is_err() {
            tracing::debug!("ui event receiver dropped; stopping backend worker");
            break;
        }
    }

    while photo_tasks.join_next().await.is_some() {}
}

async fn fetch_photo_event(api: &dyn DirectoryApi, url: String) -> UiEvent {
    let decoded = match api.fetch_photo(&url).await {
        Ok(bytes) => decode_photo(&bytes),
        Err(err) => Err(err.to_string()),
    };
    match decoded {
        Ok(image) => UiEvent::PhotoLoaded { url, image },
        Err(reason) => {
            tracing::warn!(%url, "backend: photo unavailable: {reason}");
            UiEvent::PhotoFailed {
                url,
                error: UiError::from_message(UiErrorContext::Photo, reason),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use client_core::{ClientError, LookupOutcome};
    use crossbeam_channel::{bounded, Receiver};
    use shared::{
        domain::{Code, Department},
        protocol::RecordRequest,
    };
    use tokio::sync::{Mutex, Notify};

    use super::*;

    #[derive(Default)]
    struct FakeDirectory {
        submitted: Mutex<Vec<RecordRequest>>,
        fail_submit: bool,
        photo_waits_for_lookup: bool,
        lookup_done: Notify,
    }

    #[async_trait]
    impl DirectoryApi for FakeDirectory {
        async fn lookup(&self, code: Code) -> Result<LookupOutcome, ClientError> {
            self.lookup_done.notify_one();
            match code.as_string().as_str() {
                "ERR" => Err(ClientError::IncompleteCode("ERR".to_string())),
                _ => Ok(LookupOutcome::NotFound(code)),
            }
        }

        async fn submit_request(&self, request: &RecordRequest) -> Result<(), ClientError> {
            if self.fail_submit {
                return Err(ClientError::InvalidBaseUrl {
                    url: "http://offline".to_string(),
                    reason: "connection refused".to_string(),
                });
            }
            self.submitted.lock().await.push(request.clone());
            Ok(())
        }

        async fn fetch_photo(&self, _photo_url: &str) -> Result<Vec<u8>, ClientError> {
            if self.photo_waits_for_lookup {
                self.lookup_done.notified().await;
            }
            Ok(b"definitely not an image".to_vec())
        }
    }

    async fn run(api: Arc<FakeDirectory>, commands: Vec<BackendCommand>) -> Vec<UiEvent> {
        let (cmd_tx, cmd_rx) = bounded(16);
        let (ui_tx, ui_rx): (Sender<UiEvent>, Receiver<UiEvent>) = bounded(16);
        for cmd in commands {
            cmd_tx.send(cmd).expect("queue command");
        }
        drop(cmd_tx);

        serve_commands(cmd_rx, ui_tx, api).await;
        ui_rx.try_iter().collect()
    }

    #[tokio::test]
    async fn lookup_results_are_forwarded_with_their_code() {
        let code = Code::parse("ABC").expect("code");
        let events = run(
            Arc::new(FakeDirectory::default()),
            vec![BackendCommand::Lookup { code }],
        )
        .await;

        assert!(matches!(events.first(), Some(UiEvent::Info(_))));
        match events.get(1) {
            Some(UiEvent::LookupFinished {
                code: finished,
                result: Ok(LookupOutcome::NotFound(not_found)),
            }) => {
                assert_eq!(*finished, code);
                assert_eq!(*not_found, code);
            }
            _ => panic!("expected lookup result"),
        }
    }

    #[tokio::test]
    async fn lookup_failures_become_lookup_errors() {
        let code = Code::parse("ERR").expect("code");
        let events = run(
            Arc::new(FakeDirectory::default()),
            vec![BackendCommand::Lookup { code }],
        )
        .await;

        match events.get(1) {
            Some(UiEvent::LookupFinished { result: Err(err), .. }) => {
                assert_eq!(err.context(), UiErrorContext::Lookup);
            }
            _ => panic!("expected lookup error"),
        }
    }

    #[tokio::test]
    async fn submissions_reach_the_directory() {
        let api = Arc::new(FakeDirectory::default());
        let request = RecordRequest::new("XYZ", "Somchai", Department::Civil).expect("valid");
        let events = run(
            api.clone(),
            vec![BackendCommand::SubmitRecord {
                request: request.clone(),
            }],
        )
        .await;

        assert!(matches!(events.get(1), Some(UiEvent::SubmissionFinished(Ok(())))));
        assert_eq!(*api.submitted.lock().await, vec![request]);
    }

    #[tokio::test]
    async fn submission_failures_are_reported() {
        let api = Arc::new(FakeDirectory {
            fail_submit: true,
            ..FakeDirectory::default()
        });
        let request = RecordRequest::new("XYZ", "Somchai", Department::Civil).expect("valid");
        let events = run(api, vec![BackendCommand::SubmitRecord { request }]).await;

        match events.get(1) {
            Some(UiEvent::SubmissionFinished(Err(err))) => {
                assert_eq!(err.context(), UiErrorContext::Submission);
            }
            _ => panic!("expected submission error"),
        }
    }

    #[tokio::test]
    async fn undecodable_photo_is_reported_as_failure() {
        let events = run(
            Arc::new(FakeDirectory::default()),
            vec![BackendCommand::FetchPhoto {
                url: "/photos/abc.png".to_string(),
            }],
        )
        .await;

        match events.get(1) {
            Some(UiEvent::PhotoFailed { url, error }) => {
                assert_eq!(url, "/photos/abc.png");
                assert_eq!(error.context(), UiErrorContext::Photo);
            }
            _ => panic!("expected photo failure"),
        }
    }

    #[tokio::test]
    async fn slow_photo_does_not_hold_up_lookup() {
        let api = Arc::new(FakeDirectory {
            photo_waits_for_lookup: true,
            ..FakeDirectory::default()
        });
        let code = Code::parse("ABC").expect("code");
        let events = tokio::time::timeout(
            Duration::from_secs(5),
            run(
                api,
                vec![
                    BackendCommand::FetchPhoto {
                        url: "/photos/slow.png".to_string(),
                    },
                    BackendCommand::Lookup { code },
                ],
            ),
        )
        .await
        .expect("lookup must not wait for the photo");

        assert!(matches!(events.get(1), Some(UiEvent::LookupFinished { .. })));
        assert!(matches!(events.get(2), Some(UiEvent::PhotoFailed { .. })));
    }
}
