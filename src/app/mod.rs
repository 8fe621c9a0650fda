mod state;
mod ui;

use crate::config::AppConfig;
use crate::customer::{CustomerInputMode, CustomerSelection};
use crate::error::FormError;
use crate::upload::{AttachedFile, ExtractionClient, Submission};
use eframe::{egui, App};
use log::{error, info, warn};
use state::{FormPhase, FormState};
use std::path::Path;
use std::sync::mpsc::{self as std_mpsc, TryRecvError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    ProcessFiles,
    Instructions,
}

pub struct CapturePlatform {
    tab: Tab,
    customer: CustomerSelection,
    attached: Option<AttachedFile>,
    /// Rejected attachment, shown until the next valid attach.
    attach_error: Option<FormError>,
    state: FormState,
    client: ExtractionClient,
}

impl CapturePlatform {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        info!(
            "Initializing Capture Platform (endpoint {}, submit delay {:?})",
            config.processing_url(),
            config.submit_delay
        );
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            tab: Tab::default(),
            customer: CustomerSelection::default(),
            attached: None,
            attach_error: None,
            state: FormState::default(),
            client: ExtractionClient::new(&config),
        }
    }

    pub fn select_customer(&mut self, mode: CustomerInputMode, value: &str) {
        self.customer.select(mode, value);
        self.state.acknowledge();
    }

    pub fn attach_file(&mut self, bytes: Vec<u8>, name: &str, mime_hint: Option<&str>) {
        self.state.acknowledge();
        match AttachedFile::new(name, bytes, mime_hint) {
            Ok(file) => {
                info!("Attached '{}' ({} bytes)", file.name, file.size());
                self.attached = Some(file);
                self.attach_error = None;
            }
            Err(e) => {
                warn!("Rejected attachment: {}", e);
                self.attach_error = Some(e);
            }
        }
    }

    pub fn attach_path(&mut self, path: &Path) {
        self.state.acknowledge();
        match AttachedFile::from_path(path) {
            Ok(file) => {
                info!("Attached '{}' from {}", file.name, path.display());
                self.attached = Some(file);
                self.attach_error = None;
            }
            Err(e) => {
                warn!("Could not attach {}: {}", path.display(), e);
                self.attach_error = Some(e);
            }
        }
    }

    pub fn attach_dropped(&mut self, file: egui::DroppedFile) {
        if let Some(bytes) = file.bytes {
            self.attach_file(bytes.to_vec(), &file.name, None);
        } else if let Some(path) = file.path {
            self.attach_path(&path);
        } else {
            self.state.acknowledge();
            let error = FormError::UnreadableDrop(file.name);
            warn!("Ignoring dropped item: {}", error);
            self.attach_error = Some(error);
        }
    }

    fn prepare_submission(&self) -> Result<Submission, FormError> {
        let customer_name = self.customer.validated()?;
        let file = self.attached.clone().ok_or(FormError::MissingFile)?;
        Ok(Submission {
            customer_name,
            file,
        })
    }

    pub fn submit(&mut self) {
        if self.state.is_submitting() {
            return;
        }

        let submission = match self.prepare_submission() {
            Ok(submission) => submission,
            Err(e) => {
                warn!("Submission blocked: {}", e);
                self.state.fail(e);
                return;
            }
        };

        info!(
            "Processing file '{}' for '{}'",
            submission.file.name, submission.customer_name
        );

        let (sender, receiver) = std_mpsc::channel();
        self.state.begin_submit(
            submission.file.name.clone(),
            submission.customer_name.clone(),
            receiver,
        );
        self.client.spawn(submission, sender);
    }

    /// Applies a finished submission, if any. Returns true when the state changed.
    pub fn poll_outcome(&mut self) -> bool {
        let received = match &self.state.outcome_receiver {
            Some(receiver) => receiver.try_recv(),
            None => return false,
        };

        match received {
            Ok(outcome) => {
                match &outcome.result {
                    Ok(_) => info!(
                        "File '{}' processed for '{}'",
                        outcome.file_name, outcome.customer_name
                    ),
                    Err(e) => error!("Processing '{}' failed: {}", outcome.file_name, e),
                }
                self.state.complete(outcome);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.state.fail(FormError::Unexpected(
                    "Request worker stopped without a response".to_string(),
                ));
                true
            }
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(file) = dropped.into_iter().next() {
            self.attach_dropped(file);
        }

        if self.poll_outcome() {
            ctx.request_repaint();
        }

        if self.state.is_submitting() {
            // Keeps the spinner and elapsed time moving while the worker runs.
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

impl App for CapturePlatform {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::CUSTOMER_NAMES;
    use serde_json::json;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_for(server: &MockServer) -> CapturePlatform {
        CapturePlatform::with_config(AppConfig {
            api_base_url: format!("{}/api", server.uri()),
            submit_delay: Duration::ZERO,
            ..AppConfig::default()
        })
    }

    async fn settle(app: &mut CapturePlatform) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while app.state.is_submitting() {
            app.poll_outcome();
            assert!(Instant::now() < deadline, "submission never finished");
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    async fn mount(server: &MockServer, response: ResponseTemplate) {
        server.reset().await;
        Mock::given(method("POST"))
            .and(path("/api/process/OcrBytes"))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unlisted_customers_never_reach_the_network() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(200).set_body_json(json!({}))).await;

        let mut app = app_for(&server);
        app.attach_file(b"%PDF".to_vec(), "a.pdf", None);

        for name in ["", "acme", "ALLSEAS", "voorbeelden "] {
            app.select_customer(CustomerInputMode::FreeText, name);
            app.submit();
            assert!(!app.state.is_submitting());
            assert!(matches!(app.state.phase, FormPhase::Error(ref e) if e.is_validation()));
        }

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_file_blocks_submission() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(200).set_body_json(json!({}))).await;

        let mut app = app_for(&server);
        app.select_customer(CustomerInputMode::Dropdown, CUSTOMER_NAMES[1]);
        app.submit();

        assert_eq!(app.state.phase, FormPhase::Error(FormError::MissingFile));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unsupported_attachment_is_not_kept() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);

        app.attach_file(b"hello".to_vec(), "notes.txt", Some("text/plain"));
        assert!(app.attached.is_none());
        assert_eq!(
            app.attach_error,
            Some(FormError::UnsupportedFileType("notes.txt".to_string()))
        );

        app.attach_file(b"%PDF".to_vec(), "ok.pdf", None);
        app.attach_file(b"hello".to_vec(), "notes.txt", None);
        assert_eq!(app.attached.as_ref().map(|f| f.name.as_str()), Some("ok.pdf"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn dropped_item_without_contents_is_reported() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);
        app.attach_file(b"%PDF".to_vec(), "kept.pdf", None);

        app.attach_dropped(egui::DroppedFile {
            name: "mystery".to_string(),
            ..Default::default()
        });
        assert_eq!(
            app.attach_error,
            Some(FormError::UnreadableDrop("mystery".to_string()))
        );
        assert_eq!(app.attached.as_ref().map(|f| f.name.as_str()), Some("kept.pdf"));

        app.attach_dropped(egui::DroppedFile {
            name: "scan.png".to_string(),
            bytes: Some(vec![0x89, b'P', b'N', b'G'].into()),
            ..Default::default()
        });
        assert!(app.attach_error.is_none());
        assert_eq!(app.attached.as_ref().map(|f| f.name.as_str()), Some("scan.png"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn successful_submission_renders_extracted_output() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(
                json!({"data": {"extracted_data": {"gpt_extraction_output": {"a": 1}}}}),
            ),
        )
        .await;

        let mut app = app_for(&server);
        app.select_customer(CustomerInputMode::Dropdown, "visdeal");
        app.attach_file(b"%PDF-1.4".to_vec(), "invoice.pdf", None);
        app.submit();
        assert!(app.state.is_submitting());

        // A second click while in flight is ignored.
        app.submit();
        settle(&mut app).await;

        assert!(matches!(app.state.phase, FormPhase::Success(_)));
        let result = app.state.result().expect("result stored");
        let view = result.view(Some("invoice.pdf"), "visdeal");
        let extracted = view.extracted.expect("extracted output");
        assert_eq!(extracted.pretty, "{\n  \"a\": 1\n}");
        assert_eq!(extracted.payload(), extracted.pretty.as_bytes());
        assert_eq!(extracted.download_name, "invoice_visdeal_extracted.json");
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failure_clears_result_and_form_recovers() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"data": {"extracted_data": {}}})),
        )
        .await;

        let mut app = app_for(&server);
        app.attach_file(b"\x89PNG".to_vec(), "scan.png", None);
        app.submit();
        settle(&mut app).await;
        assert!(app.state.result().is_some());

        mount(&server, ResponseTemplate::new(503)).await;
        app.submit();
        settle(&mut app).await;
        assert!(app.state.result().is_none());
        assert!(matches!(
            app.state.phase,
            FormPhase::Error(FormError::Status { status: 503, .. })
        ));

        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": true}})),
        )
        .await;
        app.submit();
        settle(&mut app).await;
        assert!(matches!(app.state.phase, FormPhase::Success(_)));
        assert_eq!(
            app.state.result().unwrap().body(),
            &json!({"data": {"ok": true}})
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn rerendering_does_not_touch_the_network() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"data": {"x": 1}})),
        )
        .await;

        let mut app = app_for(&server);
        app.attach_file(b"%PDF".to_vec(), "a.pdf", None);
        app.submit();
        settle(&mut app).await;

        let before = app.state.result().cloned();
        for _ in 0..3 {
            assert!(!app.poll_outcome());
            let result = app.state.result().unwrap();
            let view = result.view(Some("a.pdf"), "voorbeelden");
            assert!(view.extracted.is_none());
        }
        assert_eq!(app.state.result().cloned(), before);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn validation_failure_clears_stale_result() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(200).set_body_json(json!({"v": 1}))).await;

        let mut app = app_for(&server);
        app.attach_file(b"%PDF".to_vec(), "a.pdf", None);
        app.submit();
        settle(&mut app).await;
        assert!(app.state.result().is_some());

        app.select_customer(CustomerInputMode::FreeText, "acme");
        app.submit();
        assert!(app.state.result().is_none());
        assert_eq!(
            app.state.phase,
            FormPhase::Error(FormError::InvalidCustomer("acme".to_string()))
        );
    }
}
