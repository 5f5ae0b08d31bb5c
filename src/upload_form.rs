//! The upload form: pick a file, send it off, show what comes back.
//!
//! The form owns exactly two pieces of state, the selected file and the most
//! recent result. Only [`UploadForm::select_file`], [`UploadForm::clear_file`],
//! [`UploadForm::clear_result`] and [`UploadForm::submit`] change them.
//!
//! [`UploadForm`] is a cheap handle, and clones share state. Nothing stops two
//! submissions from running at once. When that happens, each response
//! overwrites the held result as it arrives, so the last response to arrive
//! wins regardless of which request was sent first.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    extraction::ExtractionResult, notify::Notifier, ocr_service::OcrService, prelude::*,
    render, selected_file::SelectedFile,
};

/// Message shown when the user submits without choosing a file.
pub const NO_FILE_MESSAGE: &str = "Please select a file first!";

/// What happened when the form was submitted.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// No file was selected. The user was notified and nothing was sent.
    NoFileSelected,

    /// The service responded, and this is now the held result.
    Extracted(ExtractionResult),
}

#[derive(Debug, Default)]
struct FormState {
    file: Option<SelectedFile>,
    ocr_result: Option<ExtractionResult>,
}

/// Upload form state plus the collaborators needed to submit it.
#[derive(Clone)]
pub struct UploadForm {
    state: Arc<Mutex<FormState>>,
    service: Arc<dyn OcrService>,
    notifier: Arc<dyn Notifier>,
}

impl UploadForm {
    /// Create an empty form.
    pub fn new(service: Arc<dyn OcrService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: Arc::default(),
            service,
            notifier,
        }
    }

    /// Lock our state. The lock is never held across an `.await`, and no
    /// update can leave the state half-written, so a poisoned lock is safe to
    /// reuse.
    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the selected file. Any held result stays put until the next
    /// submission completes.
    pub fn select_file(&self, file: SelectedFile) {
        debug!(?file, "Selected file");
        self.state().file = Some(file);
    }

    /// Forget the selected file.
    pub fn clear_file(&self) {
        debug!("Cleared file selection");
        self.state().file = None;
    }

    /// Forget the held result, so there's no panel to show. An upload still
    /// in flight will store its result when it completes.
    pub fn clear_result(&self) {
        debug!("Cleared extraction result");
        self.state().ocr_result = None;
    }

    /// The currently selected file, if any.
    pub fn file(&self) -> Option<SelectedFile> {
        self.state().file.clone()
    }

    /// The most recently received result, if any.
    pub fn ocr_result(&self) -> Option<ExtractionResult> {
        self.state().ocr_result.clone()
    }

    /// The results panel for the held result, or `None` if there's nothing
    /// to show yet.
    pub fn render_panel(&self) -> Option<String> {
        self.ocr_result().as_ref().map(render::panel)
    }

    /// Upload the selected file and store the result.
    ///
    /// On error, the previously held result (if any) is left unchanged.
    #[instrument(level = "debug", skip_all)]
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        // Snapshot the file so the user can keep selecting while we wait.
        let Some(file) = self.file() else {
            self.notifier.alert(NO_FILE_MESSAGE);
            return Ok(SubmitOutcome::NoFileSelected);
        };

        info!(file = %file.file_name(), "Uploading file for extraction");
        let body = self.service.upload(&file).await?;
        let result = ExtractionResult::from_value(body);

        self.state().ocr_result = Some(result.clone());
        debug!(?result, "Stored extraction result");
        Ok(SubmitOutcome::Extracted(result))
    }
}
