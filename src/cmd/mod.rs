//! Command-line entry points.

use std::sync::Arc;

use crate::{
    notify::StderrNotifier,
    ocr_service::{HttpOcrService, ServiceOpts},
    prelude::*,
    ui::Ui,
    upload_form::UploadForm,
};

pub mod schema;
pub mod session;
pub mod upload;

/// Build an upload form talking to the real OCR service.
pub fn build_form(ui: &Ui, service_opts: &ServiceOpts) -> UploadForm {
    let service = HttpOcrService::new(service_opts.clone());
    debug!(endpoint = %service.endpoint(), "Using OCR service");
    let notifier = StderrNotifier::new(ui.clone());
    UploadForm::new(Arc::new(service), Arc::new(notifier))
}
