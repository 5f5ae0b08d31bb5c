//! The `upload` subcommand.

use clap::Args;

use crate::{
    output::write_output,
    prelude::*,
    render::{OutputFormat, render},
    selected_file::SelectedFile,
    ui::{UPLOAD_PROGRESS, Ui},
    upload_form::{SubmitOutcome, UploadForm},
};

/// Upload command line arguments.
#[derive(Debug, Args)]
pub struct UploadOpts {
    /// The marksheet to upload. Any file type is accepted.
    #[clap(value_name = "FILE")]
    pub file: PathBuf,

    /// How to print the extracted marks.
    #[clap(long, value_enum, default_value_t = OutputFormat::default())]
    pub format: OutputFormat,

    /// Write the extracted marks to this file instead of standard output.
    #[clap(short = 'o', long = "out")]
    pub output_path: Option<PathBuf>,
}

/// The `upload` subcommand.
#[instrument(level = "debug", skip_all, fields(file = %opts.file.display()))]
pub async fn cmd_upload(ui: &Ui, form: &UploadForm, opts: &UploadOpts) -> Result<()> {
    let file = SelectedFile::from_path(&opts.file).await?;
    form.select_file(file);

    let outcome = ui.with_spinner(&UPLOAD_PROGRESS, form.submit()).await?;
    match outcome {
        SubmitOutcome::Extracted(result) => {
            let text = render(opts.format, &result)?;
            write_output(opts.output_path.as_deref(), &text).await
        }
        // We always select a file first, but if the form ever refuses, the
        // user has already been told why.
        SubmitOutcome::NoFileSelected => Ok(()),
    }
}
