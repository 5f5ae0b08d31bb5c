use std::str::FromStr;

use clap::{Parser, Subcommand};
use tracing_subscriber::{
    EnvFilter, Layer as _, filter::Directive, fmt::format::FmtSpan, layer::SubscriberExt,
    util::SubscriberInitExt as _,
};

use self::{ocr_service::ServiceOpts, prelude::*, ui::Ui};

mod cmd;
mod extraction;
mod notify;
mod ocr_service;
mod output;
mod prelude;
mod render;
mod selected_file;
mod ui;
mod upload_form;

/// Upload marksheets to an OCR service and show the extracted marks.
#[derive(Debug, Parser)]
#[clap(
    version,
    after_help = r#"
Environment Variables:
  - MARKS_OCR_ENDPOINT (optional): Override the upload URL.
    Defaults to http://localhost:8000/upload.

  These variables may be set in a standard `.env` file.
"#
)]
struct Opts {
    #[clap(flatten)]
    service: ServiceOpts,

    #[clap(subcommand)]
    subcmd: Cmd,
}

/// The subcommands we support.
#[derive(Debug, Subcommand)]
enum Cmd {
    /// Upload a single file and print the extracted marks.
    Upload(cmd::upload::UploadOpts),
    /// Interactively select files and upload them, one command per line.
    Session(cmd::session::SessionOpts),
    /// Print the JSON Schema for `upload --format json` output.
    Schema(cmd::schema::SchemaOpts),
}

impl Cmd {
    /// Are we using stdout for output?
    fn using_stdout_for_output(&self) -> bool {
        match self {
            Cmd::Upload(opts) => opts.output_path.is_none(),
            // The session prints as it goes, so the spinner is useful there.
            Cmd::Session(_) => false,
            Cmd::Schema(opts) => opts.output_path.is_none(),
        }
    }
}

/// Our entry point, which can return an error. [`anyhow::Result`] will
/// automatically print a nice error message with optional backtrace.
#[tokio::main]
async fn main() -> Result<()> {
    let ui = Ui::init();

    // Initialize tracing.
    let directive =
        Directive::from_str("info").expect("built-in directive should be valid");
    let env_filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(ui.get_stderr_writer())
        .with_filter(env_filter);

    tracing_subscriber::registry().with(subscriber).init();

    // Call our real `main` function now that logging is set up.
    real_main(ui).await
}

/// Our real entry point.
#[instrument(level = "debug", name = "main", skip_all)]
async fn real_main(ui: Ui) -> Result<()> {
    // Load environment variables from a `.env` file, if it exists. This must
    // happen before parsing, because some options read the environment.
    dotenvy::dotenv().ok();

    let opts = Opts::parse();
    debug!("Parsed options: {:?}", opts);

    if opts.subcmd.using_stdout_for_output() {
        ui.hide_progress_bars();
    }

    match &opts.subcmd {
        Cmd::Upload(upload_opts) => {
            let form = cmd::build_form(&ui, &opts.service);
            cmd::upload::cmd_upload(&ui, &form, upload_opts).await?;
        }
        Cmd::Session(session_opts) => {
            let form = cmd::build_form(&ui, &opts.service);
            cmd::session::cmd_session(&ui, &form, session_opts).await?;
        }
        Cmd::Schema(schema_opts) => {
            cmd::schema::cmd_schema(schema_opts).await?;
        }
    }
    Ok(())
}
