//! The `session` subcommand: drive the upload form interactively, one command
//! per line.

use anyhow::anyhow;
use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _, AsyncWrite, AsyncWriteExt as _, BufReader};

use crate::{
    prelude::*,
    render,
    selected_file::SelectedFile,
    ui::{UPLOAD_PROGRESS, Ui},
    upload_form::{SubmitOutcome, UploadForm},
};

const HELP: &str = "\
Commands:
  select PATH   choose a file to upload
  clear         forget the chosen file
  reset         clear the extracted marks
  upload        upload the chosen file and show the extracted marks
  show          show the most recent extracted marks
  help          show this message
  quit          leave the session
";

/// Session command line arguments.
#[derive(Debug, Args)]
pub struct SessionOpts {}

/// One line of session input.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Select(PathBuf),
    Clear,
    Reset,
    Upload,
    Show,
    Help,
    Quit,
}

/// Parse a line of input. Blank lines produce `None`.
fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let command = match (word, rest) {
        ("select", "") => return Err(anyhow!("`select` needs a path")),
        ("select", path) => Command::Select(PathBuf::from(path)),
        ("clear", "") => Command::Clear,
        ("reset", "") => Command::Reset,
        ("upload", "") => Command::Upload,
        ("show", "") => Command::Show,
        ("help", "") => Command::Help,
        ("quit" | "exit", "") => Command::Quit,
        _ => return Err(anyhow!("unknown command {line:?}, type `help` for a list")),
    };
    Ok(Some(command))
}

/// The `session` subcommand.
#[instrument(level = "debug", skip_all)]
pub async fn cmd_session(ui: &Ui, form: &UploadForm, _opts: &SessionOpts) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    run_session(ui, form, stdin, tokio::io::stdout()).await
}

/// Run commands from `input` until it ends or the user quits.
async fn run_session<R, W>(ui: &Ui, form: &UploadForm, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_text(&mut output, "Type `help` for a list of commands.\n").await?;
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read command")? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                write_text(&mut output, &format!("{err}\n")).await?;
                continue;
            }
        };
        debug!(?command, "Session command");

        let reply = match command {
            Command::Select(path) => match SelectedFile::from_path(&path).await {
                Ok(file) => {
                    let reply = format!("Selected {}\n", file.file_name());
                    form.select_file(file);
                    reply
                }
                Err(err) => format!("Could not select file: {err:#}\n"),
            },
            Command::Clear => {
                form.clear_file();
                "Selection cleared.\n".to_owned()
            }
            Command::Reset => {
                form.clear_result();
                "Results cleared.\n".to_owned()
            }
            Command::Upload => match ui.with_spinner(&UPLOAD_PROGRESS, form.submit()).await
            {
                Ok(SubmitOutcome::Extracted(result)) => render::panel(&result),
                // The notifier already told the user.
                Ok(SubmitOutcome::NoFileSelected) => String::new(),
                Err(err) => {
                    warn!("Upload failed: {err:?}");
                    format!("Upload failed: {err:#}\n")
                }
            },
            Command::Show => form
                .render_panel()
                .unwrap_or_else(|| "No result yet.\n".to_owned()),
            Command::Help => HELP.to_owned(),
            Command::Quit => break,
        };
        write_text(&mut output, &reply).await?;
    }
    Ok(())
}

async fn write_text<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output
        .write_all(text.as_bytes())
        .await
        .context("Failed to write output")?;
    output.flush().await.context("Failed to flush output")
}
