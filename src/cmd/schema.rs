//! The `schema` subcommand.

use clap::Args;
use schemars::schema_for;

use crate::{extraction::MarksRecord, output::write_output, prelude::*};

/// Schema command line arguments.
#[derive(Debug, Args)]
pub struct SchemaOpts {
    /// The output path to write the schema to.
    #[clap(short = 'o', long = "out")]
    pub output_path: Option<PathBuf>,
}

/// The `schema` subcommand. Prints the JSON Schema for records written by
/// `upload --format json`.
#[instrument(level = "debug", skip_all)]
pub async fn cmd_schema(schema_opts: &SchemaOpts) -> Result<()> {
    let schema = schema_for!(MarksRecord);
    let mut schema_str =
        serde_json::to_string_pretty(&schema).context("failed to serialize schema")?;
    schema_str.push('\n');
    write_output(schema_opts.output_path.as_deref(), &schema_str).await
}
