use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use parammap::{
    DocumentFormat, EditorOptions, MappingSession, MissingParameterPolicy, OutputDestination,
    OutputOptions, SourceKind, document_schema, emit, load_document, parse_document_any,
};

#[derive(Debug, Parser)]
#[command(
    name = "parammap",
    version,
    about = "Inspect and edit dashboard widget parameter mappings"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output destinations ("-" writes to stdout). Format follows the first file extension.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append, global = true)]
    outputs: Vec<String>,

    /// Emit compact output rather than pretty formatting
    #[arg(long = "no-pretty", global = true)]
    no_pretty: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Refuse to save static-value mappings without a value
    #[arg(long = "strict-static", global = true)]
    strict_static: bool,

    /// Drop mappings whose parameter is missing from the query instead of failing
    #[arg(long = "skip-missing", global = true)]
    skip_missing: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one summary per mapping row
    Inspect {
        /// Document spec: file path, inline payload, or "-" for stdin
        #[arg(value_name = "DOC")]
        doc: String,
    },
    /// Change where a parameter takes its value from
    Source {
        #[arg(value_name = "DOC")]
        doc: String,
        /// Parameter name of the row to edit
        #[arg(long)]
        name: String,
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Dashboard parameter to create or map to
        #[arg(long = "map-to", value_name = "NAME")]
        map_to: Option<String>,
        /// Static value, parsed as JSON when possible
        #[arg(long, value_name = "VALUE")]
        value: Option<String>,
    },
    /// Override the title shown for a parameter (omit --title to clear it)
    Title {
        #[arg(value_name = "DOC")]
        doc: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        title: Option<String>,
    },
    /// Print the JSON Schema of mapping documents
    Schema,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    AddNew,
    Existing,
    Widget,
    Static,
}

impl From<KindArg> for SourceKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::AddNew => SourceKind::DashboardAddNew,
            KindArg::Existing => SourceKind::DashboardMapToExisting,
            KindArg::Widget => SourceKind::WidgetLevel,
            KindArg::Static => SourceKind::StaticValue,
        }
    }
}

#[derive(Debug)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = build_output_options(&cli);
    let options = EditorOptions::default()
        .with_reject_empty_static_value(cli.strict_static)
        .with_missing_parameter(if cli.skip_missing {
            MissingParameterPolicy::Skip
        } else {
            MissingParameterPolicy::Fail
        });

    match &cli.command {
        Command::Schema => {
            let schema = document_schema()?;
            emit(&schema, &output).map_err(anyhow_report)?;
        }
        Command::Inspect { doc } => {
            let session = open_session(doc, options)?;
            emit(&session.summaries(), &output).map_err(anyhow_report)?;
        }
        Command::Source {
            doc,
            name,
            kind,
            map_to,
            value,
        } => {
            let mut session = open_session(doc, options)?;
            let kind = SourceKind::from(*kind);
            session.edit_source(name, |editor| {
                editor.select_source(kind)?;
                match (kind, map_to, value) {
                    (SourceKind::DashboardAddNew, Some(map_to), _) => editor.set_new_name(map_to),
                    (SourceKind::DashboardMapToExisting, Some(map_to), _) => {
                        editor.select_existing(map_to)
                    }
                    (SourceKind::StaticValue, _, Some(raw)) => {
                        editor.set_static_value(parse_static_value(raw))
                    }
                    _ => Ok(()),
                }
            })?;
            emit(&session.into_document(), &output).map_err(anyhow_report)?;
        }
        Command::Title { doc, name, title } => {
            let mut session = open_session(doc, options)?;
            session.set_title(name, title.as_deref().unwrap_or_default())?;
            emit(&session.into_document(), &output).map_err(anyhow_report)?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_output_options(cli: &Cli) -> OutputOptions {
    let destinations = if cli.outputs.is_empty() {
        vec![OutputDestination::Stdout]
    } else {
        cli.outputs
            .iter()
            .filter_map(|spec| spec.parse::<OutputDestination>().ok())
            .collect()
    };
    let options = OutputOptions::for_destinations(destinations).with_pretty(!cli.no_pretty);
    tracing::debug!(
        format = %options.format,
        destinations = options.destinations.len(),
        "resolved output options"
    );
    options
}

fn open_session(spec: &str, options: EditorOptions) -> Result<MappingSession> {
    let value = load_value(spec)?;
    let document = load_document(&value)?;
    tracing::info!(
        parameters = document.parameters.len(),
        mappings = document.mappings.len(),
        existing = document.existing_names.len(),
        "loaded mapping document"
    );
    Ok(MappingSession::open(document, options)?)
}

fn load_value(spec: &str) -> Result<Value> {
    if spec == "-" {
        let contents = read_from_source(&InputSource::Stdin)?;
        return parse_contents(&contents, DocumentFormat::default(), "document");
    }
    if spec.trim_start().starts_with('{') {
        return parse_contents(spec, DocumentFormat::default(), "inline document");
    }

    let path = PathBuf::from(spec);
    match read_from_source(&InputSource::File(path.clone())) {
        Ok(contents) => {
            let format = DocumentFormat::from_extension(&path).unwrap_or_default();
            parse_contents(&contents, format, "document")
        }
        Err(err) => {
            if is_not_found(&err) {
                return parse_contents(spec, DocumentFormat::default(), "inline document");
            }
            Err(err.wrap_err(format!("failed to load document from {}", path.display())))
        }
    }
}

fn read_from_source(source: &InputSource) -> Result<String> {
    match source {
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("failed to read from stdin")?;
            Ok(buffer)
        }
        InputSource::File(path) => fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read file {}", path.display())),
    }
}

fn is_not_found(err: &Report) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
}

fn parse_contents(contents: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    parse_document_any(contents, format).map_err(|err| eyre!("failed to parse {label}: {err:#}"))
}

/// JSON when it parses, otherwise the raw text as a string.
fn parse_static_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn anyhow_report(err: anyhow::Error) -> Report {
    eyre!("{err:#}")
}
