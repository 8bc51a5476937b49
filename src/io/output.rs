use std::convert::Infallible;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Serialize;

use super::DocumentFormat;

/// Where a rendered document or row listing goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    /// Format implied by the destination, when it is a file with a known extension.
    pub fn format_hint(&self) -> Option<DocumentFormat> {
        match self {
            OutputDestination::File(path) => DocumentFormat::from_extension(path),
            OutputDestination::Stdout => None,
        }
    }

    fn write(&self, payload: &str) -> Result<()> {
        match self {
            OutputDestination::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{payload}").context("failed to write to stdout")?;
                stdout.flush().context("failed to flush stdout")
            }
            OutputDestination::File(path) => fs::write(path, format!("{payload}\n"))
                .with_context(|| format!("failed to write to file {}", path.display())),
        }
    }
}

/// `-` is stdout; anything else is a file path.
impl FromStr for OutputDestination {
    type Err = Infallible;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        Ok(match spec {
            "-" => OutputDestination::Stdout,
            path => OutputDestination::File(PathBuf::from(path)),
        })
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub destinations: Vec<OutputDestination>,
}

impl OutputOptions {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    /// Sends output to `destinations`, picking the format from the first
    /// file with a recognised extension. JSON otherwise.
    pub fn for_destinations(destinations: Vec<OutputDestination>) -> Self {
        let format = destinations
            .iter()
            .find_map(OutputDestination::format_hint)
            .unwrap_or_default();
        Self::new(format).with_destinations(destinations)
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::Json)
    }
}

/// Renders `value` once and writes it to every destination, in order.
pub fn emit<T: Serialize + ?Sized>(value: &T, options: &OutputOptions) -> Result<()> {
    if options.destinations.is_empty() {
        return Ok(());
    }
    let payload = serialize_value(value, options)?;
    options
        .destinations
        .iter()
        .try_for_each(|destination| destination.write(&payload))
}

pub fn serialize_value<T: Serialize + ?Sized>(
    value: &T,
    options: &OutputOptions,
) -> Result<String> {
    let rendered = match (options.format, options.pretty) {
        (DocumentFormat::Json, true) => serde_json::to_string_pretty(value)?,
        (DocumentFormat::Json, false) => serde_json::to_string(value)?,
        #[cfg(feature = "yaml")]
        (DocumentFormat::Yaml, _) => serde_yaml::to_string(value)?,
        #[cfg(feature = "toml")]
        (DocumentFormat::Toml, true) => toml::to_string_pretty(value)?,
        #[cfg(feature = "toml")]
        (DocumentFormat::Toml, false) => toml::to_string(value)?,
    };
    Ok(rendered)
}
