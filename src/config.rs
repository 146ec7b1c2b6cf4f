#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{fmt, path::PathBuf, str::FromStr};

use anyhow::{Result, bail};
use tracing::Level;

/// Default name of the file graded inside a submission folder.
pub const DEFAULT_FILE_NAME: &str = "index.html";

/// How a report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Banner lines with one `[x.xx points] comment` per entry.
    #[default]
    Text,
    /// A table.
    Table,
    /// Gradescope `results.json`.
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "table" => Ok(OutputFormat::Table),
            "json" | "gradescope" => Ok(OutputFormat::Json),
            other => bail!("Unknown output format '{other}', expected text, table or json"),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// Settings for one invocation of the grader, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraderConfig {
    /// File graded inside the submission folder.
    file_name:     String,
    /// Verbosity of the log output.
    log_level:     Level,
    /// How the report is printed.
    output_format: OutputFormat,
    /// Where the report is written, stdout when unset.
    output_path:   Option<PathBuf>,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            file_name:     DEFAULT_FILE_NAME.to_string(),
            log_level:     Level::INFO,
            output_format: OutputFormat::Text,
            output_path:   None,
        }
    }
}

impl GraderConfig {
    /// Reads configuration from process environment variables. Call
    /// `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// * `RUBRIC_FILE_NAME`: graded file name, defaults to `index.html`
    /// * `RUBRIC_LOG_LEVEL`: `trace` .. `error`, defaults to `info`
    /// * `RUBRIC_OUTPUT_FORMAT`: `text`, `table` or `json`, defaults to `text`
    /// * `RUBRIC_OUTPUT_PATH`: file to write the report to
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let log_level = match read("RUBRIC_LOG_LEVEL") {
            Some(level) => match level.parse::<Level>() {
                Ok(level) => level,
                Err(_) => bail!("RUBRIC_LOG_LEVEL has an unknown level '{level}'"),
            },
            None => defaults.log_level,
        };

        let output_format = match read("RUBRIC_OUTPUT_FORMAT") {
            Some(format) => format.parse()?,
            None => defaults.output_format,
        };

        Ok(Self {
            file_name: read("RUBRIC_FILE_NAME").unwrap_or(defaults.file_name),
            log_level,
            output_format,
            output_path: read("RUBRIC_OUTPUT_PATH").map(PathBuf::from),
        })
    }

    /// File graded inside the submission folder.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Verbosity of the log output.
    pub fn log_level(&self) -> Level {
        self.log_level
    }

    /// How the report is printed.
    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    /// Where the report is written, if not stdout.
    pub fn output_path(&self) -> Option<&PathBuf> {
        self.output_path.as_ref()
    }

    /// Overrides the output format.
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Overrides the output path.
    pub fn with_output_path(mut self, path: PathBuf) -> Self {
        self.output_path = Some(path);
        self
    }
}
