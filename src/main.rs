#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # rubric
//!
//! Grades a submission folder against the Bulma landing page rubric and
//! prints itemised feedback.
//!
//! Settings come from the environment (or a `.env` file), command line flags
//! take precedence:
//!
//! * `RUBRIC_FILE_NAME`: file to grade inside the folder (`index.html`)
//! * `RUBRIC_LOG_LEVEL`: log verbosity (`info`)
//! * `RUBRIC_OUTPUT_FORMAT`: `text`, `table` or `json` (`text`)
//! * `RUBRIC_OUTPUT_PATH`: write the report to a file instead of stdout

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use bpaf::*;
use colored::Colorize;
use dotenvy::dotenv;
use rubric::{
    config::{GraderConfig, OutputFormat},
    grade::{self, Report},
    rubrics::bulma::{self, BulmaPage},
};
use tracing::{info, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Grade a submission folder
    Grade {
        /// Output format override
        format: Option<OutputFormat>,
        /// Output file override
        output: Option<PathBuf>,
        /// Submission folder
        folder: PathBuf,
    },
    /// List the rubric's steps
    Steps,
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    let format = long("format")
        .short('f')
        .help("Output format: text, table or json")
        .argument::<OutputFormat>("FORMAT")
        .optional();

    let output = long("output")
        .short('o')
        .help("Write the report to this file instead of stdout")
        .argument::<PathBuf>("FILE")
        .optional();

    let folder = positional::<PathBuf>("FOLDER")
        .help("Folder containing the submission")
        .fallback(PathBuf::from("."));

    let grade = construct!(Cmd::Grade {
        format,
        output,
        folder
    })
    .to_options()
    .command("grade")
    .help("Grade a submission");

    let steps = pure(Cmd::Steps)
        .to_options()
        .command("steps")
        .help("List the steps of the rubric in the order they run");

    let cmd = construct!([grade, steps]);

    cmd.to_options()
        .descr("Rubric grader for HTML assignments")
        .run()
}

/// Renders `report` in the requested format.
fn render(report: &Report, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => report.to_string(),
        OutputFormat::Table => report.table(),
        OutputFormat::Json => report.to_gradescope_json()?,
    })
}

fn main() -> Result<()> {
    dotenv().ok();
    let config = GraderConfig::from_env()?;

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let filter_layer = LevelFilter::from_level(config.log_level());
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let rubric = bulma::rubric().context("The built-in rubric is malformed")?;

    match options() {
        Cmd::Grade {
            format,
            output,
            folder,
        } => {
            let config = match format {
                Some(format) => config.with_output_format(format),
                None => config,
            };
            let config = match output {
                Some(path) => config.with_output_path(path),
                None => config,
            };

            let mut page = BulmaPage::load(&folder, config.file_name());
            info!(path = %page.path().display(), "grading");
            let report = grade::run(&rubric, &mut page);
            if report.stopped() {
                eprintln!(
                    "{}",
                    "Grading stopped early; later requirements were not checked.".yellow()
                );
            }

            let rendered = render(&report, config.output_format())?;
            match config.output_path() {
                Some(path) => fs::write(path, rendered)
                    .with_context(|| format!("Could not write report to {}", path.display()))?,
                None => println!("{rendered}"),
            }
        }
        Cmd::Steps => {
            println!("{}", rubric.name().bold());
            for step in rubric.steps() {
                println!(
                    "{:>3}  {}  {}",
                    step.order().to_string().dimmed(),
                    format!("[{:.2}]", step.out_of()).bold(),
                    step.description()
                );
            }
            println!("{}", format!("Maximum: {:.2}", rubric.max_points()).bold());
        }
    };

    Ok(())
}
