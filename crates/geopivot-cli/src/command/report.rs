use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use geopivot_analysis::{config::ReportConfig, report::Report};

use crate::util::{self, JsonOutput};

#[derive(Debug, Clone, Args)]
pub(crate) struct ReportArg {
    /// Input CSV files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Report configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Declutter radius of the map series (overrides the configuration)
    #[arg(long)]
    radius: Option<f64>,
    /// Directory to write `<input stem>.json` reports to (stdout if omitted)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

pub(crate) fn run(arg: &ReportArg) -> anyhow::Result<()> {
    let config = util::load_config(arg.config.as_deref(), arg.radius)?;
    log::info!("Inputs count: {}", arg.inputs.len());

    for input in &arg.inputs {
        if !input.is_file() {
            log::info!("\"{}\" isn't a file or doesn't exist", input.display());
            continue;
        }
        let name = input
            .file_name()
            .map_or_else(|| input.display().to_string(), |n| n.to_string_lossy().into_owned());
        log::info!("Current file: {name} ({})", input.display());

        let output_path = arg
            .output_dir
            .as_deref()
            .map(|dir| report_path(dir, input))
            .transpose()?;
        process_file(input, &config, output_path)?;
    }
    Ok(())
}

fn process_file(
    input: &Path,
    config: &ReportConfig,
    output_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let dataset = util::read_dataset_file(input, &config.csv)?;
    log::info!("Loaded {} events", dataset.len());

    let report = Report::build(&dataset, config)
        .with_context(|| format!("Failed to build report for {}", input.display()))?;

    let output = JsonOutput::create(output_path.as_deref())?;
    let target = output.target().to_owned();
    output.write(&report)?;
    log::info!("Report written to {target}");
    Ok(())
}

fn report_path(dir: &Path, input: &Path) -> anyhow::Result<PathBuf> {
    let stem = input
        .file_stem()
        .with_context(|| format!("Input path has no file name: {}", input.display()))?;
    let mut file_name = stem.to_os_string();
    file_name.push(".json");
    Ok(dir.join(file_name))
}
