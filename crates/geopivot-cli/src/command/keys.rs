use std::path::PathBuf;

use clap::Args;
use geopivot_analysis::{
    category::{extract_keys, extract_labels},
    dimension::Dimension,
};

use crate::util::{self, JsonOutput};

#[derive(Debug, Clone, Args)]
pub(crate) struct KeysArg {
    /// Input CSV file
    input: PathBuf,
    /// Dimension to list
    #[arg(long)]
    dimension: Dimension,
    /// Report configuration JSON file (CSV column names)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the label map as JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub(crate) fn run(arg: &KeysArg) -> anyhow::Result<()> {
    let config = util::load_config(arg.config.as_deref(), None)?;
    let dataset = util::read_dataset_file(&arg.input, &config.csv)?;
    let keys = extract_keys(&dataset, arg.dimension)?;
    let labels = extract_labels(&dataset, &keys, arg.dimension)?;

    if arg.json {
        return JsonOutput::create(None)?.write(&labels);
    }

    println!("  {:<12} Label", "Key");
    println!("  {}", "-".repeat(40));
    for (key, label) in labels.iter() {
        println!("  {key:<12} {label}");
    }
    println!();
    println!("  {} distinct {} values", keys.len(), arg.dimension);
    Ok(())
}
