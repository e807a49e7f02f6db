//! Count table display
//!
//! Prints one- and two-dimensional count tables in a fixed-width layout:
//!
//! ```text
//!   year                     Январь    Февраль      Total
//!   -------------------------------------------------------
//!   2020                          1          1          2
//!   2021                          1          0          1
//! ```

use std::path::PathBuf;

use clap::Args;
use geopivot_analysis::{
    category::{extract_keys, extract_labels},
    dimension::Dimension,
    pivot::{CountTable, CrossCountTable, double_dimension_pass, single_dimension_pass},
};

use crate::util;

const LABEL_WIDTH: usize = 20;
const COUNT_WIDTH: usize = 10;

#[derive(Debug, Clone, Args)]
pub(crate) struct PivotArg {
    /// Input CSV file
    input: PathBuf,
    /// Row dimension
    #[arg(long)]
    outer: Dimension,
    /// Column dimension
    #[arg(long)]
    inner: Option<Dimension>,
    /// Report configuration JSON file (CSV column names)
    #[arg(long)]
    config: Option<PathBuf>,
}

pub(crate) fn run(arg: &PivotArg) -> anyhow::Result<()> {
    let config = util::load_config(arg.config.as_deref(), None)?;
    let dataset = util::read_dataset_file(&arg.input, &config.csv)?;

    let outer_keys = extract_keys(&dataset, arg.outer)?;
    let outer_labels = extract_labels(&dataset, &outer_keys, arg.outer)?;

    match arg.inner {
        None => {
            let (counts, _) = single_dimension_pass(&dataset, &outer_keys, arg.outer)?;
            print_single_table(arg.outer, &counts.relabel(&outer_labels)?);
        }
        Some(inner) if inner == arg.outer => {
            anyhow::bail!("--outer and --inner must differ (both are {inner})");
        }
        Some(inner) => {
            let inner_keys = extract_keys(&dataset, inner)?;
            let inner_labels = extract_labels(&dataset, &inner_keys, inner)?;
            let (counts, _) =
                double_dimension_pass(&dataset, &outer_keys, &inner_keys, arg.outer, inner)?;
            let counts = counts
                .relabel(&outer_labels)?
                .relabel_inner(&inner_labels)?;
            let columns = inner_labels.iter().map(|(_, label)| label).collect::<Vec<_>>();
            print_cross_table(arg.outer, &columns, &counts);
        }
    }
    Ok(())
}

fn print_separator(num_counts: usize) {
    let total_width = LABEL_WIDTH + num_counts * (COUNT_WIDTH + 1);
    println!("  {}", "-".repeat(total_width));
}

fn print_single_table(dimension: Dimension, counts: &CountTable) {
    println!(
        "  {:<LABEL_WIDTH$} {:>COUNT_WIDTH$}",
        dimension.to_string(),
        "Events"
    );
    print_separator(1);
    for (label, count) in counts.iter() {
        println!("  {label:<LABEL_WIDTH$} {count:>COUNT_WIDTH$}");
    }
    print_separator(1);
    println!("  {:<LABEL_WIDTH$} {:>COUNT_WIDTH$}", "Total", counts.total());
}

fn print_cross_table(dimension: Dimension, columns: &[&str], counts: &CrossCountTable) {
    let mut header = format!("  {:<LABEL_WIDTH$}", dimension.to_string());
    for column in columns.iter().chain(&["Total"]) {
        header.push_str(&format!(" {column:>COUNT_WIDTH$}"));
    }
    println!("{header}");
    print_separator(columns.len() + 1);

    for (label, row) in counts.iter() {
        let mut line = format!("  {label:<LABEL_WIDTH$}");
        for count in row.values() {
            line.push_str(&format!(" {count:>COUNT_WIDTH$}"));
        }
        line.push_str(&format!(" {:>COUNT_WIDTH$}", row.total()));
        println!("{line}");
    }
}
