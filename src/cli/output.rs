//! Output formatting for run reports
//!
//! Reports can be rendered as JSON, YAML or human-readable text. The `order`
//! command shows only the compile order; `prepare` shows the whole report.
//!
//! # Example
//!
//! ```ignore
//! use dssat_prep::cli::output::{OutputFormat, OutputFormatter};
//!
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! let output = formatter.format_order(&report)?;
//! println!("{}", output);
//! ```

use anyhow::{Context, Result};
use serde::Serialize;

use crate::pipeline::{OrderedUnit, PreparationReport};
use crate::source::ModuleName;
use std::collections::BTreeSet;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

#[derive(Serialize)]
struct OrderView<'a> {
    passes: usize,
    order: &'a [OrderedUnit],
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the compile order part of a report.
    pub fn format_order(&self, report: &PreparationReport) -> Result<String> {
        let view = OrderView {
            passes: report.passes,
            order: &report.order,
        };
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&view)
                .context("Failed to serialize compile order to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(&view).context("Failed to serialize compile order to YAML")
            }
            OutputFormat::Human => Ok(self.format_order_human(report)),
        }
    }

    /// Formats a full preparation report.
    pub fn format_report(&self, report: &PreparationReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize report to YAML")
            }
            OutputFormat::Human => Ok(self.format_report_human(report)),
        }
    }

    fn format_order_human(&self, report: &PreparationReport) -> String {
        let mut output = format!(
            "Compile order ({} units, {} passes)\n",
            report.order.len(),
            report.passes
        );
        let width = report.order.len().to_string().len();
        for (i, unit) in report.order.iter().enumerate() {
            output.push_str(&format!(
                "{:>width$}. {}",
                i + 1,
                unit.path.display(),
                width = width
            ));
            if !unit.provides.is_empty() {
                output.push_str(&format!("  provides: {}", join_names(&unit.provides)));
            }
            if !unit.requires.is_empty() {
                output.push_str(&format!("  uses: {}", join_names(&unit.requires)));
            }
            output.push('\n');
        }
        output
    }

    fn format_report_human(&self, report: &PreparationReport) -> String {
        let mut output = String::new();
        output.push_str("\u{2713} Preparation complete\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        if let Some(root) = &report.source_root {
            output.push_str(&format!("Source root:   {}\n", root.display()));
        }
        output.push_str(&format!("Candidates:    {}\n", report.candidates));
        output.push_str(&format!(
            "Compile order: {} units in {} passes\n",
            report.order.len(),
            report.passes
        ));
        if let Some(makefile) = &report.makefile {
            output.push_str(&format!("Makefile:      {}\n", makefile.display()));
        }

        if !report.patched.is_empty() {
            output.push_str("\nPlatform patches:\n");
            for (i, patched) in report.patched.iter().enumerate() {
                let connector = if i == report.patched.len() - 1 {
                    "\u{2514}"
                } else {
                    "\u{251C}"
                };
                let summary = &patched.summary;
                let status = if summary.changed {
                    format!(
                        "{} commented, {} uncommented",
                        summary.commented, summary.uncommented
                    )
                } else {
                    "unchanged".to_string()
                };
                output.push_str(&format!(
                    "{}\u{2500} {} ({})\n",
                    connector,
                    patched.path.display(),
                    status
                ));
            }
        }

        if !report.created_dirs.is_empty() {
            output.push_str(&format!(
                "\nDirectories:   {} ready\n",
                report.created_dirs.len()
            ));
        }
        if report.staged_files > 0 || report.profile_staged {
            output.push_str(&format!("Data files:    {} copied\n", report.staged_files));
            output.push_str(&format!(
                "Profile:       {}\n",
                if report.profile_staged {
                    "copied"
                } else {
                    "not copied"
                }
            ));
        }

        output
    }
}

fn join_names(names: &BTreeSet<ModuleName>) -> String {
    names
        .iter()
        .map(ModuleName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
