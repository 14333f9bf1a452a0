//! Command handlers
//!
//! Each handler runs one subcommand and returns the process exit code. Errors
//! are reported on stderr with their full cause chain.

use super::commands::{MakefileArgs, OrderArgs, PatchArgs, PrepareArgs, TreeArgs};
use super::output::OutputFormatter;
use crate::config::PrepConfig;
use crate::pipeline::{PipelineOrchestrator, PreparationContext, PreparationReport, RunOptions};
use crate::prepare::{patch_file, Platform};
use crate::progress::LoggingHandler;
use anyhow::{Context, Result};
use tracing::{debug, info};

pub fn handle_prepare(args: &PrepareArgs, quiet: bool) -> i32 {
    report_result(run_prepare(args, quiet))
}

pub fn handle_order(args: &OrderArgs) -> i32 {
    report_result(run_order(args))
}

pub fn handle_makefile(args: &MakefileArgs) -> i32 {
    report_result(run_makefile(args))
}

pub fn handle_patch(args: &PatchArgs) -> i32 {
    report_result(run_patch(args))
}

fn report_result(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    }
}

/// Layers command-line flags over the file and environment configuration.
pub fn load_config(tree: &TreeArgs) -> Result<PrepConfig> {
    let mut config = PrepConfig::load(tree.config.as_deref())?;

    if let Some(root) = &tree.root {
        config.root_dir = root.clone();
    }
    if let Some(version) = &tree.model_version {
        config.set_version(version)?;
    }
    if let Some(source_dir) = &tree.source_dir {
        config.source_dir = Some(source_dir.clone());
    }
    if let Some(object_dir) = &tree.object_dir {
        config.object_dir = Some(object_dir.clone());
    }
    if let Some(compiler) = &tree.compiler {
        config.compiler = compiler.clone();
    }

    config.validate()?;
    let config = config
        .with_absolute_root()
        .context("Failed to determine the current directory")?;
    debug!(?config, "Configuration loaded");
    Ok(config)
}

fn run_pipeline(config: PrepConfig, options: RunOptions) -> Result<PreparationReport> {
    let orchestrator = PipelineOrchestrator::new(Some(Box::new(LoggingHandler)));
    let mut context = PreparationContext::new(config, options);
    orchestrator.execute(&mut context)
}

fn run_prepare(args: &PrepareArgs, quiet: bool) -> Result<()> {
    let mut config = load_config(&args.tree)?;
    if let Some(platform) = args.platform {
        config.platform = platform.into();
    }

    let options = RunOptions::default()
        .with_patch_platform(!args.no_patch)
        .with_stage_assets(!args.no_stage);
    let report = run_pipeline(config, options)?;

    if !quiet {
        let formatter = OutputFormatter::new(args.format.into());
        print!("{}", ensure_newline(formatter.format_report(&report)?));
    }
    Ok(())
}

fn run_order(args: &OrderArgs) -> Result<()> {
    let config = load_config(&args.tree)?;
    let report = run_pipeline(config, RunOptions::order_only())?;

    let formatter = OutputFormatter::new(args.format.into());
    print!("{}", ensure_newline(formatter.format_order(&report)?));
    Ok(())
}

fn run_makefile(args: &MakefileArgs) -> Result<()> {
    let config = load_config(&args.tree)?;
    let orchestrator = PipelineOrchestrator::new(Some(Box::new(LoggingHandler)));
    let mut context = PreparationContext::new(config, RunOptions::order_only());
    orchestrator.execute(&mut context)?;

    let description = context.build_description()?;

    match &args.output {
        Some(path) => {
            description.write_to(path)?;
            info!(path = %path.display(), "Makefile written");
        }
        None => print!("{}", description.render()),
    }
    Ok(())
}

fn run_patch(args: &PatchArgs) -> Result<()> {
    let platform = args.platform.map(Platform::from).unwrap_or_default();

    for file in &args.files {
        let summary = patch_file(file, platform)
            .with_context(|| format!("Failed to patch {}", file.display()))?;
        info!(
            file = %file.display(),
            %platform,
            commented = summary.commented,
            uncommented = summary.uncommented,
            changed = summary.changed,
            "Patched"
        );
    }
    Ok(())
}

fn ensure_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
