use super::context::{PreparationContext, PreparationReport};
use super::phase_trait::{FinalizeHook, PreparationPhase};
use super::phases::{
    BuildOrderPhase, CollectPhase, EmitPhase, FinalizePhase, PatchPhase, ScanPhase, StagePhase,
};
use crate::progress::{ProgressEvent, ProgressHandler};
use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{debug, info};

/// Runs the phases of a preparation run in order:
/// patch, collect, scan, order, emit, stage, finalize.
///
/// A failing phase stops the run, so nothing after a failed resolution is
/// written.
#[derive(Default)]
pub struct PipelineOrchestrator {
    progress_handler: Option<Box<dyn ProgressHandler>>,
    finalize_hook: Option<Box<dyn FinalizeHook>>,
}

impl PipelineOrchestrator {
    pub fn new(progress_handler: Option<Box<dyn ProgressHandler>>) -> Self {
        Self {
            progress_handler,
            finalize_hook: None,
        }
    }

    pub fn with_finalize_hook(mut self, hook: Box<dyn FinalizeHook>) -> Self {
        self.finalize_hook = Some(hook);
        self
    }

    fn phases(&self, context: &PreparationContext) -> Vec<Box<dyn PreparationPhase + '_>> {
        let options = context.options;
        let mut phases: Vec<Box<dyn PreparationPhase + '_>> = Vec::new();

        if options.patch_platform {
            phases.push(Box::new(PatchPhase));
        }
        phases.push(Box::new(CollectPhase));
        phases.push(Box::new(ScanPhase));
        phases.push(Box::new(BuildOrderPhase));
        if options.write_build_script {
            phases.push(Box::new(EmitPhase));
        }
        if options.stage_assets {
            phases.push(Box::new(StagePhase));
        }
        if options.finalize {
            phases.push(Box::new(FinalizePhase::new(self.finalize_hook.as_deref())));
        }

        phases
    }

    pub fn execute(&self, context: &mut PreparationContext) -> Result<PreparationReport> {
        let start = Instant::now();
        let root = context.config.root_dir.display().to_string();
        info!("Starting preparation in: {}", root);
        self.notify(ProgressEvent::Started { root });

        for phase in self.phases(context) {
            let phase_name = phase.name();
            self.notify(ProgressEvent::PhaseStarted {
                phase: phase_name.to_string(),
            });

            let phase_start = Instant::now();
            if let Err(err) = phase.execute(context) {
                self.notify(ProgressEvent::Failed {
                    phase: phase_name.to_string(),
                    error: format!("{:#}", err),
                });
                return Err(err).with_context(|| format!("Phase {} failed", phase_name));
            }

            self.notify(ProgressEvent::PhaseComplete {
                phase: phase_name.to_string(),
                duration: phase_start.elapsed(),
            });
            self.notify_results(phase_name, context);

            debug!("Phase {} complete", phase_name);
        }

        self.notify(ProgressEvent::Completed {
            total_time: start.elapsed(),
        });

        Ok(context.report())
    }

    fn notify_results(&self, phase_name: &str, context: &PreparationContext) {
        match phase_name {
            "CollectPhase" => self.notify(ProgressEvent::CandidatesCollected {
                candidates: context.candidates.len(),
            }),
            "BuildOrderPhase" => {
                if let Some(order) = &context.order {
                    self.notify(ProgressEvent::OrderResolved {
                        units: order.len(),
                        passes: order.passes,
                    });
                }
            }
            _ => {}
        }
    }

    fn notify(&self, event: ProgressEvent) {
        if let Some(handler) = &self.progress_handler {
            handler.on_progress(&event);
        }
    }
}
