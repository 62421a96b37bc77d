//! Sequential step execution with per-step timing.

use std::time::Instant;

use odi_core::errors::PipelineError;
use odi_core::types::StepId;
use tracing::debug;

use super::context::PipelineContext;
use super::step::Step;
use crate::linalg::round_to;

#[derive(Debug, Clone, PartialEq)]
pub struct StepTiming {
    pub step: StepId,
    pub elapsed_ms: f64,
}

/// Timings of one completed run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub timings: Vec<StepTiming>,
    pub total_ms: f64,
}

/// Runs steps strictly in order; the first failure stops the run.
#[derive(Debug, Clone)]
pub struct PipelineRunner {
    steps: Vec<Step>,
}

impl PipelineRunner {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn run(&self, ctx: &mut PipelineContext) -> Result<RunReport, PipelineError> {
        let start = Instant::now();
        let mut timings = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let step_start = Instant::now();
            step.run(ctx).map_err(|source| PipelineError::StepFailed {
                step: step.id(),
                source,
            })?;
            let elapsed_ms = round_to(step_start.elapsed().as_secs_f64() * 1000.0, 2);
            debug!(step = %step.id(), elapsed_ms, "step complete");
            timings.push(StepTiming {
                step: step.id(),
                elapsed_ms,
            });
        }

        let total_ms = round_to(start.elapsed().as_secs_f64() * 1000.0, 2);
        debug!(steps = timings.len(), total_ms, "pipeline complete");
        Ok(RunReport { timings, total_ms })
    }
}
