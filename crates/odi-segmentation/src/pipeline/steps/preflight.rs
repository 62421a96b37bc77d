//! Step 1: Preflight — sample size against the per-segment rule of thumb.

use odi_core::errors::StepError;
use tracing::warn;

use crate::pipeline::PipelineContext;

pub fn run(
    ctx: &mut PipelineContext,
    num_segments: usize,
    min_per_segment: usize,
    strict: bool,
) -> Result<(), StepError> {
    check_sample_size(ctx.responses().len(), num_segments, min_per_segment, strict)
}

/// Strict mode fails below `min_per_segment * num_segments` respondents;
/// lenient mode warns and continues.
pub fn check_sample_size(
    respondents: usize,
    num_segments: usize,
    min_per_segment: usize,
    strict: bool,
) -> Result<(), StepError> {
    let required = min_per_segment.saturating_mul(num_segments);
    if respondents >= required {
        return Ok(());
    }
    if strict {
        return Err(StepError::InsufficientSample {
            respondents,
            segments: num_segments,
            required,
        });
    }
    warn!(
        respondents,
        segments = num_segments,
        required,
        "sample below recommended size, segments may be unstable"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enough_respondents_passes() {
        assert!(check_sample_size(180, 3, 60, true).is_ok());
    }

    #[test]
    fn test_strict_mode_fails_below_threshold() {
        let err = check_sample_size(179, 3, 60, true).unwrap_err();
        assert_eq!(
            err,
            StepError::InsufficientSample {
                respondents: 179,
                segments: 3,
                required: 180
            }
        );
    }

    #[test]
    fn test_lenient_mode_continues() {
        assert!(check_sample_size(10, 3, 60, false).is_ok());
    }
}
