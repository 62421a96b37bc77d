//! Ulwick opportunity formula at individual and aggregate scale.
//!
//! Both share one shape, `imp + max(imp - sat, 0)`: unmet importance counts
//! double, surplus satisfaction earns nothing.

use odi_core::errors::OpportunityError;

/// Per-respondent opportunity over 1-5 ratings; yields 1-10.
pub fn individual_opportunity(importance: u8, satisfaction: u8) -> u8 {
    importance + importance.saturating_sub(satisfaction)
}

/// Per-segment opportunity over Top-2-Box percentages; yields 0-20.
///
/// Both inputs must lie in `[0, 100]`.
pub fn aggregate_opportunity(
    importance_t2b_pct: f64,
    satisfaction_t2b_pct: f64,
) -> Result<f64, OpportunityError> {
    check_percentage("importance_t2b_pct", importance_t2b_pct)?;
    check_percentage("satisfaction_t2b_pct", satisfaction_t2b_pct)?;
    let imp = importance_t2b_pct / 10.0;
    let sat = satisfaction_t2b_pct / 10.0;
    Ok(imp + (imp - sat).max(0.0))
}

fn check_percentage(field: &'static str, value: f64) -> Result<(), OpportunityError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(OpportunityError::PercentageOutOfRange { field, value })
    }
}
