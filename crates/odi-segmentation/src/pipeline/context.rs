//! Write-once artifact store threaded through one segmentation fit.

use std::sync::Arc;

use odi_core::errors::ContextError;
use odi_core::schema::ArtifactKey;
use odi_core::types::{OutcomeId, ResponseTable, SegmentId};

use super::artifacts::{
    FactorLoadings, OpportunityProfiles, SegmentProfileRow, SegmentSize, SegmentedTable,
    StandardizedImportance,
};

/// One slot per artifact. Each slot may be written at most once; reading an
/// empty slot fails with the slot's key.
#[derive(Debug)]
pub struct PipelineContext {
    responses: Arc<ResponseTable>,
    standardized_importance: Option<StandardizedImportance>,
    component_count: Option<usize>,
    factor_loadings: Option<FactorLoadings>,
    key_outcomes: Option<Vec<OutcomeId>>,
    opportunity_profiles: Option<OpportunityProfiles>,
    segment_labels: Option<Vec<SegmentId>>,
    segmented_table: Option<SegmentedTable>,
    segment_profiles: Option<Vec<SegmentProfileRow>>,
    segment_sizes: Option<Vec<SegmentSize>>,
}

/// Artifacts the Segment Builder keeps after a successful run.
#[derive(Debug, Clone)]
pub struct PipelineOutputs {
    pub responses: Arc<ResponseTable>,
    pub key_outcomes: Vec<OutcomeId>,
    pub opportunity_profiles: OpportunityProfiles,
    pub segment_labels: Vec<SegmentId>,
    pub segmented_table: SegmentedTable,
    pub segment_profiles: Vec<SegmentProfileRow>,
    pub segment_sizes: Vec<SegmentSize>,
}

fn put<T>(slot: &mut Option<T>, key: ArtifactKey, value: T) -> Result<(), ContextError> {
    if slot.is_some() {
        return Err(ContextError::AlreadyWritten { key });
    }
    *slot = Some(value);
    Ok(())
}

fn get<T>(slot: &Option<T>, key: ArtifactKey) -> Result<&T, ContextError> {
    slot.as_ref().ok_or(ContextError::MissingArtifact { key })
}

fn take<T>(slot: Option<T>, key: ArtifactKey) -> Result<T, ContextError> {
    slot.ok_or(ContextError::MissingArtifact { key })
}

impl PipelineContext {
    pub fn new(responses: Arc<ResponseTable>) -> Self {
        Self {
            responses,
            standardized_importance: None,
            component_count: None,
            factor_loadings: None,
            key_outcomes: None,
            opportunity_profiles: None,
            segment_labels: None,
            segmented_table: None,
            segment_profiles: None,
            segment_sizes: None,
        }
    }

    /// The primary wide table; read-only for the life of the context.
    pub fn responses(&self) -> &ResponseTable {
        &self.responses
    }

    pub fn responses_arc(&self) -> Arc<ResponseTable> {
        Arc::clone(&self.responses)
    }

    pub fn contains(&self, key: ArtifactKey) -> bool {
        match key {
            ArtifactKey::StandardizedImportance => self.standardized_importance.is_some(),
            ArtifactKey::ComponentCount => self.component_count.is_some(),
            ArtifactKey::FactorLoadings => self.factor_loadings.is_some(),
            ArtifactKey::KeyOutcomes => self.key_outcomes.is_some(),
            ArtifactKey::OpportunityProfiles => self.opportunity_profiles.is_some(),
            ArtifactKey::SegmentLabels => self.segment_labels.is_some(),
            ArtifactKey::SegmentedTable => self.segmented_table.is_some(),
            ArtifactKey::SegmentProfiles => self.segment_profiles.is_some(),
            ArtifactKey::SegmentSizes => self.segment_sizes.is_some(),
        }
    }

    /// Keys written so far, in pipeline order.
    pub fn written_keys(&self) -> Vec<ArtifactKey> {
        ArtifactKey::ALL
            .into_iter()
            .filter(|k| self.contains(*k))
            .collect()
    }

    pub fn set_standardized_importance(
        &mut self,
        value: StandardizedImportance,
    ) -> Result<(), ContextError> {
        put(&mut self.standardized_importance, ArtifactKey::StandardizedImportance, value)
    }

    pub fn standardized_importance(&self) -> Result<&StandardizedImportance, ContextError> {
        get(&self.standardized_importance, ArtifactKey::StandardizedImportance)
    }

    pub fn set_component_count(&mut self, value: usize) -> Result<(), ContextError> {
        put(&mut self.component_count, ArtifactKey::ComponentCount, value)
    }

    pub fn component_count(&self) -> Result<usize, ContextError> {
        get(&self.component_count, ArtifactKey::ComponentCount).copied()
    }

    pub fn set_factor_loadings(&mut self, value: FactorLoadings) -> Result<(), ContextError> {
        put(&mut self.factor_loadings, ArtifactKey::FactorLoadings, value)
    }

    pub fn factor_loadings(&self) -> Result<&FactorLoadings, ContextError> {
        get(&self.factor_loadings, ArtifactKey::FactorLoadings)
    }

    pub fn set_key_outcomes(&mut self, value: Vec<OutcomeId>) -> Result<(), ContextError> {
        put(&mut self.key_outcomes, ArtifactKey::KeyOutcomes, value)
    }

    pub fn key_outcomes(&self) -> Result<&[OutcomeId], ContextError> {
        get(&self.key_outcomes, ArtifactKey::KeyOutcomes).map(Vec::as_slice)
    }

    pub fn set_opportunity_profiles(
        &mut self,
        value: OpportunityProfiles,
    ) -> Result<(), ContextError> {
        put(&mut self.opportunity_profiles, ArtifactKey::OpportunityProfiles, value)
    }

    pub fn opportunity_profiles(&self) -> Result<&OpportunityProfiles, ContextError> {
        get(&self.opportunity_profiles, ArtifactKey::OpportunityProfiles)
    }

    pub fn set_segment_labels(&mut self, value: Vec<SegmentId>) -> Result<(), ContextError> {
        put(&mut self.segment_labels, ArtifactKey::SegmentLabels, value)
    }

    pub fn segment_labels(&self) -> Result<&[SegmentId], ContextError> {
        get(&self.segment_labels, ArtifactKey::SegmentLabels).map(Vec::as_slice)
    }

    pub fn set_segmented_table(&mut self, value: SegmentedTable) -> Result<(), ContextError> {
        put(&mut self.segmented_table, ArtifactKey::SegmentedTable, value)
    }

    pub fn segmented_table(&self) -> Result<&SegmentedTable, ContextError> {
        get(&self.segmented_table, ArtifactKey::SegmentedTable)
    }

    pub fn set_segment_profiles(
        &mut self,
        value: Vec<SegmentProfileRow>,
    ) -> Result<(), ContextError> {
        put(&mut self.segment_profiles, ArtifactKey::SegmentProfiles, value)
    }

    pub fn segment_profiles(&self) -> Result<&[SegmentProfileRow], ContextError> {
        get(&self.segment_profiles, ArtifactKey::SegmentProfiles).map(Vec::as_slice)
    }

    pub fn set_segment_sizes(&mut self, value: Vec<SegmentSize>) -> Result<(), ContextError> {
        put(&mut self.segment_sizes, ArtifactKey::SegmentSizes, value)
    }

    pub fn segment_sizes(&self) -> Result<&[SegmentSize], ContextError> {
        get(&self.segment_sizes, ArtifactKey::SegmentSizes).map(Vec::as_slice)
    }

    /// Consume the context, keeping the artifacts the final views need.
    pub fn into_outputs(self) -> Result<PipelineOutputs, ContextError> {
        Ok(PipelineOutputs {
            responses: self.responses,
            key_outcomes: take(self.key_outcomes, ArtifactKey::KeyOutcomes)?,
            opportunity_profiles: take(
                self.opportunity_profiles,
                ArtifactKey::OpportunityProfiles,
            )?,
            segment_labels: take(self.segment_labels, ArtifactKey::SegmentLabels)?,
            segmented_table: take(self.segmented_table, ArtifactKey::SegmentedTable)?,
            segment_profiles: take(self.segment_profiles, ArtifactKey::SegmentProfiles)?,
            segment_sizes: take(self.segment_sizes, ArtifactKey::SegmentSizes)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odi_core::types::RespondentId;

    fn ctx() -> PipelineContext {
        let table = ResponseTable::new(vec![RespondentId::new(1)]).unwrap();
        PipelineContext::new(Arc::new(table))
    }

    #[test]
    fn test_write_once() {
        let mut c = ctx();
        c.set_component_count(2).unwrap();
        assert_eq!(
            c.set_component_count(3),
            Err(ContextError::AlreadyWritten {
                key: ArtifactKey::ComponentCount
            })
        );
        assert_eq!(c.component_count(), Ok(2));
    }

    #[test]
    fn test_missing_read_names_key() {
        let c = ctx();
        let err = c.key_outcomes().unwrap_err();
        assert_eq!(
            err,
            ContextError::MissingArtifact {
                key: ArtifactKey::KeyOutcomes
            }
        );
        assert!(err.to_string().contains("key_outcomes"));
    }

    #[test]
    fn test_written_keys_in_order() {
        let mut c = ctx();
        c.set_key_outcomes(vec![OutcomeId::new(1)]).unwrap();
        c.set_component_count(1).unwrap();
        assert_eq!(
            c.written_keys(),
            vec![ArtifactKey::ComponentCount, ArtifactKey::KeyOutcomes]
        );
    }

    #[test]
    fn test_outputs_require_final_artifacts() {
        let err = ctx().into_outputs().unwrap_err();
        assert!(matches!(err, ContextError::MissingArtifact { .. }));
    }
}
