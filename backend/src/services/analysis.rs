//! Analysis service
//!
//! Turns a raw form submission into a complete analysis using the
//! engine and risk model held in [`AppState`].

use crate::error::ApiResult;
use crate::state::AppState;
use chrono::NaiveDate;
use lifemode_shared::report::{corrective_actions, TextReport};
use lifemode_shared::types::{AnalysisResponse, AnalyzeRequest};
use lifemode_shared::Analysis;
use tracing::{debug, info, instrument};

/// Analysis service for business logic
pub struct AnalysisService;

impl AnalysisService {
    /// Run one analysis for a submitted form
    #[instrument(skip_all)]
    pub fn analyze(state: &AppState, req: AnalyzeRequest) -> ApiResult<Analysis> {
        let (profile, intake) = req.into_inputs()?;
        debug!(
            lifestyle = ?profile.lifestyle,
            age = profile.age_years,
            "Analyzing submission"
        );

        let analysis = state.engine().analyze(
            profile,
            intake,
            state.risk_model(),
            state.risk_policy(),
        )?;

        info!(
            health_score = analysis.scores.overall_health_score,
            occupational_risk = analysis.scores.occupational.score,
            burnout = analysis.scores.burnout.score,
            composite = analysis.scores.composite_index,
            risk = analysis.risk.as_ref().map(|r| r.level.key()),
            "Analysis complete"
        );
        Ok(analysis)
    }

    /// Analysis with its corrective actions, as returned by the API
    pub fn analyze_with_actions(state: &AppState, req: AnalyzeRequest) -> ApiResult<AnalysisResponse> {
        let analysis = Self::analyze(state, req)?;
        let corrective_actions = corrective_actions(&analysis.profile)
            .into_iter()
            .map(str::to_string)
            .collect();
        Ok(AnalysisResponse {
            analysis,
            corrective_actions,
        })
    }

    /// Plain-text report for a submitted form
    pub fn report(state: &AppState, req: AnalyzeRequest, today: NaiveDate) -> ApiResult<String> {
        let analysis = Self::analyze(state, req)?;
        Ok(TextReport::new(&analysis, today).to_string())
    }
}
