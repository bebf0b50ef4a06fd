//! Axum route handler for the resume matching API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{debug, info, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::ExtractorRegistry;
use crate::llm_client::ScoringService;
use crate::matching::prompts::compose_prompt;
use crate::matching::upload::{read_match_upload, MatchUpload};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub result: String,
}

/// POST /match_resume
///
/// Multipart form with a `resume` file and a `job_description` text field.
/// Replies with the scoring service's raw text in `result`.
pub async fn handle_match_resume(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MatchResponse>, AppError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("match_resume", %request_id);

    async move {
        let multipart = multipart.map_err(|e| AppError::InvalidUpload(e.body_text()))?;
        let upload = read_match_upload(multipart).await?;

        let result = match_resume(&state.extractors, state.scorer.as_ref(), upload).await?;

        info!(result_len = result.len(), "Resume matched");
        Ok::<_, AppError>(Json(MatchResponse { result }))
    }
    .instrument(span)
    .await
}

/// Extract → compose → score. Any failure aborts the whole request; nothing
/// partial is returned.
pub async fn match_resume(
    extractors: &ExtractorRegistry,
    scorer: &dyn ScoringService,
    upload: MatchUpload,
) -> Result<String, AppError> {
    debug!(
        bytes = upload.resume.bytes.len(),
        format = %upload.resume.format,
        file_name = upload.resume.file_name.as_deref().unwrap_or("-"),
        "Received resume upload"
    );

    let resume_text = extractors.extract(upload.resume).await?;

    let prompt = compose_prompt(&resume_text, &upload.job_description);
    debug!(
        model = scorer.model(),
        prompt_len = prompt.len(),
        "Composed scoring prompt"
    );

    Ok(scorer.score(&prompt).await?)
}
