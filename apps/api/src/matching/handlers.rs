use anyhow::anyhow;
use axum::{
    extract::{
        multipart::Field,
        rejection::{JsonRejection, QueryRejection},
        Multipart, Query, State,
    },
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::extraction::document::decode_resume;
use crate::matching::corpus::{CorpusSummary, JobCorpus};
use crate::matching::scoring::{ScoreWeights, ScoringStrategy};
use crate::matching::screening::{run_screening, Screening, ScreeningOptions, ScreeningResponse};
use crate::report::{export::CSV_FILE_NAME, export_csv, summary::TEXT_FILE_NAME, AtsReport};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScreeningRequest {
    pub resume_text: String,
    #[serde(flatten)]
    pub options: ScreeningOptions,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub format: Option<ReportFormat>,
}

/// Runs one screening against the current corpus snapshot.
/// Scoring is CPU-bound, so it runs on the blocking pool.
async fn screen(
    state: &AppState,
    resume_text: String,
    options: ScreeningOptions,
) -> Result<Screening, AppError> {
    let state = state.clone();
    tokio::task::spawn_blocking(move || {
        let corpus = state.corpus.snapshot();
        let scorer = state.scorer_for(options.strategy);
        let weights = options
            .weights
            .unwrap_or_else(|| scorer.strategy().default_weights());
        let top_n = options.top_n.unwrap_or(state.config.top_n);

        run_screening(
            &resume_text,
            &corpus,
            &state.dictionary,
            scorer.as_ref(),
            weights,
            top_n,
        )
    })
    .await
    .map_err(|e| anyhow!("screening task failed: {e}"))?
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

/// GET /api/v1/jobs
pub async fn handle_corpus_summary(State(state): State<AppState>) -> Json<CorpusSummary> {
    Json(state.corpus.snapshot().summary())
}

/// POST /api/v1/jobs/reload
pub async fn handle_corpus_reload(
    State(state): State<AppState>,
) -> Result<Json<CorpusSummary>, AppError> {
    let path = state.config.jobs_csv_path.clone();
    let dictionary = state.dictionary.clone();
    let corpus = tokio::task::spawn_blocking(move || JobCorpus::from_csv_path(&path, &dictionary))
        .await
        .map_err(|e| anyhow!("corpus reload task failed: {e}"))??;

    let summary = corpus.summary();
    let previous = state.corpus.replace(corpus);
    info!(
        "Job corpus reloaded: {} -> {} postings",
        previous.len(),
        summary.job_count
    );
    Ok(Json(summary))
}

/// POST /api/v1/screen
pub async fn handle_screen(
    State(state): State<AppState>,
    payload: Result<Json<ScreeningRequest>, JsonRejection>,
) -> Result<Json<ScreeningResponse>, AppError> {
    let req = json_body(payload)?;
    let screening = screen(&state, req.resume_text, req.options).await?;
    Ok(Json(ScreeningResponse::from(screening)))
}

/// POST /api/v1/screen/upload
///
/// Multipart fields: `file` (required, .txt or .pdf), and optional
/// `text_weight`, `skill_weight`, `title_weight`, `strategy`, `top_n`.
/// Weights that are not sent keep the strategy's defaults.
pub async fn handle_screen_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreeningResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;
    let mut text_weight: Option<f64> = None;
    let mut skill_weight: Option<f64> = None;
    let mut title_weight: Option<f64> = None;
    let mut strategy: Option<ScoringStrategy> = None;
    let mut top_n: Option<usize> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
                upload = Some((file_name, bytes));
            }
            "text_weight" => text_weight = Some(parse_field(field, &name).await?),
            "skill_weight" => skill_weight = Some(parse_field(field, &name).await?),
            "title_weight" => title_weight = Some(parse_field(field, &name).await?),
            "strategy" => strategy = Some(parse_field(field, &name).await?),
            "top_n" => top_n = Some(parse_field(field, &name).await?),
            other => debug!("Ignoring unknown multipart field '{other}'"),
        }
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;
    let resume_text = decode_resume(&file_name, bytes).await?;

    let defaults = strategy.unwrap_or(state.scorer.strategy()).default_weights();
    let weights = ScoreWeights::new(
        text_weight.unwrap_or(defaults.text_weight),
        skill_weight.unwrap_or(defaults.skill_weight),
        title_weight.unwrap_or(defaults.title_weight),
    );

    let screening = screen(
        &state,
        resume_text,
        ScreeningOptions {
            weights: Some(weights),
            strategy,
            top_n,
        },
    )
    .await?;
    Ok(Json(ScreeningResponse::from(screening)))
}

async fn parse_field<T>(field: Field<'_>, name: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("failed to read field '{name}': {e}")))?;
    raw.trim()
        .parse::<T>()
        .map_err(|e| AppError::Validation(format!("invalid value '{raw}' for '{name}': {e}")))
}

/// POST /api/v1/screen/export
pub async fn handle_export_csv(
    State(state): State<AppState>,
    payload: Result<Json<ScreeningRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let req = json_body(payload)?;
    let screening = screen(&state, req.resume_text, req.options).await?;
    let csv = export_csv(&screening.top_matches())?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}

/// POST /api/v1/screen/report?format=json|text
pub async fn handle_report(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
    payload: Result<Json<ScreeningRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let req = json_body(payload)?;
    let screening = screen(&state, req.resume_text, req.options).await?;
    let report = AtsReport::from_screening(&screening);

    match query.format.unwrap_or_default() {
        ReportFormat::Json => Ok(Json(report).into_response()),
        ReportFormat::Text => Ok((
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{TEXT_FILE_NAME}\""),
                ),
            ],
            report.render_text(),
        )
            .into_response()),
    }
}
