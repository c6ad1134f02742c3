//! Screening pipeline: one resume against the current corpus.
//!
//! raw text ─┬─ normalize ─ extract_skills ─┬─ JobScorer ─ RankedResult ─ highlight(best)
//!           └─ extract_identity ───────────┘

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::extraction::{extract_identity, CandidateIdentity, SkillDictionary, SkillSet};
use crate::matching::corpus::JobCorpus;
use crate::matching::highlight::highlight;
use crate::matching::scoring::{
    JobMatchSummary, JobScorer, RankedResult, ResumeProfile, ScoreWeights, ScoringStrategy,
};

/// Caller-tunable knobs. Unset fields fall back to the service defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScreeningOptions {
    pub weights: Option<ScoreWeights>,
    pub strategy: Option<ScoringStrategy>,
    pub top_n: Option<usize>,
}

/// Everything the presentation layer renders for one resume.
#[derive(Debug, Clone)]
pub struct Screening {
    pub identity: CandidateIdentity,
    pub skills: SkillSet,
    pub weights: ScoreWeights,
    pub ranked: RankedResult,
    pub ats_score: f64,
    pub highlighted_description: String,
    pub top_n: usize,
}

impl Screening {
    pub fn top_matches(&self) -> Vec<JobMatchSummary> {
        self.ranked.top_matches(self.top_n)
    }
}

pub fn run_screening(
    raw_text: &str,
    corpus: &JobCorpus,
    dictionary: &SkillDictionary,
    scorer: &dyn JobScorer,
    weights: ScoreWeights,
    top_n: usize,
) -> Result<Screening, AppError> {
    if top_n == 0 {
        return Err(AppError::Validation("top_n must be at least 1".to_string()));
    }

    let identity = extract_identity(raw_text);
    let profile = ResumeProfile::build(raw_text, dictionary);
    if profile.normalized.is_empty() {
        debug!("Resume has no content words after normalization; text score will be 0");
    }

    debug!(
        strategy = %scorer.strategy(),
        jobs = corpus.len(),
        tokens = profile.normalized.len(),
        skills = profile.skills.len(),
        "Scoring resume"
    );

    let ranked = scorer.score(&profile, corpus, &weights)?;
    let ats_score = ranked.ats_score();
    let highlighted_description = highlight(&ranked.best().job_description, &profile.skills);

    Ok(Screening {
        identity,
        skills: profile.skills,
        weights,
        ranked,
        ats_score,
        highlighted_description,
        top_n,
    })
}

/// Best-match block of the API response (scores without the full description).
#[derive(Debug, Clone, Serialize)]
pub struct BestMatch {
    pub position_title: String,
    pub company_name: String,
    pub text_score: f64,
    pub skill_score: f64,
    pub title_score: f64,
    pub final_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreeningResponse {
    pub identity: CandidateIdentity,
    pub skills: SkillSet,
    pub best_match: BestMatch,
    pub ats_score: f64,
    pub top_matches: Vec<JobMatchSummary>,
    pub highlighted_description: String,
    pub weights: ScoreWeights,
    pub scorer_backend: ScoringStrategy,
}

impl From<Screening> for ScreeningResponse {
    fn from(screening: Screening) -> Self {
        let top_matches = screening.top_matches();
        let best = screening.ranked.best();
        let best_match = BestMatch {
            position_title: best.position_title.clone(),
            company_name: best.company_name.clone(),
            text_score: best.text_score,
            skill_score: best.skill_score,
            title_score: best.title_score,
            final_score: best.final_score,
        };
        let scorer_backend = screening.ranked.strategy;

        ScreeningResponse {
            identity: screening.identity,
            skills: screening.skills,
            best_match,
            ats_score: screening.ats_score,
            top_matches,
            highlighted_description: screening.highlighted_description,
            weights: screening.weights,
            scorer_backend,
        }
    }
}
