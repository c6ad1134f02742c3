//! Scoring: pluggable, trait-based ranking of the job corpus against one resume.
//!
//! Default: `OverlapScorer` (token-set coverage + skill overlap + title keyword).
//! Alternate: `TfIdfScorer` (TF-IDF cosine + cross-extracted skills + fixed title bonus).
//!
//! `AppState` holds an `Arc<dyn JobScorer>` for the configured strategy; a
//! request may ask for the other one.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::skills::{extract_skills, extract_skills_from_text, SkillDictionary, SkillSet};
use crate::matching::corpus::JobCorpus;
use crate::text::{normalize, NormalizedText};

/// The ATS score is clamped into this display band.
pub const ATS_FLOOR: f64 = 40.0;
pub const ATS_CEILING: f64 = 90.0;

pub const DEFAULT_TOP_N: usize = 5;

/// Overlap scores are reported on a 0–100-ish scale.
const OVERLAP_SCALE: f64 = 100.0;
/// Points per shared skill in the TF-IDF strategy.
const TFIDF_SKILL_POINTS: f64 = 10.0;

// ────────────────────────────────────────────────────────────────────────────
// Strategy + weights
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    #[default]
    Overlap,
    Tfidf,
}

impl ScoringStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringStrategy::Overlap => "overlap",
            ScoringStrategy::Tfidf => "tfidf",
        }
    }

    pub fn default_weights(&self) -> ScoreWeights {
        match self {
            ScoringStrategy::Overlap => ScoreWeights::new(0.55, 0.30, 0.48),
            ScoringStrategy::Tfidf => ScoreWeights::new(0.55, 0.30, 0.15),
        }
    }
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overlap" => Ok(ScoringStrategy::Overlap),
            "tfidf" | "tf-idf" => Ok(ScoringStrategy::Tfidf),
            other => Err(format!(
                "unknown scoring strategy '{other}' (expected 'overlap' or 'tfidf')"
            )),
        }
    }
}

/// Per-request factor weights. They need not sum to 1; the final score is an
/// unnormalized weighted sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub text_weight: f64,
    pub skill_weight: f64,
    pub title_weight: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoringStrategy::default().default_weights()
    }
}

impl ScoreWeights {
    pub const fn new(text_weight: f64, skill_weight: f64, title_weight: f64) -> Self {
        Self {
            text_weight,
            skill_weight,
            title_weight,
        }
    }

    /// Weights must be finite and non-negative. Zero disables a factor.
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, value) in [
            ("text_weight", self.text_weight),
            ("skill_weight", self.skill_weight),
            ("title_weight", self.title_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::Validation(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    fn combine(&self, text: f64, skill: f64, title: f64) -> f64 {
        text * self.text_weight + skill * self.skill_weight + title * self.title_weight
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resume signals + ranked output
// ────────────────────────────────────────────────────────────────────────────

/// Everything the scorers need to know about one resume.
#[derive(Debug, Clone)]
pub struct ResumeProfile {
    pub raw_text: String,
    pub normalized: NormalizedText,
    pub skills: SkillSet,
}

impl ResumeProfile {
    pub fn build(raw_text: &str, dictionary: &SkillDictionary) -> Self {
        let normalized = normalize(raw_text);
        let skills = extract_skills(&normalized, dictionary);
        Self {
            raw_text: raw_text.to_string(),
            normalized,
            skills,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredJob {
    /// Position in the corpus; ties are ordered by it.
    pub corpus_index: usize,
    pub position_title: String,
    pub company_name: String,
    pub job_description: String,
    pub text_score: f64,
    pub skill_score: f64,
    pub title_score: f64,
    pub final_score: f64,
}

/// The `{position_title, company_name, final_score}` projection used by the
/// recommendation list and the CSV export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobMatchSummary {
    pub position_title: String,
    pub company_name: String,
    pub final_score: f64,
}

impl From<&ScoredJob> for JobMatchSummary {
    fn from(job: &ScoredJob) -> Self {
        Self {
            position_title: job.position_title.clone(),
            company_name: job.company_name.clone(),
            final_score: job.final_score,
        }
    }
}

/// The whole corpus sorted by `final_score`, highest first. Never empty.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    pub strategy: ScoringStrategy,
    entries: Vec<ScoredJob>,
}

impl RankedResult {
    /// Sorts `scored` descending by final score. The sort is stable, so equal
    /// scores keep corpus order.
    pub fn from_scored(strategy: ScoringStrategy, mut scored: Vec<ScoredJob>) -> Result<Self, AppError> {
        if scored.is_empty() {
            return Err(AppError::EmptyCorpus);
        }
        scored.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
        Ok(Self {
            strategy,
            entries: scored,
        })
    }

    pub fn best(&self) -> &ScoredJob {
        &self.entries[0]
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[ScoredJob] {
        &self.entries
    }

    pub fn top(&self, n: usize) -> &[ScoredJob] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn top_matches(&self, n: usize) -> Vec<JobMatchSummary> {
        self.top(n).iter().map(JobMatchSummary::from).collect()
    }

    pub fn ats_score(&self) -> f64 {
        ats_score(self.best().final_score)
    }
}

/// Rounds to two decimals, then clamps into the display band so no candidate
/// sees a score near 0 or a perfect 100.
pub fn ats_score(final_score: f64) -> f64 {
    round2(final_score).clamp(ATS_FLOOR, ATS_CEILING)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The job scorer trait. Implement this to add a ranking backend without
/// touching handlers or the CLI.
pub trait JobScorer: Send + Sync {
    fn strategy(&self) -> ScoringStrategy;

    fn score(
        &self,
        resume: &ResumeProfile,
        corpus: &JobCorpus,
        weights: &ScoreWeights,
    ) -> Result<RankedResult, AppError>;
}

pub fn build_scorer(strategy: ScoringStrategy, dictionary: Arc<SkillDictionary>) -> Arc<dyn JobScorer> {
    match strategy {
        ScoringStrategy::Overlap => Arc::new(OverlapScorer),
        ScoringStrategy::Tfidf => Arc::new(TfIdfScorer::new(dictionary)),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// OverlapScorer (default)
// ────────────────────────────────────────────────────────────────────────────

/// Per job:
/// - text  = |resume tokens ∩ job tokens| / max(|resume tokens|, 1)
///   (coverage of the resume by the job, not Jaccard)
/// - skill = number of resume skills whose lowercased label is a job token
/// - title = 1 if any lowercased skill label occurs in the position title
///
/// final = (text·w_text + skill·w_skill + title·w_title) × 100
pub struct OverlapScorer;

impl JobScorer for OverlapScorer {
    fn strategy(&self) -> ScoringStrategy {
        ScoringStrategy::Overlap
    }

    fn score(
        &self,
        resume: &ResumeProfile,
        corpus: &JobCorpus,
        weights: &ScoreWeights,
    ) -> Result<RankedResult, AppError> {
        weights.validate()?;

        let resume_tokens: HashSet<&str> = resume.normalized.token_set();
        let denominator = resume_tokens.len().max(1) as f64;
        let skill_keys: Vec<String> = resume.skills.iter().map(str::to_lowercase).collect();

        let scored = corpus
            .postings()
            .iter()
            .enumerate()
            .map(|(corpus_index, posting)| {
                let shared = resume_tokens
                    .iter()
                    .filter(|t| posting.contains_token(t))
                    .count();
                let text_score = shared as f64 / denominator;

                let skill_score = skill_keys
                    .iter()
                    .filter(|s| posting.contains_token(s))
                    .count() as f64;

                let title = posting.position_title.to_lowercase();
                let title_score = if skill_keys.iter().any(|s| title.contains(s.as_str())) {
                    1.0
                } else {
                    0.0
                };

                ScoredJob {
                    corpus_index,
                    position_title: posting.position_title.clone(),
                    company_name: posting.company_name.clone(),
                    job_description: posting.job_description.clone(),
                    text_score,
                    skill_score,
                    title_score,
                    final_score: weights.combine(text_score, skill_score, title_score)
                        * OVERLAP_SCALE,
                }
            })
            .collect();

        RankedResult::from_scored(self.strategy(), scored)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// TfIdfScorer (alternate)
// ────────────────────────────────────────────────────────────────────────────

/// Per job:
/// - text  = cosine(resume, job) over the corpus TF-IDF space × 100
/// - skill = |skills(job description) ∩ skills(raw resume)| × 10, with the
///   job side precomputed at corpus load
/// - title = fixed bonus by title keyword (see [`title_bonus`])
///
/// final = text·w_text + skill·w_skill + title·w_title
pub struct TfIdfScorer {
    dictionary: Arc<SkillDictionary>,
}

impl TfIdfScorer {
    pub fn new(dictionary: Arc<SkillDictionary>) -> Self {
        Self { dictionary }
    }
}

impl JobScorer for TfIdfScorer {
    fn strategy(&self) -> ScoringStrategy {
        ScoringStrategy::Tfidf
    }

    fn score(
        &self,
        resume: &ResumeProfile,
        corpus: &JobCorpus,
        weights: &ScoreWeights,
    ) -> Result<RankedResult, AppError> {
        weights.validate()?;

        let similarities = corpus.tfidf().cosine_similarities(&resume.normalized);
        let resume_skills = extract_skills_from_text(&resume.raw_text, &self.dictionary);

        let scored = corpus
            .postings()
            .iter()
            .zip(similarities)
            .enumerate()
            .map(|(corpus_index, (posting, similarity))| {
                let text_score = similarity * 100.0;
                let skill_score =
                    posting.skills.intersection_count(&resume_skills) as f64 * TFIDF_SKILL_POINTS;
                let title_score = title_bonus(&posting.position_title);

                ScoredJob {
                    corpus_index,
                    position_title: posting.position_title.clone(),
                    company_name: posting.company_name.clone(),
                    job_description: posting.job_description.clone(),
                    text_score,
                    skill_score,
                    title_score,
                    final_score: weights.combine(text_score, skill_score, title_score),
                }
            })
            .collect();

        RankedResult::from_scored(self.strategy(), scored)
    }
}

/// Fixed title bonus: data analyst 20, analyst 15, scientist 10, anything else 5.
pub fn title_bonus(position_title: &str) -> f64 {
    let title = position_title.to_lowercase();
    if title.contains("data analyst") {
        20.0
    } else if title.contains("analyst") {
        15.0
    } else if title.contains("scientist") {
        10.0
    } else {
        5.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::corpus::JobRecord;

    const RESUME: &str = "John Smith\njohn.smith@mail.com\n9876543210\nSkilled in Python and SQL.";

    fn job(title: &str, company: &str, description: &str) -> JobRecord {
        JobRecord {
            position_title: title.to_string(),
            company_name: company.to_string(),
            job_description: description.to_string(),
        }
    }

    fn corpus(records: Vec<JobRecord>) -> JobCorpus {
        JobCorpus::from_records(records, "test", &SkillDictionary::builtin())
    }

    fn profile(text: &str) -> ResumeProfile {
        ResumeProfile::build(text, &SkillDictionary::builtin())
    }

    #[test]
    fn test_end_to_end_overlap_scores() {
        let corpus = corpus(vec![job("Data Analyst", "Acme", "python sql analysis")]);
        let ranked = OverlapScorer
            .score(&profile(RESUME), &corpus, &ScoreWeights::new(0.55, 0.30, 0.48))
            .unwrap();

        let best = ranked.best();
        assert!((best.text_score - 2.0 / 7.0).abs() < 1e-12);
        assert_eq!(best.skill_score, 2.0);
        assert_eq!(best.title_score, 0.0);
        let expected = (2.0 / 7.0 * 0.55 + 2.0 * 0.30) * 100.0;
        assert!((best.final_score - expected).abs() < 1e-9, "got {}", best.final_score);
        assert_eq!(ranked.ats_score(), 75.71);
    }

    #[test]
    fn test_title_score_when_skill_in_title() {
        let corpus = corpus(vec![job("Python Developer", "Initech", "backend services")]);
        let ranked = OverlapScorer
            .score(&profile(RESUME), &corpus, &ScoreWeights::default())
            .unwrap();
        assert_eq!(ranked.best().title_score, 1.0);
    }

    #[test]
    fn test_empty_resume_never_fails() {
        let corpus = corpus(vec![
            job("Analyst", "A", "python sql"),
            job("Engineer", "B", "rust systems"),
        ]);
        let ranked = OverlapScorer
            .score(&profile(""), &corpus, &ScoreWeights::default())
            .unwrap();
        for entry in ranked.entries() {
            assert_eq!(entry.text_score, 0.0);
            assert_eq!(entry.skill_score, 0.0);
            assert_eq!(entry.title_score, 0.0);
        }
        assert_eq!(ranked.ats_score(), ATS_FLOOR);
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        let empty = corpus(vec![]);
        let err = OverlapScorer
            .score(&profile(RESUME), &empty, &ScoreWeights::default())
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyCorpus));

        let scorer = TfIdfScorer::new(Arc::new(SkillDictionary::builtin()));
        let err = scorer
            .score(&profile(RESUME), &empty, &ScoreWeights::default())
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyCorpus));
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let corpus = corpus(vec![
            job("First", "A", "python"),
            job("Better", "B", "python sql skilled"),
            job("Second", "C", "python"),
        ]);
        let ranked = OverlapScorer
            .score(&profile(RESUME), &corpus, &ScoreWeights::default())
            .unwrap();
        let titles: Vec<&str> = ranked
            .entries()
            .iter()
            .map(|e| e.position_title.as_str())
            .collect();
        assert_eq!(titles, vec!["Better", "First", "Second"]);
    }

    #[test]
    fn test_zero_skills_degrades_to_text_only() {
        let corpus = corpus(vec![
            job("Python Lead", "A", "warehouse logistics"),
            job("Clerk", "B", "warehouse logistics inventory"),
        ]);
        let ranked = OverlapScorer
            .score(
                &profile("warehouse logistics inventory"),
                &corpus,
                &ScoreWeights::default(),
            )
            .unwrap();
        assert!(ranked.entries().iter().all(|e| e.skill_score == 0.0 && e.title_score == 0.0));
        assert_eq!(ranked.best().position_title, "Clerk");
    }

    #[test]
    fn test_zero_weight_disables_factor() {
        let corpus = corpus(vec![job("Data Analyst", "Acme", "python sql analysis")]);
        let ranked = OverlapScorer
            .score(&profile(RESUME), &corpus, &ScoreWeights::new(0.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(ranked.best().final_score, 0.0);
    }

    #[test]
    fn test_negative_or_nan_weights_are_rejected() {
        let corpus = corpus(vec![job("Data Analyst", "Acme", "python")]);
        for weights in [
            ScoreWeights::new(-0.1, 0.3, 0.4),
            ScoreWeights::new(0.5, f64::NAN, 0.4),
            ScoreWeights::new(0.5, 0.3, f64::INFINITY),
        ] {
            let err = OverlapScorer
                .score(&profile(RESUME), &corpus, &weights)
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[test]
    fn test_top_matches_projects_first_five() {
        let records = (0..8)
            .map(|i| job(&format!("Job {i}"), "Co", &"python ".repeat(i + 1)))
            .collect();
        let ranked = OverlapScorer
            .score(&profile(RESUME), &corpus(records), &ScoreWeights::default())
            .unwrap();
        let top = ranked.top_matches(DEFAULT_TOP_N);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].position_title, ranked.best().position_title);
        assert_eq!(ranked.top(50).len(), 8);
    }

    #[test]
    fn test_ats_score_is_clamped_and_rounded() {
        assert_eq!(ats_score(12.3), 40.0);
        assert_eq!(ats_score(250.0), 90.0);
        assert_eq!(ats_score(67.5), 67.5);
        assert_eq!(ats_score(67.456), 67.46);
        for raw in [-5.0, 0.0, 39.99, 40.0, 55.555, 90.0, 90.01, 1e9] {
            let score = ats_score(raw);
            assert!((ATS_FLOOR..=ATS_CEILING).contains(&score), "{raw} -> {score}");
        }
    }

    #[test]
    fn test_tfidf_scorer_uses_bonus_and_skill_points() {
        let corpus = corpus(vec![
            job("Data Analyst", "Acme", "python sql reporting"),
            job("Research Scientist", "Lab", "deep learning tensorflow"),
            job("Sales Rep", "Shop", "retail customers"),
        ]);
        let scorer = TfIdfScorer::new(Arc::new(SkillDictionary::builtin()));
        let ranked = scorer
            .score(&profile(RESUME), &corpus, &ScoringStrategy::Tfidf.default_weights())
            .unwrap();

        assert_eq!(ranked.strategy, ScoringStrategy::Tfidf);
        let best = ranked.best();
        assert_eq!(best.position_title, "Data Analyst");
        assert_eq!(best.title_score, 20.0);
        assert_eq!(best.skill_score, 20.0);
        assert!(best.text_score > 0.0 && best.text_score <= 100.0 + 1e-9);

        let sales = ranked
            .entries()
            .iter()
            .find(|e| e.position_title == "Sales Rep")
            .unwrap();
        assert_eq!(sales.text_score, 0.0);
        assert_eq!(sales.final_score, 5.0 * 0.15);
    }

    #[test]
    fn test_tfidf_skill_term_reads_skills_cached_at_load() {
        // Corpus loaded with a dictionary that knows no skills: the scorer must
        // use the cached (empty) job skills, not re-extract from the description.
        let empty = SkillDictionary::from_map(Default::default()).unwrap();
        let corpus = JobCorpus::from_records(
            vec![job("Data Analyst", "Acme", "python sql reporting")],
            "test",
            &empty,
        );
        assert!(corpus.postings()[0].skills.is_empty());

        let scorer = TfIdfScorer::new(Arc::new(SkillDictionary::builtin()));
        let ranked = scorer
            .score(&profile(RESUME), &corpus, &ScoringStrategy::Tfidf.default_weights())
            .unwrap();
        assert_eq!(ranked.best().skill_score, 0.0);
        assert_eq!(ranked.best().title_score, 20.0);
    }

    #[test]
    fn test_title_bonus_precedence() {
        assert_eq!(title_bonus("Senior Data Analyst"), 20.0);
        assert_eq!(title_bonus("Business Analyst"), 15.0);
        assert_eq!(title_bonus("Data Scientist"), 10.0);
        assert_eq!(title_bonus("Engineer"), 5.0);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("overlap".parse::<ScoringStrategy>(), Ok(ScoringStrategy::Overlap));
        assert_eq!("TF-IDF".parse::<ScoringStrategy>(), Ok(ScoringStrategy::Tfidf));
        assert!("bm25".parse::<ScoringStrategy>().is_err());
    }

    #[test]
    fn test_build_scorer_matches_strategy() {
        let dictionary = Arc::new(SkillDictionary::builtin());
        assert_eq!(
            build_scorer(ScoringStrategy::Overlap, dictionary.clone()).strategy(),
            ScoringStrategy::Overlap
        );
        assert_eq!(
            build_scorer(ScoringStrategy::Tfidf, dictionary).strategy(),
            ScoringStrategy::Tfidf
        );
    }
}
