use std::sync::Arc;

use crate::config::Config;
use crate::extraction::SkillDictionary;
use crate::matching::corpus::CorpusHandle;
use crate::matching::scoring::{build_scorer, JobScorer, ScoringStrategy};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Current job corpus snapshot. Swapped wholesale on reload.
    pub corpus: CorpusHandle,
    pub dictionary: Arc<SkillDictionary>,
    /// Scorer for the configured strategy. Default: OverlapScorer.
    pub scorer: Arc<dyn JobScorer>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, corpus: CorpusHandle, dictionary: Arc<SkillDictionary>) -> Self {
        let scorer = build_scorer(config.scoring_strategy, dictionary.clone());
        AppState {
            corpus,
            dictionary,
            scorer,
            config,
        }
    }

    /// The configured scorer, or a fresh one when a request asks for another strategy.
    pub fn scorer_for(&self, requested: Option<ScoringStrategy>) -> Arc<dyn JobScorer> {
        match requested {
            Some(strategy) if strategy != self.scorer.strategy() => {
                build_scorer(strategy, self.dictionary.clone())
            }
            _ => self.scorer.clone(),
        }
    }
}
