//! Job corpus: loaded once, normalized once, then shared read-only.
//!
//! A reload never mutates the live corpus: a complete new snapshot is built
//! off-lock and swapped into the [`CorpusHandle`] in one step.

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::extraction::skills::{extract_skills_from_text, SkillDictionary, SkillSet};
use crate::matching::tfidf::TfIdfIndex;
use crate::text::{normalize, NormalizedText};

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to open job corpus {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid job corpus CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of the job corpus CSV. Extra columns are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub position_title: String,
    pub company_name: String,
    pub job_description: String,
}

#[derive(Debug, Clone)]
pub struct JobPosting {
    pub position_title: String,
    pub company_name: String,
    pub job_description: String,
    pub normalized: NormalizedText,
    /// Skills named anywhere in the raw description.
    pub skills: SkillSet,
    token_set: HashSet<String>,
}

impl JobPosting {
    pub fn from_record(record: JobRecord, dictionary: &SkillDictionary) -> Self {
        let normalized = normalize(&record.job_description);
        let token_set = normalized.tokens().iter().cloned().collect();
        let skills = extract_skills_from_text(&record.job_description, dictionary);
        Self {
            position_title: record.position_title,
            company_name: record.company_name,
            job_description: record.job_description,
            normalized,
            skills,
            token_set,
        }
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.token_set.contains(token)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CorpusSummary {
    pub job_count: usize,
    pub vocabulary_size: usize,
    pub loaded_at: DateTime<Utc>,
    pub source: String,
}

/// Immutable snapshot of every job posting plus derived indexes.
#[derive(Debug)]
pub struct JobCorpus {
    postings: Vec<JobPosting>,
    tfidf: TfIdfIndex,
    loaded_at: DateTime<Utc>,
    source: String,
}

impl JobCorpus {
    /// Builds a snapshot. Every per-job signal (tokens, skills, TF-IDF vector)
    /// is computed here once and reused by every scoring request.
    pub fn from_records(
        records: Vec<JobRecord>,
        source: impl Into<String>,
        dictionary: &SkillDictionary,
    ) -> Self {
        let postings: Vec<JobPosting> = records
            .into_iter()
            .map(|record| JobPosting::from_record(record, dictionary))
            .collect();
        let tfidf = TfIdfIndex::fit(postings.iter().map(|p| &p.normalized));
        Self {
            postings,
            tfidf,
            loaded_at: Utc::now(),
            source: source.into(),
        }
    }

    pub fn from_csv_reader<R: Read>(
        reader: R,
        source: impl Into<String>,
        dictionary: &SkillDictionary,
    ) -> Result<Self, CorpusError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let records = csv_reader
            .deserialize::<JobRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_records(records, source, dictionary))
    }

    pub fn from_csv_path(path: &Path, dictionary: &SkillDictionary) -> Result<Self, CorpusError> {
        let file = std::fs::File::open(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let corpus = Self::from_csv_reader(file, path.display().to_string(), dictionary)?;

        if corpus.is_empty() {
            warn!("Job corpus at {} has no postings", path.display());
        } else {
            info!(
                "Loaded {} job postings from {} ({} terms indexed)",
                corpus.len(),
                path.display(),
                corpus.tfidf.vocabulary_len()
            );
        }
        Ok(corpus)
    }

    pub fn postings(&self) -> &[JobPosting] {
        &self.postings
    }

    pub fn tfidf(&self) -> &TfIdfIndex {
        &self.tfidf
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn summary(&self) -> CorpusSummary {
        CorpusSummary {
            job_count: self.postings.len(),
            vocabulary_size: self.tfidf.vocabulary_len(),
            loaded_at: self.loaded_at,
            source: self.source.clone(),
        }
    }
}

/// Shared, swappable pointer to the current corpus snapshot.
///
/// Readers take an `Arc` clone and drop the lock immediately, so a scoring
/// request keeps its snapshot even if a reload lands mid-request.
#[derive(Debug, Clone)]
pub struct CorpusHandle {
    inner: Arc<RwLock<Arc<JobCorpus>>>,
}

impl CorpusHandle {
    pub fn new(corpus: JobCorpus) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(corpus))),
        }
    }

    pub fn snapshot(&self) -> Arc<JobCorpus> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Installs `corpus` as the current snapshot and returns the previous one.
    pub fn replace(&self, corpus: JobCorpus) -> Arc<JobCorpus> {
        let next = Arc::new(corpus);
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }
}
