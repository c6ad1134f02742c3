use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use tracing::info;

use crate::config::Config;
use crate::extraction::SkillDictionary;
use crate::matching::corpus::JobCorpus;
use crate::matching::scoring::{build_scorer, JobMatchSummary, ScoringStrategy};
use crate::matching::screening::run_screening;

#[derive(Debug, Parser)]
#[command(name = "ats_matcher", version, about = "Resume screening and job matching service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Rank the job corpus against one resume from a resume CSV
    Rank(RankArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RankArgs {
    /// Resume CSV with a `Resume_str` column
    #[arg(long, default_value = "data/Resume.csv")]
    pub resumes: PathBuf,

    /// Zero-based row of the resume to rank
    #[arg(long, default_value_t = 0)]
    pub row: usize,

    /// Number of jobs to print
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Job corpus CSV (defaults to JOBS_CSV_PATH)
    #[arg(long)]
    pub jobs: Option<PathBuf>,

    #[arg(long, default_value = "tfidf")]
    pub strategy: ScoringStrategy,
}

#[derive(Debug, Deserialize)]
struct ResumeRecord {
    #[serde(rename = "Resume_str")]
    resume_str: String,
}

fn load_resume(path: &Path, row: usize) -> Result<String> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open resume CSV {}", path.display()))?;

    let mut count = 0;
    for record in reader.deserialize::<ResumeRecord>() {
        let record = record.with_context(|| format!("invalid resume CSV {}", path.display()))?;
        if count == row {
            return Ok(record.resume_str);
        }
        count += 1;
    }
    bail!(
        "row {row} is out of range: {} has {count} resumes",
        path.display()
    )
}

/// Scores one resume against the corpus and returns the top entries.
pub fn rank(args: &RankArgs, config: &Config) -> Result<Vec<JobMatchSummary>> {
    let jobs_path = args.jobs.as_deref().unwrap_or(config.jobs_csv_path.as_path());
    let dictionary = Arc::new(
        SkillDictionary::load(
            config.skill_dictionary_path.as_deref(),
            config.skill_dictionary_mode,
        )
        .context("failed to load skill dictionary")?,
    );
    let corpus = JobCorpus::from_csv_path(jobs_path, &dictionary)?;
    let resume = load_resume(&args.resumes, args.row)?;

    let scorer = build_scorer(args.strategy, dictionary.clone());
    let screening = run_screening(
        &resume,
        &corpus,
        &dictionary,
        scorer.as_ref(),
        args.strategy.default_weights(),
        args.top,
    )?;

    info!(
        "Ranked {} jobs for resume row {} (ATS score {})",
        corpus.len(),
        args.row,
        screening.ats_score
    );
    Ok(screening.top_matches())
}

pub fn run_rank(args: &RankArgs, config: &Config) -> Result<()> {
    for job in rank(args, config)? {
        println!(
            "{} | {} | {:.2}",
            job.position_title, job.company_name, job.final_score
        );
    }
    Ok(())
}
