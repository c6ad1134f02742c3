use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::extraction::CandidateIdentity;
use crate::matching::scoring::{round2, JobMatchSummary, ScoringStrategy};
use crate::matching::screening::Screening;

pub const TEXT_FILE_NAME: &str = "ATS_Report.txt";

#[derive(Debug, Clone, Serialize)]
pub struct ReportBestMatch {
    pub position_title: String,
    pub company_name: String,
    pub final_score: f64,
}

/// Downloadable summary of one screening.
#[derive(Debug, Clone, Serialize)]
pub struct AtsReport {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub identity: CandidateIdentity,
    pub best_match: ReportBestMatch,
    pub ats_score: f64,
    pub skills: Vec<String>,
    pub top_matches: Vec<JobMatchSummary>,
    pub scorer_backend: ScoringStrategy,
}

impl AtsReport {
    pub fn from_screening(screening: &Screening) -> Self {
        let best = screening.ranked.best();
        AtsReport {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            identity: screening.identity.clone(),
            best_match: ReportBestMatch {
                position_title: best.position_title.clone(),
                company_name: best.company_name.clone(),
                final_score: round2(best.final_score),
            },
            ats_score: screening.ats_score,
            skills: screening.skills.to_vec(),
            top_matches: screening.top_matches(),
            scorer_backend: screening.ranked.strategy,
        }
    }

    /// Plain-text rendering for the `ATS_Report.txt` download.
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AtsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ATS Resume Screening Report")?;
        writeln!(f, "Report ID: {}", self.report_id)?;
        writeln!(f, "Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(f)?;

        writeln!(f, "Candidate Details")?;
        writeln!(f, "Name: {}", self.identity.name_or_not_found())?;
        writeln!(f, "Email: {}", self.identity.email_or_not_found())?;
        writeln!(f, "Phone: {}", self.identity.phone_or_not_found())?;
        writeln!(f)?;

        writeln!(f, "Best Job Match")?;
        writeln!(f, "Position: {}", self.best_match.position_title)?;
        writeln!(f, "Company: {}", self.best_match.company_name)?;
        writeln!(f, "Match Score: {:.2}", self.best_match.final_score)?;
        writeln!(f)?;

        writeln!(f, "ATS Score")?;
        writeln!(f, "{} / 100", self.ats_score)?;
        writeln!(f)?;

        writeln!(f, "Skills Detected")?;
        if self.skills.is_empty() {
            writeln!(f, "None")?;
        } else {
            writeln!(f, "{}", self.skills.join(", "))?;
        }
        writeln!(f)?;

        writeln!(f, "Top Recommendations")?;
        for (rank, job) in self.top_matches.iter().enumerate() {
            writeln!(
                f,
                "{}. {} | {} | {:.2}",
                rank + 1,
                job.position_title,
                job.company_name,
                job.final_score
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Scorer: {}", self.scorer_backend)
    }
}
