//! Skill extraction against a fixed keyword dictionary.
//!
//! The dictionary is a plain data table of `(canonical, aliases)` pairs.
//! Adding a skill means adding a row (or a JSON entry at startup), never code.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extraction::title_case;
use crate::text::NormalizedText;

const BUILTIN_SKILLS: &[(&str, &[&str])] = &[
    ("python", &["python"]),
    ("sql", &["sql", "mysql", "postgres", "oracle"]),
    ("power bi", &["power bi", "powerbi"]),
    ("excel", &["excel", "spreadsheet"]),
    ("tableau", &["tableau"]),
    ("ml", &["machine learning", "ml"]),
    ("dl", &["deep learning", "neural network", "dl"]),
    ("nlp", &["nlp", "natural language processing"]),
    ("statistics", &["statistics", "statistical"]),
    ("data analysis", &["data analysis", "data analyst"]),
    ("pandas", &["pandas"]),
    ("numpy", &["numpy"]),
    ("matplotlib", &["matplotlib"]),
    ("seaborn", &["seaborn"]),
    ("git", &["git", "github"]),
    ("jira", &["jira"]),
    ("tensorflow", &["tensorflow"]),
    ("sklearn", &["scikit", "sklearn"]),
];

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("failed to read skill dictionary {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("skill dictionary is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("skill '{0}' has an empty alias")]
    EmptyAlias(String),

    #[error("skill '{0}' has no aliases")]
    NoAliases(String),
}

/// How a dictionary file combines with the built-in table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DictionaryMode {
    #[default]
    Extend,
    Replace,
}

impl FromStr for DictionaryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "extend" => Ok(DictionaryMode::Extend),
            "replace" => Ok(DictionaryMode::Replace),
            other => Err(format!(
                "unknown dictionary mode '{other}' (expected 'extend' or 'replace')"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillEntry {
    pub canonical: String,
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillDictionary {
    entries: Vec<SkillEntry>,
}

impl Default for SkillDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SkillDictionary {
    pub fn builtin() -> Self {
        let entries = BUILTIN_SKILLS
            .iter()
            .map(|(canonical, aliases)| SkillEntry {
                canonical: canonical.to_string(),
                aliases: aliases.iter().map(|a| a.to_string()).collect(),
            })
            .collect();
        Self { entries }
    }

    /// Builds a dictionary from canonical → aliases pairs.
    /// Names and aliases are lowercased; empty aliases are rejected.
    pub fn from_map(map: BTreeMap<String, Vec<String>>) -> Result<Self, DictionaryError> {
        let mut entries = Vec::with_capacity(map.len());
        for (canonical, aliases) in map {
            let canonical = canonical.trim().to_lowercase();
            if aliases.is_empty() {
                return Err(DictionaryError::NoAliases(canonical));
            }
            let mut normalized = Vec::with_capacity(aliases.len());
            for alias in aliases {
                let alias = alias.trim().to_lowercase();
                if alias.is_empty() {
                    return Err(DictionaryError::EmptyAlias(canonical));
                }
                normalized.push(alias);
            }
            entries.push(SkillEntry {
                canonical,
                aliases: normalized,
            });
        }
        Ok(Self { entries })
    }

    pub fn from_json_str(json: &str) -> Result<Self, DictionaryError> {
        let map: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        Self::from_map(map)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, DictionaryError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Loads the dictionary for a running service: the built-in table,
    /// optionally extended or replaced by a JSON file.
    pub fn load(path: Option<&Path>, mode: DictionaryMode) -> Result<Self, DictionaryError> {
        let Some(path) = path else {
            return Ok(Self::builtin());
        };
        let loaded = Self::from_json_file(path)?;
        Ok(match mode {
            DictionaryMode::Replace => loaded,
            DictionaryMode::Extend => {
                let mut merged = Self::builtin();
                merged.extend(loaded);
                merged
            }
        })
    }

    /// Merges another dictionary in. Aliases of an existing canonical skill
    /// are appended; new skills are added at the end.
    pub fn extend(&mut self, other: SkillDictionary) {
        for entry in other.entries {
            match self
                .entries
                .iter_mut()
                .find(|e| e.canonical == entry.canonical)
            {
                Some(existing) => {
                    for alias in entry.aliases {
                        if !existing.aliases.contains(&alias) {
                            existing.aliases.push(alias);
                        }
                    }
                }
                None => self.entries.push(entry),
            }
        }
    }

    pub fn entries(&self) -> &[SkillEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Set of canonical, title-cased skill labels. Iterates in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(BTreeSet<String>);

impl SkillSet {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[cfg(test)]
    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn intersection_count(&self, other: &SkillSet) -> usize {
        self.0.intersection(&other.0).count()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl FromIterator<String> for SkillSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        SkillSet(iter.into_iter().collect())
    }
}

/// Skills present in a normalized text.
pub fn extract_skills(normalized: &NormalizedText, dictionary: &SkillDictionary) -> SkillSet {
    extract_skills_from_text(&normalized.as_text(), dictionary)
}

/// Skills present in arbitrary text, by lowercase substring containment of
/// any alias. A keyword may match inside a larger token ("ml" in "html").
pub fn extract_skills_from_text(text: &str, dictionary: &SkillDictionary) -> SkillSet {
    let haystack = text.to_lowercase();
    dictionary
        .entries()
        .iter()
        .filter(|entry| {
            entry
                .aliases
                .iter()
                .any(|alias| haystack.contains(alias.as_str()))
        })
        .map(|entry| title_case(&entry.canonical))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::normalize;

    fn labels(skills: &SkillSet) -> Vec<&str> {
        skills.iter().collect()
    }

    #[test]
    fn test_builtin_dictionary_has_all_rows() {
        let dictionary = SkillDictionary::builtin();
        assert_eq!(dictionary.len(), 18);
        assert!(dictionary
            .entries()
            .iter()
            .any(|e| e.canonical == "power bi" && e.aliases.contains(&"powerbi".to_string())));
    }

    #[test]
    fn test_extracts_title_cased_labels() {
        let dictionary = SkillDictionary::builtin();
        let skills = extract_skills(&normalize("Skilled in Python and SQL."), &dictionary);
        assert_eq!(labels(&skills), vec!["Python", "Sql"]);
    }

    #[test]
    fn test_alias_maps_to_canonical_once() {
        let dictionary = SkillDictionary::builtin();
        let skills = extract_skills_from_text("MySQL, Postgres and Oracle DBA", &dictionary);
        assert_eq!(labels(&skills), vec!["Sql"]);
    }

    #[test]
    fn test_multi_word_aliases_match() {
        let dictionary = SkillDictionary::builtin();
        let skills = extract_skills(
            &normalize("Built machine learning models; senior data analyst using Power BI"),
            &dictionary,
        );
        assert!(skills.contains("Ml"));
        assert!(skills.contains("Data Analysis"));
        assert!(skills.contains("Power Bi"));
    }

    #[test]
    fn test_substring_match_inside_larger_token() {
        let dictionary = SkillDictionary::builtin();
        let skills = extract_skills(&normalize("html developer"), &dictionary);
        assert!(skills.contains("Ml"));
    }

    #[test]
    fn test_unknown_terms_are_ignored() {
        let dictionary = SkillDictionary::builtin();
        let skills = extract_skills(&normalize("Cobol mainframe veteran"), &dictionary);
        assert!(skills.is_empty());
    }

    #[test]
    fn test_extraction_is_stable_under_renormalization() {
        let dictionary = SkillDictionary::builtin();
        let raw = "Statistical modelling with Pandas, NumPy and TensorFlow; GitHub projects";
        let once = normalize(raw);
        let twice = normalize(&once.as_text());
        assert_eq!(
            extract_skills(&once, &dictionary),
            extract_skills(&twice, &dictionary)
        );
    }

    #[test]
    fn test_labels_are_unique_when_many_aliases_match() {
        let dictionary = SkillDictionary::builtin();
        let skills = extract_skills_from_text("git github git github", &dictionary);
        assert_eq!(skills.len(), 1);
    }

    #[test]
    fn test_json_dictionary_extends_builtin() {
        let mut dictionary = SkillDictionary::builtin();
        let extra =
            SkillDictionary::from_json_str(r#"{"Docker": ["docker", "containers"], "sql": ["sqlite"]}"#)
                .unwrap();
        dictionary.extend(extra);

        assert_eq!(dictionary.len(), 19);
        let skills = extract_skills_from_text("sqlite inside docker", &dictionary);
        assert_eq!(labels(&skills), vec!["Docker", "Sql"]);
    }

    #[test]
    fn test_json_dictionary_rejects_empty_alias() {
        let err = SkillDictionary::from_json_str(r#"{"rust": ["rust", " "]}"#).unwrap_err();
        assert!(matches!(err, DictionaryError::EmptyAlias(name) if name == "rust"));
    }

    #[test]
    fn test_load_replace_mode_uses_file_only() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, br#"{"rust": ["rust", "cargo"]}"#).unwrap();

        let dictionary = SkillDictionary::load(Some(file.path()), DictionaryMode::Replace).unwrap();
        assert_eq!(dictionary.len(), 1);

        let extended = SkillDictionary::load(Some(file.path()), DictionaryMode::Extend).unwrap();
        assert_eq!(extended.len(), 19);
    }

    #[test]
    fn test_load_without_path_is_builtin() {
        let dictionary = SkillDictionary::load(None, DictionaryMode::Replace).unwrap();
        assert_eq!(dictionary, SkillDictionary::builtin());
    }

    #[test]
    fn test_dictionary_mode_parsing() {
        assert_eq!("extend".parse::<DictionaryMode>(), Ok(DictionaryMode::Extend));
        assert_eq!(" REPLACE ".parse::<DictionaryMode>(), Ok(DictionaryMode::Replace));
        assert!("merge".parse::<DictionaryMode>().is_err());
    }
}
