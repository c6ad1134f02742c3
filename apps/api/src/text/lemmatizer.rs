//! Rule-based noun lemmatizer.
//!
//! Reduces plural nouns to their dictionary form using WordNet-style suffix
//! rules plus an exception table. There is no part-of-speech context, so every
//! token is treated as a noun: verb and adjective inflections (`-ing`, `-ed`)
//! pass through unchanged.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

/// Irregular plurals that suffix rules cannot recover. This includes the
/// `-zes`, `-ses` and `-oes` plurals that take an extra `es`, since the bare
/// `s` rule is right for the common case (`sizes`, `cases`, `shoes`).
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("analyses", "analysis"),
    ("axes", "axis"),
    ("bases", "basis"),
    ("buses", "bus"),
    ("children", "child"),
    ("criteria", "criterion"),
    ("diagnoses", "diagnosis"),
    ("echoes", "echo"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("heroes", "hero"),
    ("hypotheses", "hypothesis"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("men", "man"),
    ("mice", "mouse"),
    ("people", "people"),
    ("phenomena", "phenomenon"),
    ("potatoes", "potato"),
    ("quizzes", "quiz"),
    ("salesmen", "salesman"),
    ("teeth", "tooth"),
    ("theses", "thesis"),
    ("tomatoes", "tomato"),
    ("vetoes", "veto"),
    ("viruses", "virus"),
    ("vertices", "vertex"),
    ("women", "woman"),
];

/// Terms that end in `s` but are already base forms.
const INVARIANT_NOUNS: &[&str] = &[
    "alias",
    "analytics",
    "atlas",
    "bias",
    "canvas",
    "economics",
    "ethics",
    "kubernetes",
    "logistics",
    "mathematics",
    "news",
    "pandas",
    "physics",
    "robotics",
    "series",
    "species",
    "statistics",
    "status",
];

/// Suffix rewrites, tried in order. Longer suffixes come first so that
/// `classes` hits `sses` before the bare `s` rule. There is no `zes` rule:
/// `sizes` must become `size`, and `quizzes` is in the irregular table.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("sses", "ss"),
    ("ies", "y"),
    ("xes", "x"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("s", ""),
];

static IRREGULAR: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| IRREGULAR_PLURALS.iter().copied().collect());

static INVARIANT: Lazy<HashSet<&'static str>> =
    Lazy::new(|| INVARIANT_NOUNS.iter().copied().collect());

/// Returns the noun base form of a lowercase ASCII token.
pub fn lemmatize(token: &str) -> String {
    if let Some(lemma) = IRREGULAR.get(token) {
        return (*lemma).to_string();
    }
    if token.len() <= 3 || INVARIANT.contains(token) || has_singular_ending(token) {
        return token.to_string();
    }

    for (suffix, replacement) in SUFFIX_RULES {
        if let Some(stem) = token.strip_suffix(suffix) {
            // "ies" on a short word ("ties", "pies") drops only the "s".
            if *suffix == "ies" && stem.len() < 2 {
                return token[..token.len() - 1].to_string();
            }
            return format!("{stem}{replacement}");
        }
    }

    token.to_string()
}

fn has_singular_ending(token: &str) -> bool {
    token.ends_with("ss") || token.ends_with("us") || token.ends_with("is")
}
