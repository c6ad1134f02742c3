// Signal extraction from resume text: identity fields, skills, and upload decoding.
// Identity runs on raw text; skills run on normalized text.

pub mod document;
pub mod identity;
pub mod skills;

pub use identity::{extract_identity, CandidateIdentity};
pub use skills::{SkillDictionary, SkillSet};

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
/// `"power bi"` → `"Power Bi"`, `"o'neil"` → `"O'Neil"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_words() {
        assert_eq!(title_case("power bi"), "Power Bi");
        assert_eq!(title_case("JOHN smith"), "John Smith");
        assert_eq!(title_case("data analysis"), "Data Analysis");
    }

    #[test]
    fn test_title_case_restarts_after_non_letters() {
        assert_eq!(title_case("o'neil"), "O'Neil");
        assert_eq!(title_case("mary-jane 2nd"), "Mary-Jane 2Nd");
    }
}
