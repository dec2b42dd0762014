//! Sentence segmentation
//!
//! Rule-based splitting on terminal punctuation followed by a capitalized
//! word, with an abbreviation list and initial detection to avoid breaking
//! on "Dr. Smith" or "J. Doe".

use std::collections::HashSet;

/// Splits a text buffer into sentences
pub trait SentenceSplitter: Send + Sync {
    /// Return trimmed, non-empty sentences in text order.
    ///
    /// Every returned slice is a substring of `text`.
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

const CLOSERS: &[char] = &['"', '\'', ')', ']', '}', '\u{201D}', '\u{2019}', '\u{00BB}'];
const OPENERS: &[char] = &['"', '\'', '(', '[', '{', '\u{201C}', '\u{2018}', '\u{00AB}'];

const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "vs", "etc", "inc", "ltd", "co",
    "corp", "plc", "llc", "no", "nos", "fig", "figs", "eq", "approx", "dept", "est", "vol",
    "pp", "ch", "sec", "ref", "al", "cf", "ca", "jan", "feb", "mar", "apr", "jun", "jul",
    "aug", "sep", "sept", "oct", "nov", "dec", "gov", "gen", "rep", "sen", "rev", "hon",
];

/// Punctuation-driven sentence splitter
#[derive(Debug, Clone)]
pub struct PunctSentenceSplitter {
    abbreviations: HashSet<String>,
}

impl Default for PunctSentenceSplitter {
    fn default() -> Self {
        Self {
            abbreviations: ABBREVIATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PunctSentenceSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an abbreviation (without its trailing period)
    pub fn with_abbreviation(mut self, abbreviation: &str) -> Self {
        self.abbreviations
            .insert(abbreviation.trim_end_matches('.').to_lowercase());
        self
    }

    fn ends_sentence(&self, token: &str, next: Option<&str>) -> bool {
        let core = token.trim_end_matches(CLOSERS);
        match core.chars().last() {
            Some('!') | Some('?') => true,
            Some('.') | Some('\u{2026}') => match next {
                None => true,
                Some(next) => !self.is_abbreviation(core) && starts_sentence(next),
            },
            _ => false,
        }
    }

    fn is_abbreviation(&self, core: &str) -> bool {
        let word = core.trim_end_matches('.').trim_start_matches(OPENERS);
        if word.is_empty() {
            return false;
        }
        if self.abbreviations.contains(&word.to_lowercase()) {
            return true;
        }

        // Initials ("J.") and dotted forms ("e.g.", "U.S.")
        let mut chars = word.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return c.is_alphabetic();
        }
        word.contains('.')
            && word
                .split('.')
                .all(|part| !part.is_empty() && part.chars().count() <= 2 && part.chars().all(char::is_alphabetic))
    }
}

fn starts_sentence(token: &str) -> bool {
    token
        .trim_start_matches(OPENERS)
        .chars()
        .next()
        .map_or(false, |c| c.is_uppercase() || c.is_numeric())
}

/// Whitespace-separated tokens with their byte offsets
fn tokens(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;
    for (idx, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                out.push((s, &text[s..idx]));
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push((s, &text[s..]));
    }
    out
}

impl SentenceSplitter for PunctSentenceSplitter {
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let tokens = tokens(text);
        let mut sentences = Vec::new();
        let mut begin: Option<usize> = None;

        for (i, &(offset, token)) in tokens.iter().enumerate() {
            let start = *begin.get_or_insert(offset);
            let next = tokens.get(i + 1).map(|(_, t)| *t);
            if self.ends_sentence(token, next) {
                sentences.push(&text[start..offset + token.len()]);
                begin = None;
            }
        }

        if let Some(start) = begin {
            let rest = text[start..].trim();
            if !rest.is_empty() {
                sentences.push(rest);
            }
        }

        sentences
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Vec<&str> {
        PunctSentenceSplitter::new().split(text)
    }

    #[test]
    fn test_splits_on_terminal_punctuation() {
        assert_eq!(
            split("We cut waste. Emissions fell by 10%! Was it enough? Yes. "),
            vec!["We cut waste.", "Emissions fell by 10%!", "Was it enough?", "Yes."]
        );
    }

    #[test]
    fn test_requires_capitalized_follower_after_period() {
        assert_eq!(
            split("Revenue grew 3.5 percent vs. last year. Costs fell."),
            vec!["Revenue grew 3.5 percent vs. last year.", "Costs fell."]
        );
        assert_eq!(split("see section 4. below for detail"), vec!["see section 4. below for detail"]);
    }

    #[test]
    fn test_abbreviations_and_initials_do_not_split() {
        assert_eq!(
            split("Dr. Smith chairs the board. J. Doe leads ESG at Acme Inc. in Europe."),
            vec![
                "Dr. Smith chairs the board.",
                "J. Doe leads ESG at Acme Inc. in Europe."
            ]
        );
        assert_eq!(
            split("Operations in the U.S. Midwest expanded."),
            vec!["Operations in the U.S. Midwest expanded."]
        );
    }

    #[test]
    fn test_closing_quotes_stay_with_sentence() {
        assert_eq!(
            split("He said \"we are net zero.\" The audit disagreed."),
            vec!["He said \"we are net zero.\"", "The audit disagreed."]
        );
    }

    #[test]
    fn test_sentence_starting_with_number() {
        assert_eq!(
            split("Targets were set. 2030 is the deadline."),
            vec!["Targets were set.", "2030 is the deadline."]
        );
    }

    #[test]
    fn test_unterminated_tail_is_kept() {
        assert_eq!(split("Scope 1 emissions  "), vec!["Scope 1 emissions"]);
        assert!(split("   ").is_empty());
    }

    #[test]
    fn test_custom_abbreviation() {
        let splitter = PunctSentenceSplitter::new().with_abbreviation("Env.");
        assert_eq!(splitter.split("See Env. Report."), vec!["See Env. Report."]);
    }

    #[test]
    fn test_sentences_are_substrings() {
        let text = "Alpha beta.  Gamma delta?\u{201C}Quoted\u{201D} end.";
        for sentence in split(text) {
            assert!(text.contains(sentence));
        }
    }
}
