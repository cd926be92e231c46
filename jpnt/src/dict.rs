//! Dictionary entries, normalization, and the trie-building pipeline
//! (ambient — grounded in the builder input contract of spec.md §6).
//!
//! `Builder` is the single writer spec §9 Open Question (a) calls for: the
//! only place that decides what happens when the conjugation generator's
//! output collides with the source dictionary or word list, matching how
//! `legacy::dart::builder::IndexBuilder` is the sole place that dedupes and
//! sorts before handing records to the trie.

use std::collections::BTreeMap;

use tracing::warn;

use crate::conjugate::conjugate_all;
use crate::error::{self, Result};
use crate::trie::TrieBuilder;
use crate::vocab::{self, normalize_phoneme};

/// One raw `(text, phoneme)` pair from the input dictionary (spec §3). An
/// empty `phoneme` marks `text` as a word-only entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictEntry {
    pub text: String,
    pub phoneme: String,
}

impl DictEntry {
    pub fn new(text: impl Into<String>, phoneme: impl Into<String>) -> Self {
        DictEntry {
            text: text.into(),
            phoneme: phoneme.into(),
        }
    }
}

/// Non-fatal problems found while normalizing the input dictionary (spec
/// §7: "surfaced as a warning report, not a fatal error"). The builder
/// still inserts the offending entries; it only reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// `(text, offending phoneme character)` pairs outside the fixed IPA
    /// vocabulary (spec §3).
    pub vocab_warnings: Vec<(String, char)>,
    /// Dictionary keys generated by conjugation that collided with an
    /// existing entry and were dropped in favour of it (spec §4.3
    /// "dictionary dominates generator").
    pub generator_collisions: Vec<String>,
}

/// Ties the pipeline together: normalizes and validates dictionary entries,
/// expands verb paradigms, merges in the word list, and serializes a single
/// trie holding both dictionaries (spec §4.2 data flow).
#[derive(Debug, Default)]
pub struct Builder {
    entries: Vec<DictEntry>,
    words: Vec<String>,
}

impl Builder {
    pub fn new() -> Self {
        Builder::default()
    }

    /// Adds a raw dictionary entry. `text` must be non-empty (spec §3); an
    /// empty key is rejected as a `Config` error at [`Builder::build`] time
    /// rather than here, so callers can batch-add before validating.
    pub fn add_entry(&mut self, entry: DictEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    pub fn add_entries(&mut self, entries: impl IntoIterator<Item = DictEntry>) -> &mut Self {
        self.entries.extend(entries);
        self
    }

    /// Adds a word-list line. Blank lines are the caller's responsibility to
    /// skip (the textual word-list format in spec §6 ignores them at parse
    /// time, before they ever reach the builder).
    pub fn add_word(&mut self, word: impl Into<String>) -> &mut Self {
        self.words.push(word.into());
        self
    }

    pub fn add_words(&mut self, words: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.words.extend(words.into_iter().map(Into::into));
        self
    }

    /// Runs the full pipeline and returns the populated trie, a build
    /// report, and the entry counts the binary header wants (spec §4.2).
    /// Does not serialize; call [`crate::codec::write_trie`] separately,
    /// the way `IndexBuilder::build` hands back a trie for the caller to do
    /// with as it pleases.
    pub fn build(&self) -> Result<(TrieBuilder, BuildReport, BuildCounts)> {
        for entry in &self.entries {
            if entry.text.is_empty() {
                return Err(error::Error::Config {
                    reason: "dictionary key must not be empty".to_owned(),
                });
            }
        }

        let mut report = BuildReport::default();

        // Normalize and strip punctuation first, so the conjugation engine
        // and trie never see either raw ligature spellings or entries that
        // exist only to be passed through untouched (spec §6).
        let normalized: Vec<DictEntry> = self
            .entries
            .iter()
            .filter(|e| !e.text.chars().all(vocab::is_punctuation))
            .map(|e| DictEntry::new(e.text.clone(), normalize_phoneme(&e.phoneme)))
            .collect();

        for entry in &normalized {
            for c in entry.phoneme.chars() {
                if !vocab::is_vocab_char(c) {
                    report.vocab_warnings.push((entry.text.clone(), c));
                }
            }
        }

        // Dictionary-wins map: source entries first, so a later `extend`
        // from the generator can never overwrite one (spec §4.3, §9 Open
        // Question (a): the builder enforces this, not map-insert order).
        let mut merged: BTreeMap<String, String> = BTreeMap::new();
        for entry in &normalized {
            merged.insert(entry.text.clone(), entry.phoneme.clone());
        }

        let conjugated = conjugate_all(
            normalized
                .iter()
                .map(|e| (e.text.as_str(), e.phoneme.as_str())),
        );
        for (text, phoneme) in conjugated {
            if merged.contains_key(&text) {
                report.generator_collisions.push(text);
            } else {
                merged.insert(text, phoneme);
            }
        }

        let n_phoneme_entries = merged.values().filter(|p| !p.is_empty()).count() as u32;

        // Word list: union of the source list and every generated surface
        // form (spec §6), stored as the empty-string word-marker unless a
        // phoneme entry already claims the same key.
        let mut word_set: std::collections::BTreeSet<String> = self.words.iter().cloned().collect();
        word_set.extend(merged.keys().cloned());
        let n_word_entries = word_set.len() as u32;

        let mut trie = TrieBuilder::new();
        for (text, phoneme) in &merged {
            trie.insert(text, phoneme.clone());
        }
        for word in &word_set {
            if !merged.contains_key(word) {
                trie.insert(word, "");
            }
        }

        for (text, c) in &report.vocab_warnings {
            warn!(%text, bad_char = %c, "phoneme value contains a non-vocabulary character");
        }
        for text in &report.generator_collisions {
            warn!(%text, "generated conjugation collided with an existing dictionary entry");
        }

        Ok((
            trie,
            report,
            BuildCounts {
                n_phoneme_entries,
                n_word_entries,
            },
        ))
    }
}

/// Header accounting fields the codec wants but does not itself track (spec
/// §4.2: "caller-supplied accounting fields").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildCounts {
    pub n_phoneme_entries: u32,
    pub n_word_entries: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::lookup_longest;
    use pretty_assertions::assert_eq;

    #[test]
    fn rejects_empty_key() {
        let mut b = Builder::new();
        b.add_entry(DictEntry::new("", "nani"));
        let err = b.build().unwrap_err();
        assert!(matches!(err, error::Error::Config { .. }));
    }

    #[test]
    fn strips_punctuation_entries() {
        let mut b = Builder::new();
        b.add_entry(DictEntry::new("、", "ignored"));
        b.add_entry(DictEntry::new("猫", "neko"));
        let (trie, _, _) = b.build().unwrap();
        let chars: Vec<char> = "猫".chars().collect();
        assert!(lookup_longest(&trie, &chars).is_some());
        let chars: Vec<char> = "、".chars().collect();
        assert!(lookup_longest(&trie, &chars).is_none());
    }

    #[test]
    fn normalizes_ligatures_on_insert() {
        let mut b = Builder::new();
        b.add_entry(DictEntry::new("通知", "tsɯːʨi"));
        let (trie, _, _) = b.build().unwrap();
        let chars: Vec<char> = "通知".chars().collect();
        let (value, _) = lookup_longest(&trie, &chars).unwrap();
        assert_eq!(value, "ʦɯːʨi");
    }

    #[test]
    fn dictionary_wins_over_generator_on_conflict() {
        let mut b = Builder::new();
        b.add_entry(DictEntry::new("書く", "kakɯ"));
        // a dictionary entry that happens to collide with a generated form
        b.add_entry(DictEntry::new("書いた", "special"));
        let (trie, report, _) = b.build().unwrap();
        let chars: Vec<char> = "書いた".chars().collect();
        let (value, _) = lookup_longest(&trie, &chars).unwrap();
        assert_eq!(value, "special");
        assert!(report.generator_collisions.contains(&"書いた".to_owned()));
    }

    #[test]
    fn word_list_entries_become_markers() {
        let mut b = Builder::new();
        b.add_word("ほんとうに");
        let (trie, _, _) = b.build().unwrap();
        let chars: Vec<char> = "ほんとうに".chars().collect();
        let (value, _) = lookup_longest(&trie, &chars).unwrap();
        assert_eq!(value, "");
    }

    #[test]
    fn reports_non_vocabulary_phoneme_characters() {
        let mut b = Builder::new();
        b.add_entry(DictEntry::new("謎", "xyz"));
        let (_, report, _) = b.build().unwrap();
        assert!(!report.vocab_warnings.is_empty());
    }

    #[test]
    fn conjugated_forms_are_inserted() {
        let mut b = Builder::new();
        b.add_entry(DictEntry::new("食べる", "tabeɾɯ"));
        let (trie, _, _) = b.build().unwrap();
        let chars: Vec<char> = "食べた".chars().collect();
        let (value, _) = lookup_longest(&trie, &chars).unwrap();
        assert_eq!(value, "tabeta");
    }
}
