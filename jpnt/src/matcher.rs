//! Segmentation, phoneme conversion, and furigana override (spec.md §4.4).
//!
//! `Segmenter` and `PhonemeConverter` are thin wrappers over the same
//! [`TrieView`] walk; neither duplicates [`lookup_longest`], the way
//! `szr_tokenise::Tokeniser` is a single trait both the main and user
//! dictionaries of `szr_morph::Dict` implement against instead of each
//! growing its own copy of the matching loop.

use crate::trie::{lookup_longest, TrieView};

/// Runtime behaviour toggle (spec.md §9): whether `convert` segments into
/// words before converting, or feeds the whole input straight to the
/// phoneme converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub segment_words: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            segment_words: true,
        }
    }
}

/// Code points treated as whitespace by the segmenter: dropped from the
/// output, and always a grammar-run boundary.
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// One token produced by [`Segmenter::segment`]: either a dictionary match
/// (word-boundary value present, possibly empty) or a grammar run (no match
/// found anywhere in the span).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word<'a> {
    pub text: &'a [char],
    pub start: usize,
}

/// Word segmentation pass: treats value-presence (empty or not) as a
/// boundary signal, not as a replacement (spec §4.4).
pub struct Segmenter<'a, T: TrieView + ?Sized> {
    trie: &'a T,
}

impl<'a, T: TrieView + ?Sized> Segmenter<'a, T> {
    pub fn new(trie: &'a T) -> Self {
        Segmenter { trie }
    }

    /// Splits `chars` into words: dictionary matches and grammar runs,
    /// in input order, with whitespace dropped and always closing any
    /// open grammar run.
    pub fn segment<'c>(&self, chars: &'c [char]) -> Vec<Word<'c>> {
        let mut words = Vec::new();
        let mut pos = 0usize;
        let mut run_start: Option<usize> = None;

        let flush_run = |words: &mut Vec<Word<'c>>, run_start: &mut Option<usize>, end: usize| {
            if let Some(start) = run_start.take() {
                if end > start {
                    words.push(Word {
                        text: &chars[start..end],
                        start,
                    });
                }
            }
        };

        while pos < chars.len() {
            if is_whitespace(chars[pos]) {
                flush_run(&mut words, &mut run_start, pos);
                pos += 1;
                continue;
            }

            match lookup_longest(self.trie, &chars[pos..]) {
                Some((_, len)) if len >= 1 => {
                    flush_run(&mut words, &mut run_start, pos);
                    words.push(Word {
                        text: &chars[pos..pos + len],
                        start: pos,
                    });
                    pos += len;
                }
                _ => {
                    if run_start.is_none() {
                        run_start = Some(pos);
                    }
                    pos += 1;
                }
            }
        }
        flush_run(&mut words, &mut run_start, pos);
        words
    }
}

/// Phoneme conversion pass: a non-empty value replaces the matched span; an
/// empty value (word-marker) is not a replacement and the single code point
/// at the cursor is copied through, the same as a complete lookup miss
/// (spec §4.4, §7: "the matcher is total").
pub struct PhonemeConverter<'a, T: TrieView + ?Sized> {
    trie: &'a T,
}

impl<'a, T: TrieView + ?Sized> PhonemeConverter<'a, T> {
    pub fn new(trie: &'a T) -> Self {
        PhonemeConverter { trie }
    }

    /// Converts one run of code points to phonemes, appending matched spans
    /// to `matches`. `base_offset` is `chars`'s own starting position within
    /// the original input, so `start_code_point` in the resulting records is
    /// always an index into the caller's original text, not into `chars`.
    pub fn convert_chars(
        &self,
        chars: &[char],
        base_offset: usize,
        out: &mut String,
        matches: &mut Vec<MatchRecord>,
    ) {
        let mut pos = 0usize;
        while pos < chars.len() {
            match lookup_longest(self.trie, &chars[pos..]) {
                Some((value, len)) if !value.is_empty() => {
                    let byte_start = out.len();
                    out.push_str(&value);
                    matches.push(MatchRecord {
                        byte_range: byte_start..out.len(),
                        phonemes: value,
                        start_code_point: base_offset + pos,
                        len_code_points: len,
                    });
                    pos += len;
                }
                _ => {
                    out.push(chars[pos]);
                    pos += 1;
                }
            }
        }
    }
}

/// One matched dictionary span in the converted output (spec §6: "an
/// optional list of match records `(original_span, phoneme,
/// start_code_point_index)`").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub byte_range: std::ops::Range<usize>,
    pub phonemes: String,
    pub start_code_point: usize,
    pub len_code_points: usize,
}

/// The full result of [`convert_detailed`]: the joined phoneme string, every
/// matched span, and the code points that passed through unreplaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertResult {
    pub phonemes: String,
    pub matches: Vec<MatchRecord>,
    pub unmatched: Vec<char>,
}

const BRACKETS: &[(char, char)] = &[('「', '」'), ('【', '】'), ('『', '』'), ('[', ']')];

/// A furigana-overridden span: `base` is the text preceding the bracket
/// (back to the previous pair or start of input, at `base_start`), `hint` is
/// the bracketed pronunciation text fed to the phoneme converter on its own.
struct FuriganaSegment<'a> {
    base: &'a [char],
    base_start: usize,
    hint: &'a [char],
}

/// Scans `chars` for furigana bracket pairs (spec §4.4), returning
/// alternating plain-text and furigana-hinted segments in input order.
/// Unclosed brackets degrade to literal characters, i.e. they simply do not
/// split off a segment and are left for the caller's plain-text pass.
enum Segment<'a> {
    Plain(&'a [char], usize),
    Furigana(FuriganaSegment<'a>),
}

fn split_furigana(chars: &[char]) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut cursor = 0usize;
    let mut pos = 0usize;

    while pos < chars.len() {
        let open = BRACKETS.iter().find(|&&(o, _)| o == chars[pos]);
        let Some(&(_, close)) = open else {
            pos += 1;
            continue;
        };

        let Some(close_rel) = chars[pos + 1..].iter().position(|&c| c == close) else {
            // Unclosed bracket: leave it as literal text and keep scanning
            // past it, not at it, so we don't loop on the same bracket.
            pos += 1;
            continue;
        };
        let close_pos = pos + 1 + close_rel;

        // A bracket with no preceding text drops the whole segment, hint
        // included, rather than surfacing an ownerless pronunciation (ground
        // truth: `parse_furigana_hints`'s `if base_text:` guard).
        if cursor < pos {
            segments.push(Segment::Furigana(FuriganaSegment {
                base: &chars[cursor..pos],
                base_start: cursor,
                hint: &chars[pos + 1..close_pos],
            }));
        }
        cursor = close_pos + 1;
        pos = cursor;
    }

    if cursor < chars.len() {
        segments.push(Segment::Plain(&chars[cursor..], cursor));
    }

    segments
}

/// Converts `text` to an IPA phoneme string plus match/unmatched detail
/// (spec §6). Furigana brackets are resolved first; each bracket's hint is
/// converted on its own and replaces the base span, and the base span
/// itself is discarded (the hint is the pronunciation override for it).
pub fn convert_detailed<T: TrieView + ?Sized>(
    trie: &T,
    text: &str,
    cfg: Config,
) -> ConvertResult {
    let chars: Vec<char> = text.chars().collect();
    let converter = PhonemeConverter::new(trie);

    let has_brackets = BRACKETS.iter().any(|&(o, _)| chars.contains(&o));

    let mut out = String::new();
    let mut matches = Vec::new();

    if has_brackets {
        let segments = split_furigana(&chars);
        let mut first = true;
        for segment in segments {
            match segment {
                Segment::Plain(span, start) => {
                    emit_plain_span(trie, &converter, cfg, span, start, &mut first, &mut out, &mut matches);
                }
                Segment::Furigana(FuriganaSegment {
                    base,
                    base_start,
                    hint,
                }) => {
                    if !first {
                        out.push(' ');
                    }
                    first = false;
                    // The hint alone decides the pronunciation (spec §4.4);
                    // the whole base span is credited as one match record
                    // against the hint's fully-converted phoneme string,
                    // rather than exposing the hint's own internal
                    // sub-matches.
                    let byte_start = out.len();
                    let mut hint_matches = Vec::new();
                    converter.convert_chars(hint, 0, &mut out, &mut hint_matches);
                    matches.push(MatchRecord {
                        byte_range: byte_start..out.len(),
                        phonemes: out[byte_start..].to_owned(),
                        start_code_point: base_start,
                        len_code_points: base.len().max(1),
                    });
                }
            }
        }
    } else {
        let mut first = true;
        emit_plain_span(trie, &converter, cfg, &chars, 0, &mut first, &mut out, &mut matches);
    }

    let unmatched = unmatched_code_points(&chars, &matches);
    ConvertResult {
        phonemes: out,
        matches,
        unmatched,
    }
}

/// Converts one plain (non-furigana-overridden) span, applying word
/// segmentation within it when `cfg.segment_words` is set so that e.g. the
/// tail after a furigana override still splits into its own word tokens
/// (spec scenario 5: `...はバカ` → `... wa baka`, not one fused blob).
/// `first` tracks whether a leading separator space is needed across the
/// whole call chain, matching "joined with single spaces" at every level.
#[allow(clippy::too_many_arguments)]
fn emit_plain_span<T: TrieView + ?Sized>(
    trie: &T,
    converter: &PhonemeConverter<T>,
    cfg: Config,
    span: &[char],
    start: usize,
    first: &mut bool,
    out: &mut String,
    matches: &mut Vec<MatchRecord>,
) {
    if span.is_empty() {
        return;
    }
    if cfg.segment_words {
        let words = Segmenter::new(trie).segment(span);
        for word in words {
            if !*first {
                out.push(' ');
            }
            *first = false;
            converter.convert_chars(word.text, start + word.start, out, matches);
        }
    } else {
        if !*first {
            out.push(' ');
        }
        *first = false;
        converter.convert_chars(span, start, out, matches);
    }
}

/// Code points from `chars` not covered by any matched span's code-point
/// range and not whitespace (which is dropped deliberately, not "unmatched"
/// in the spec §6 sense of "matched nothing").
fn unmatched_code_points(chars: &[char], matches: &[MatchRecord]) -> Vec<char> {
    let mut covered = vec![false; chars.len()];
    for m in matches {
        for i in m.start_code_point..m.start_code_point + m.len_code_points {
            if i < covered.len() {
                covered[i] = true;
            }
        }
    }
    chars
        .iter()
        .zip(covered.iter())
        .filter(|(&c, &is_covered)| !is_covered && !is_whitespace(c))
        .map(|(&c, _)| c)
        .collect()
}

/// The top-level entry point (spec §1, §6): joins per-word phonemes with a
/// single space when segmentation is enabled, otherwise a single straight
/// pass with no spaces introduced.
pub fn convert<T: TrieView + ?Sized>(trie: &T, text: &str, cfg: Config) -> String {
    convert_detailed(trie, text, cfg).phonemes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::TrieBuilder;
    use pretty_assertions::assert_eq;

    fn dict() -> TrieBuilder {
        let mut t = TrieBuilder::new();
        t.insert("こんにちは", "koɴniʨiha");
        t.insert("東京", "toːkʲoː");
        t.insert("世界", "sekai");
        t.insert("健太", "keɴta");
        t.insert("けんた", "keɴta");
        t.insert("は", ""); // word-only particle marker
        t.insert("バカ", "baka");
        t.insert("を", "wo");
        t
    }

    #[test]
    fn scenario_1_konnichiwa() {
        let t = dict();
        assert_eq!(
            convert(&t, "こんにちは", Config::default()),
            "koɴniʨiha"
        );
    }

    #[test]
    fn scenario_2_known_compound_wins_over_prefix() {
        let t = dict();
        assert_eq!(convert(&t, "東京", Config::default()), "toːkʲoː");
    }

    #[test]
    fn scenario_6_ascii_and_unknown_punctuation_pass_through() {
        let t = dict();
        let out = convert(&t, "Hello、世界", Config::default());
        assert_eq!(out, "Hello、sekai");
    }

    #[test]
    fn unknown_text_passes_through_verbatim() {
        let t = TrieBuilder::new();
        assert_eq!(convert(&t, "xyz123", Config::default()), "xyz123");
    }

    #[test]
    fn empty_value_is_a_boundary_not_a_replacement() {
        let t = dict();
        let result = convert_detailed(&t, "は", Config::default());
        assert_eq!(result.phonemes, "は");
    }

    #[test]
    fn segmentation_joins_words_with_single_spaces() {
        let t = dict();
        let out = convert(&t, "健太は", Config { segment_words: true });
        assert_eq!(out, "keɴta は");
    }

    #[test]
    fn no_segmentation_introduces_no_spaces() {
        let t = dict();
        let out = convert(&t, "健太は", Config { segment_words: false });
        assert_eq!(out, "keɴtaは");
    }

    #[test]
    fn furigana_override_uses_bracketed_hint() {
        let t = dict();
        let out = convert(&t, "健太「けんた」はバカ", Config::default());
        assert_eq!(out, "keɴta は baka");
    }

    #[test]
    fn unclosed_bracket_degrades_to_literal_text() {
        let t = dict();
        let result = convert_detailed(&t, "「けんた", Config { segment_words: false });
        assert_eq!(result.phonemes, "「keɴta");
    }

    #[test]
    fn furigana_with_no_preceding_text_drops_hint_entirely() {
        // A bracket with nothing before it has no base span to attach a
        // pronunciation to, so the whole bracket — hint included — vanishes
        // rather than surfacing an ownerless "keɴta" in the output.
        let t = dict();
        let out = convert(&t, "「けんた」です", Config::default());
        assert_eq!(out, "です");
    }

    #[test]
    fn segmenter_bundles_unmatched_run_as_single_token() {
        let t = dict();
        let chars: Vec<char> = "abc健太xyz".chars().collect();
        let words = Segmenter::new(&t).segment(&chars);
        let rendered: Vec<String> = words.iter().map(|w| w.text.iter().collect()).collect();
        assert_eq!(rendered, vec!["abc", "健太", "xyz"]);
    }

    #[test]
    fn segmenter_drops_whitespace_and_closes_run() {
        let t = dict();
        let chars: Vec<char> = "abc 健太".chars().collect();
        let words = Segmenter::new(&t).segment(&chars);
        let rendered: Vec<String> = words.iter().map(|w| w.text.iter().collect()).collect();
        assert_eq!(rendered, vec!["abc", "健太"]);
    }

    #[test]
    fn unmatched_code_points_are_reported() {
        let t = dict();
        let result = convert_detailed(&t, "東京z", Config { segment_words: false });
        assert_eq!(result.unmatched, vec!['z']);
    }
}
