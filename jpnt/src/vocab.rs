//! The fixed IPA vocabulary and the text-normalization tables that sit in
//! front of it (spec.md §3, §6).

/// Every code point a phoneme value is allowed to contain.
///
/// Builder-time validation against this set is advisory only (spec §7):
/// offending entries are reported, never dropped.
pub const IPA_VOCAB: &[char] = &[
    // affricate ligatures
    'ʥ', 'ʨ', 'ʦ', 'ʣ', 'ʧ', 'ʤ', // vowels
    'a', 'i', 'ɯ', 'e', 'o', // moraic nasal, glottal stop
    'ɴ', 'ʔ', // palatal approximant
    'j', // fricatives
    'ɕ', 'ç', 'ɸ', // tap, approximant
    'ɾ', 'ɰ', // gemination
    'ː', // plain consonants, spelled out in ASCII per the rest of the
    // dictionary's phoneme strings (kakɯ, koɴniʨiha, toːkʲoː, ...), plus
    // the palatalization modifier ʲ used for the -kyo/-sho/... row
    'k', 'g', 's', 'z', 't', 'd', 'n', 'h', 'b', 'p', 'm', 'r', 'w', 'ʲ',
];

pub fn is_vocab_char(c: char) -> bool {
    IPA_VOCAB.contains(&c)
}

/// First match wins; longer sequences are listed first so that, e.g., `dʒ`
/// is not accidentally read as `d` followed by a lone `ʒ`.
const LIGATURE_SUBSTITUTIONS: &[(&str, char)] = &[
    ("dʑ", 'ʥ'),
    ("tɕ", 'ʨ'),
    ("ts", 'ʦ'),
    ("dz", 'ʣ'),
    ("tʃ", 'ʧ'),
    ("dʒ", 'ʤ'),
];

/// Applies the multi-character-to-ligature substitution table (spec §6),
/// longest match first, to a raw phoneme string from an input dictionary.
pub fn normalize_phoneme(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let chars: Vec<char> = raw.chars().collect();
    let mut i = 0;
    'outer: while i < chars.len() {
        for (pattern, ligature) in LIGATURE_SUBSTITUTIONS {
            let plen = pattern.chars().count();
            if i + plen <= chars.len() && chars[i..i + plen].iter().collect::<String>() == *pattern
            {
                out.push(*ligature);
                i += plen;
                continue 'outer;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Punctuation that is stripped from the dictionary before serialization so
/// that it always passes through conversion unchanged (spec §6).
pub const PUNCTUATION: &[char] = &[
    '、', '。', '「', '」', '『', '』', '【', '】', '[', ']', '(', ')', '（', '）', '・', '〜',
    '!', '?', '！', '？', ',', '.', '　',
];

pub fn is_punctuation(c: char) -> bool {
    PUNCTUATION.contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalizes_known_sequences() {
        assert_eq!(normalize_phoneme("konnitɕiha"), "konniʨiha");
        assert_eq!(normalize_phoneme("tsɯkɯe"), "ʦɯkɯe");
        assert_eq!(normalize_phoneme("adʒi"), "aʤi");
    }

    #[test]
    fn leaves_unrelated_text_alone() {
        assert_eq!(normalize_phoneme("koɴniʨiha"), "koɴniʨiha");
        assert_eq!(normalize_phoneme(""), "");
    }

    #[test]
    fn longest_match_wins_for_overlap() {
        // "dzu" must not be read as "d" + "zu"; the "dz" pair takes priority.
        assert_eq!(normalize_phoneme("dzɯ"), "ʣɯ");
    }

    #[test]
    fn vocab_membership() {
        assert!(is_vocab_char('ɯ'));
        assert!(is_vocab_char('ʥ'));
        assert!(is_vocab_char('k'));
        assert!(!is_vocab_char('x'));
        assert!(!is_vocab_char('q'));
    }
}
