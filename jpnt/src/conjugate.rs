//! Verb classification and paradigm generation (spec.md §4.3).
//!
//! The classifier is strictly lexical-plus-phonetic, matched against the
//! exact ordered rule list in the specification: no morphological analyzer,
//! no part-of-speech model, just string comparisons against `text` and
//! `phoneme` in a fixed order.

pub mod tables;

use std::collections::BTreeMap;

use tables::{ColumnRows, TeTaGroup};

/// The closed set of verb classes this engine recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbClass {
    Ichidan,
    GodanU,
    GodanK,
    GodanG,
    GodanS,
    GodanT,
    GodanN,
    GodanB,
    GodanM,
    GodanR,
    Iku,
    Aru,
    Suru,
    Kuru,
    SuruCompound,
    KuruCompound,
}

/// Everything before the conjugated tail, for a simple (non-compound) verb:
/// text with the final kana stripped, phoneme with the final stem-vowel
/// syllable stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stem {
    pub text: String,
    pub phoneme: String,
}

/// Everything before する/来る/くる, for a compound verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    pub text: String,
    pub phoneme: String,
}

/// The result of classification: a verb class plus whatever carrier (stem or
/// prefix) that class needs to generate its paradigm. Fully-irregular verbs
/// (`Suru`, `Kuru`) carry neither — their paradigm is a literal table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedVerb {
    pub class: VerbClass,
    pub stem: Option<Stem>,
    pub prefix: Option<Prefix>,
}

/// Classifies a dictionary entry, following spec §4.3's ordered rule list
/// exactly. Returns `None` if `text` is not a conjugable verb.
pub fn classify(text: &str, phoneme: &str) -> Option<ClassifiedVerb> {
    if text == "する" {
        return Some(ClassifiedVerb {
            class: VerbClass::Suru,
            stem: None,
            prefix: None,
        });
    }
    if tables::IRREGULAR_VERBS[1..].contains(&text) {
        return Some(ClassifiedVerb {
            class: VerbClass::Kuru,
            stem: None,
            prefix: None,
        });
    }

    if text == "ある" {
        return Some(ClassifiedVerb {
            class: VerbClass::Aru,
            stem: Some(strip_godan_stem(text, phoneme, 1)),
            prefix: None,
        });
    }

    if tables::IKU_SPELLINGS.contains(&text) {
        return Some(ClassifiedVerb {
            class: VerbClass::Iku,
            stem: Some(strip_godan_stem(text, phoneme, 1)),
            prefix: None,
        });
    }

    if text.chars().count() > 2 && text.ends_with("する") {
        return Some(ClassifiedVerb {
            class: VerbClass::SuruCompound,
            stem: None,
            prefix: Some(split_prefix(text, phoneme, "する", "sɯɾɯ")),
        });
    }

    if text.chars().count() > 2 && (text.ends_with("来る") || text.ends_with("くる")) {
        let text_suffix = if text.ends_with("来る") { "来る" } else { "くる" };
        return Some(ClassifiedVerb {
            class: VerbClass::KuruCompound,
            stem: None,
            prefix: Some(split_prefix(text, phoneme, text_suffix, "kɯɾɯ")),
        });
    }

    if !text.ends_with('る') {
        // Supplements the distilled rule list with the obvious missing
        // branch: dictionary-form verbs ending in any other u-row kana
        // still need a column assignment (spec scenario 3: 書く → kakɯ
        // must classify as godan_k). See DESIGN.md.
        return classify_non_ru_godan(text, phoneme);
    }

    if tables::GODAN_R_EXCEPTIONS.contains(&text) {
        return Some(ClassifiedVerb {
            class: VerbClass::GodanR,
            stem: Some(strip_godan_stem(text, phoneme, 1)),
            prefix: None,
        });
    }

    let chars: Vec<char> = phoneme.chars().collect();
    let is_ichidan = chars.len() >= 3
        && chars[chars.len() - 2] == 'ɾ'
        && chars[chars.len() - 1] == 'ɯ'
        && matches!(chars[chars.len() - 3], 'i' | 'e');

    if is_ichidan {
        Some(ClassifiedVerb {
            class: VerbClass::Ichidan,
            stem: Some(Stem {
                text: strip_last_chars(text, 1),
                phoneme: strip_last_chars(phoneme, 2),
            }),
            prefix: None,
        })
    } else {
        Some(ClassifiedVerb {
            class: VerbClass::GodanR,
            stem: Some(strip_godan_stem(text, phoneme, 1)),
            prefix: None,
        })
    }
}

fn classify_non_ru_godan(text: &str, phoneme: &str) -> Option<ClassifiedVerb> {
    let class = match text.chars().last()? {
        'う' => VerbClass::GodanU,
        'く' => VerbClass::GodanK,
        'ぐ' => VerbClass::GodanG,
        'す' => VerbClass::GodanS,
        'つ' => VerbClass::GodanT,
        'ぬ' => VerbClass::GodanN,
        'ぶ' => VerbClass::GodanB,
        'む' => VerbClass::GodanM,
        _ => return None,
    };
    let phoneme_strip = if class == VerbClass::GodanU { 1 } else { 2 };
    Some(ClassifiedVerb {
        class,
        stem: Some(Stem {
            text: strip_last_chars(text, 1),
            phoneme: strip_last_chars(phoneme, phoneme_strip),
        }),
        prefix: None,
    })
}

fn strip_last_chars(s: &str, n: usize) -> String {
    let len = s.chars().count();
    s.chars().take(len.saturating_sub(n)).collect()
}

/// Strips the final godan-る kana from `text` and the final `ɾɯ` from
/// `phoneme`. Only called for る-ending verbs, so the strip length is fixed.
fn strip_godan_stem(text: &str, phoneme: &str, _unused: usize) -> Stem {
    Stem {
        text: strip_last_chars(text, 1),
        phoneme: strip_last_chars(phoneme, 2),
    }
}

fn split_prefix(text: &str, phoneme: &str, text_suffix: &str, phoneme_suffix: &str) -> Prefix {
    Prefix {
        text: strip_last_chars(text, text_suffix.chars().count()),
        phoneme: strip_last_chars(phoneme, phoneme_suffix.chars().count()),
    }
}

fn column_rows(class: VerbClass) -> &'static ColumnRows {
    match class {
        VerbClass::GodanU => &tables::GODAN_U,
        VerbClass::GodanK | VerbClass::Iku => &tables::GODAN_K,
        VerbClass::GodanG => &tables::GODAN_G,
        VerbClass::GodanS => &tables::GODAN_S,
        VerbClass::GodanT => &tables::GODAN_T,
        VerbClass::GodanN => &tables::GODAN_N,
        VerbClass::GodanB => &tables::GODAN_B,
        VerbClass::GodanM => &tables::GODAN_M,
        VerbClass::GodanR | VerbClass::Aru => &tables::GODAN_R,
        _ => unreachable!("column_rows called on a non-godan class"),
    }
}

fn te_ta_group(class: VerbClass) -> TeTaGroup {
    match class {
        VerbClass::GodanU | VerbClass::GodanT | VerbClass::GodanR | VerbClass::Aru => {
            TeTaGroup::Doubling
        }
        VerbClass::GodanN | VerbClass::GodanB | VerbClass::GodanM => TeTaGroup::Nasalize,
        VerbClass::GodanK => TeTaGroup::PalatalizeK,
        VerbClass::GodanG => TeTaGroup::PalatalizeG,
        VerbClass::GodanS => TeTaGroup::Sibilant,
        // 行く's defining irregularity: k-column rows, but doubling te/ta.
        VerbClass::Iku => TeTaGroup::Doubling,
        _ => unreachable!("te_ta_group called on a non-godan class"),
    }
}

/// The 14 distinct surface keys a godan (or godan-shaped) verb produces.
/// Potential and passive share a surface form for ichidan only, not here —
/// godan keeps them distinct (書ける vs 書かれる).
fn godan_forms(rows: &ColumnRows, group: TeTaGroup, stem: &Stem) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    let mut insert = |text_suffix: &str, phoneme_suffix: &str| {
        out.insert(
            format!("{}{}", stem.text, text_suffix),
            format!("{}{}", stem.phoneme, phoneme_suffix),
        );
    };

    let (te_t, te_p, ta_t, ta_p) = tables::te_ta_suffix(group);
    insert(ta_t, ta_p); // past
    insert(te_t, te_p); // te-form
    insert(&format!("{}ない", rows.a.0), &format!("{}nai", rows.a.1));
    insert(
        &format!("{}なかった", rows.a.0),
        &format!("{}nakatta", rows.a.1),
    );
    insert(&format!("{}ます", rows.i.0), &format!("{}masɯ", rows.i.1));
    insert(
        &format!("{}ました", rows.i.0),
        &format!("{}maɕita", rows.i.1),
    );
    insert(&format!("{}ません", rows.i.0), &format!("{}maseɴ", rows.i.1));
    insert(
        &format!("{}ませんでした", rows.i.0),
        &format!("{}maseɴdeɕita", rows.i.1),
    );
    insert(&format!("{}ば", rows.e.0), &format!("{}ba", rows.e.1));
    insert(&format!("{}う", rows.o.0), &format!("{}ː", rows.o.1)); // volitional
    insert(rows.e.0, rows.e.1); // imperative
    insert(&format!("{}る", rows.e.0), &format!("{}ɾɯ", rows.e.1)); // potential
    insert(&format!("{}れる", rows.a.0), &format!("{}ɾeɾɯ", rows.a.1)); // passive
    insert(&format!("{}せる", rows.a.0), &format!("{}seɾɯ", rows.a.1)); // causative

    let past_text = format!("{}{}", stem.text, ta_t);
    let past_phoneme = format!("{}{}", stem.phoneme, ta_p);
    out.insert(format!("{}ら", past_text), format!("{}ɾa", past_phoneme));

    out
}

fn ichidan_forms(stem: &Stem) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    let mut insert = |text_suffix: &str, phoneme_suffix: &str| {
        out.insert(
            format!("{}{}", stem.text, text_suffix),
            format!("{}{}", stem.phoneme, phoneme_suffix),
        );
    };
    insert("た", "ta");
    insert("て", "te");
    insert("ない", "nai");
    insert("なかった", "nakatta");
    insert("ます", "masɯ");
    insert("ました", "maɕita");
    insert("ません", "maseɴ");
    insert("ませんでした", "maseɴdeɕita");
    insert("れば", "ɾeba");
    insert("よう", "joː");
    insert("ろ", "ɾo");
    insert("よ", "jo");
    insert("られる", "ɾaɾeɾɯ"); // potential and passive share this form
    insert("させる", "saseɾɯ");
    insert("たら", "taɾa");
    out
}

fn aru_forms(stem: &Stem) -> BTreeMap<String, String> {
    let mut out = godan_forms(&tables::GODAN_R, TeTaGroup::Doubling, stem);
    // ある's suppletive negative: なかった/ない replace the whole word, not
    // just the conjugated tail (spec §4.3: "needs special negative").
    out.remove(&format!("{}らない", stem.text));
    out.remove(&format!("{}らなかった", stem.text));
    out.insert("ない".to_owned(), "nai".to_owned());
    out.insert("なかった".to_owned(), "nakatta".to_owned());
    out
}

fn suru_forms(prefix: Option<&Prefix>) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for &(_, text_suffix, phoneme_suffix) in tables::SURU_FORMS {
        let (text_base, phoneme_base) = match prefix {
            Some(p) => (p.text.as_str(), p.phoneme.as_str()),
            None => ("", ""),
        };
        out.insert(
            format!("{text_base}{text_suffix}"),
            format!("{phoneme_base}{phoneme_suffix}"),
        );
    }
    out
}

fn kuru_forms(prefix: Option<&Prefix>) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for &(_, kanji_suffix, kana_suffix, phoneme_suffix) in tables::KURU_FORMS {
        let (text_base, phoneme_base) = match prefix {
            Some(p) => (p.text.as_str(), p.phoneme.as_str()),
            None => ("", ""),
        };
        out.insert(
            format!("{text_base}{kanji_suffix}"),
            format!("{phoneme_base}{phoneme_suffix}"),
        );
        out.insert(
            format!("{text_base}{kana_suffix}"),
            format!("{phoneme_base}{phoneme_suffix}"),
        );
    }
    out
}

/// Generates the full inflectional paradigm for one dictionary entry. Empty
/// if `text` is not classifiable as a verb.
pub fn conjugate(text: &str, phoneme: &str) -> BTreeMap<String, String> {
    let Some(cv) = classify(text, phoneme) else {
        return BTreeMap::new();
    };

    match cv.class {
        VerbClass::Ichidan => ichidan_forms(cv.stem.as_ref().unwrap()),
        VerbClass::Aru => aru_forms(cv.stem.as_ref().unwrap()),
        VerbClass::Iku => {
            let stem = cv.stem.as_ref().unwrap();
            godan_forms(column_rows(VerbClass::Iku), te_ta_group(VerbClass::Iku), stem)
        }
        VerbClass::GodanU
        | VerbClass::GodanK
        | VerbClass::GodanG
        | VerbClass::GodanS
        | VerbClass::GodanT
        | VerbClass::GodanN
        | VerbClass::GodanB
        | VerbClass::GodanM
        | VerbClass::GodanR => {
            let stem = cv.stem.as_ref().unwrap();
            godan_forms(column_rows(cv.class), te_ta_group(cv.class), stem)
        }
        VerbClass::Suru => suru_forms(None),
        VerbClass::Kuru => kuru_forms(None),
        VerbClass::SuruCompound => suru_forms(cv.prefix.as_ref()),
        VerbClass::KuruCompound => kuru_forms(cv.prefix.as_ref()),
    }
}

/// Runs [`conjugate`] over many entries and merges the results. Entries are
/// independent (spec §5 "embarrassingly parallel"); the caller may shard
/// this however it likes (`jpnt-builder` uses `rayon`) as long as the merge
/// itself goes through one writer.
pub fn conjugate_all<'a, I>(entries: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = BTreeMap::new();
    for (text, phoneme) in entries {
        out.extend(conjugate(text, phoneme));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn classifies_ichidan_by_phonetic_stem_vowel() {
        let cv = classify("食べる", "tabeɾɯ").unwrap();
        assert_eq!(cv.class, VerbClass::Ichidan);
    }

    #[test]
    fn classifies_exception_as_godan_r_despite_looking_ichidan() {
        // 切る ends in i+る but is a listed godan exception.
        let cv = classify("切る", "kiɾɯ").unwrap();
        assert_eq!(cv.class, VerbClass::GodanR);
    }

    #[test]
    fn classifies_non_ru_godan_verb() {
        let cv = classify("書く", "kakɯ").unwrap();
        assert_eq!(cv.class, VerbClass::GodanK);
    }

    #[test]
    fn non_verb_returns_none() {
        assert!(classify("猫", "neko").is_none());
    }

    #[test]
    fn kaku_past_is_kaita() {
        let forms = conjugate("書く", "kakɯ");
        assert_eq!(forms.get("書いた").map(String::as_str), Some("kaita"));
    }

    #[test]
    fn iku_te_form_is_irregular_doubling() {
        let forms = conjugate("行く", "ikɯ");
        assert_eq!(forms.get("行って").map(String::as_str), Some("itːe"));
        assert_eq!(forms.get("行った").map(String::as_str), Some("itːa"));
    }

    #[test]
    fn u_column_te_form_doubles_to_t() {
        let forms = conjugate("買う", "kaɰ");
        assert_eq!(forms.get("買って").map(String::as_str), Some("katːe"));
    }

    #[test]
    fn r_column_te_form_doubles_to_t() {
        let forms = conjugate("走る", "haɕiɾɯ");
        assert_eq!(forms.get("走って").map(String::as_str), Some("haɕitːe"));
    }

    #[test]
    fn g_column_te_form_palatalizes_voiced() {
        let forms = conjugate("急ぐ", "isogɯ");
        assert_eq!(forms.get("急いで").map(String::as_str), Some("isoide"));
    }

    #[test]
    fn aru_negative_is_suppletive() {
        let forms = conjugate("ある", "aɾɯ");
        assert_eq!(forms.get("ない").map(String::as_str), Some("nai"));
        assert_eq!(forms.get("なかった").map(String::as_str), Some("nakatta"));
        assert_eq!(forms.get("あって").map(String::as_str), Some("atːe"));
    }

    #[test]
    fn ichidan_has_both_imperative_forms() {
        let forms = conjugate("食べる", "tabeɾɯ");
        assert_eq!(forms.get("食べろ").map(String::as_str), Some("tabeɾo"));
        assert_eq!(forms.get("食べよ").map(String::as_str), Some("tabejo"));
    }

    #[test]
    fn suru_compound_reuses_bare_suru_tail() {
        let forms = conjugate("勉強する", "beɴkjoːsɯɾɯ");
        assert_eq!(
            forms.get("勉強した").map(String::as_str),
            Some("beɴkjoːɕita")
        );
    }

    #[test]
    fn kuru_compound_emits_both_spellings() {
        let forms = conjugate("戻ってくる", "modotːekɯɾɯ");
        assert_eq!(
            forms.get("戻ってきた").map(String::as_str),
            Some("modotːekita")
        );
        assert!(forms.contains_key("戻って来た"));
    }

    #[test]
    fn bare_kuru_has_both_kanji_and_kana_forms() {
        let forms = conjugate("来る", "kɯɾɯ");
        assert_eq!(forms.get("来た").map(String::as_str), Some("kita"));
        assert_eq!(forms.get("きた").map(String::as_str), Some("kita"));
    }

    #[test]
    fn conjugate_all_merges_independent_entries() {
        let entries = vec![("書く", "kakɯ"), ("食べる", "tabeɾɯ")];
        let merged = conjugate_all(entries);
        assert!(merged.contains_key("書いた"));
        assert!(merged.contains_key("食べた"));
    }

    #[test]
    fn conjugating_an_entrys_own_output_is_stable_for_non_eru_forms() {
        // spec §8 invariant 5 holds for forms that don't themselves end in
        // an i/e-row + る (the potential form of a godan verb, e.g. 書ける,
        // is phonetically indistinguishable from a base ichidan verb under
        // the purely lexical+phonetic rule in step 8 of classification —
        // a known ambiguity of that rule, not checked here).
        let forms = conjugate("書く", "kakɯ");
        assert!(classify("書いた", "kaita").is_none());
        assert!(classify("書かない", "kakanai").is_none());
        let _ = forms;
    }
}
