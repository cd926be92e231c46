//! Literal gojūon row tables and irregular paradigms.
//!
//! Kept as plain `const` arrays rather than a lazily-built map, the way
//! `szr_ja_utils` keeps `HIRA_START`/`KATA_START` and friends as bare
//! consts instead of building a lookup structure for a handful of values.

/// The four conjugable rows of one godan column: dictionary-form-minus-stem
/// kana/phoneme pairs for the あ, い, え, お rows respectively.
pub struct ColumnRows {
    pub a: (&'static str, &'static str),
    pub i: (&'static str, &'static str),
    pub e: (&'static str, &'static str),
    pub o: (&'static str, &'static str),
}

pub const GODAN_U: ColumnRows = ColumnRows {
    a: ("わ", "wa"),
    i: ("い", "i"),
    e: ("え", "e"),
    o: ("お", "o"),
};
pub const GODAN_K: ColumnRows = ColumnRows {
    a: ("か", "ka"),
    i: ("き", "ki"),
    e: ("け", "ke"),
    o: ("こ", "ko"),
};
pub const GODAN_G: ColumnRows = ColumnRows {
    a: ("が", "ga"),
    i: ("ぎ", "gi"),
    e: ("げ", "ge"),
    o: ("ご", "go"),
};
pub const GODAN_S: ColumnRows = ColumnRows {
    a: ("さ", "sa"),
    i: ("し", "ɕi"),
    e: ("せ", "se"),
    o: ("そ", "so"),
};
pub const GODAN_T: ColumnRows = ColumnRows {
    a: ("た", "ta"),
    i: ("ち", "ʨi"),
    e: ("て", "te"),
    o: ("と", "to"),
};
pub const GODAN_N: ColumnRows = ColumnRows {
    a: ("な", "na"),
    i: ("に", "ni"),
    e: ("ね", "ne"),
    o: ("の", "no"),
};
pub const GODAN_B: ColumnRows = ColumnRows {
    a: ("ば", "ba"),
    i: ("び", "bi"),
    e: ("べ", "be"),
    o: ("ぼ", "bo"),
};
pub const GODAN_M: ColumnRows = ColumnRows {
    a: ("ま", "ma"),
    i: ("み", "mi"),
    e: ("め", "me"),
    o: ("も", "mo"),
};
pub const GODAN_R: ColumnRows = ColumnRows {
    a: ("ら", "ɾa"),
    i: ("り", "ɾi"),
    e: ("れ", "ɾe"),
    o: ("ろ", "ɾo"),
};

/// Which phonological rule the te/ta-form stem modifier follows (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeTaGroup {
    /// t, r, u columns: geminate to `tː`, written as a small `っ`.
    Doubling,
    /// n, b, m columns: nasalize to `ɴ`, voice the suffix to で/だ.
    Nasalize,
    /// k column: palatalize, `い` + て/た.
    PalatalizeK,
    /// g column: palatalize, `い` + で/だ (voiced).
    PalatalizeG,
    /// s column: `し` + て/た.
    Sibilant,
}

/// `(te_text, te_phoneme, ta_text, ta_phoneme)` suffixes for a group. These
/// are constant across every column in the group — the point of the
/// phonological rule is exactly that the original column consonant is
/// neutralized (e.g. う/く/る/つ all end up as a plain `っ` + て/た).
pub fn te_ta_suffix(group: TeTaGroup) -> (&'static str, &'static str, &'static str, &'static str) {
    match group {
        TeTaGroup::Doubling => ("って", "tːe", "った", "tːa"),
        TeTaGroup::Nasalize => ("んで", "ɴde", "んだ", "ɴda"),
        TeTaGroup::PalatalizeK => ("いて", "ite", "いた", "ita"),
        TeTaGroup::PalatalizeG => ("いで", "ide", "いだ", "ida"),
        TeTaGroup::Sibilant => ("して", "ɕite", "した", "ɕita"),
    }
}

/// Dictionary-entry texts naming one of the three fully-irregular verbs.
pub const IRREGULAR_VERBS: &[&str] = &["する", "来る", "くる"];

/// Kana alternates of 行く, which takes regular godan-k conjugation for every
/// form except te/ta (spec §4.3: `行く` → `itːe`/`itːa`, not the expected
/// `iite`/`iita` a plain k-column verb would produce).
pub const IKU_SPELLINGS: &[&str] = &["行く", "いく"];

/// Verbs whose dictionary form ends in る but which are godan (not ichidan)
/// despite superficially looking ichidan-shaped; the phonetic rule in
/// classification step 8 handles the general case, this list is for the
/// handful that would otherwise be ambiguous or exceptional in practice.
pub const GODAN_R_EXCEPTIONS: &[&str] = &[
    "帰る", "切る", "走る", "入る", "要る", "知る", "蹴る", "滑る", "限る", "握る", "練る", "減る",
    "焦る", "覆る", "遮る", "捻る",
];

/// One row per productive form of する: `(text_suffix, phoneme_suffix)`,
/// already relative to an empty prefix — i.e. these are the full word for
/// bare する, and the suffix to append after a `suru_compound` prefix.
pub const SURU_FORMS: &[(&str, &str, &str)] = &[
    ("past", "した", "ɕita"),
    ("te", "して", "ɕite"),
    ("negative", "しない", "ɕinai"),
    ("negative_past", "しなかった", "ɕinakatta"),
    ("polite", "します", "ɕimasɯ"),
    ("polite_past", "しました", "ɕimaɕita"),
    ("polite_negative", "しません", "ɕimaseɴ"),
    ("polite_negative_past", "しませんでした", "ɕimaseɴdeɕita"),
    ("conditional_ba", "すれば", "sɯɾeba"),
    ("volitional", "しよう", "ɕijoː"),
    ("imperative", "しろ", "ɕiɾo"),
    ("potential", "できる", "dekiɾɯ"),
    ("passive", "される", "saɾeɾɯ"),
    ("causative", "させる", "saseɾɯ"),
    ("conditional_tara", "したら", "ɕitaɾa"),
];

/// Same shape as [`SURU_FORMS`] but with both the 来る (kanji) and くる
/// (kana) surface spellings, since spec §4.3 requires both to appear.
pub const KURU_FORMS: &[(&str, &str, &str, &str)] = &[
    ("past", "来た", "きた", "kita"),
    ("te", "来て", "きて", "kite"),
    ("negative", "来ない", "こない", "konai"),
    ("negative_past", "来なかった", "こなかった", "konakatta"),
    ("polite", "来ます", "きます", "kimasɯ"),
    ("polite_past", "来ました", "きました", "kimaɕita"),
    ("polite_negative", "来ません", "きません", "kimaseɴ"),
    ("polite_negative_past", "来ませんでした", "きませんでした", "kimaseɴdeɕita"),
    ("conditional_ba", "来れば", "くれば", "kɯɾeba"),
    ("volitional", "来よう", "こよう", "kojoː"),
    ("imperative", "来い", "こい", "koi"),
    ("potential", "来られる", "こられる", "koɾaɾeɾɯ"),
    ("passive", "来られる", "こられる", "koɾaɾeɾɯ"),
    ("causative", "来させる", "こさせる", "kosaseɾɯ"),
    ("conditional_tara", "来たら", "きたら", "kitaɾa"),
];
