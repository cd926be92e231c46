//! Japanese-text-to-IPA-phoneme conversion core.
//!
//! Four pieces, bottom-up, mirroring spec.md §2: [`trie`] (the prefix tree
//! and its `lookup_longest` walk), [`codec`] (the binary artifact format),
//! [`conjugate`] (verb paradigm generation), and [`matcher`] (segmentation,
//! phoneme conversion, furigana override). [`dict`] sits on top as the
//! build-time pipeline that ties a raw dictionary and word list into one
//! trie ready for [`codec::write_trie`].

pub mod codec;
pub mod conjugate;
pub mod dict;
pub mod error;
pub mod matcher;
pub mod trie;
pub mod varint;
pub mod vocab;

pub use codec::{load, write_trie, DictionaryArtifact, Header};
pub use dict::{BuildCounts, BuildReport, Builder, DictEntry};
pub use error::{Error, Result};
pub use matcher::{convert, convert_detailed, Config, ConvertResult, MatchRecord};
pub use trie::{lookup_longest, TrieBuilder, TrieView};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// End-to-end round trip (spec §8 "Round trips"): build, serialize,
    /// load, query, and compare against building and querying directly.
    #[test]
    fn build_serialize_load_query_matches_direct_build() {
        let mut builder = Builder::new();
        builder.add_entry(DictEntry::new("東京", "toːkʲoː"));
        builder.add_entry(DictEntry::new("食べる", "tabeɾɯ"));
        let (trie, _, counts) = builder.build().unwrap();

        let mut bytes = Vec::new();
        write_trie(
            &trie,
            counts.n_phoneme_entries,
            counts.n_word_entries,
            &mut bytes,
        )
        .unwrap();

        let artifact = load(&bytes[..]).unwrap();
        let loaded = artifact.trie();

        let direct = convert(&trie, "東京に食べた", Config::default());
        let via_artifact = convert(loaded, "東京に食べた", Config::default());
        assert_eq!(direct, via_artifact);
        assert_eq!(via_artifact, "toːkʲoː に tabeta");
    }
}
