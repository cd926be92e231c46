//! Binary (de)serialization of a [`TrieBuilder`] into the self-describing
//! artifact format from spec.md §4.2, grounded in the header/bincode split
//! `legacy::dart::DoubleArrayTrie::save`/`load` use, but with the format's
//! own post-order, offset-relative layout rather than a bincode dump.
//!
//! ## Header (24 bytes)
//! `b"JPNT"` magic, u16 major, u16 minor, u32 phoneme-entry count, u32
//! word-entry count, u64 root offset — all little-endian. (The listed
//! fields alone add up to 24 bytes; see `DESIGN.md` for the note on the
//! 16-byte figure floating around in early drafts of this format.)
//!
//! ## Node record
//! Written in post-order (every child strictly precedes its parent in the
//! byte stream), so the writer never has to patch a forward reference:
//!
//! - flags byte: bit 0 `has_value`; the remaining 7 bits are the child
//!   count if `<= 126`, or the sentinel `127` if the real count follows as
//!   a varint.
//! - if `has_value`: a varint length, then that many UTF-8 bytes.
//! - the children table, one 7-byte entry per child, sorted by ascending
//!   code point: 3 bytes code point (LE), then a signed 32-bit (LE) offset
//!   relative to the byte immediately following that entry. Because
//!   children are always written before their parent, this relative offset
//!   is negative in every real artifact.

use crate::error::{self, FormatIssue, Result};
use crate::trie::{TrieBuilder, TrieView};
use crate::varint;
use std::io::{Read, Write};
use tracing::debug;

pub const MAGIC: &[u8; 4] = b"JPNT";
pub const CURRENT_MAJOR: u16 = 2;
pub const CURRENT_MINOR: u16 = 0;

/// Length of the fixed header prefix up to (not including) the root offset.
const HEADER_LEN: usize = 16;
/// Sentinel value of the flags byte's 7-bit inline count field: the real
/// count is too large to fit and follows immediately as a varint.
const LARGE_CHILD_COUNT: u8 = 0x7f;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub major: u16,
    pub minor: u16,
    pub n_phoneme_entries: u32,
    pub n_word_entries: u32,
    pub root_offset: u64,
}

impl Header {
    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&self.major.to_le_bytes());
        out.extend_from_slice(&self.minor.to_le_bytes());
        out.extend_from_slice(&self.n_phoneme_entries.to_le_bytes());
        out.extend_from_slice(&self.n_word_entries.to_le_bytes());
        out.extend_from_slice(&self.root_offset.to_le_bytes());
    }

    fn read(buf: &[u8]) -> Result<Header> {
        if buf.len() < HEADER_LEN {
            return Err(error::Error::Format {
                issue: FormatIssue::TruncatedNode,
            });
        }
        if &buf[0..4] != MAGIC {
            return Err(error::Error::Format {
                issue: FormatIssue::BadMagic,
            });
        }
        let major = u16::from_le_bytes(buf[4..6].try_into().unwrap());
        let minor = u16::from_le_bytes(buf[6..8].try_into().unwrap());
        if major != CURRENT_MAJOR {
            return Err(error::Error::Format {
                issue: FormatIssue::UnsupportedMajorVersion { found: major },
            });
        }
        let n_phoneme_entries = u32::from_le_bytes(buf[8..12].try_into().unwrap());
        let n_word_entries = u32::from_le_bytes(buf[12..16].try_into().unwrap());
        // root offset follows the fixed 16-byte prefix; re-read with a
        // widened slice check below once we know the full header length.
        if buf.len() < HEADER_LEN + 8 {
            return Err(error::Error::Format {
                issue: FormatIssue::TruncatedNode,
            });
        }
        let root_offset = u64::from_le_bytes(buf[16..24].try_into().unwrap());
        Ok(Header {
            major,
            minor,
            n_phoneme_entries,
            n_word_entries,
            root_offset,
        })
    }
}

/// Serializes `trie` to `out`, preceded by a [`Header`]. `n_phoneme_entries`
/// and `n_word_entries` are caller-supplied accounting fields (spec §4.2);
/// the codec itself does not know which of its entries are which.
pub fn write_trie<W: Write>(
    trie: &TrieBuilder,
    n_phoneme_entries: u32,
    n_word_entries: u32,
    mut out: W,
) -> Result<()> {
    let mut body = Vec::new();
    let root_offset = write_node(trie, trie.root(), &mut body);

    let header = Header {
        major: CURRENT_MAJOR,
        minor: CURRENT_MINOR,
        n_phoneme_entries,
        n_word_entries,
        root_offset,
    };

    let mut buf = Vec::with_capacity(HEADER_LEN + 8 + body.len());
    header.write(&mut buf);
    buf.extend_from_slice(&body);
    debug!(
        bytes = buf.len(),
        n_phoneme_entries, n_word_entries, "serialized trie artifact"
    );
    out.write_all(&buf).map_err(|source| error::Error::Io { source })
}

fn write_node(trie: &TrieBuilder, node: u32, buf: &mut Vec<u8>) -> u64 {
    let mut children: Vec<(u32, u32)> = trie.node_children(node).collect();
    children.sort_by_key(|&(cp, _)| cp);

    let mut child_offsets = Vec::with_capacity(children.len());
    for &(cp, child) in &children {
        let offset = write_node(trie, child, buf);
        child_offsets.push((cp, offset));
    }

    let this_offset = buf.len() as u64;
    let value = trie.node_value(node);

    let has_value_bit: u8 = if value.is_some() { 1 } else { 0 };
    let count = children.len();
    if count <= (LARGE_CHILD_COUNT - 1) as usize {
        buf.push(((count as u8) << 1) | has_value_bit);
    } else {
        buf.push((LARGE_CHILD_COUNT << 1) | has_value_bit);
        varint::write(buf, count as u64);
    }

    if let Some(v) = value {
        varint::write(buf, v.len() as u64);
        buf.extend_from_slice(v.as_bytes());
    }

    for &(cp, child_abs_offset) in &child_offsets {
        let cp_bytes = cp.to_le_bytes();
        buf.extend_from_slice(&cp_bytes[0..3]);
        let entry_end = buf.len() as i64 + 4;
        let rel = child_abs_offset as i64 - entry_end;
        buf.extend_from_slice(&(rel as i32).to_le_bytes());
    }

    this_offset
}

/// A node in the loaded, read-only arena built by [`load`].
struct LoadedNode {
    value: Option<String>,
    // sorted by code point, as the writer guarantees.
    children: Vec<(u32, u32)>,
}

/// A fully materialized trie read back from the on-disk format. Loading is
/// eager rather than a lazy cursor over the byte buffer: dictionaries in
/// this format top out at a few hundred thousand entries, small enough that
/// paying the parse cost once up front and then doing plain arena indexing
/// beats re-parsing node records on every lookup.
pub struct LoadedTrie {
    nodes: Vec<LoadedNode>,
    root: u32,
}

impl TrieView for LoadedTrie {
    fn root(&self) -> u32 {
        self.root
    }

    fn value(&self, node: u32) -> Option<&str> {
        self.nodes[node as usize].value.as_deref()
    }

    fn child(&self, node: u32, cp: u32) -> Option<u32> {
        self.nodes[node as usize]
            .children
            .binary_search_by_key(&cp, |&(c, _)| c)
            .ok()
            .map(|i| self.nodes[node as usize].children[i].1)
    }
}

/// The parsed artifact: entry counts from the header plus the loaded trie.
pub struct DictionaryArtifact {
    header: Header,
    trie: LoadedTrie,
}

impl DictionaryArtifact {
    pub fn n_phoneme_entries(&self) -> u32 {
        self.header.n_phoneme_entries
    }

    pub fn n_word_entries(&self) -> u32 {
        self.header.n_word_entries
    }

    pub fn trie(&self) -> &LoadedTrie {
        &self.trie
    }
}

pub fn load<R: Read>(mut input: R) -> Result<DictionaryArtifact> {
    let mut buf = Vec::new();
    input
        .read_to_end(&mut buf)
        .map_err(|source| error::Error::Io { source })?;
    let header = Header::read(&buf)?;

    let mut nodes = Vec::new();
    let root = parse_node(&buf, header.root_offset, &mut nodes)?;

    debug!(
        bytes = buf.len(),
        nodes = nodes.len(),
        n_phoneme_entries = header.n_phoneme_entries,
        n_word_entries = header.n_word_entries,
        "loaded trie artifact"
    );

    Ok(DictionaryArtifact {
        header,
        trie: LoadedTrie { nodes, root },
    })
}

/// Parses the node record at absolute byte offset `offset`, recursing into
/// its children first so the returned index already has a populated entry
/// in `nodes`. The format is a tree (no shared subtrees, no cycles), so
/// there is no need to memoize already-visited offsets.
fn parse_node(buf: &[u8], offset: u64, nodes: &mut Vec<LoadedNode>) -> Result<u32> {
    let offset = usize::try_from(offset).map_err(|_| error::Error::Format {
        issue: FormatIssue::OffsetOutOfRange {
            offset: offset as i64,
        },
    })?;
    let mut pos = offset;

    let flags = *buf.get(pos).ok_or(error::Error::Format {
        issue: FormatIssue::TruncatedNode,
    })?;
    pos += 1;

    let has_value = flags & 1 != 0;
    let count_field = flags >> 1;
    let child_count = if count_field == LARGE_CHILD_COUNT {
        varint::read(buf, &mut pos)? as usize
    } else {
        count_field as usize
    };

    let value = if has_value {
        let len = varint::read(buf, &mut pos)? as usize;
        let end = pos
            .checked_add(len)
            .ok_or(error::Error::Format {
                issue: FormatIssue::TruncatedNode,
            })?;
        let bytes = buf.get(pos..end).ok_or(error::Error::Format {
            issue: FormatIssue::TruncatedNode,
        })?;
        let s = std::str::from_utf8(bytes)
            .map_err(|_| error::Error::Format {
                issue: FormatIssue::InvalidUtf8Value,
            })?
            .to_owned();
        pos = end;
        Some(s)
    } else {
        None
    };

    let mut raw_children = Vec::with_capacity(child_count);
    for _ in 0..child_count {
        let entry = buf.get(pos..pos + 7).ok_or(error::Error::Format {
            issue: FormatIssue::TruncatedNode,
        })?;
        let cp = u32::from_le_bytes([entry[0], entry[1], entry[2], 0]);
        let rel = i32::from_le_bytes([entry[3], entry[4], entry[5], entry[6]]);
        pos += 7;
        let entry_end = pos as i64;
        let child_abs_offset = entry_end + rel as i64;
        if child_abs_offset < 0 || child_abs_offset as u64 >= buf.len() as u64 {
            return Err(error::Error::Format {
                issue: FormatIssue::OffsetOutOfRange {
                    offset: child_abs_offset,
                },
            });
        }
        raw_children.push((cp, child_abs_offset as u64));
    }

    let mut children = Vec::with_capacity(raw_children.len());
    for (cp, abs) in raw_children {
        let idx = parse_node(buf, abs, nodes)?;
        children.push((cp, idx));
    }

    nodes.push(LoadedNode { value, children });
    Ok((nodes.len() - 1) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::lookup_longest;
    use pretty_assertions::assert_eq;

    fn build_sample() -> TrieBuilder {
        let mut t = TrieBuilder::new();
        t.insert("東", "toː");
        t.insert("東京", "toːkʲoː");
        t.insert("は", "");
        t.insert("猫", "neko");
        t
    }

    #[test]
    fn roundtrips_through_bytes() {
        let builder = build_sample();
        let mut bytes = Vec::new();
        write_trie(&builder, 3, 1, &mut bytes).unwrap();

        let artifact = load(&bytes[..]).unwrap();
        assert_eq!(artifact.n_phoneme_entries(), 3);
        assert_eq!(artifact.n_word_entries(), 1);

        let trie = artifact.trie();
        let chars: Vec<char> = "東京都".chars().collect();
        let (value, len) = lookup_longest(trie, &chars).unwrap();
        assert_eq!(value, "toːkʲoː");
        assert_eq!(len, 2);

        let chars: Vec<char> = "猫".chars().collect();
        let (value, _) = lookup_longest(trie, &chars).unwrap();
        assert_eq!(value, "neko");
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = Vec::new();
        write_trie(&TrieBuilder::new(), 0, 0, &mut bytes).unwrap();
        bytes[0] = b'X';
        let err = load(&bytes[..]).unwrap_err();
        assert!(matches!(
            err,
            error::Error::Format {
                issue: FormatIssue::BadMagic
            }
        ));
    }

    #[test]
    fn rejects_unsupported_major_version() {
        let mut bytes = Vec::new();
        write_trie(&TrieBuilder::new(), 0, 0, &mut bytes).unwrap();
        bytes[4..6].copy_from_slice(&99u16.to_le_bytes());
        let err = load(&bytes[..]).unwrap_err();
        assert!(matches!(
            err,
            error::Error::Format {
                issue: FormatIssue::UnsupportedMajorVersion { found: 99 }
            }
        ));
    }

    #[test]
    fn rejects_child_offset_out_of_range() {
        let mut bytes = Vec::new();
        write_trie(&build_sample(), 0, 0, &mut bytes).unwrap();
        // corrupt the last child-entry offset field in the buffer with a
        // huge absolute jump. The exact entry location is format-internal;
        // instead prove the bounds check fires by pointing the root offset
        // itself far out of range.
        let bad_root = (bytes.len() as u64) + 10_000;
        bytes[16..24].copy_from_slice(&bad_root.to_le_bytes());
        let err = load(&bytes[..]).unwrap_err();
        assert!(matches!(
            err,
            error::Error::Format {
                issue: FormatIssue::OffsetOutOfRange { .. }
            } | error::Error::Format {
                issue: FormatIssue::TruncatedNode
            }
        ));
    }

    #[test]
    fn large_child_count_sentinel_roundtrips() {
        let mut t = TrieBuilder::new();
        for i in 0..200u32 {
            let c = char::from_u32(0x4e00 + i).unwrap();
            t.insert(&c.to_string(), format!("v{i}"));
        }
        let mut bytes = Vec::new();
        write_trie(&t, 200, 0, &mut bytes).unwrap();
        let artifact = load(&bytes[..]).unwrap();
        let trie = artifact.trie();
        for i in 0..200u32 {
            let c = char::from_u32(0x4e00 + i).unwrap();
            let (value, len) = lookup_longest(trie, &[c]).unwrap();
            assert_eq!(value, format!("v{i}"));
            assert_eq!(len, 1);
        }
    }
}
