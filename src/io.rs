//! File and stream persistence for [`Trie`].
//!
//! The on-disk layout is little-endian and fixed-order: a magic/version
//! header, then the topology, terminal, and tail bitvectors (bit length +
//! raw words each), the edge byte array, the packed tail references, the
//! tagged tail store (flat table or recursive nested body), and the key
//! count. Rank/select directories are deterministic derivations of the raw
//! bits and are rebuilt on load.
//!
//! Loading validates every structural invariant before a [`Trie`] is
//! returned; a corrupt or version-mismatched blob fails with
//! [`StoreError::Load`] instead of producing an inconsistent structure.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::binary::{bytes_to_words_vec, words_to_bytes};
use crate::bits::{BitVec, IntVec};
use crate::trie::tail::TailStore;
use crate::{Config, RankSelect, Trie};

const MAGIC: [u8; 4] = *b"LDTR";
const FORMAT_VERSION: u32 = 1;

const TAG_FLAT: u8 = 0;
const TAG_NESTED: u8 = 1;

/// Errors surfaced by [`Trie::save`] and [`Trie::load`].
///
/// Open, write, and read failures are distinct kinds so callers can decide
/// between retry and abort; `Save`/`Load` report semantic failures (format
/// limits, corruption, version mismatch).
#[derive(Debug)]
pub enum StoreError {
    /// Opening or creating the file failed.
    FileOpen(std::io::Error),
    /// Writing to the destination failed.
    FileWrite(std::io::Error),
    /// Reading from the source failed (including truncation).
    FileRead(std::io::Error),
    /// The structure cannot be represented in the serialized format.
    Save(&'static str),
    /// The serialized data is corrupt or from an unsupported version.
    Load(&'static str),
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StoreError::FileOpen(e) => write!(f, "failed to open file: {}", e),
            StoreError::FileWrite(e) => write!(f, "write failed: {}", e),
            StoreError::FileRead(e) => write!(f, "read failed: {}", e),
            StoreError::Save(msg) => write!(f, "save failed: {}", msg),
            StoreError::Load(msg) => write!(f, "load failed: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::FileOpen(e) | StoreError::FileWrite(e) | StoreError::FileRead(e) => {
                Some(e)
            }
            _ => None,
        }
    }
}

impl Trie {
    /// Serialize the trie to a stream.
    pub fn save<W: Write>(&self, w: &mut W) -> Result<(), StoreError> {
        w.write_all(&MAGIC).map_err(StoreError::FileWrite)?;
        write_u32(w, FORMAT_VERSION)?;
        self.write_body(w)?;
        w.flush().map_err(StoreError::FileWrite)
    }

    /// Serialize the trie to a file.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let file = File::create(path).map_err(StoreError::FileOpen)?;
        let mut w = BufWriter::new(file);
        self.save(&mut w)
    }

    /// Deserialize a trie from a stream.
    pub fn load<R: Read>(r: &mut R) -> Result<Self, StoreError> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic).map_err(StoreError::FileRead)?;
        if magic != MAGIC {
            return Err(StoreError::Load("bad magic"));
        }
        if read_u32(r)? != FORMAT_VERSION {
            return Err(StoreError::Load("unsupported format version"));
        }
        Self::read_body(r, &Config::default(), 0)
    }

    /// Deserialize a trie from a file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let file = File::open(path).map_err(StoreError::FileOpen)?;
        let mut r = BufReader::new(file);
        Self::load(&mut r)
    }

    fn write_body<W: Write>(&self, w: &mut W) -> Result<(), StoreError> {
        if self.num_nodes() > u32::MAX as usize || self.num_keys > u32::MAX as usize {
            return Err(StoreError::Save("structure exceeds format limits"));
        }

        write_bitvec(w, &self.louds)?;
        write_bitvec(w, &self.terminal)?;
        write_bitvec(w, &self.tail)?;

        write_u64(w, self.edges.len() as u64)?;
        w.write_all(&self.edges).map_err(StoreError::FileWrite)?;

        write_u8(w, self.tail_ids.width() as u8)?;
        write_u64(w, self.tail_ids.len() as u64)?;
        w.write_all(words_to_bytes(self.tail_ids.as_words()))
            .map_err(StoreError::FileWrite)?;

        match &self.tails {
            TailStore::Flat(table) => {
                write_u8(w, TAG_FLAT)?;
                write_u64(w, table.len() as u64)?;
                for tail in table {
                    write_u64(w, tail.len() as u64)?;
                    w.write_all(tail).map_err(StoreError::FileWrite)?;
                }
            }
            TailStore::Nested(trie) => {
                write_u8(w, TAG_NESTED)?;
                trie.write_body(w)?;
            }
        }

        write_u64(w, self.num_keys as u64)
    }

    fn read_body<R: Read>(r: &mut R, config: &Config, depth: u8) -> Result<Self, StoreError> {
        let louds = read_bitvec(r, config)?;
        let terminal = read_bitvec(r, config)?;
        let tail = read_bitvec(r, config)?;

        let edge_count = to_usize(read_u64(r)?)?;
        let edges = read_bytes(r, edge_count)?;

        let width = read_u8(r)? as u32;
        if width > 64 {
            return Err(StoreError::Load("tail id width exceeds 64 bits"));
        }
        let id_count = to_usize(read_u64(r)?)?;
        let id_bits = id_count
            .checked_mul(width as usize)
            .ok_or(StoreError::Load("packed tail ids too large"))?;
        let id_bytes = read_bytes(r, id_bits.div_ceil(64) * 8)?;
        let tail_ids = IntVec::from_raw_parts(bytes_to_words_vec(&id_bytes), width, id_count)
            .ok_or(StoreError::Load("packed tail ids inconsistent"))?;

        let tails = match read_u8(r)? {
            TAG_FLAT => {
                let count = to_usize(read_u64(r)?)?;
                let mut table = Vec::with_capacity(count.min(1 << 20));
                for _ in 0..count {
                    let len = to_usize(read_u64(r)?)?;
                    table.push(read_bytes(r, len)?);
                }
                TailStore::Flat(table)
            }
            TAG_NESTED => {
                if depth >= 1 {
                    return Err(StoreError::Load("tail tries nest at most once"));
                }
                TailStore::Nested(Box::new(Self::read_body(r, config, depth + 1)?))
            }
            _ => return Err(StoreError::Load("unknown tail store tag")),
        };

        let num_keys = to_usize(read_u64(r)?)?;

        let trie = Trie {
            louds,
            terminal,
            tail,
            edges,
            tail_ids,
            tails,
            num_keys,
        };
        trie.validate()?;
        Ok(trie)
    }

    /// Structural invariants every loaded trie must satisfy. Rejecting them
    /// here keeps the query paths free of bounds surprises.
    fn validate(&self) -> Result<(), StoreError> {
        let nodes = self.louds.count_ones();
        let zeros = self.louds.count_zeros();
        if nodes == 0 || zeros != nodes + 1 {
            return Err(StoreError::Load("topology bit counts inconsistent"));
        }
        if !self.louds.get(0) || self.louds.get(1) {
            return Err(StoreError::Load("malformed super-root"));
        }
        if self.terminal.len() != nodes || self.tail.len() != nodes {
            return Err(StoreError::Load("flag vector length mismatch"));
        }
        if self.edges.len() != nodes - 1 {
            return Err(StoreError::Load("edge array length mismatch"));
        }
        if self.num_keys != self.terminal.count_ones() {
            return Err(StoreError::Load("key count mismatch"));
        }
        if self.tail_ids.len() != self.tail.count_ones() {
            return Err(StoreError::Load("tail reference count mismatch"));
        }
        let table_len = self.tails.len() as u64;
        for i in 0..self.tail_ids.len() {
            if self.tail_ids.get(i) >= table_len {
                return Err(StoreError::Load("tail reference out of range"));
            }
        }
        // Level order: every node's parent precedes it. This is what makes
        // upward walks terminate and subtree enumeration strictly descend.
        for k in 1..nodes {
            let pos = self
                .louds
                .select1(k)
                .ok_or(StoreError::Load("topology bit counts inconsistent"))?;
            if self.louds.rank0(pos) - 1 >= k {
                return Err(StoreError::Load("topology not level-ordered"));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Little-endian framing helpers
// =============================================================================

fn write_u8<W: Write>(w: &mut W, v: u8) -> Result<(), StoreError> {
    w.write_all(&[v]).map_err(StoreError::FileWrite)
}

fn write_u32<W: Write>(w: &mut W, v: u32) -> Result<(), StoreError> {
    w.write_all(&v.to_le_bytes()).map_err(StoreError::FileWrite)
}

fn write_u64<W: Write>(w: &mut W, v: u64) -> Result<(), StoreError> {
    w.write_all(&v.to_le_bytes()).map_err(StoreError::FileWrite)
}

fn write_bitvec<W: Write>(w: &mut W, bv: &BitVec) -> Result<(), StoreError> {
    write_u64(w, bv.len() as u64)?;
    w.write_all(words_to_bytes(bv.as_words()))
        .map_err(StoreError::FileWrite)
}

fn read_u8<R: Read>(r: &mut R) -> Result<u8, StoreError> {
    let mut b = [0u8; 1];
    r.read_exact(&mut b).map_err(StoreError::FileRead)?;
    Ok(b[0])
}

fn read_u32<R: Read>(r: &mut R) -> Result<u32, StoreError> {
    let mut b = [0u8; 4];
    r.read_exact(&mut b).map_err(StoreError::FileRead)?;
    Ok(u32::from_le_bytes(b))
}

fn read_u64<R: Read>(r: &mut R) -> Result<u64, StoreError> {
    let mut b = [0u8; 8];
    r.read_exact(&mut b).map_err(StoreError::FileRead)?;
    Ok(u64::from_le_bytes(b))
}

/// Read exactly `len` bytes in bounded chunks, so a corrupt length field
/// cannot trigger a giant up-front allocation.
fn read_bytes<R: Read>(r: &mut R, len: usize) -> Result<Vec<u8>, StoreError> {
    const CHUNK: usize = 64 * 1024;
    let mut buf = Vec::with_capacity(len.min(CHUNK));
    let mut chunk = [0u8; CHUNK];
    let mut remaining = len;
    while remaining > 0 {
        let take = remaining.min(CHUNK);
        r.read_exact(&mut chunk[..take])
            .map_err(StoreError::FileRead)?;
        buf.extend_from_slice(&chunk[..take]);
        remaining -= take;
    }
    Ok(buf)
}

fn read_bitvec<R: Read>(r: &mut R, config: &Config) -> Result<BitVec, StoreError> {
    let len = to_usize(read_u64(r)?)?;
    let byte_count = len
        .div_ceil(64)
        .checked_mul(8)
        .ok_or(StoreError::Load("bit vector too large"))?;
    let bytes = read_bytes(r, byte_count)?;
    Ok(BitVec::from_words_with_config(
        bytes_to_words_vec(&bytes),
        len,
        config,
    ))
}

fn to_usize(v: u64) -> Result<usize, StoreError> {
    usize::try_from(v).map_err(|_| StoreError::Load("section length exceeds address space"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_roundtrip() {
        let trie = Trie::from_keys(&["a", "an", "and", "ant", "bat"]);
        let mut blob = Vec::new();
        trie.save(&mut blob).unwrap();

        let loaded = Trie::load(&mut blob.as_slice()).unwrap();
        assert_eq!(loaded.num_keys(), 5);
        let m = loaded.prefix_search(b"antelope").unwrap();
        assert_eq!(loaded.decode(m.id).unwrap(), b"ant");
    }

    #[test]
    fn test_bad_magic() {
        let mut blob = Vec::new();
        Trie::from_keys(&["x"]).save(&mut blob).unwrap();
        blob[0] ^= 0xFF;
        assert!(matches!(
            Trie::load(&mut blob.as_slice()),
            Err(StoreError::Load("bad magic"))
        ));
    }

    #[test]
    fn test_version_mismatch() {
        let mut blob = Vec::new();
        Trie::from_keys(&["x"]).save(&mut blob).unwrap();
        blob[4] = 0xEE;
        assert!(matches!(
            Trie::load(&mut blob.as_slice()),
            Err(StoreError::Load("unsupported format version"))
        ));
    }

    #[test]
    fn test_truncated_blob() {
        let mut blob = Vec::new();
        Trie::from_keys(&["alpha", "beta"]).save(&mut blob).unwrap();
        blob.truncate(blob.len() / 2);
        assert!(matches!(
            Trie::load(&mut blob.as_slice()),
            Err(StoreError::FileRead(_))
        ));
    }

    #[test]
    fn test_error_display_distinct() {
        let open = StoreError::FileOpen(std::io::Error::new(std::io::ErrorKind::Other, "x"));
        let save = StoreError::Save("y");
        let load = StoreError::Load("z");
        assert!(open.to_string().contains("open"));
        assert!(save.to_string().contains("save"));
        assert!(load.to_string().contains("load"));
    }
}
