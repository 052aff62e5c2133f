//! Persistence codec: three constant-database (CDB) files plus the binary
//! posting-list layout stored as each index entry's value.
//!
//! CDB ([D. J. Bernstein's constant database][cdb]) is an immutable
//! key→value store: a 2048-byte header of 256 `(table_position, table_len)`
//! pairs, one per hash bucket, followed by the `(klen, dlen, key, data)`
//! records in insertion order, followed by the 256 open-addressed hash
//! tables themselves. Nothing here depends on the structure of the values —
//! posting-list and metadata encoding live in their own functions below and
//! are layered on top of a plain `put(key, value)`/`get(key)` interface.
//!
//! [cdb]: https://cr.yp.to/cdb.html

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use roaring::RoaringBitmap;

use crate::error::{IndexError, Result};
use crate::types::Posting;

const HEADER_SLOTS: usize = 256;
const HEADER_BYTES: usize = HEADER_SLOTS * 8;

fn cdb_hash(key: &[u8]) -> u32 {
    let mut h: u32 = 5381;
    for &b in key {
        h = h.wrapping_shl(5).wrapping_add(h) ^ u32::from(b);
    }
    h
}

/// Builds one CDB file from an insertion-ordered sequence of key/value
/// pairs. Keys are not deduplicated — last write wins only if the reader
/// happens to probe that entry first, so callers should not `put` the same
/// key twice.
pub struct CdbWriter {
    records: Vec<(Vec<u8>, Vec<u8>)>,
}

impl CdbWriter {
    pub fn new() -> Self {
        CdbWriter {
            records: Vec::new(),
        }
    }

    pub fn put(&mut self, key: &[u8], value: &[u8]) {
        self.records.push((key.to_vec(), value.to_vec()));
    }

    /// Serializes the header, records, and hash tables to `path`.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        std::fs::write(path, out)?;
        Ok(())
    }

    fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        // Reserve space for the header; it is filled in once record
        // positions and hash tables are known.
        out.resize(HEADER_BYTES, 0);

        // (hash, record_position) entries for each bucket.
        let mut buckets: Vec<Vec<(u32, u32)>> = vec![Vec::new(); HEADER_SLOTS];

        for (key, value) in &self.records {
            let position = out.len() as u32;
            out.extend_from_slice(&(key.len() as u32).to_le_bytes());
            out.extend_from_slice(&(value.len() as u32).to_le_bytes());
            out.extend_from_slice(key);
            out.extend_from_slice(value);

            let hash = cdb_hash(key);
            buckets[(hash as usize) % HEADER_SLOTS].push((hash, position));
        }

        let mut header = vec![0u8; HEADER_BYTES];

        for (bucket_idx, entries) in buckets.into_iter().enumerate() {
            let table_len = entries.len() * 2;
            let table_position = out.len() as u32;

            if table_len == 0 {
                header[bucket_idx * 8..bucket_idx * 8 + 4].copy_from_slice(&table_position.to_le_bytes());
                header[bucket_idx * 8 + 4..bucket_idx * 8 + 8].copy_from_slice(&0u32.to_le_bytes());
                continue;
            }

            let mut slots = vec![(0u32, 0u32); table_len];
            for (hash, position) in entries {
                let mut slot = (hash as usize >> 8) % table_len;
                while slots[slot].1 != 0 {
                    slot = (slot + 1) % table_len;
                }
                slots[slot] = (hash, position);
            }

            for (hash, position) in slots {
                out.extend_from_slice(&hash.to_le_bytes());
                out.extend_from_slice(&position.to_le_bytes());
            }

            header[bucket_idx * 8..bucket_idx * 8 + 4].copy_from_slice(&table_position.to_le_bytes());
            header[bucket_idx * 8 + 4..bucket_idx * 8 + 8]
                .copy_from_slice(&(table_len as u32).to_le_bytes());
        }

        out[0..HEADER_BYTES].copy_from_slice(&header);
        Ok(())
    }
}

impl Default for CdbWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// A CDB file loaded fully into memory. Real CDB readers mmap the file and
/// probe the hash table directly; we keep the whole byte buffer resident
/// instead, which is simpler and is the shape the rest of this crate
/// already assumes (the index itself lives entirely in memory).
pub struct CdbReader {
    data: Vec<u8>,
}

impl CdbReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut file = std::fs::File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(CdbReader { data })
    }

    fn header_entry(&self, bucket: usize) -> (u32, u32) {
        let offset = bucket * 8;
        let position = u32::from_le_bytes(self.data[offset..offset + 4].try_into().unwrap());
        let len = u32::from_le_bytes(self.data[offset + 4..offset + 8].try_into().unwrap());
        (position, len)
    }

    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        let hash = cdb_hash(key);
        let (table_position, table_len) = self.header_entry((hash as usize) % HEADER_SLOTS);
        if table_len == 0 {
            return None;
        }

        let start_slot = (hash as usize >> 8) % table_len as usize;
        for probe in 0..table_len as usize {
            let slot = (start_slot + probe) % table_len as usize;
            let slot_offset = table_position as usize + slot * 8;
            let slot_hash =
                u32::from_le_bytes(self.data[slot_offset..slot_offset + 4].try_into().unwrap());
            let record_position =
                u32::from_le_bytes(self.data[slot_offset + 4..slot_offset + 8].try_into().unwrap());

            if record_position == 0 {
                return None;
            }

            if slot_hash == hash {
                if let Some(value) = self.read_record_if_key_matches(record_position as usize, key) {
                    return Some(value);
                }
            }
        }

        None
    }

    fn read_record_if_key_matches(&self, position: usize, key: &[u8]) -> Option<Vec<u8>> {
        let klen = u32::from_le_bytes(self.data[position..position + 4].try_into().unwrap()) as usize;
        let dlen =
            u32::from_le_bytes(self.data[position + 4..position + 8].try_into().unwrap()) as usize;
        let key_start = position + 8;
        let data_start = key_start + klen;

        if &self.data[key_start..data_start] == key {
            Some(self.data[data_start..data_start + dlen].to_vec())
        } else {
            None
        }
    }

    /// Iterates every `(key, value)` record in insertion order. Used to
    /// bulk-load the full term dictionary or category map into memory
    /// rather than probing one key at a time.
    pub fn iter(&self) -> CdbIter<'_> {
        CdbIter {
            data: &self.data,
            cursor: HEADER_BYTES,
            end: self.records_end(),
        }
    }

    fn records_end(&self) -> usize {
        // The lowest table_position across all non-empty buckets marks the
        // end of the record area; if every bucket is empty the whole file
        // is just the header.
        (0..HEADER_SLOTS)
            .filter_map(|b| {
                let (pos, len) = self.header_entry(b);
                (len > 0).then_some(pos as usize)
            })
            .min()
            .unwrap_or(HEADER_BYTES)
    }
}

pub struct CdbIter<'a> {
    data: &'a [u8],
    cursor: usize,
    end: usize,
}

impl<'a> Iterator for CdbIter<'a> {
    type Item = (Vec<u8>, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }

        let klen =
            u32::from_le_bytes(self.data[self.cursor..self.cursor + 4].try_into().unwrap()) as usize;
        let dlen = u32::from_le_bytes(
            self.data[self.cursor + 4..self.cursor + 8].try_into().unwrap(),
        ) as usize;
        let key_start = self.cursor + 8;
        let data_start = key_start + klen;
        let data_end = data_start + dlen;

        let key = self.data[key_start..data_start].to_vec();
        let value = self.data[data_start..data_end].to_vec();
        self.cursor = data_end;

        Some((key, value))
    }
}

/// Encodes a posting list as `for each posting: u32 doc_id, u32 frequency,
/// f32 boost (IEEE-754 bits), u32[frequency] positions` — little-endian,
/// no length prefix.
pub fn encode_postings(postings: &[Posting]) -> Vec<u8> {
    let size: usize = postings.iter().map(|p| 12 + p.frequency as usize * 4).sum();
    let mut buf = Vec::with_capacity(size);

    for p in postings {
        buf.extend_from_slice(&p.doc_id.to_le_bytes());
        buf.extend_from_slice(&p.frequency.to_le_bytes());
        buf.extend_from_slice(&p.boost.to_bits().to_le_bytes());
        for &pos in &p.positions {
            buf.extend_from_slice(&pos.to_le_bytes());
        }
    }

    buf
}

/// Decodes a posting list encoded by [`encode_postings`]. Rejects buffers
/// under 16 bytes — the minimum size of a single posting is 12 bytes plus
/// at least one 4-byte position, since a term is never indexed with zero
/// occurrences in a document.
pub fn decode_postings(buf: &[u8]) -> Result<Vec<Posting>> {
    if buf.len() < 16 {
        return Err(IndexError::DecoderTooShort(buf.len()));
    }

    let mut postings = Vec::new();
    let mut cursor = 0;

    while cursor < buf.len() {
        let doc_id = u32::from_le_bytes(buf[cursor..cursor + 4].try_into().unwrap());
        let frequency = u32::from_le_bytes(buf[cursor + 4..cursor + 8].try_into().unwrap());
        let boost = f32::from_bits(u32::from_le_bytes(
            buf[cursor + 8..cursor + 12].try_into().unwrap(),
        ));
        cursor += 12;

        let mut positions = Vec::with_capacity(frequency as usize);
        for _ in 0..frequency {
            positions.push(u32::from_le_bytes(buf[cursor..cursor + 4].try_into().unwrap()));
            cursor += 4;
        }

        postings.push(Posting {
            doc_id,
            frequency,
            boost,
            positions,
        });
    }

    Ok(postings)
}

/// Encodes `field_len` as `u32[num_docs]` little-endian.
pub fn encode_field_len(field_len: &[u32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(field_len.len() * 4);
    for &len in field_len {
        buf.extend_from_slice(&len.to_le_bytes());
    }
    buf
}

pub fn decode_field_len(buf: &[u8]) -> Vec<u32> {
    buf.chunks_exact(4)
        .map(|c| u32::from_le_bytes(c.try_into().unwrap()))
        .collect()
}

/// Writes `index.cdb`, `metadata.cdb`, and `categories.cdb` into `dir`.
pub fn persist(index: &crate::index::Index, dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();

    let mut terms_writer = CdbWriter::new();
    for (term, postings) in &index.terms {
        terms_writer.put(term.as_bytes(), &encode_postings(postings));
    }
    terms_writer.write_to_file(dir.join("index.cdb"))?;

    let mut metadata_writer = CdbWriter::new();
    metadata_writer.put(b":docId", &index.doc_id_counter.to_le_bytes());
    metadata_writer.put(b":NumDocs", &index.num_docs.to_le_bytes());
    metadata_writer.put(b":avgFieldLen", &index.avg_field_len.to_le_bytes());
    metadata_writer.put(b":fieldLen", &encode_field_len(&index.field_len));
    metadata_writer.write_to_file(dir.join("metadata.cdb"))?;

    let mut categories_writer = CdbWriter::new();
    for (category, bitmap) in &index.category_bitmap {
        let mut bytes = Vec::with_capacity(bitmap.serialized_size());
        bitmap.serialize_into(&mut bytes).map_err(IndexError::Io)?;
        categories_writer.put(category.as_bytes(), &bytes);
    }
    categories_writer.write_to_file(dir.join("categories.cdb"))?;

    Ok(())
}

/// Loaded index state that can answer queries but never mutate — loading
/// from disk always yields a read-only index, matching the "freeze before
/// persist" lifecycle described in [`crate::index::Index`].
pub fn load(analyzer: crate::analyzer::Analyzer, dir: impl AsRef<Path>) -> Result<crate::index::Index> {
    let dir = dir.as_ref();

    let terms_reader = CdbReader::open(dir.join("index.cdb"))?;
    let mut terms = HashMap::new();
    for (key, value) in terms_reader.iter() {
        let term = String::from_utf8_lossy(&key).into_owned();
        terms.insert(term, decode_postings(&value)?);
    }

    let metadata_reader = CdbReader::open(dir.join("metadata.cdb"))?;
    let doc_id_counter = read_u32(&metadata_reader, "metadata.cdb", ":docId")?;
    let num_docs = read_u32(&metadata_reader, "metadata.cdb", ":NumDocs")?;
    let avg_field_len = read_f64(&metadata_reader, "metadata.cdb", ":avgFieldLen")?;
    let field_len_bytes = metadata_reader
        .get(b":fieldLen")
        .ok_or_else(|| missing_key("metadata.cdb", ":fieldLen"))?;
    let field_len = decode_field_len(&field_len_bytes);

    let categories_reader = CdbReader::open(dir.join("categories.cdb"))?;
    let mut category_bitmap = HashMap::new();
    for (key, value) in categories_reader.iter() {
        let category = String::from_utf8_lossy(&key).into_owned();
        let bitmap = RoaringBitmap::deserialize_from(&value[..]).map_err(IndexError::Io)?;
        category_bitmap.insert(category, bitmap);
    }

    Ok(crate::index::Index {
        terms,
        field_len,
        doc_category: HashMap::new(),
        category_bitmap,
        store: Vec::new(),
        doc_id_counter,
        num_docs,
        avg_field_len,
        read_only: true,
        analyzer: std::sync::Arc::new(analyzer),
    })
}

fn missing_key(file: &'static str, key: &str) -> IndexError {
    IndexError::MissingKey {
        file,
        key: key.to_string(),
    }
}

fn read_u32(reader: &CdbReader, file: &'static str, key: &str) -> Result<u32> {
    let bytes = reader.get(key.as_bytes()).ok_or_else(|| missing_key(file, key))?;
    Ok(u32::from_le_bytes(bytes[..4].try_into().unwrap()))
}

fn read_f64(reader: &CdbReader, file: &'static str, key: &str) -> Result<f64> {
    let bytes = reader.get(key.as_bytes()).ok_or_else(|| missing_key(file, key))?;
    Ok(f64::from_le_bytes(bytes[..8].try_into().unwrap()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdb_roundtrips_many_keys() {
        let mut writer = CdbWriter::new();
        for i in 0..500 {
            writer.put(format!("key{i}").as_bytes(), format!("value{i}").as_bytes());
        }

        let mut buf = Vec::new();
        writer.write_to(&mut buf).unwrap();

        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), &buf).unwrap();
        let reader = CdbReader::open(tmp.path()).unwrap();

        for i in 0..500 {
            let value = reader.get(format!("key{i}").as_bytes()).unwrap();
            assert_eq!(value, format!("value{i}").as_bytes());
        }
        assert!(reader.get(b"missing").is_none());
    }

    #[test]
    fn cdb_iter_yields_every_record() {
        let mut writer = CdbWriter::new();
        writer.put(b"a", b"1");
        writer.put(b"b", b"2");

        let mut buf = Vec::new();
        writer.write_to(&mut buf).unwrap();
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), &buf).unwrap();
        let reader = CdbReader::open(tmp.path()).unwrap();

        let mut entries: Vec<_> = reader.iter().collect();
        entries.sort();
        assert_eq!(entries, vec![(b"a".to_vec(), b"1".to_vec()), (b"b".to_vec(), b"2".to_vec())]);
    }

    #[test]
    fn posting_roundtrip() {
        let postings = vec![
            Posting {
                doc_id: 7,
                frequency: 2,
                boost: 1.5,
                positions: vec![3, 9],
            },
            Posting {
                doc_id: 12,
                frequency: 1,
                boost: 0.25,
                positions: vec![0],
            },
        ];
        let encoded = encode_postings(&postings);
        let decoded = decode_postings(&encoded).unwrap();
        assert_eq!(decoded, postings);
    }

    #[test]
    fn decode_postings_rejects_short_buffers() {
        assert!(matches!(
            decode_postings(&[0u8; 15]),
            Err(IndexError::DecoderTooShort(15))
        ));
    }

    #[test]
    fn field_len_roundtrip() {
        let field_len = vec![3, 8, 1, 42];
        let encoded = encode_field_len(&field_len);
        assert_eq!(decode_field_len(&encoded), field_len);
    }
}
