/// Cache file record codec
///
/// A cache file is a bare sequence of records, with no magic, header, footer
/// or entry count:
///
/// ```text
/// [u32 key_len][u32 bytecode_len][key_len bytes of key][bytecode_len bytes of bytecode]
/// ```
///
/// Integers are little-endian. Records are appended in insertion order.

use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};

/// Size in bytes of the two length fields preceding every record
pub const RECORD_HEADER_SIZE: u64 = 8;

/// One cached artifact: a purpose key and its compiled bytecode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Purpose string the bytecode was compiled for
    pub key: String,
    /// Compiled bytecode
    pub bytecode: Vec<u8>,
}

impl CacheEntry {
    /// Create a new cache entry
    pub fn new(key: impl Into<String>, bytecode: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            bytecode,
        }
    }

    /// Number of bytes this entry occupies on disk
    pub fn encoded_len(&self) -> u64 {
        RECORD_HEADER_SIZE + self.key.len() as u64 + self.bytecode.len() as u64
    }

    /// Serialize the record (header, key, bytecode)
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let key_len = u32::try_from(self.key.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "cache key longer than u32::MAX"))?;
        let bytecode_len = u32::try_from(self.bytecode.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "bytecode longer than u32::MAX"))?;

        writer.write_all(&key_len.to_le_bytes())?;
        writer.write_all(&bytecode_len.to_le_bytes())?;
        writer.write_all(self.key.as_bytes())?;
        writer.write_all(&self.bytecode)?;
        Ok(())
    }
}

/// Length prefix of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecordHeader {
    pub key_len: u32,
    pub bytecode_len: u32,
}

impl RecordHeader {
    fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut bytes = [0u8; RECORD_HEADER_SIZE as usize];
        reader.read_exact(&mut bytes)?;
        Ok(Self {
            key_len: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            bytecode_len: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }

    /// Total record size, header included
    pub fn record_len(&self) -> u64 {
        RECORD_HEADER_SIZE + self.key_len as u64 + self.bytecode_len as u64
    }
}

/// Result of scanning a cache file for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecordScan {
    /// Record with the key starts at this offset
    Found { offset: u64 },
    /// Reached end of file without a match
    NotFound,
    /// A record at this offset runs past end of file
    Truncated { offset: u64 },
}

/// Walk the records from the start of the file, skipping bytecode, until
/// `key` matches or the file ends
///
/// `file_len` bounds every record so a damaged length prefix cannot drive
/// reads past the end of the file. Bytecode is skipped with a relative seek
/// so the read buffer survives small records.
pub(crate) fn scan_for_key<R: Read + Seek>(
    reader: &mut BufReader<R>,
    key: &str,
    file_len: u64,
) -> io::Result<RecordScan> {
    let mut offset = reader.seek(SeekFrom::Start(0))?;

    loop {
        if offset == file_len {
            return Ok(RecordScan::NotFound);
        }
        if offset + RECORD_HEADER_SIZE > file_len {
            return Ok(RecordScan::Truncated { offset });
        }

        let header = RecordHeader::read_from(reader)?;
        if offset + header.record_len() > file_len {
            return Ok(RecordScan::Truncated { offset });
        }

        let mut record_key = vec![0u8; header.key_len as usize];
        reader.read_exact(&mut record_key)?;
        if record_key == key.as_bytes() {
            return Ok(RecordScan::Found { offset });
        }

        reader.seek_relative(i64::from(header.bytecode_len))?;
        offset += header.record_len();
    }
}

/// Collect the keys of every complete record, in file order
pub(crate) fn scan_keys<R: Read + Seek>(reader: &mut BufReader<R>, file_len: u64) -> io::Result<Vec<String>> {
    let mut keys = Vec::new();
    let mut offset = reader.seek(SeekFrom::Start(0))?;

    while offset + RECORD_HEADER_SIZE <= file_len {
        let header = RecordHeader::read_from(reader)?;
        if offset + header.record_len() > file_len {
            break;
        }
        let mut key = vec![0u8; header.key_len as usize];
        reader.read_exact(&mut key)?;
        keys.push(String::from_utf8_lossy(&key).into_owned());

        reader.seek_relative(i64::from(header.bytecode_len))?;
        offset += header.record_len();
    }

    Ok(keys)
}

/// Read the full record (key and bytecode) starting at `offset`
pub(crate) fn read_record_at<R: Read + Seek>(reader: &mut R, offset: u64) -> io::Result<CacheEntry> {
    reader.seek(SeekFrom::Start(offset))?;
    let header = RecordHeader::read_from(reader)?;

    let mut key = vec![0u8; header.key_len as usize];
    reader.read_exact(&mut key)?;
    let key = String::from_utf8(key)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let mut bytecode = vec![0u8; header.bytecode_len as usize];
    reader.read_exact(&mut bytecode)?;

    Ok(CacheEntry { key, bytecode })
}

#[cfg(test)]
#[path = "cache_entry_tests.rs"]
mod tests;
