//! Binary DXF reader (R13 and later)

use super::stream_reader::{DxfCodePair, DxfStreamReader};
use crate::error::{Result, TakeoffError};
use crate::io::dxf::GroupCodeValueType;
use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::Encoding;
use std::io::{BufRead, ErrorKind, Seek, SeekFrom};

/// Binary DXF sentinel
pub const BINARY_DXF_SENTINEL: &[u8] = b"AutoCAD Binary DXF\r\n\x1a\x00";

/// Binary DXF stream reader.
///
/// Group codes are little-endian `i16`; values have a fixed width per code
/// type, strings are NUL-terminated and binary chunks carry a one-byte length.
pub struct DxfBinaryReader<R: BufRead + Seek> {
    reader: R,
    peeked_pair: Option<DxfCodePair>,
    encoding: Option<&'static Encoding>,
}

impl<R: BufRead + Seek> DxfBinaryReader<R> {
    /// Create a reader; fails unless the stream starts with the sentinel
    pub fn new(mut reader: R) -> Result<Self> {
        let mut sentinel = [0u8; 22];
        reader.read_exact(&mut sentinel)?;
        if sentinel != BINARY_DXF_SENTINEL {
            return Err(TakeoffError::InvalidFormat(
                "missing binary DXF sentinel".to_string(),
            ));
        }
        Ok(Self {
            reader,
            peeked_pair: None,
            encoding: None,
        })
    }

    fn read_string(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        self.reader.read_until(0, &mut bytes)?;
        if bytes.last() == Some(&0) {
            bytes.pop();
        } else {
            return Err(TakeoffError::Parse("unterminated string in binary DXF".to_string()));
        }
        let s = match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => {
                let bytes = e.into_bytes();
                match self.encoding {
                    Some(enc) => enc.decode(&bytes).0.into_owned(),
                    None => bytes.iter().map(|&b| b as char).collect(),
                }
            }
        };
        Ok(s)
    }

    fn read_pair_internal(&mut self) -> Result<Option<DxfCodePair>> {
        let code = match self.reader.read_i16::<LittleEndian>() {
            Ok(code) => i32::from(code),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let pair = match GroupCodeValueType::from_code(code) {
            GroupCodeValueType::Double => {
                DxfCodePair::from_double(code, self.reader.read_f64::<LittleEndian>()?)
            }
            GroupCodeValueType::Int16 => {
                DxfCodePair::from_int(code, i64::from(self.reader.read_i16::<LittleEndian>()?))
            }
            GroupCodeValueType::Int32 => {
                DxfCodePair::from_int(code, i64::from(self.reader.read_i32::<LittleEndian>()?))
            }
            GroupCodeValueType::Int64 => {
                DxfCodePair::from_int(code, self.reader.read_i64::<LittleEndian>()?)
            }
            GroupCodeValueType::Bool => {
                DxfCodePair::from_int(code, i64::from(self.reader.read_u8()?))
            }
            GroupCodeValueType::Binary => {
                let len = usize::from(self.reader.read_u8()?);
                let mut chunk = vec![0u8; len];
                self.reader.read_exact(&mut chunk)?;
                let hex: String = chunk.iter().map(|b| format!("{:02X}", b)).collect();
                DxfCodePair::new(code, hex)
            }
            GroupCodeValueType::String
            | GroupCodeValueType::Handle
            | GroupCodeValueType::Comment => {
                let value = self.read_string()?;
                DxfCodePair::new(code, value)
            }
        };
        Ok(Some(pair))
    }
}

impl<R: BufRead + Seek> DxfStreamReader for DxfBinaryReader<R> {
    fn read_pair(&mut self) -> Result<Option<DxfCodePair>> {
        if let Some(pair) = self.peeked_pair.take() {
            return Ok(Some(pair));
        }
        self.read_pair_internal()
    }

    fn peek_code(&mut self) -> Result<Option<i32>> {
        if let Some(ref pair) = self.peeked_pair {
            return Ok(Some(pair.code));
        }
        match self.read_pair_internal()? {
            Some(pair) => {
                let code = pair.code;
                self.peeked_pair = Some(pair);
                Ok(Some(code))
            }
            None => Ok(None),
        }
    }

    fn push_back(&mut self, pair: DxfCodePair) {
        self.peeked_pair = Some(pair);
    }

    fn reset(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(BINARY_DXF_SENTINEL.len() as u64))?;
        self.peeked_pair = None;
        Ok(())
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;
    use std::io::{Cursor, Write};

    fn encode(pairs: &[(i16, &dyn Fn(&mut Vec<u8>))]) -> Vec<u8> {
        let mut buf = BINARY_DXF_SENTINEL.to_vec();
        for (code, write_value) in pairs {
            buf.write_i16::<LittleEndian>(*code).unwrap();
            write_value(&mut buf);
        }
        buf
    }

    fn string(s: &'static str) -> impl Fn(&mut Vec<u8>) {
        move |b: &mut Vec<u8>| {
            b.write_all(s.as_bytes()).unwrap();
            b.write_u8(0).unwrap();
        }
    }

    #[test]
    fn test_typed_values() {
        let section = string("SECTION");
        let x = |b: &mut Vec<u8>| b.write_f64::<LittleEndian>(12.5).unwrap();
        let units = |b: &mut Vec<u8>| b.write_i16::<LittleEndian>(4).unwrap();
        let flag = |b: &mut Vec<u8>| b.write_u8(1).unwrap();
        let data = encode(&[(0, &section), (10, &x), (70, &units), (290, &flag)]);

        let mut r = DxfBinaryReader::new(Cursor::new(data.as_slice())).unwrap();
        assert!(r.read_pair().unwrap().unwrap().is_marker("SECTION"));
        assert_eq!(r.read_pair().unwrap().unwrap().as_double(), Some(12.5));
        assert_eq!(r.read_pair().unwrap().unwrap().as_i16(), Some(4));
        assert_eq!(r.read_pair().unwrap().unwrap().as_bool(), Some(true));
        assert!(r.read_pair().unwrap().is_none());

        r.reset().unwrap();
        assert_eq!(r.peek_code().unwrap(), Some(0));
    }

    #[test]
    fn test_binary_chunk_as_hex() {
        let chunk = |b: &mut Vec<u8>| {
            b.write_u8(2).unwrap();
            b.write_all(&[0xAB, 0x01]).unwrap();
        };
        let data = encode(&[(310, &chunk)]);
        let mut r = DxfBinaryReader::new(Cursor::new(data.as_slice())).unwrap();
        assert_eq!(r.read_pair().unwrap().unwrap().value_string, "AB01");
    }

    #[test]
    fn test_rejects_text_dxf() {
        let data = b"  0\nSECTION\n  2\nHEADER\n  0\nENDSEC\n";
        assert!(DxfBinaryReader::new(Cursor::new(&data[..])).is_err());
    }
}
