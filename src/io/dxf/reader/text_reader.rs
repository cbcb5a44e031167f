//! DXF ASCII text reader

use super::stream_reader::{DxfCodePair, DxfStreamReader};
use crate::error::{Result, TakeoffError};
use encoding_rs::Encoding;
use std::io::{BufRead, Seek, SeekFrom};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// DXF ASCII text reader
pub struct DxfTextReader<R: BufRead + Seek> {
    reader: R,
    line_number: usize,
    peeked_pair: Option<DxfCodePair>,
    /// Non-UTF8 fallback encoding.  `None` means use Latin-1 (byte-to-char).
    encoding: Option<&'static Encoding>,
    buffer: Vec<u8>,
}

impl<R: BufRead + Seek> DxfTextReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            peeked_pair: None,
            encoding: None,
            buffer: Vec::with_capacity(256),
        }
    }

    /// Read one line, decoding non-UTF-8 bytes with the configured encoding
    /// (or Latin-1). Line terminators and surrounding whitespace are removed.
    fn read_line(&mut self) -> Result<Option<String>> {
        self.buffer.clear();
        if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        let mut bytes = self.buffer.as_slice();
        if self.line_number == 1 {
            bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        }

        let line = match std::str::from_utf8(bytes) {
            Ok(s) => s.trim().to_string(),
            Err(_) => match self.encoding {
                Some(enc) => enc.decode(bytes).0.trim().to_string(),
                // Latin-1 is a 1:1 mapping of bytes 0-255 to Unicode code points
                None => bytes.iter().map(|&b| b as char).collect::<String>().trim().to_string(),
            },
        };
        Ok(Some(line))
    }

    fn read_pair_internal(&mut self) -> Result<Option<DxfCodePair>> {
        let code_line = match self.read_line()? {
            Some(line) => line,
            None => return Ok(None),
        };
        // tolerate a trailing blank line after EOF
        if code_line.is_empty() {
            if let Some(next) = self.read_line()? {
                return Err(TakeoffError::Parse(format!(
                    "Empty DXF code at line {} (followed by '{}')",
                    self.line_number - 1,
                    next
                )));
            }
            return Ok(None);
        }

        let code = code_line.parse::<i32>().map_err(|_| {
            TakeoffError::Parse(format!(
                "Invalid DXF code at line {}: '{}'",
                self.line_number, code_line
            ))
        })?;

        let value_line = self.read_line()?.ok_or_else(|| {
            TakeoffError::Parse(format!(
                "Unexpected EOF after code {} at line {}",
                code, self.line_number
            ))
        })?;

        Ok(Some(DxfCodePair::new(code, unescape(&value_line))))
    }
}

/// Caret escapes used in DXF strings
fn unescape(value: &str) -> String {
    if !value.contains('^') {
        return value.to_string();
    }
    value
        .replace("^J", "\n")
        .replace("^M", "\r")
        .replace("^I", "\t")
        .replace("^ ", "^")
}

impl<R: BufRead + Seek> DxfStreamReader for DxfTextReader<R> {
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
        self.reader.seek(SeekFrom::Start(0))?;
        self.line_number = 0;
        self.peeked_pair = None;
        Ok(())
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }
}
