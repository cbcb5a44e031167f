//! DXF file reader

mod binary_reader;
mod section_reader;
mod stream_reader;
mod text_reader;

pub use binary_reader::{DxfBinaryReader, BINARY_DXF_SENTINEL};
pub use stream_reader::{DxfCodePair, DxfStreamReader, PointReader};
pub use text_reader::DxfTextReader;

use section_reader::SectionReader;

use crate::document::DxfDocument;
use crate::error::Result;
use crate::notification::NotificationType;
use crate::types::DxfVersion;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// Configuration for the DXF reader.
#[derive(Debug, Clone)]
pub struct DxfReaderConfiguration {
    /// When `true`, errors inside a section, or a broken token stream, end
    /// up as notifications on the document and reading keeps whatever was
    /// parsed so far.
    ///
    /// Default: `true`.
    pub failsafe: bool,
}

impl Default for DxfReaderConfiguration {
    fn default() -> Self {
        Self { failsafe: true }
    }
}

/// DXF file reader
pub struct DxfReader {
    reader: Box<dyn DxfStreamReader>,
    version: DxfVersion,
    config: DxfReaderConfiguration,
}

impl DxfReader {
    /// Create a new DXF reader from any reader
    pub fn from_reader<R: Read + Seek + 'static>(reader: R) -> Result<Self> {
        let mut buf_reader = BufReader::new(reader);

        let reader: Box<dyn DxfStreamReader> = if Self::is_binary(&mut buf_reader)? {
            Box::new(DxfBinaryReader::new(buf_reader)?)
        } else {
            Box::new(DxfTextReader::new(buf_reader))
        };

        Ok(Self {
            reader,
            version: DxfVersion::Unknown,
            config: DxfReaderConfiguration::default(),
        })
    }

    /// Create a DXF reader over an in-memory file
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes.to_vec()))
    }

    /// Create a new DXF reader from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    /// Check if a stream contains binary DXF data; the stream is rewound
    pub fn is_binary<R: Read + Seek>(reader: &mut R) -> Result<bool> {
        let mut buffer = [0u8; 22];
        let mut filled = 0;
        while filled < buffer.len() {
            let n = reader.read(&mut buffer[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        reader.seek(SeekFrom::Start(0))?;
        Ok(buffer[..filled] == *BINARY_DXF_SENTINEL)
    }

    /// Set the reader configuration.
    pub fn with_configuration(mut self, config: DxfReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Read the drawing
    pub fn read(mut self) -> Result<DxfDocument> {
        let failsafe = self.config.failsafe;
        let mut document = DxfDocument::new();

        if let Err(e) = self.read_version() {
            if !failsafe {
                return Err(e);
            }
            document.notifications.notify(
                NotificationType::Warning,
                format!("Could not pre-scan the header: {}", e),
            );
            self.reader.reset()?;
        }
        document.version = self.version;

        loop {
            let pair = match self.reader.read_pair() {
                Ok(Some(pair)) => pair,
                Ok(None) => break,
                Err(e) if failsafe => {
                    document.notifications.notify(
                        NotificationType::Error,
                        format!("Reading stopped early: {}", e),
                    );
                    break;
                }
                Err(e) => return Err(e),
            };

            if pair.is_marker("EOF") {
                break;
            }
            if !pair.is_marker("SECTION") {
                continue;
            }
            let Some(section_pair) = self.reader.read_pair()? else {
                break;
            };
            if section_pair.code != 2 {
                self.reader.push_back(section_pair);
                continue;
            }

            let section_name = section_pair.value_string;
            let mut section_reader = SectionReader::new(&mut self.reader);
            let result = match section_name.as_str() {
                "HEADER" => section_reader.read_header(&mut document),
                "TABLES" => section_reader.read_tables(&mut document),
                "ENTITIES" => section_reader.read_entities(&mut document),
                "BLOCKS" => {
                    document.notifications.notify(
                        NotificationType::NotImplemented,
                        "BLOCKS section skipped; block contents are not expanded",
                    );
                    section_reader.skip_section()
                }
                _ => section_reader.skip_section(),
            };

            if let Err(e) = result {
                if !failsafe {
                    return Err(e);
                }
                document.notifications.notify(
                    NotificationType::Error,
                    format!("Error reading {} section: {}", section_name, e),
                );
                if SectionReader::new(&mut self.reader).skip_section().is_err() {
                    break;
                }
            }
        }

        log::debug!(
            "DXF {} read: {} entities, {} layers",
            document.version.release_name(),
            document.entity_count(),
            document.layers.len()
        );
        Ok(document)
    }

    /// Pre-scan the HEADER section for $ACADVER and $DWGCODEPAGE.
    ///
    /// After this call the reader is reset to the beginning and `self.version`
    /// is populated. Pre-2007 drawings with a known code page switch the
    /// stream reader to that encoding.
    fn read_version(&mut self) -> Result<()> {
        let mut code_page: Option<String> = None;

        while let Some(pair) = self.reader.read_pair()? {
            let entities_start = pair.code == 2 && pair.value_string == "ENTITIES";
            if entities_start || pair.is_marker("EOF") {
                break;
            }
            if pair.code != 9 {
                continue;
            }
            match pair.value_string.as_str() {
                "$ACADVER" => {
                    if let Some(vp) = self.reader.read_pair()? {
                        if vp.code == 1 {
                            self.version = DxfVersion::from_version_string(vp.as_str());
                        }
                    }
                }
                "$DWGCODEPAGE" => {
                    if let Some(cp) = self.reader.read_pair()? {
                        if cp.code == 3 {
                            code_page = Some(cp.value_string);
                        }
                    }
                }
                _ => {}
            }
            if self.version != DxfVersion::Unknown && code_page.is_some() {
                break;
            }
        }

        if self.version.uses_code_page() {
            if let Some(enc) = code_page
                .as_deref()
                .and_then(crate::io::dxf::code_page::encoding_from_code_page)
            {
                log::debug!("using {} for DXF strings", enc.name());
                self.reader.set_encoding(enc);
            }
        }

        self.reader.reset()?;
        Ok(())
    }
}
