//! DXF (Drawing Exchange Format) reading

mod code_page;
mod group_code_value;
pub mod reader;

pub use code_page::encoding_from_code_page;
pub use group_code_value::GroupCodeValueType;
pub use reader::{DxfReader, DxfReaderConfiguration, BINARY_DXF_SENTINEL};
