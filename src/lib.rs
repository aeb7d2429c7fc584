//! Convert logic simulator "v2.0 raw" memory images into raw binary files.
//!
//! An image is a text file whose first line is the format tag and whose
//! remaining lines each hold one hex record. Records are decoded and appended
//! in order to `<image>.bin`.

pub mod converter;
pub mod error;
pub mod header;
pub mod utils;

pub use converter::{convert, convert_stream, output_path, ConversionReport, OUTPUT_SUFFIX};
pub use error::ConversionError;
pub use header::{check_header, HeaderCheck, FORMAT_TAG};
pub use utils::hex_to_bin;
