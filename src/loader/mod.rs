//! Directory batch loading.
//!
//! A load runs in four steps, each in its own module:
//! - [`scan`]: list the directory and keep supported extensions
//! - [`sort`]: order the names and apply the start index
//! - [`decode`]: turn each file into image and mask tensors
//! - [`batch`]: drive the steps, honour the load cap, skip failures

pub mod batch;
pub mod decode;
pub mod options;
pub mod scan;
pub mod sort;

pub use batch::{load_batch, load_batch_with_progress, BatchResult};
pub use decode::{decode_record, open_image, DecodedImage, ImageRecord, SourceImage};
pub use options::{BatchLoadOptions, ParseSortMethodError, SortMethod};
pub use scan::{is_supported_name, jxl_supported, scan_directory, supported_extensions, EmptyReason};
pub use sort::{numeric_key, slice_from, sort_entries, NumericKey};
