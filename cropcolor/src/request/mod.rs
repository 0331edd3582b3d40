//! Request layer: raw inputs, their KVP encoding, and the process description.
//!
//! # Example
//!
//! ```
//! use cropcolor::request::{parse_data_inputs, ProcessDescription};
//!
//! let request = parse_data_inputs("crop_color", "r=dem.tif;output_tif=true").unwrap();
//! ProcessDescription::crop_color().check_cardinality(&request).unwrap();
//! ```

mod description;
mod input;
mod kvp;

pub use description::{
    InputDescriptor, InputKind, OutputDescriptor, OutputKind, ProcessDescription, GML_MEDIA_TYPE,
    TEXT_MEDIA_TYPE,
};
pub use input::{parse_bool, InputValue, RawRequest};
pub use kvp::parse_data_inputs;

/// Identifier under which the process is published.
pub const PROCESS_IDENTIFIER: &str = "crop_color";
