//! DataCite Metadata Conversion Library
//!
//! This library converts DataCite kernel-4 XML records into the DataCite
//! JSON (`{"data": {"id", "type", "attributes"}}`) representation, and ships
//! two small companions for the JSON-LD profile of the same schema.
//!
//! # Overview
//!
//! A conversion walks the XML tree once and maps each section with a
//! declarative attribute table. A few fields are derived afterwards:
//!
//! 1. `prefix` and `suffix` are split from the DOI
//! 2. `container` is assembled from the resource type, the first `PURL`
//!    related identifier and the first `SeriesInformation` description
//! 3. Name-only affiliations collapse to plain strings
//! 4. `types` is extended with RIS, BibTeX, CSL and schema.org equivalents
//! 5. The source document is embedded base64-encoded as `xml`
//!
//! Missing elements never fail a conversion; only unparseable input does.
//!
//! # Companions
//!
//! - [`jskos`]: SKOS mapping relations in a JSON-LD crosswalk become flat
//!   JSKOS mapping records
//! - [`sync`]: checks that every enum of the JSON-LD profile agrees with the
//!   per-vocabulary term files it points to
//!
//! # Usage
//!
//! ```ignore
//! use datacite_convert::{convert, to_json_string, ConvertOptions};
//!
//! let xml = std::fs::read("record.xml")?;
//! let result = convert(&xml, &ConvertOptions::default())?;
//!
//! println!("{}", to_json_string(&result, true)?);
//! ```

pub mod convert;
pub mod crosswalk;
pub mod error;
pub mod fields;
pub mod jskos;
pub mod sync;
pub mod transform;
pub mod vocab;
pub mod xml;

// Re-export main types for convenience
pub use crate::convert::{
    convert, convert_file, convert_str, to_json_string, ConvertOptions, ConvertResult,
    ConvertStats,
};
pub use crate::crosswalk::{resource_type_crosswalk, TypeCrosswalk};
pub use crate::error::{ConvertError, JskosError, SyncError};
pub use crate::jskos::{convert_graph, write_ndjson, JskosOptions, JskosResult, Mapping};
pub use crate::sync::{
    check_profile, run_sync_check, Discrepancy, DiscrepancyKind, SyncOptions, SyncReport,
};
pub use crate::vocab::{DATACITE_NS, RECORD_TYPE};
