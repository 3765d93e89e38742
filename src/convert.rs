//! DataCite XML to DataCite JSON conversion
//!
//! Builds the `{"data": {"id", "type", "attributes"}}` envelope served by the
//! DataCite REST API from one kernel-4 XML document.

use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use roxmltree::{Document, Node, ParsingOptions};
use serde_json::{json, Value};

use crate::crosswalk::resource_type_crosswalk;
use crate::error::ConvertError;
use crate::fields::{
    alternate_identifier, contributor, creator, date, description, funding_reference,
    geo_location, publisher, related_identifier, related_item, rights, subject, text_list, title,
};
use crate::transform::{
    collapse_affiliations, collapse_related_item_affiliations, derive_container, publication_year,
    split_doi,
};
use crate::vocab::RECORD_TYPE;
use crate::xml::{attribute, child, insert_opt, non_empty_list, section_items, text, Record};

/// Options for conversion
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Attach the base64-encoded source document as `attributes.xml`
    pub embed_source: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { embed_source: true }
    }
}

/// Result of converting one document
#[derive(Debug)]
pub struct ConvertResult {
    /// The complete JSON envelope
    pub record: Value,
    /// Statistics about the conversion
    pub stats: ConvertStats,
}

/// Statistics from conversion
#[derive(Debug, Default)]
pub struct ConvertStats {
    /// Number of top-level fields in `attributes`
    pub attributes: usize,
    /// Size of the source document in bytes
    pub source_bytes: usize,
}

/// Convert a DataCite XML document
///
/// `source` must be the complete document. It is parsed once; the embedded
/// `xml` field is encoded from these exact bytes, not from the parsed tree.
pub fn convert(source: &[u8], options: &ConvertOptions) -> Result<ConvertResult, ConvertError> {
    let xml = std::str::from_utf8(source)?;
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);

    let parsing = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, parsing)?;

    let mut attributes = build_attributes(doc.root_element());
    if options.embed_source {
        attributes.insert("xml".to_string(), Value::String(STANDARD.encode(source)));
    }

    let stats = ConvertStats {
        attributes: attributes.len(),
        source_bytes: source.len(),
    };

    let id = attributes
        .get("doi")
        .and_then(|d| d.as_str())
        .map(str::to_lowercase);

    tracing::debug!(
        "Converted {} into {} attribute fields",
        id.as_deref().unwrap_or("record without identifier"),
        stats.attributes
    );

    let record = json!({
        "data": {
            "id": id,
            "type": RECORD_TYPE,
            "attributes": attributes
        }
    });

    Ok(ConvertResult { record, stats })
}

/// Convert a DataCite XML document held in a string
pub fn convert_str(xml: &str, options: &ConvertOptions) -> Result<ConvertResult, ConvertError> {
    convert(xml.as_bytes(), options)
}

/// Read and convert a DataCite XML file
pub fn convert_file(path: &Path, options: &ConvertOptions) -> Result<ConvertResult, ConvertError> {
    if !path.is_file() {
        return Err(ConvertError::InvalidPath(path.to_path_buf()));
    }

    let source = fs::read(path).map_err(|e| ConvertError::LoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    convert(&source, options)
}

fn insert_value(record: &mut Record, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        record.insert(key.to_string(), value);
    }
}

/// Map every section of the document into the `attributes` object
fn build_attributes(root: Node) -> Record {
    let mut attributes = Record::new();

    let doi = text(child(root, "identifier"));
    if let Some(doi) = &doi {
        attributes.insert("doi".to_string(), Value::String(doi.clone()));
        let parts = split_doi(doi);
        insert_opt(&mut attributes, "prefix", parts.prefix.map(String::from));
        insert_opt(&mut attributes, "suffix", parts.suffix.map(String::from));
    }

    // Alternate identifiers are mirrored into the generic identifiers list
    let (alternates, identifiers): (Vec<Value>, Vec<Value>) =
        section_items(root, "alternateIdentifiers", "alternateIdentifier")
            .filter_map(alternate_identifier)
            .unzip();
    insert_value(&mut attributes, "identifiers", non_empty_list(identifiers));
    insert_value(&mut attributes, "alternateIdentifiers", non_empty_list(alternates));

    let mut creators = non_empty_list(section_items(root, "creators", "creator").filter_map(creator));
    if let Some(creators) = creators.as_mut() {
        collapse_affiliations(creators);
    }
    insert_value(&mut attributes, "creators", creators);

    insert_value(
        &mut attributes,
        "titles",
        non_empty_list(section_items(root, "titles", "title").filter_map(title)),
    );
    insert_value(
        &mut attributes,
        "publisher",
        child(root, "publisher").and_then(publisher),
    );

    let resource_type = child(root, "resourceType");
    let resource_type_general = resource_type.and_then(|n| attribute(n, "resourceTypeGeneral"));
    let related_identifiers = non_empty_list(
        section_items(root, "relatedIdentifiers", "relatedIdentifier")
            .filter_map(related_identifier),
    );
    let descriptions = non_empty_list(
        section_items(root, "descriptions", "description").filter_map(description),
    );

    insert_value(
        &mut attributes,
        "container",
        derive_container(
            resource_type_general.as_deref(),
            related_identifiers.as_ref(),
            descriptions.as_ref(),
        ),
    );

    insert_value(
        &mut attributes,
        "publicationYear",
        text(child(root, "publicationYear")).map(publication_year),
    );
    insert_value(
        &mut attributes,
        "subjects",
        non_empty_list(section_items(root, "subjects", "subject").filter_map(subject)),
    );

    let mut contributors =
        non_empty_list(section_items(root, "contributors", "contributor").filter_map(contributor));
    if let Some(contributors) = contributors.as_mut() {
        collapse_affiliations(contributors);
    }
    insert_value(&mut attributes, "contributors", contributors);

    insert_value(
        &mut attributes,
        "dates",
        non_empty_list(section_items(root, "dates", "date").filter_map(date)),
    );
    insert_opt(&mut attributes, "language", text(child(root, "language")));

    if let Some(resource_type) = resource_type {
        let mut types = Record::new();
        insert_opt(&mut types, "resourceType", text(Some(resource_type)));
        insert_opt(
            &mut types,
            "resourceTypeGeneral",
            resource_type_general.clone(),
        );
        resource_type_crosswalk(resource_type_general.as_deref()).extend_record(&mut types);
        attributes.insert("types".to_string(), Value::Object(types));
    }

    insert_value(&mut attributes, "relatedIdentifiers", related_identifiers);

    let mut related_items = non_empty_list(
        section_items(root, "relatedItems", "relatedItem").filter_map(related_item),
    );
    if let Some(items) = related_items.as_mut() {
        collapse_related_item_affiliations(items);
    }
    insert_value(&mut attributes, "relatedItems", related_items);

    insert_value(&mut attributes, "sizes", text_list(root, "sizes", "size"));
    insert_value(&mut attributes, "formats", text_list(root, "formats", "format"));
    insert_opt(&mut attributes, "version", text(child(root, "version")));
    insert_value(
        &mut attributes,
        "rightsList",
        non_empty_list(section_items(root, "rightsList", "rights").filter_map(rights)),
    );
    insert_value(&mut attributes, "descriptions", descriptions);
    insert_value(
        &mut attributes,
        "geoLocations",
        non_empty_list(section_items(root, "geoLocations", "geoLocation").filter_map(geo_location)),
    );
    insert_value(
        &mut attributes,
        "fundingReferences",
        non_empty_list(
            section_items(root, "fundingReferences", "fundingReference")
                .filter_map(funding_reference),
        ),
    );

    attributes
}

/// Serialize a conversion result to a JSON string
pub fn to_json_string(result: &ConvertResult, pretty: bool) -> Result<String, ConvertError> {
    if pretty {
        Ok(serde_json::to_string_pretty(&result.record)?)
    } else {
        Ok(serde_json::to_string(&result.record)?)
    }
}
