//! Vocabulary definitions for DataCite conversion
//!
//! Namespaces, fixed marker values, and the attribute rename tables used
//! when mapping DataCite XML onto DataCite JSON. Each table pairs an XML
//! attribute name with the JSON field it becomes. Attributes spelled with
//! an upper-case `URI` suffix are renamed to `Uri`, all others keep their
//! name.

/// DataCite Metadata Schema kernel-4 namespace
pub const DATACITE_NS: &str = "http://datacite.org/schema/kernel-4";

/// Namespace holding the `lang` attribute
pub const XML_NS: &str = roxmltree::NS_XML_URI;

/// Value of `data.type` in the envelope
pub const RECORD_TYPE: &str = "dois";

/// Separator between DOI prefix and suffix
pub const DOI_SEPARATOR: char = '/';

/// resourceTypeGeneral value (case-insensitive) that gives the container a type
pub const DATASET_TYPE: &str = "dataset";

/// Container type used for datasets
pub const DATASET_CONTAINER_TYPE: &str = "DataRepository";

/// relatedIdentifierType marking the container's identifier
pub const CONTAINER_IDENTIFIER_TYPE: &str = "PURL";

/// descriptionType marking the container's title
pub const CONTAINER_TITLE_DESCRIPTION_TYPE: &str = "SeriesInformation";

/// Attribute to field rename table
pub type AttributeTable = &'static [(&'static str, &'static str)];

pub const NAME_ATTRS: AttributeTable = &[("nameType", "nameType")];

pub const NAME_IDENTIFIER_ATTRS: AttributeTable = &[
    ("nameIdentifierScheme", "nameIdentifierScheme"),
    ("schemeURI", "schemeUri"),
];

pub const AFFILIATION_ATTRS: AttributeTable = &[
    ("affiliationIdentifier", "affiliationIdentifier"),
    ("affiliationIdentifierScheme", "affiliationIdentifierScheme"),
    ("schemeURI", "schemeUri"),
];

pub const CONTRIBUTOR_ATTRS: AttributeTable = &[("contributorType", "contributorType")];

pub const TITLE_ATTRS: AttributeTable = &[("titleType", "titleType")];

pub const SUBJECT_ATTRS: AttributeTable = &[
    ("subjectScheme", "subjectScheme"),
    ("schemeURI", "schemeUri"),
    ("valueURI", "valueUri"),
    ("classificationCode", "classificationCode"),
];

pub const PUBLISHER_ATTRS: AttributeTable = &[
    ("publisherIdentifier", "publisherIdentifier"),
    ("publisherIdentifierScheme", "publisherIdentifierScheme"),
    ("schemeURI", "schemeUri"),
];

pub const DATE_ATTRS: AttributeTable = &[
    ("dateType", "dateType"),
    ("dateInformation", "dateInformation"),
];

pub const ALTERNATE_IDENTIFIER_ATTRS: AttributeTable =
    &[("alternateIdentifierType", "alternateIdentifierType")];

pub const RELATED_IDENTIFIER_ATTRS: AttributeTable = &[
    ("relatedIdentifierType", "relatedIdentifierType"),
    ("relationType", "relationType"),
    ("relatedMetadataScheme", "relatedMetadataScheme"),
    ("schemeURI", "schemeUri"),
    ("schemeType", "schemeType"),
    ("resourceTypeGeneral", "resourceTypeGeneral"),
];

pub const RELATED_ITEM_ATTRS: AttributeTable = &[
    ("relatedItemType", "relatedItemType"),
    ("relationType", "relationType"),
];

pub const RELATED_ITEM_IDENTIFIER_ATTRS: AttributeTable = &[
    ("relatedItemIdentifierType", "relatedItemIdentifierType"),
    ("relatedMetadataScheme", "relatedMetadataScheme"),
    ("schemeURI", "schemeUri"),
    ("schemeType", "schemeType"),
];

/// Child elements of a related item copied as plain text fields
pub const RELATED_ITEM_FIELDS: AttributeTable = &[
    ("volume", "volume"),
    ("issue", "issue"),
    ("number", "number"),
    ("firstPage", "firstPage"),
    ("lastPage", "lastPage"),
    ("publisher", "publisher"),
    ("edition", "edition"),
];

pub const NUMBER_ATTRS: AttributeTable = &[("numberType", "numberType")];

pub const RIGHTS_ATTRS: AttributeTable = &[
    ("rightsURI", "rightsUri"),
    ("schemeURI", "schemeUri"),
    ("rightsIdentifier", "rightsIdentifier"),
    ("rightsIdentifierScheme", "rightsIdentifierScheme"),
];

pub const DESCRIPTION_ATTRS: AttributeTable = &[("descriptionType", "descriptionType")];

pub const FUNDER_IDENTIFIER_ATTRS: AttributeTable = &[
    ("funderIdentifierType", "funderIdentifierType"),
    ("schemeURI", "schemeUri"),
];

pub const AWARD_NUMBER_ATTRS: AttributeTable = &[("awardURI", "awardUri")];

/// Coordinates of a point, in output order
pub const POINT_FIELDS: AttributeTable = &[
    ("pointLatitude", "pointLatitude"),
    ("pointLongitude", "pointLongitude"),
];

/// Bounds of a geolocation box, in output order
pub const BOX_FIELDS: AttributeTable = &[
    ("westBoundLongitude", "westBoundLongitude"),
    ("eastBoundLongitude", "eastBoundLongitude"),
    ("southBoundLatitude", "southBoundLatitude"),
    ("northBoundLatitude", "northBoundLatitude"),
];

/// SKOS mapping predicates and the relation type IRI each one produces
pub const SKOS_MAPPING_PREDICATES: AttributeTable = &[
    ("skos:exactMatch", "http://www.w3.org/2004/02/skos/core#exactMatch"),
    ("skos:closeMatch", "http://www.w3.org/2004/02/skos/core#closeMatch"),
    ("skos:broadMatch", "http://www.w3.org/2004/02/skos/core#broadMatch"),
    ("skos:narrowMatch", "http://www.w3.org/2004/02/skos/core#narrowMatch"),
    ("skos:relatedMatch", "http://www.w3.org/2004/02/skos/core#relatedMatch"),
];

/// Node type selecting concepts in a SKOS crosswalk graph
pub const SKOS_CONCEPT_TYPE: &str = "skos:Concept";

/// CURIE prefixes expanded in SKOS crosswalk targets
pub const DEFAULT_PREFIXES: AttributeTable = &[
    ("schema", "http://schema.org/"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("wd", "http://www.wikidata.org/entity/"),
    ("dcat", "http://www.w3.org/ns/dcat#"),
];

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TABLES: &[AttributeTable] = &[
        NAME_ATTRS,
        NAME_IDENTIFIER_ATTRS,
        AFFILIATION_ATTRS,
        CONTRIBUTOR_ATTRS,
        TITLE_ATTRS,
        SUBJECT_ATTRS,
        PUBLISHER_ATTRS,
        DATE_ATTRS,
        ALTERNATE_IDENTIFIER_ATTRS,
        RELATED_IDENTIFIER_ATTRS,
        RELATED_ITEM_ATTRS,
        RELATED_ITEM_IDENTIFIER_ATTRS,
        RELATED_ITEM_FIELDS,
        NUMBER_ATTRS,
        RIGHTS_ATTRS,
        DESCRIPTION_ATTRS,
        FUNDER_IDENTIFIER_ATTRS,
        AWARD_NUMBER_ATTRS,
        POINT_FIELDS,
        BOX_FIELDS,
    ];

    #[test]
    fn test_output_fields_are_lower_camel() {
        for table in ALL_TABLES {
            for (source, field) in table.iter() {
                assert!(!field.contains("URI"), "{} -> {}", source, field);
                assert!(field.starts_with(|c: char| c.is_ascii_lowercase()));
            }
        }
    }

    #[test]
    fn test_uri_attributes_renamed() {
        let renamed: Vec<_> = ALL_TABLES
            .iter()
            .flat_map(|t| t.iter())
            .filter(|(source, _)| source.ends_with("URI"))
            .collect();
        assert!(!renamed.is_empty());
        for (source, field) in renamed {
            assert_eq!(field.strip_suffix("Uri"), source.strip_suffix("URI"));
        }
    }
}
