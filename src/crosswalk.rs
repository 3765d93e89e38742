//! Resource type crosswalk
//!
//! Maps a DataCite `resourceTypeGeneral` onto the equivalent RIS, BibTeX,
//! CSL (citeproc) and Schema.org types. The table is fixed data; values not
//! listed, and a missing value, use the `other` row.

use serde::Serialize;
use serde_json::Value;

use crate::xml::Record;

/// Types in four external vocabularies for one resourceTypeGeneral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCrosswalk {
    pub ris: &'static str,
    pub bibtex: &'static str,
    pub citeproc: &'static str,
    pub schema_org: &'static str,
}

/// Row used for unknown and missing values
pub const OTHER: TypeCrosswalk = TypeCrosswalk {
    ris: "GEN",
    bibtex: "misc",
    citeproc: "other",
    schema_org: "CreativeWork",
};

/// Lower-cased resourceTypeGeneral to crosswalk row
pub const CROSSWALK: &[(&str, TypeCrosswalk)] = &[
    (
        "dataset",
        TypeCrosswalk {
            ris: "DATA",
            bibtex: "misc",
            citeproc: "dataset",
            schema_org: "Dataset",
        },
    ),
    (
        "collection",
        TypeCrosswalk {
            ris: "GEN",
            bibtex: "misc",
            citeproc: "dataset",
            schema_org: "Collection",
        },
    ),
    (
        "text",
        TypeCrosswalk {
            ris: "GEN",
            bibtex: "article",
            citeproc: "article",
            schema_org: "ScholarlyArticle",
        },
    ),
    (
        "audiovisual",
        TypeCrosswalk {
            ris: "AV",
            bibtex: "misc",
            citeproc: "motion_picture",
            schema_org: "VideoObject",
        },
    ),
    (
        "image",
        TypeCrosswalk {
            ris: "IMAGE",
            bibtex: "misc",
            citeproc: "graphic",
            schema_org: "ImageObject",
        },
    ),
    (
        "software",
        TypeCrosswalk {
            ris: "COMP",
            bibtex: "software",
            citeproc: "software",
            schema_org: "SoftwareSourceCode",
        },
    ),
    ("other", OTHER),
];

/// Look up the crosswalk row for a resourceTypeGeneral (case-insensitive)
pub fn resource_type_crosswalk(resource_type_general: Option<&str>) -> TypeCrosswalk {
    resource_type_general
        .and_then(|general| {
            CROSSWALK
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(general.trim()))
        })
        .map(|(_, row)| *row)
        .unwrap_or(OTHER)
}

impl TypeCrosswalk {
    /// Append the four crosswalk fields to a `types` record
    pub fn extend_record(&self, record: &mut Record) {
        if let Ok(Value::Object(fields)) = serde_json::to_value(self) {
            record.extend(fields);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_types_case_insensitive() {
        assert_eq!(resource_type_crosswalk(Some("Dataset")).schema_org, "Dataset");
        assert_eq!(resource_type_crosswalk(Some("DATASET")).ris, "DATA");
        assert_eq!(
            resource_type_crosswalk(Some("Software")).schema_org,
            "SoftwareSourceCode"
        );
        assert_eq!(resource_type_crosswalk(Some("Audiovisual")).citeproc, "motion_picture");
        assert_eq!(resource_type_crosswalk(Some("Text")).bibtex, "article");
    }

    #[test]
    fn test_unknown_and_missing_fall_back_to_other() {
        for general in [Some("PhysicalObject"), Some(""), Some("Workflow"), None] {
            assert_eq!(resource_type_crosswalk(general), OTHER);
        }
    }

    #[test]
    fn test_extend_record_field_names() {
        let mut record = Record::new();
        record.insert("resourceTypeGeneral".to_string(), json!("Image"));
        resource_type_crosswalk(Some("Image")).extend_record(&mut record);

        assert_eq!(
            Value::Object(record),
            json!({
                "resourceTypeGeneral": "Image",
                "ris": "IMAGE",
                "bibtex": "misc",
                "citeproc": "graphic",
                "schemaOrg": "ImageObject"
            })
        );
    }

    #[test]
    fn test_extend_record_appends_in_field_order() {
        let mut record = Record::new();
        record.insert("resourceType".to_string(), json!("Census Data"));
        OTHER.extend_record(&mut record);

        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["resourceType", "ris", "bibtex", "citeproc", "schemaOrg"]);
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(OTHER).unwrap();
        assert_eq!(value["schemaOrg"], json!("CreativeWork"));
    }
}
