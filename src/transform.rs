//! Post-processing of mapped records
//!
//! Derived fields that are not copied verbatim from the XML. These run on
//! records already produced by [`crate::fields`], never during traversal.

use serde_json::Value;

use crate::vocab::{
    CONTAINER_IDENTIFIER_TYPE, CONTAINER_TITLE_DESCRIPTION_TYPE, DATASET_CONTAINER_TYPE,
    DATASET_TYPE, DOI_SEPARATOR,
};
use crate::xml::{insert_opt, non_empty, Record};

/// Prefix and suffix of a DOI
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DoiParts<'a> {
    pub prefix: Option<&'a str>,
    pub suffix: Option<&'a str>,
}

/// Split a DOI on its first separator
///
/// A DOI without a separator has neither part. Empty parts are dropped, so
/// `"10.5072/"` yields a prefix only.
pub fn split_doi(doi: &str) -> DoiParts<'_> {
    match doi.split_once(DOI_SEPARATOR) {
        Some((prefix, suffix)) => DoiParts {
            prefix: Some(prefix).filter(|p| !p.is_empty()),
            suffix: Some(suffix).filter(|s| !s.is_empty()),
        },
        None => DoiParts::default(),
    }
}

/// Replace affiliation records that only carry a name with the bare name
///
/// `people` is a `creators` or `contributors` list. Records with any
/// identifier or scheme attribute are left untouched.
pub fn collapse_affiliations(people: &mut Value) {
    let Some(people) = people.as_array_mut() else {
        return;
    };

    for person in people {
        let Some(Value::Array(affiliations)) = person.get_mut("affiliation") else {
            continue;
        };
        for affiliation in affiliations.iter_mut() {
            if let Some(name) = bare_name(affiliation) {
                *affiliation = Value::String(name);
            }
        }
    }
}

/// The name of an affiliation record whose only field is `name`
fn bare_name(affiliation: &Value) -> Option<String> {
    let obj = affiliation.as_object()?;
    if obj.len() != 1 {
        return None;
    }
    obj.get("name").and_then(|n| n.as_str()).map(String::from)
}

/// Collapse affiliations of the people nested in each related item
pub fn collapse_related_item_affiliations(items: &mut Value) {
    let Some(items) = items.as_array_mut() else {
        return;
    };

    for item in items {
        if let Some(obj) = item.as_object_mut() {
            for key in ["creators", "contributors"] {
                if let Some(people) = obj.get_mut(key) {
                    collapse_affiliations(people);
                }
            }
        }
    }
}

/// First record in `list` whose `key` field equals `value`
fn first_with<'a>(list: Option<&'a Value>, key: &str, value: &str) -> Option<&'a Value> {
    list?
        .as_array()?
        .iter()
        .find(|record| record.get(key).and_then(|v| v.as_str()) == Some(value))
}

/// Assemble the `container` object from otherwise unrelated sections
///
/// - `type` is `DataRepository` when resourceTypeGeneral is `Dataset`
/// - `identifier`/`identifierType` come from the first related identifier
///   of type `PURL`
/// - `title` comes from the first description of type `SeriesInformation`
///
/// Only the first match in document order is used. Returns `None` when no
/// source applies.
pub fn derive_container(
    resource_type_general: Option<&str>,
    related_identifiers: Option<&Value>,
    descriptions: Option<&Value>,
) -> Option<Value> {
    let mut container = Record::new();

    if resource_type_general.is_some_and(|g| g.eq_ignore_ascii_case(DATASET_TYPE)) {
        container.insert("type".to_string(), DATASET_CONTAINER_TYPE.into());
    }

    if let Some(purl) = first_with(
        related_identifiers,
        "relatedIdentifierType",
        CONTAINER_IDENTIFIER_TYPE,
    ) {
        insert_opt(&mut container, "identifier", string_field(purl, "relatedIdentifier"));
        container.insert("identifierType".to_string(), CONTAINER_IDENTIFIER_TYPE.into());
    }

    if let Some(series) = first_with(
        descriptions,
        "descriptionType",
        CONTAINER_TITLE_DESCRIPTION_TYPE,
    ) {
        insert_opt(&mut container, "title", string_field(series, "description"));
    }

    non_empty(container)
}

fn string_field(record: &Value, key: &str) -> Option<String> {
    record.get(key).and_then(|v| v.as_str()).map(String::from)
}

/// Publication year as a JSON number when it is an integer, else as text
///
/// Integers beyond the `u64` range stay text.
pub fn publication_year(year: String) -> Value {
    if let Ok(n) = year.parse::<i64>() {
        return Value::from(n);
    }
    match year.parse::<u64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::String(year),
    }
}
