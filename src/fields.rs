//! Record mappers for DataCite XML elements
//!
//! Each mapper turns one element into a JSON record using the rename tables
//! in [`crate::vocab`]. A field is written only when its source text or
//! attribute is present, and a mapper returns `None` when nothing at all
//! was found, so empty elements never reach the output lists.
//!
//! Affiliations are always produced as full records here; collapsing them
//! to bare names happens afterwards in [`crate::transform`].

use roxmltree::Node;
use serde_json::Value;

use crate::vocab::{
    AttributeTable, AFFILIATION_ATTRS, ALTERNATE_IDENTIFIER_ATTRS, AWARD_NUMBER_ATTRS, BOX_FIELDS,
    CONTRIBUTOR_ATTRS, DATE_ATTRS, DESCRIPTION_ATTRS, FUNDER_IDENTIFIER_ATTRS, NAME_ATTRS,
    NAME_IDENTIFIER_ATTRS, NUMBER_ATTRS, POINT_FIELDS, PUBLISHER_ATTRS, RELATED_IDENTIFIER_ATTRS,
    RELATED_ITEM_ATTRS, RELATED_ITEM_FIELDS, RELATED_ITEM_IDENTIFIER_ATTRS, RIGHTS_ATTRS,
    SUBJECT_ATTRS, TITLE_ATTRS,
};
use crate::xml::{
    child, children, insert_opt, lang, map_attributes, map_child_text, non_empty,
    non_empty_list, section_items, text, Record,
};

/// A `<nameIdentifier>` element
pub fn name_identifier(node: Node) -> Option<Value> {
    let mut record = Record::new();
    insert_opt(&mut record, "nameIdentifier", text(Some(node)));
    map_attributes(node, NAME_IDENTIFIER_ATTRS, &mut record);
    non_empty(record)
}

/// An `<affiliation>` element, as a full record
pub fn affiliation(node: Node) -> Option<Value> {
    let mut record = Record::new();
    insert_opt(&mut record, "name", text(Some(node)));
    map_attributes(node, AFFILIATION_ATTRS, &mut record);
    non_empty(record)
}

/// Fields shared by creators and contributors
///
/// `name_element` is the local name of the element holding the full name
/// (`creatorName` or `contributorName`). When it is missing the record
/// simply has no `name`.
fn person(node: Node, name_element: &'static str) -> Record {
    let mut record = Record::new();
    let name_node = child(node, name_element);

    insert_opt(&mut record, "name", text(name_node));
    if let Some(name_node) = name_node {
        map_attributes(name_node, NAME_ATTRS, &mut record);
    }
    insert_opt(&mut record, "givenName", text(child(node, "givenName")));
    insert_opt(&mut record, "familyName", text(child(node, "familyName")));

    if let Some(ids) = non_empty_list(children(node, "nameIdentifier").filter_map(name_identifier)) {
        record.insert("nameIdentifiers".to_string(), ids);
    }
    if let Some(affiliations) = non_empty_list(children(node, "affiliation").filter_map(affiliation))
    {
        record.insert("affiliation".to_string(), affiliations);
    }

    record
}

/// A `<creator>` element
pub fn creator(node: Node) -> Option<Value> {
    non_empty(person(node, "creatorName"))
}

/// A `<contributor>` element: a creator record plus `contributorType`
pub fn contributor(node: Node) -> Option<Value> {
    let mut record = person(node, "contributorName");
    map_attributes(node, CONTRIBUTOR_ATTRS, &mut record);
    non_empty(record)
}

/// Text content under `key`, then `lang`, then the attributes in `table`
fn text_with_lang(node: Node, key: &str, table: AttributeTable) -> Option<Value> {
    let mut record = Record::new();
    insert_opt(&mut record, key, text(Some(node)));
    insert_opt(&mut record, "lang", lang(node));
    map_attributes(node, table, &mut record);
    non_empty(record)
}

/// A `<title>` element
pub fn title(node: Node) -> Option<Value> {
    text_with_lang(node, "title", TITLE_ATTRS)
}

/// A `<subject>` element
pub fn subject(node: Node) -> Option<Value> {
    text_with_lang(node, "subject", SUBJECT_ATTRS)
}

/// A `<description>` element
pub fn description(node: Node) -> Option<Value> {
    text_with_lang(node, "description", DESCRIPTION_ATTRS)
}

/// A `<rights>` element
pub fn rights(node: Node) -> Option<Value> {
    text_with_lang(node, "rights", RIGHTS_ATTRS)
}

/// The `<publisher>` element, as an object with a `name`
pub fn publisher(node: Node) -> Option<Value> {
    text_with_lang(node, "name", PUBLISHER_ATTRS)
}

/// A `<date>` element
pub fn date(node: Node) -> Option<Value> {
    let mut record = Record::new();
    insert_opt(&mut record, "date", text(Some(node)));
    map_attributes(node, DATE_ATTRS, &mut record);
    non_empty(record)
}

/// An `<alternateIdentifier>` element
///
/// Returns the `alternateIdentifiers` entry together with the generic
/// `identifiers` entry carrying the same value and type.
pub fn alternate_identifier(node: Node) -> Option<(Value, Value)> {
    let mut alternate = Record::new();
    insert_opt(&mut alternate, "alternateIdentifier", text(Some(node)));
    map_attributes(node, ALTERNATE_IDENTIFIER_ATTRS, &mut alternate);

    let mut generic = Record::new();
    for (from, to) in [
        ("alternateIdentifier", "identifier"),
        ("alternateIdentifierType", "identifierType"),
    ] {
        if let Some(value) = alternate.get(from) {
            generic.insert(to.to_string(), value.clone());
        }
    }

    Some((non_empty(alternate)?, Value::Object(generic)))
}

/// A `<relatedIdentifier>` element
pub fn related_identifier(node: Node) -> Option<Value> {
    let mut record = Record::new();
    insert_opt(&mut record, "relatedIdentifier", text(Some(node)));
    map_attributes(node, RELATED_IDENTIFIER_ATTRS, &mut record);
    non_empty(record)
}

/// A `<relatedItemIdentifier>` element
fn related_item_identifier(node: Node) -> Option<Value> {
    let mut record = Record::new();
    insert_opt(&mut record, "relatedItemIdentifier", text(Some(node)));
    map_attributes(node, RELATED_ITEM_IDENTIFIER_ATTRS, &mut record);
    non_empty(record)
}

/// A `<relatedItem>` element
///
/// Nested creators, titles and contributors use the same mappers as the
/// top level. Sections missing from the item are left out entirely.
pub fn related_item(node: Node) -> Option<Value> {
    let mut record = Record::new();
    map_attributes(node, RELATED_ITEM_ATTRS, &mut record);

    if let Some(identifier) = child(node, "relatedItemIdentifier").and_then(related_item_identifier)
    {
        record.insert("relatedItemIdentifier".to_string(), identifier);
    }
    if let Some(creators) = non_empty_list(section_items(node, "creators", "creator").filter_map(creator))
    {
        record.insert("creators".to_string(), creators);
    }
    if let Some(titles) = non_empty_list(section_items(node, "titles", "title").filter_map(title)) {
        record.insert("titles".to_string(), titles);
    }
    insert_opt(&mut record, "publicationYear", text(child(node, "publicationYear")));

    for (element, field) in RELATED_ITEM_FIELDS {
        let field_node = child(node, element);
        insert_opt(&mut record, field, text(field_node));
        if *element == "number" {
            if let Some(number) = field_node {
                map_attributes(number, NUMBER_ATTRS, &mut record);
            }
        }
    }

    if let Some(contributors) =
        non_empty_list(section_items(node, "contributors", "contributor").filter_map(contributor))
    {
        record.insert("contributors".to_string(), contributors);
    }

    non_empty(record)
}

/// Coordinates of a `<geoLocationPoint>`, `<polygonPoint>` or `<inPolygonPoint>`
fn point(node: Node) -> Option<Value> {
    let mut record = Record::new();
    map_child_text(node, POINT_FIELDS, &mut record);
    non_empty(record)
}

/// Points of a `<geoLocationPolygon>` in document order
///
/// Each entry is wrapped in an object named after its element so that the
/// interior `inPolygonPoint` stays distinguishable from the boundary.
fn polygon(node: Node) -> Option<Value> {
    let namespace = node.tag_name().namespace();
    let points = node
        .children()
        .filter(|n| n.is_element() && n.tag_name().namespace() == namespace)
        .filter_map(|n| {
            let key = n.tag_name().name();
            match key {
                "polygonPoint" | "inPolygonPoint" => point(n).map(|p| {
                    let mut entry = Record::new();
                    entry.insert(key.to_string(), p);
                    Value::Object(entry)
                }),
                _ => None,
            }
        });
    non_empty_list(points)
}

/// A `<geoLocation>` element
///
/// Place, point, box and polygon are each optional; a partial box keeps
/// whichever bounds are present.
pub fn geo_location(node: Node) -> Option<Value> {
    let mut record = Record::new();
    insert_opt(&mut record, "geoLocationPlace", text(child(node, "geoLocationPlace")));

    if let Some(coordinates) = child(node, "geoLocationPoint").and_then(point) {
        record.insert("geoLocationPoint".to_string(), coordinates);
    }

    if let Some(bounds) = child(node, "geoLocationBox") {
        let mut boxed = Record::new();
        map_child_text(bounds, BOX_FIELDS, &mut boxed);
        if let Some(boxed) = non_empty(boxed) {
            record.insert("geoLocationBox".to_string(), boxed);
        }
    }

    if let Some(points) = child(node, "geoLocationPolygon").and_then(polygon) {
        record.insert("geoLocationPolygon".to_string(), points);
    }

    non_empty(record)
}

/// A `<fundingReference>` element, using the flat DataCite JSON keys
pub fn funding_reference(node: Node) -> Option<Value> {
    let mut record = Record::new();
    insert_opt(&mut record, "funderName", text(child(node, "funderName")));

    if let Some(funder) = child(node, "funderIdentifier") {
        insert_opt(&mut record, "funderIdentifier", text(Some(funder)));
        map_attributes(funder, FUNDER_IDENTIFIER_ATTRS, &mut record);
    }
    if let Some(award) = child(node, "awardNumber") {
        insert_opt(&mut record, "awardNumber", text(Some(award)));
        map_attributes(award, AWARD_NUMBER_ATTRS, &mut record);
    }
    insert_opt(&mut record, "awardTitle", text(child(node, "awardTitle")));

    non_empty(record)
}

/// Plain text entries of a section such as `sizes/size`
pub fn text_list(root: Node, section: &'static str, item: &'static str) -> Option<Value> {
    non_empty_list(
        section_items(root, section, item)
            .filter_map(|n| text(Some(n)))
            .map(Value::String),
    )
}
