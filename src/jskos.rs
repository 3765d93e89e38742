//! SKOS crosswalk to JSKOS mappings
//!
//! Reads a JSON-LD graph of `skos:Concept` nodes and emits one flat JSKOS
//! mapping record per SKOS mapping relation. Relations whose target cannot
//! be resolved are skipped and reported; they never abort the run.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::JskosError;
use crate::vocab::{DEFAULT_PREFIXES, SKOS_CONCEPT_TYPE, SKOS_MAPPING_PREDICATES};

/// Options for JSKOS conversion
#[derive(Debug, Clone)]
pub struct JskosOptions {
    /// Base IRI that concept local ids are appended to
    pub concept_base: String,
    /// Base IRI of generated mapping identifiers
    pub mapping_base: String,
    /// Creator recorded on every mapping
    pub creator_uri: String,
    /// Creation timestamp recorded on every mapping
    pub created: String,
    /// CURIE prefixes expanded in relation targets
    pub prefixes: Vec<(String, String)>,
}

impl Default for JskosOptions {
    fn default() -> Self {
        Self {
            concept_base: "https://selgebali.github.io/datacite4.6-jsonld/main_context.jsonld#"
                .to_string(),
            mapping_base: "https://selgebali.github.io/datacite4.6-jsonld/jskos-mappings.json#"
                .to_string(),
            creator_uri: "https://github.com/selgebali".to_string(),
            created: "2025-07-24T00:00:00Z".to_string(),
            prefixes: DEFAULT_PREFIXES
                .iter()
                .map(|(p, iri)| (p.to_string(), iri.to_string()))
                .collect(),
        }
    }
}

/// A `{"uri": ...}` reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UriRef {
    pub uri: String,
}

/// One side of a mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptBundle {
    pub member_set: Vec<UriRef>,
}

impl ConceptBundle {
    fn single(uri: String) -> Self {
        Self {
            member_set: vec![UriRef { uri }],
        }
    }
}

/// A JSKOS concept mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mapping {
    pub from: ConceptBundle,
    pub to: ConceptBundle,
    #[serde(rename = "type")]
    pub kind: Vec<String>,
    pub creator: Vec<UriRef>,
    pub created: String,
    pub identifier: Vec<String>,
}

/// A relation that could not be turned into a mapping
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRelation {
    /// Concept IRI, if the node had an `@id`
    pub concept: Option<String>,
    /// SKOS predicate, if the failure concerns a single relation
    pub predicate: Option<String>,
    /// The offending target value
    pub target: Value,
}

impl fmt::Display for SkippedRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.concept, &self.predicate) {
            (Some(concept), Some(predicate)) => write!(
                f,
                "Skipping {} mapping from {} to invalid target: {}",
                predicate, concept, self.target
            ),
            _ => write!(f, "Skipping concept without @id: {}", self.target),
        }
    }
}

/// Result of converting a SKOS graph
#[derive(Debug, Default)]
pub struct JskosResult {
    pub mappings: Vec<Mapping>,
    pub skipped: Vec<SkippedRelation>,
}

/// Expand a CURIE with a known prefix to a full IRI
///
/// Absolute `http` IRIs, values without a colon and unknown prefixes are
/// returned unchanged.
pub fn expand_curie(curie: &str, prefixes: &[(String, String)]) -> String {
    if curie.starts_with("http") {
        return curie.to_string();
    }
    if let Some((prefix, local)) = curie.split_once(':') {
        if let Some((_, base)) = prefixes.iter().find(|(p, _)| p == prefix) {
            return format!("{}{}", base, local);
        }
    }
    curie.to_string()
}

fn is_concept(node: &Value) -> bool {
    match node.get("@type") {
        Some(Value::String(t)) => t == SKOS_CONCEPT_TYPE,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(SKOS_CONCEPT_TYPE)),
        _ => false,
    }
}

/// IRI of a relation target: a string, or an object with `@id` or `id`
fn target_iri(target: &Value) -> Option<&str> {
    match target {
        Value::String(s) => Some(s.as_str()),
        Value::Object(obj) => obj
            .get("@id")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .or_else(|| obj.get("id").and_then(|v| v.as_str())),
        _ => None,
    }
}

/// Identifier of one mapping: base IRI plus an encoded fragment
fn mapping_identifier(base: &str, local_id: &str, label: &str, target: &str) -> String {
    let fragment = format!("{}--{}--{}", local_id, label, target)
        .replace(':', "_")
        .replace('/', "_");
    format!("{}{}", base, urlencoding::encode(&fragment))
}

/// Convert a parsed JSON-LD document into JSKOS mappings
pub fn convert_graph(document: &Value, options: &JskosOptions) -> Result<JskosResult, JskosError> {
    let obj = document
        .as_object()
        .ok_or_else(|| JskosError::InvalidGraph("document is not a JSON object".to_string()))?;

    let graph: &[Value] = match obj.get("@graph") {
        Some(Value::Array(graph)) => graph.as_slice(),
        Some(_) => {
            return Err(JskosError::InvalidGraph(
                "@graph is not an array".to_string(),
            ))
        }
        None => &[],
    };

    let mut result = JskosResult::default();

    for node in graph.iter().filter(|n| is_concept(n)) {
        let Some(raw_id) = node.get("@id").and_then(|v| v.as_str()) else {
            let skipped = SkippedRelation {
                concept: None,
                predicate: None,
                target: node.clone(),
            };
            tracing::warn!("{}", skipped);
            result.skipped.push(skipped);
            continue;
        };

        let local_id = raw_id.rsplit(':').next().unwrap_or(raw_id);
        let concept_uri = format!("{}{}", options.concept_base, local_id);

        for (predicate, relation_type) in SKOS_MAPPING_PREDICATES {
            let targets = match node.get(*predicate) {
                Some(Value::Array(targets)) => targets.iter().collect::<Vec<_>>(),
                Some(target) => vec![target],
                None => continue,
            };
            let label = predicate.split_once(':').map_or(*predicate, |(_, l)| l);

            for target in targets {
                let uri = target_iri(target)
                    .map(|iri| expand_curie(iri, &options.prefixes))
                    .filter(|iri| !iri.is_empty());

                let Some(uri) = uri else {
                    let skipped = SkippedRelation {
                        concept: Some(concept_uri.clone()),
                        predicate: Some(predicate.to_string()),
                        target: target.clone(),
                    };
                    tracing::warn!("{}", skipped);
                    result.skipped.push(skipped);
                    continue;
                };

                result.mappings.push(Mapping {
                    from: ConceptBundle::single(concept_uri.clone()),
                    identifier: vec![mapping_identifier(
                        &options.mapping_base,
                        local_id,
                        label,
                        &uri,
                    )],
                    to: ConceptBundle::single(uri),
                    kind: vec![relation_type.to_string()],
                    creator: vec![UriRef {
                        uri: options.creator_uri.clone(),
                    }],
                    created: options.created.clone(),
                });
            }
        }
    }

    tracing::info!(
        "Generated {} mappings ({} relations skipped)",
        result.mappings.len(),
        result.skipped.len()
    );

    Ok(result)
}

/// Read a JSON-LD file and convert it into JSKOS mappings
pub fn convert_file(input: &Path, options: &JskosOptions) -> Result<JskosResult, JskosError> {
    let content = fs::read_to_string(input)?;
    let document: Value = serde_json::from_str(&content)?;
    convert_graph(&document, options)
}

/// Write mappings as NDJSON, one record per line
pub fn write_ndjson<W: Write>(mut writer: W, mappings: &[Mapping]) -> Result<(), JskosError> {
    for mapping in mappings {
        serde_json::to_writer(&mut writer, mapping)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_graph() -> Value {
        json!({
            "@context": {"skos": "http://www.w3.org/2004/02/skos/core#"},
            "@graph": [
                {
                    "@id": "dcite:creator",
                    "@type": "skos:Concept",
                    "skos:exactMatch": [
                        {"@id": "schema:creator"},
                        "dcterms:creator"
                    ],
                    "skos:closeMatch": {"id": "https://www.wikidata.org/wiki/Property:P170"}
                },
                {
                    "@id": "dcite:publisher",
                    "@type": ["skos:Concept"],
                    "skos:relatedMatch": "unknown:thing",
                    "skos:broadMatch": [{"label": "no id"}, 42]
                },
                {
                    "@id": "dcite:Scheme",
                    "@type": "skos:ConceptScheme",
                    "skos:exactMatch": "schema:Thing"
                }
            ]
        })
    }

    #[test]
    fn test_expand_curie() {
        let prefixes = JskosOptions::default().prefixes;
        assert_eq!(expand_curie("schema:identifier", &prefixes), "http://schema.org/identifier");
        assert_eq!(expand_curie("wd:Q42", &prefixes), "http://www.wikidata.org/entity/Q42");
        assert_eq!(expand_curie("unknown:thing", &prefixes), "unknown:thing");
        assert_eq!(
            expand_curie("https://schema.org/name", &prefixes),
            "https://schema.org/name"
        );
        assert_eq!(expand_curie("plain", &prefixes), "plain");
    }

    #[test]
    fn test_convert_graph_mappings() {
        let result = convert_graph(&sample_graph(), &JskosOptions::default()).unwrap();

        let targets: Vec<&str> = result
            .mappings
            .iter()
            .map(|m| m.to.member_set[0].uri.as_str())
            .collect();
        assert_eq!(
            targets,
            vec![
                "http://schema.org/creator",
                "http://purl.org/dc/terms/creator",
                "https://www.wikidata.org/wiki/Property:P170",
                "unknown:thing"
            ]
        );

        let first = &result.mappings[0];
        assert_eq!(
            first.from.member_set[0].uri,
            "https://selgebali.github.io/datacite4.6-jsonld/main_context.jsonld#creator"
        );
        assert_eq!(first.kind, vec!["http://www.w3.org/2004/02/skos/core#exactMatch"]);
        assert_eq!(result.mappings[2].kind, vec!["http://www.w3.org/2004/02/skos/core#closeMatch"]);
        assert_eq!(
            result.mappings[3].kind,
            vec!["http://www.w3.org/2004/02/skos/core#relatedMatch"]
        );
    }

    #[test]
    fn test_invalid_targets_are_skipped() {
        let result = convert_graph(&sample_graph(), &JskosOptions::default()).unwrap();

        assert_eq!(result.skipped.len(), 2);
        assert_eq!(result.skipped[0].predicate.as_deref(), Some("skos:broadMatch"));
        assert_eq!(result.skipped[0].target, json!({"label": "no id"}));
        assert_eq!(result.skipped[1].target, json!(42));
    }

    #[test]
    fn test_concept_without_id_is_reported() {
        let doc = json!({"@graph": [{"@type": "skos:Concept", "skos:exactMatch": "schema:name"}]});
        let result = convert_graph(&doc, &JskosOptions::default()).unwrap();

        assert!(result.mappings.is_empty());
        assert_eq!(result.skipped.len(), 1);
        assert!(result.skipped[0].concept.is_none());
    }

    #[test]
    fn test_mapping_identifier_encoding() {
        let id = mapping_identifier(
            "https://example.org/m.json#",
            "creator",
            "exactMatch",
            "http://schema.org/creator",
        );
        assert_eq!(
            id,
            "https://example.org/m.json#creator--exactMatch--http___schema.org_creator"
        );

        let id = mapping_identifier("#", "a b", "closeMatch", "x?y");
        assert_eq!(id, "#a%20b--closeMatch--x%3Fy");
    }

    #[test]
    fn test_missing_graph_and_invalid_document() {
        let result = convert_graph(&json!({"@context": {}}), &JskosOptions::default()).unwrap();
        assert!(result.mappings.is_empty());

        assert!(matches!(
            convert_graph(&json!([1, 2]), &JskosOptions::default()),
            Err(JskosError::InvalidGraph(_))
        ));
        assert!(matches!(
            convert_graph(&json!({"@graph": {}}), &JskosOptions::default()),
            Err(JskosError::InvalidGraph(_))
        ));
    }

    #[test]
    fn test_write_ndjson() {
        let result = convert_graph(&sample_graph(), &JskosOptions::default()).unwrap();
        let mut out = Vec::new();
        write_ndjson(&mut out, &result.mappings).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        let keys: Vec<&str> = first.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["from", "to", "type", "creator", "created", "identifier"]);
        assert!(first["from"]["memberSet"][0]["uri"].is_string());
        assert_eq!(first["creator"], json!([{"uri": "https://github.com/selgebali"}]));
        assert_eq!(first["created"], json!("2025-07-24T00:00:00Z"));
    }

    #[test]
    fn test_convert_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SKOScrosswalk.jsonld");
        fs::write(&path, serde_json::to_string(&sample_graph()).unwrap()).unwrap();

        let result = convert_file(&path, &JskosOptions::default()).unwrap();
        assert_eq!(result.mappings.len(), 4);

        let missing = convert_file(&dir.path().join("missing.jsonld"), &JskosOptions::default());
        assert!(matches!(missing, Err(JskosError::Io(_))));
    }
}
