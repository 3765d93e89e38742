//! Sync check between profile enums and enum_lists term files
//!
//! Every `$defs` entry of the profile that has both an `enum` array and an
//! `iriMap` object is compared against the JSON-LD term file its IRIs point
//! to. All discrepancies across all entries are collected; nothing stops at
//! the first mismatch.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

use crate::error::SyncError;

/// Options for the sync check
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Base URL every iriMap value must start with, before the file name
    pub expected_base: String,
    /// Fragment spellings treated as the same term
    pub aliases: Vec<(String, String)>,
    /// Term file nodes whose term ends with one of these are scheme nodes
    pub ignore_suffixes: Vec<String>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            expected_base: "https://selgebali.github.io/datacite4.6-jsonld/enum_lists/".to_string(),
            aliases: vec![("CrossrefFunderID".to_string(), "Crossref Funder ID".to_string())],
            ignore_suffixes: vec!["Scheme".to_string()],
        }
    }
}

impl SyncOptions {
    fn alias<'a>(&'a self, term: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(from, _)| from == term)
            .map_or(term, |(_, to)| to.as_str())
    }
}

/// What went wrong for one `$defs` entry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscrepancyKind {
    #[error("iriMap missing terms: {0:?}")]
    IriMapMissingTerms(Vec<String>),

    #[error("enum missing terms: {0:?}")]
    EnumMissingTerms(Vec<String>),

    #[error("iriMap is empty")]
    EmptyIriMap,

    #[error("Cannot parse IRI '{iri}': {reason}")]
    InvalidIri { iri: String, reason: String },

    #[error("enum JSON-LD file not found: {}", .0.display())]
    EnumFileNotFound(PathBuf),

    #[error("enum JSON-LD file unreadable: {}: {reason}", .path.display())]
    EnumFileUnreadable { path: PathBuf, reason: String },

    #[error("enum_lists missing terms: {0:?}")]
    EnumListMissingTerms(Vec<String>),

    #[error("$defs missing terms present in enum_lists: {0:?}")]
    DefsMissingTerms(Vec<String>),

    #[error("IRI not http(s): {0}")]
    NotHttp(String),

    #[error("Unexpected IRI base or filename for term '{term}':\n  got:      {got}\n  expected prefix: {expected_prefix}…")]
    UnexpectedBase {
        term: String,
        got: String,
        expected_prefix: String,
    },

    #[error("IRI fragment '{fragment}' does not match enum term '{term}'.")]
    FragmentMismatch { fragment: String, term: String },
}

/// A discrepancy found in one `$defs` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discrepancy {
    pub def_key: String,
    pub kind: DiscrepancyKind,
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.def_key, self.kind)
    }
}

/// Outcome of a whole sync check
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Number of `$defs` entries that carried both `enum` and `iriMap`
    pub checked: usize,
    /// Every discrepancy, in profile order
    pub discrepancies: Vec<Discrepancy>,
}

impl SyncReport {
    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

fn load_json(path: &Path) -> Result<Value, SyncError> {
    let content = fs::read_to_string(path).map_err(|e| SyncError::LoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(serde_json::from_str(&content)?)
}

fn decode(s: &str) -> String {
    urlencoding::decode(s)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

/// File name of the term file an IRI points to (`…/enum_lists/<file>.jsonld#Term`)
///
/// The name is the last path segment exactly as written in the IRI, so
/// non-ASCII file names are not percent-encoded.
pub fn iri_filename(iri: &str) -> Result<String, String> {
    Url::parse(iri).map_err(|e| e.to_string())?;
    let path = iri.split(|c| c == '#' || c == '?').next().unwrap_or(iri);
    let name = path.rsplit('/').next().unwrap_or(path);
    if !name.ends_with(".jsonld") {
        return Err(format!("IRI does not end with .jsonld path: {}", iri));
    }
    Ok(name.to_string())
}

/// Term named by a term file node `@id`
///
/// CURIEs give their local part, IRIs their fragment or last path segment.
fn term_from_id(id: &str) -> &str {
    if id.contains(':') && !id.starts_with("http") {
        id.split_once(':').map_or(id, |(_, local)| local)
    } else if let Some((_, fragment)) = id.rsplit_once('#') {
        fragment
    } else {
        id.rsplit('/').next().unwrap_or(id)
    }
}

/// Terms listed in a JSON-LD term file, after decoding and aliasing
pub fn extract_terms(document: &Value, options: &SyncOptions) -> BTreeSet<String> {
    let Some(graph) = document.get("@graph").and_then(|g| g.as_array()) else {
        return BTreeSet::new();
    };

    graph
        .iter()
        .filter_map(|node| node.get("@id").and_then(|id| id.as_str()))
        .filter(|id| !id.is_empty())
        .map(|id| decode(term_from_id(id)))
        .filter(|term| !options.ignore_suffixes.iter().any(|s| term.ends_with(s.as_str())))
        .map(|term| options.alias(&term).to_string())
        .filter(|term| !term.is_empty())
        .collect()
}

fn sorted(terms: impl Iterator<Item = impl Into<String>>) -> Vec<String> {
    let mut terms: Vec<String> = terms.map(Into::into).collect();
    terms.sort();
    terms
}

/// Check one `$defs` entry
///
/// Entries without both `enum` and `iriMap` are not vocabulary enums and
/// return `None`.
pub fn check_definition(
    def_key: &str,
    definition: &Value,
    enum_dir: &Path,
    options: &SyncOptions,
) -> Option<Vec<Discrepancy>> {
    let (Some(enum_terms), Some(iri_map)) = (
        definition.get("enum").and_then(|e| e.as_array()),
        definition.get("iriMap").and_then(|m| m.as_object()),
    ) else {
        return None;
    };

    let mut found = Vec::new();
    let mut report = |kind: DiscrepancyKind| {
        found.push(Discrepancy {
            def_key: def_key.to_string(),
            kind,
        })
    };

    let enum_set: BTreeSet<&str> = enum_terms.iter().filter_map(|t| t.as_str()).collect();
    let iri_keys: BTreeSet<&str> = iri_map.keys().map(String::as_str).collect();

    let missing_in_iri = sorted(enum_set.difference(&iri_keys).copied());
    if !missing_in_iri.is_empty() {
        report(DiscrepancyKind::IriMapMissingTerms(missing_in_iri));
    }
    let missing_in_enum = sorted(iri_keys.difference(&enum_set).copied());
    if !missing_in_enum.is_empty() {
        report(DiscrepancyKind::EnumMissingTerms(missing_in_enum));
    }

    let Some(sample_iri) = iri_map.values().next() else {
        report(DiscrepancyKind::EmptyIriMap);
        return Some(found);
    };

    let sample_iri = sample_iri.as_str().unwrap_or_default();
    let enum_file = match iri_filename(sample_iri) {
        Ok(name) => name,
        Err(reason) => {
            report(DiscrepancyKind::InvalidIri {
                iri: sample_iri.to_string(),
                reason,
            });
            return Some(found);
        }
    };

    let enum_path = enum_dir.join(&enum_file);
    if !enum_path.is_file() {
        report(DiscrepancyKind::EnumFileNotFound(enum_path));
        return Some(found);
    }

    let jsonld_terms = match load_json(&enum_path) {
        Ok(document) => extract_terms(&document, options),
        Err(e) => {
            report(DiscrepancyKind::EnumFileUnreadable {
                path: enum_path,
                reason: e.to_string(),
            });
            return Some(found);
        }
    };

    let missing_in_jsonld = sorted(
        enum_set
            .iter()
            .filter(|t| !jsonld_terms.contains(**t))
            .copied(),
    );
    if !missing_in_jsonld.is_empty() {
        report(DiscrepancyKind::EnumListMissingTerms(missing_in_jsonld));
    }
    let missing_in_defs = sorted(
        jsonld_terms
            .iter()
            .filter(|t| !enum_set.contains(t.as_str()))
            .cloned(),
    );
    if !missing_in_defs.is_empty() {
        report(DiscrepancyKind::DefsMissingTerms(missing_in_defs));
    }

    for (term, iri) in iri_map_entries(iri_map) {
        let fname = match iri_filename(iri) {
            Ok(name) => name,
            Err(reason) => {
                report(DiscrepancyKind::InvalidIri {
                    iri: iri.to_string(),
                    reason,
                });
                continue;
            }
        };

        let is_http = Url::parse(iri)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
            .unwrap_or(false);
        if !is_http {
            report(DiscrepancyKind::NotHttp(iri.to_string()));
        }

        let expected_prefix = format!("{}{}#", options.expected_base, fname);
        if !iri.starts_with(&expected_prefix) {
            report(DiscrepancyKind::UnexpectedBase {
                term: term.to_string(),
                got: iri.to_string(),
                expected_prefix,
            });
        }

        if let Some((_, fragment)) = iri.rsplit_once('#') {
            let fragment = decode(fragment);
            if options.alias(&fragment) != options.alias(term) {
                report(DiscrepancyKind::FragmentMismatch {
                    fragment,
                    term: term.to_string(),
                });
            }
        }
    }

    Some(found)
}

/// iriMap entries as `(term, iri)`; non-string values read as empty IRIs
fn iri_map_entries(iri_map: &Map<String, Value>) -> impl Iterator<Item = (&str, &str)> {
    iri_map
        .iter()
        .map(|(term, iri)| (term.as_str(), iri.as_str().unwrap_or_default()))
}

/// Check every `$defs` entry of a parsed profile
pub fn check_profile(profile: &Value, enum_dir: &Path, options: &SyncOptions) -> SyncReport {
    let mut report = SyncReport::default();
    let Some(defs) = profile.get("$defs").and_then(|d| d.as_object()) else {
        return report;
    };

    for (key, definition) in defs {
        let Some(found) = check_definition(key, definition, enum_dir, options) else {
            continue;
        };
        tracing::debug!("Checked {}: {} discrepancies", key, found.len());
        report.checked += 1;
        report.discrepancies.extend(found);
    }

    report
}

/// Load a profile and compare it against an enum_lists directory
pub fn run_sync_check(
    profile_path: &Path,
    enum_dir: &Path,
    options: &SyncOptions,
) -> Result<SyncReport, SyncError> {
    if !profile_path.is_file() {
        return Err(SyncError::ProfileNotFound(profile_path.to_path_buf()));
    }
    if !enum_dir.is_dir() {
        return Err(SyncError::EnumDirNotFound(enum_dir.to_path_buf()));
    }

    let profile = load_json(profile_path)?;
    Ok(check_profile(&profile, enum_dir, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://selgebali.github.io/datacite4.6-jsonld/enum_lists/";

    fn write_term_file(dir: &Path, name: &str, ids: &[&str]) {
        let graph: Vec<Value> = ids.iter().map(|id| json!({"@id": id})).collect();
        let doc = json!({"@context": {}, "@graph": graph});
        fs::write(dir.join(name), serde_json::to_string(&doc).unwrap()).unwrap();
    }

    fn iri(file: &str, term: &str) -> String {
        format!("{}{}#{}", BASE, file, term)
    }

    #[test]
    fn test_iri_filename() {
        assert_eq!(
            iri_filename(&iri("titleType.jsonld", "Subtitle")).unwrap(),
            "titleType.jsonld"
        );
        assert!(iri_filename("https://example.org/titleType.json#Subtitle").is_err());
        assert!(iri_filename("not an iri").is_err());
    }

    #[test]
    fn test_extract_terms() {
        let doc = json!({"@graph": [
            {"@id": "dcite:Subtitle"},
            {"@id": "https://example.org/enum_lists/titleType.jsonld#Alternative%20Title"},
            {"@id": "https://example.org/terms/TranslatedTitle"},
            {"@id": "dcite:TitleTypeScheme"},
            {"@id": "dcite:CrossrefFunderID"},
            {"label": "no id"}
        ]});

        let terms = extract_terms(&doc, &SyncOptions::default());
        let terms: Vec<&str> = terms.iter().map(String::as_str).collect();
        assert_eq!(
            terms,
            vec!["Alternative Title", "Crossref Funder ID", "Subtitle", "TranslatedTitle"]
        );
    }

    #[test]
    fn test_consistent_definition() {
        let dir = tempfile::tempdir().unwrap();
        write_term_file(
            dir.path(),
            "titleType.jsonld",
            &["dcite:TitleTypeScheme", "dcite:Subtitle", "dcite:Other"],
        );

        let def = json!({
            "enum": ["Subtitle", "Other"],
            "iriMap": {
                "Subtitle": iri("titleType.jsonld", "Subtitle"),
                "Other": iri("titleType.jsonld", "Other")
            }
        });

        let found = check_definition("titleType", &def, dir.path(), &SyncOptions::default())
            .unwrap();
        assert!(found.is_empty(), "{:?}", found);
    }

    #[test]
    fn test_all_discrepancies_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_term_file(
            dir.path(),
            "titleType.jsonld",
            &["dcite:Subtitle", "dcite:Other", "dcite:Extra"],
        );

        let def = json!({
            "enum": ["Subtitle", "Other", "Missing"],
            "iriMap": {
                "Subtitle": iri("titleType.jsonld", "Subtitle"),
                "Other": iri("titleType.jsonld", "Wrong"),
                "Stray": "https://elsewhere.org/titleType.jsonld#Stray"
            }
        });

        let found = check_definition("titleType", &def, dir.path(), &SyncOptions::default())
            .unwrap();
        let kinds: Vec<&DiscrepancyKind> = found.iter().map(|d| &d.kind).collect();

        assert_eq!(
            kinds,
            vec![
                &DiscrepancyKind::IriMapMissingTerms(vec!["Missing".to_string()]),
                &DiscrepancyKind::EnumMissingTerms(vec!["Stray".to_string()]),
                &DiscrepancyKind::EnumListMissingTerms(vec!["Missing".to_string()]),
                &DiscrepancyKind::DefsMissingTerms(vec!["Extra".to_string()]),
                &DiscrepancyKind::FragmentMismatch {
                    fragment: "Wrong".to_string(),
                    term: "Other".to_string()
                },
                &DiscrepancyKind::UnexpectedBase {
                    term: "Stray".to_string(),
                    got: "https://elsewhere.org/titleType.jsonld#Stray".to_string(),
                    expected_prefix: format!("{}titleType.jsonld#", BASE),
                },
            ]
        );
        assert!(found.iter().all(|d| d.def_key == "titleType"));
    }

    #[test]
    fn test_alias_fragment_matches_term() {
        let dir = tempfile::tempdir().unwrap();
        write_term_file(dir.path(), "funderIdentifierType.jsonld", &["dcite:CrossrefFunderID"]);

        let def = json!({
            "enum": ["Crossref Funder ID"],
            "iriMap": {"Crossref Funder ID": iri("funderIdentifierType.jsonld", "CrossrefFunderID")}
        });

        let found = check_definition(
            "funderIdentifierType",
            &def,
            dir.path(),
            &SyncOptions::default(),
        )
        .unwrap();
        assert!(found.is_empty(), "{:?}", found);
    }

    #[test]
    fn test_missing_term_file_and_empty_map() {
        let dir = tempfile::tempdir().unwrap();

        let def = json!({"enum": ["A"], "iriMap": {"A": iri("absent.jsonld", "A")}});
        let found = check_definition("absent", &def, dir.path(), &SyncOptions::default())
            .unwrap();
        assert!(matches!(found.last().unwrap().kind, DiscrepancyKind::EnumFileNotFound(_)));

        let def = json!({"enum": [], "iriMap": {}});
        let found = check_definition("empty", &def, dir.path(), &SyncOptions::default())
            .unwrap();
        assert_eq!(found[0].kind, DiscrepancyKind::EmptyIriMap);
    }

    #[test]
    fn test_non_ascii_term_file_name() {
        let dir = tempfile::tempdir().unwrap();
        write_term_file(dir.path(), "résumé.jsonld", &["dcite:A"]);

        let def = json!({"enum": ["A"], "iriMap": {"A": iri("résumé.jsonld", "A")}});
        let found = check_definition("resume", &def, dir.path(), &SyncOptions::default())
            .unwrap();
        assert!(found.is_empty(), "{:?}", found);

        assert_eq!(
            iri_filename(&format!("{}résumé.jsonld?v=2#A", BASE)).unwrap(),
            "résumé.jsonld"
        );
    }

    #[test]
    fn test_definition_without_iri_map_not_checked() {
        let dir = tempfile::tempdir().unwrap();
        let def = json!({"enum": ["a"]});
        assert_eq!(
            check_definition("onlyEnum", &def, dir.path(), &SyncOptions::default()),
            None
        );
    }

    #[test]
    fn test_non_enum_definitions_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let profile = json!({"$defs": {
            "title": {"type": "string"},
            "onlyEnum": {"enum": ["a"]}
        }});

        let report = check_profile(&profile, dir.path(), &SyncOptions::default());
        assert_eq!(report.checked, 0);
        assert!(report.is_consistent());
    }

    #[test]
    fn test_run_sync_check_paths() {
        let dir = tempfile::tempdir().unwrap();
        let profile_path = dir.path().join("profile.json");

        let missing = run_sync_check(&profile_path, dir.path(), &SyncOptions::default());
        assert!(matches!(missing, Err(SyncError::ProfileNotFound(_))));

        fs::write(&profile_path, r#"{"$defs": {}}"#).unwrap();
        let missing_dir = run_sync_check(
            &profile_path,
            &dir.path().join("enum_lists"),
            &SyncOptions::default(),
        );
        assert!(matches!(missing_dir, Err(SyncError::EnumDirNotFound(_))));

        let report = run_sync_check(&profile_path, dir.path(), &SyncOptions::default()).unwrap();
        assert!(report.is_consistent());
    }

    #[test]
    fn test_discrepancy_display() {
        let d = Discrepancy {
            def_key: "titleType".to_string(),
            kind: DiscrepancyKind::IriMapMissingTerms(vec!["A".to_string(), "B".to_string()]),
        };
        assert_eq!(d.to_string(), r#"[titleType] iriMap missing terms: ["A", "B"]"#);
    }
}
