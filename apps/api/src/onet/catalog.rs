//! O*NET catalog — occupation records, task statements, and the flattened
//! job-title search index.
//!
//! Loaded once at process start from the JSON files produced by `process_onet`,
//! then shared read-only behind an `Arc`. Nothing here mutates after load.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Occupation lookup, keyed by O*NET-SOC code.
pub const OCCUPATIONS_FILE: &str = "onet-occupations.json";
/// Task statements grouped by O*NET-SOC code, source order preserved.
pub const TASKS_FILE: &str = "onet-tasks.json";
/// One searchable entry per primary and alternate title.
pub const SEARCH_INDEX_FILE: &str = "onet-search-index.json";

/// A single occupation from the O*NET taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupationRecord {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub alternate_titles: Vec<String>,
}

/// One task statement for an occupation. Order within an occupation follows the
/// source database and is meaningful: the first N tasks are the ones analyzed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatement {
    pub id: String,
    #[serde(rename = "task")]
    pub text: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A searchable job title. Alternate titles carry the primary title they
/// belong to so callers can display "also known as" context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    pub title: String,
    pub code: String,
    pub is_primary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_title: Option<String>,
}

/// Corpus counts, reported by `/health`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub occupations: usize,
    pub task_statements: usize,
    pub searchable_titles: usize,
}

/// Immutable in-memory view of the O*NET data set.
#[derive(Debug)]
pub struct OnetCatalog {
    occupations: HashMap<String, OccupationRecord>,
    tasks: HashMap<String, Vec<TaskStatement>>,
    search_index: Vec<SearchEntry>,
    codes_with_tasks: HashSet<String>,
}

impl OnetCatalog {
    /// Loads the three catalog files from `data_dir` and validates referential
    /// integrity. Fails fast on a missing file or a search entry whose code has
    /// no occupation record — both indicate corrupt ETL output.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let occupations: HashMap<String, OccupationRecord> =
            read_json(&data_dir.join(OCCUPATIONS_FILE))?;
        let tasks: HashMap<String, Vec<TaskStatement>> = read_json(&data_dir.join(TASKS_FILE))?;
        let search_index: Vec<SearchEntry> = read_json(&data_dir.join(SEARCH_INDEX_FILE))?;

        let catalog = Self::from_parts(occupations, tasks, search_index)?;
        let stats = catalog.stats();
        info!(
            "O*NET catalog loaded: {} occupations, {} task statements, {} searchable titles",
            stats.occupations, stats.task_statements, stats.searchable_titles
        );
        Ok(catalog)
    }

    /// Builds a catalog from already-parsed parts. Every search entry must
    /// reference a loaded occupation record.
    pub fn from_parts(
        occupations: HashMap<String, OccupationRecord>,
        tasks: HashMap<String, Vec<TaskStatement>>,
        search_index: Vec<SearchEntry>,
    ) -> Result<Self> {
        for entry in &search_index {
            if !occupations.contains_key(&entry.code) {
                bail!(
                    "search index references unknown occupation code {} (\"{}\")",
                    entry.code,
                    entry.title
                );
            }
        }

        let codes_with_tasks = tasks
            .iter()
            .filter(|(_, t)| !t.is_empty())
            .map(|(code, _)| code.clone())
            .collect();

        Ok(Self {
            occupations,
            tasks,
            search_index,
            codes_with_tasks,
        })
    }

    /// Looks up an occupation by O*NET-SOC code.
    pub fn occupation(&self, code: &str) -> Option<&OccupationRecord> {
        self.occupations.get(code)
    }

    /// Returns the ordered task statements for an occupation, empty if none.
    pub fn tasks(&self, code: &str) -> &[TaskStatement] {
        self.tasks.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when the occupation has at least one task statement. Occupations
    /// without tasks are excluded from search since an analysis cannot proceed
    /// without tasks.
    pub fn has_tasks(&self, code: &str) -> bool {
        self.codes_with_tasks.contains(code)
    }

    /// All searchable title entries, in index order.
    pub fn search_entries(&self) -> &[SearchEntry] {
        &self.search_index
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            occupations: self.occupations.len(),
            task_statements: self.tasks.values().map(Vec::len).sum(),
            searchable_titles: self.search_index.len(),
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn occupation(code: &str, title: &str, alternates: &[&str]) -> OccupationRecord {
        OccupationRecord {
            code: code.to_string(),
            title: title.to_string(),
            description: format!("{title} description"),
            alternate_titles: alternates.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub(crate) fn task(id: &str, text: &str) -> TaskStatement {
        TaskStatement {
            id: id.to_string(),
            text: text.to_string(),
            task_type: "Core".to_string(),
            date: "07/2014".to_string(),
            source: Some("Analyst".to_string()),
        }
    }

    fn entry(title: &str, code: &str, is_primary: bool) -> SearchEntry {
        SearchEntry {
            title: title.to_string(),
            code: code.to_string(),
            is_primary,
            primary_title: None,
        }
    }

    #[test]
    fn test_from_parts_rejects_dangling_search_entry() {
        let occupations = HashMap::from([(
            "11-1011.00".to_string(),
            occupation("11-1011.00", "Chief Executives", &[]),
        )]);
        let result = OnetCatalog::from_parts(
            occupations,
            HashMap::new(),
            vec![entry("Ghost Title", "99-9999.00", true)],
        );
        let err = result.err().expect("dangling code must fail the build");
        assert!(err.to_string().contains("99-9999.00"));
    }

    #[test]
    fn test_tasks_preserve_source_order() {
        let occupations = HashMap::from([(
            "15-1252.00".to_string(),
            occupation("15-1252.00", "Software Developers", &[]),
        )]);
        let tasks = HashMap::from([(
            "15-1252.00".to_string(),
            vec![task("1", "Design software"), task("2", "Review code")],
        )]);
        let catalog = OnetCatalog::from_parts(occupations, tasks, vec![]).unwrap();

        let ids: Vec<&str> = catalog
            .tasks("15-1252.00")
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_has_tasks_excludes_empty_lists() {
        let occupations = HashMap::from([
            ("11-1011.00".to_string(), occupation("11-1011.00", "Chief Executives", &[])),
            ("11-1021.00".to_string(), occupation("11-1021.00", "General Managers", &[])),
        ]);
        let tasks = HashMap::from([
            ("11-1011.00".to_string(), vec![task("1", "Direct operations")]),
            ("11-1021.00".to_string(), vec![]),
        ]);
        let catalog = OnetCatalog::from_parts(occupations, tasks, vec![]).unwrap();

        assert!(catalog.has_tasks("11-1011.00"));
        assert!(!catalog.has_tasks("11-1021.00"));
        assert!(!catalog.has_tasks("99-9999.00"));
    }

    #[test]
    fn test_missing_occupation_returns_none_and_empty_tasks() {
        let catalog = OnetCatalog::from_parts(HashMap::new(), HashMap::new(), vec![]).unwrap();
        assert!(catalog.occupation("11-1011.00").is_none());
        assert!(catalog.tasks("11-1011.00").is_empty());
    }

    #[test]
    fn test_load_round_trips_etl_output() {
        let dir = tempfile::tempdir().unwrap();

        let occupations = HashMap::from([(
            "29-1141.00".to_string(),
            occupation("29-1141.00", "Registered Nurses", &["RN", "Staff Nurse"]),
        )]);
        let tasks = HashMap::from([(
            "29-1141.00".to_string(),
            vec![task("100", "Administer medications")],
        )]);
        let index = vec![
            entry("Registered Nurses", "29-1141.00", true),
            SearchEntry {
                title: "RN".to_string(),
                code: "29-1141.00".to_string(),
                is_primary: false,
                primary_title: Some("Registered Nurses".to_string()),
            },
        ];

        std::fs::write(
            dir.path().join(OCCUPATIONS_FILE),
            serde_json::to_string_pretty(&occupations).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join(TASKS_FILE),
            serde_json::to_string_pretty(&tasks).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join(SEARCH_INDEX_FILE),
            serde_json::to_string_pretty(&index).unwrap(),
        )
        .unwrap();

        let catalog = OnetCatalog::load(dir.path()).unwrap();
        let stats = catalog.stats();
        assert_eq!(stats.occupations, 1);
        assert_eq!(stats.task_statements, 1);
        assert_eq!(stats.searchable_titles, 2);
        assert_eq!(
            catalog.occupation("29-1141.00").unwrap().title,
            "Registered Nurses"
        );
    }

    #[test]
    fn test_load_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = OnetCatalog::load(dir.path()).err().expect("must fail");
        assert!(err.to_string().contains(OCCUPATIONS_FILE));
    }

    #[test]
    fn test_search_entry_json_uses_camel_case() {
        let e = SearchEntry {
            title: "RN".to_string(),
            code: "29-1141.00".to_string(),
            is_primary: false,
            primary_title: Some("Registered Nurses".to_string()),
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["isPrimary"], false);
        assert_eq!(json["primaryTitle"], "Registered Nurses");
    }

    #[test]
    fn test_task_statement_json_matches_data_files() {
        let json = r#"{"id":"8823","task":"Review code","type":"Core","date":"07/2014"}"#;
        let t: TaskStatement = serde_json::from_str(json).unwrap();
        assert_eq!(t.text, "Review code");
        assert_eq!(t.task_type, "Core");
        assert!(t.source.is_none());
    }
}
