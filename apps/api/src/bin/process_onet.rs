//! Converts raw O*NET distribution files into the JSON catalog the API
//! serves.
//!
//! Expects the tab-separated files from an O*NET database release:
//! `Occupation Data.txt`, `Task Statements.txt`, and `Alternate Titles.txt`.
//! Output ordering is deterministic so generated files diff cleanly between
//! releases.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use workscope::onet::catalog::{OCCUPATIONS_FILE, SEARCH_INDEX_FILE, TASKS_FILE};
use workscope::onet::{OccupationRecord, SearchEntry, TaskStatement};

const OCCUPATION_DATA: &str = "Occupation Data.txt";
const TASK_STATEMENTS: &str = "Task Statements.txt";
const ALTERNATE_TITLES: &str = "Alternate Titles.txt";

#[derive(Parser, Debug)]
#[command(
    name = "process_onet",
    about = "Convert a raw O*NET database release into the serving catalog"
)]
struct Args {
    /// Directory containing the raw O*NET .txt files
    #[arg(long, default_value = "data/raw")]
    input: PathBuf,

    /// Directory to write the processed JSON files into
    #[arg(long, default_value = "data")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut occupations = load_occupations(&args.input.join(OCCUPATION_DATA))?;
    let tasks = load_tasks(&args.input.join(TASK_STATEMENTS), &occupations)?;
    let alternate_count = attach_alternates(&args.input.join(ALTERNATE_TITLES), &mut occupations)?;
    let index = build_search_index(&occupations);

    fs::create_dir_all(&args.output)
        .with_context(|| format!("creating output directory {}", args.output.display()))?;
    write_json(&args.output.join(OCCUPATIONS_FILE), &occupations)?;
    write_json(&args.output.join(TASKS_FILE), &tasks)?;
    write_json(&args.output.join(SEARCH_INDEX_FILE), &index)?;

    let task_count: usize = tasks.values().map(Vec::len).sum();
    println!(
        "Processed {} occupations, {} task statements, {} alternate titles",
        occupations.len(),
        task_count,
        alternate_count
    );
    println!(
        "Search index has {} entries ({} with task data)",
        index.len(),
        index.iter().filter(|e| tasks.contains_key(&e.code)).count()
    );
    println!("Wrote catalog to {}", args.output.display());
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// TSV parsing
// ────────────────────────────────────────────────────────────────────────────

struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading O*NET file {}", path.display()))?;
        let mut lines = raw.lines();
        let columns: Vec<String> = lines
            .next()
            .with_context(|| format!("{} is empty", path.display()))?
            .split('\t')
            .map(|c| c.trim().to_string())
            .collect();
        let rows = lines
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split('\t').map(|f| f.trim().to_string()).collect())
            .collect();
        Ok(Self { columns, rows })
    }

    fn column(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .with_context(|| format!("missing column \"{name}\""))
    }
}

fn field<'a>(row: &'a [String], index: usize) -> &'a str {
    row.get(index).map(String::as_str).unwrap_or("")
}

// ────────────────────────────────────────────────────────────────────────────
// Transformations
// ────────────────────────────────────────────────────────────────────────────

fn load_occupations(path: &Path) -> Result<BTreeMap<String, OccupationRecord>> {
    let table = Table::read(path)?;
    let code = table.column("O*NET-SOC Code")?;
    let title = table.column("Title")?;
    let description = table.column("Description")?;

    let mut occupations = BTreeMap::new();
    for row in &table.rows {
        let record = OccupationRecord {
            code: field(row, code).to_string(),
            title: field(row, title).to_string(),
            description: field(row, description).to_string(),
            alternate_titles: Vec::new(),
        };
        if record.code.is_empty() || record.title.is_empty() {
            continue;
        }
        occupations.insert(record.code.clone(), record);
    }
    Ok(occupations)
}

/// Groups task statements by occupation code, keeping the release's row
/// order within each occupation. Rows referencing unknown codes are dropped.
fn load_tasks(
    path: &Path,
    occupations: &BTreeMap<String, OccupationRecord>,
) -> Result<BTreeMap<String, Vec<TaskStatement>>> {
    let table = Table::read(path)?;
    let code = table.column("O*NET-SOC Code")?;
    let task_id = table.column("Task ID")?;
    let text = table.column("Task")?;
    let task_type = table.column("Task Type")?;
    let date = table.column("Date")?;
    let source = table.column("Domain Source")?;

    let mut tasks: BTreeMap<String, Vec<TaskStatement>> = BTreeMap::new();
    let mut dropped = 0usize;
    for row in &table.rows {
        let occupation_code = field(row, code);
        if !occupations.contains_key(occupation_code) {
            dropped += 1;
            continue;
        }
        let statement = TaskStatement {
            id: field(row, task_id).to_string(),
            text: field(row, text).to_string(),
            task_type: field(row, task_type).to_string(),
            date: field(row, date).to_string(),
            source: match field(row, source) {
                "" => None,
                s => Some(s.to_string()),
            },
        };
        if statement.id.is_empty() || statement.text.is_empty() {
            dropped += 1;
            continue;
        }
        tasks.entry(occupation_code.to_string()).or_default().push(statement);
    }
    if dropped > 0 {
        println!("Dropped {dropped} task rows with missing fields or unknown codes");
    }
    Ok(tasks)
}

/// Folds alternate titles into their occupation records. The release marks
/// absent values as "n/a"; those and duplicates are skipped.
fn attach_alternates(
    path: &Path,
    occupations: &mut BTreeMap<String, OccupationRecord>,
) -> Result<usize> {
    let table = Table::read(path)?;
    let code = table.column("O*NET-SOC Code")?;
    let title = table.column("Alternate Title")?;

    let mut attached = 0usize;
    for row in &table.rows {
        let alternate = field(row, title);
        if alternate.is_empty() || alternate.eq_ignore_ascii_case("n/a") {
            continue;
        }
        let Some(occupation) = occupations.get_mut(field(row, code)) else {
            continue;
        };
        if occupation.title.eq_ignore_ascii_case(alternate)
            || occupation
                .alternate_titles
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(alternate))
        {
            continue;
        }
        occupation.alternate_titles.push(alternate.to_string());
        attached += 1;
    }
    Ok(attached)
}

/// One entry per primary and alternate title, sorted by title for stable
/// output. Taskless codes stay in the index; the matcher filters them at
/// query time.
fn build_search_index(occupations: &BTreeMap<String, OccupationRecord>) -> Vec<SearchEntry> {
    let mut index = Vec::new();
    for occupation in occupations.values() {
        index.push(SearchEntry {
            title: occupation.title.clone(),
            code: occupation.code.clone(),
            is_primary: true,
            primary_title: None,
        });
        for alternate in &occupation.alternate_titles {
            index.push(SearchEntry {
                title: alternate.clone(),
                code: occupation.code.clone(),
                is_primary: false,
                primary_title: Some(occupation.title.clone()),
            });
        }
    }
    index.sort_by(|a, b| {
        a.title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.code.cmp(&b.code))
    });
    index
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
