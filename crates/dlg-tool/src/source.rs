use std::fs;
use std::path::{Path, PathBuf};

use dlg_api::DIALOGUE_FILE_NAME;
use walkdir::WalkDir;

use crate::{DlgToolError, TestCase, TESTCASE_SCHEMA_V1};

pub const CASE_FILE_NAME: &str = "testcase.json";

pub fn read_dialogue_source(example_dir: &Path) -> Result<String, DlgToolError> {
    let path = example_dir.join(DIALOGUE_FILE_NAME);
    if !path.is_file() {
        return Err(DlgToolError::SourceMissing {
            path: example_dir.to_path_buf(),
        });
    }
    fs::read_to_string(&path).map_err(|source| DlgToolError::ReadFile { path, source })
}

pub fn read_test_case(case_path: &Path) -> Result<TestCase, DlgToolError> {
    let raw = fs::read_to_string(case_path).map_err(|source| DlgToolError::ReadFile {
        path: case_path.to_path_buf(),
        source,
    })?;
    let parsed: TestCase =
        serde_json::from_str(&raw).map_err(|source| DlgToolError::ParseCase {
            path: case_path.to_path_buf(),
            source,
        })?;

    if parsed.schema_version != TESTCASE_SCHEMA_V1 {
        return Err(DlgToolError::InvalidSchemaVersion {
            expected: TESTCASE_SCHEMA_V1.to_string(),
            found: parsed.schema_version,
        });
    }

    Ok(parsed)
}

/// Directories under `root` holding both a dialogue and a testcase, sorted.
pub fn discover_case_dirs(root: &Path) -> Vec<PathBuf> {
    let mut directories = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == CASE_FILE_NAME)
        .filter_map(|entry| entry.path().parent().map(Path::to_path_buf))
        .filter(|directory| directory.join(DIALOGUE_FILE_NAME).is_file())
        .collect::<Vec<_>>();
    directories.sort();
    directories
}
