use std::fs;
use std::path::Path;

use lr_core::Chunk;

use crate::{LrToolError, TestCase, TESTCASE_SCHEMA_V1};

/// Reads `relative` under `example_dir`; the relative path becomes the chunk name.
pub fn read_chunk(example_dir: &Path, relative: &str) -> Result<Chunk, LrToolError> {
    let path = example_dir.join(relative);
    let code = fs::read_to_string(&path).map_err(|source| LrToolError::ReadFile { path, source })?;
    Ok(Chunk::new(relative, code))
}

pub fn read_test_case(case_path: &Path) -> Result<TestCase, LrToolError> {
    let raw = fs::read_to_string(case_path).map_err(|source| LrToolError::ReadFile {
        path: case_path.to_path_buf(),
        source,
    })?;
    let parsed: TestCase = serde_json::from_str(&raw).map_err(|source| LrToolError::ParseCase {
        path: case_path.to_path_buf(),
        source,
    })?;

    if parsed.schema_version != TESTCASE_SCHEMA_V1 {
        return Err(LrToolError::InvalidSchemaVersion {
            expected: TESTCASE_SCHEMA_V1.to_string(),
            found: parsed.schema_version,
        });
    }

    Ok(parsed)
}

#[cfg(test)]
mod source_tests {
    use super::*;

    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should move forward")
            .as_nanos();
        std::env::temp_dir().join(format!("lr-tool-{}-{}", name, nanos))
    }

    fn write_file(path: &Path, content: &str) {
        let parent = path.parent().expect("path should have parent");
        fs::create_dir_all(parent).expect("parent dir should be created");
        fs::write(path, content).expect("file should be written");
    }

    #[test]
    fn read_chunk_names_chunk_by_relative_path() {
        let root = temp_dir("chunk");
        write_file(&root.join("lib/util.luau"), "return 1");

        let chunk = read_chunk(&root, "lib/util.luau").expect("chunk should load");
        assert_eq!(chunk.chunk_name, "lib/util.luau");
        assert_eq!(chunk.code, "return 1");

        let error = read_chunk(&root, "missing.luau").expect_err("missing file should fail");
        assert!(matches!(error, LrToolError::ReadFile { .. }));
    }

    #[test]
    fn read_test_case_validates_schema_version() {
        let root = temp_dir("schema");
        let good = root.join("good.json");
        let bad = root.join("bad.json");
        let broken = root.join("broken.json");
        write_file(&good, r#"{"schemaVersion":"lr-tool-case.v1","target":"x.luau"}"#);
        write_file(&bad, r#"{"schemaVersion":"v0"}"#);
        write_file(&broken, "{");

        assert_eq!(read_test_case(&good).expect("good case").target, "x.luau");
        assert!(matches!(
            read_test_case(&bad).expect_err("bad schema"),
            LrToolError::InvalidSchemaVersion { .. }
        ));
        assert!(matches!(
            read_test_case(&broken).expect_err("broken json"),
            LrToolError::ParseCase { .. }
        ));
        assert!(matches!(
            read_test_case(&root.join("none.json")).expect_err("missing case"),
            LrToolError::ReadFile { .. }
        ));
    }
}
