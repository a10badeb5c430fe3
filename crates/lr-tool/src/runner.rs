use std::path::Path;

use lr_core::{RunOptions, RunResult};

use crate::source::{read_chunk, read_test_case};
use crate::{LrToolError, TestCase};

pub fn build_run_options(example_dir: &Path, case: &TestCase) -> Result<RunOptions, LrToolError> {
    let mut options = RunOptions::new(read_chunk(example_dir, &case.target)?);
    if let Some(bootstrap) = &case.bootstrap {
        options.bootstrap = Some(read_chunk(example_dir, bootstrap)?);
    }
    options.preloads = case
        .preloads
        .iter()
        .map(|preload| read_chunk(example_dir, preload))
        .collect::<Result<Vec<_>, _>>()?;
    options.services = case.services.clone();
    Ok(options)
}

pub fn run_case(example_dir: &Path, case: &TestCase) -> Result<RunResult, LrToolError> {
    let options = build_run_options(example_dir, case)?;
    Ok(lr_runtime::run(&options))
}

pub fn assert_case(example_dir: &Path, case_path: &Path) -> Result<(), LrToolError> {
    let case = read_test_case(case_path)?;
    let result = run_case(example_dir, &case)?;

    if result.success != case.expect_success {
        return Err(LrToolError::SuccessMismatch {
            expected: case.expect_success,
            actual: result.success,
            errors: to_json(&result.errors)?,
        });
    }

    if result.output != case.expected_output {
        return Err(LrToolError::OutputMismatch {
            expected: to_json(&case.expected_output)?,
            actual: to_json(&result.output)?,
        });
    }

    if result.errors.len() != case.expected_errors.len() {
        return Err(LrToolError::ErrorCountMismatch {
            expected: case.expected_errors.len(),
            actual: result.errors.len(),
            observed: to_json(&result.errors)?,
        });
    }

    for (index, (expected, actual)) in case
        .expected_errors
        .iter()
        .zip(result.errors.iter())
        .enumerate()
    {
        if !expected.matches(actual) {
            return Err(LrToolError::ErrorMismatch {
                index,
                expected: to_json(expected)?,
                actual: to_json(actual)?,
            });
        }
    }

    Ok(())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, LrToolError> {
    serde_json::to_string(value).map_err(LrToolError::Serialize)
}
