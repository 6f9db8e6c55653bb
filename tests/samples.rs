#[cfg(test)]
mod samples {
    use std::fs;
    use std::path::{Path, PathBuf};

    use impostor::canonical::Identity;
    use impostor::schema;
    use impostor::GenerationError;

    fn json_files(dir: &Path) -> Vec<PathBuf> {
        let entries = fs::read_dir(dir).expect("Failed to read directory");

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.expect("Failed to read directory entry");
            let path = entry.path();

            if path
                .extension()
                .and_then(|s| s.to_str())
                == Some("json")
            {
                files.push(path);
            }
        }

        // read_dir order is unspecified
        files.sort();
        files
    }

    #[test]
    fn ensure_samples_generate() {
        let dir = Path::new("tests/samples/");

        assert!(dir.exists(), "samples directory missing");

        let files = json_files(dir);
        assert!(!files.is_empty(), "No .json files found in samples directory");

        let mut failures = Vec::new();

        for file in &files {
            let content = schema::load(&file)
                .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));
            let schema = schema::parse(&file, &content)
                .unwrap_or_else(|e| panic!("Failed to parse file {:?}: {:?}", file, e));

            match impostor::generate(&schema, &Identity) {
                Ok(first) => {
                    let second = impostor::generate(&schema, &Identity).unwrap();
                    if first != second {
                        println!("File {:?} did not generate deterministically", file);
                        failures.push(file.clone());
                    }
                    if !first.starts_with("// generated by \"") {
                        println!("File {:?} is missing its header", file);
                        failures.push(file.clone());
                    }
                }
                Err(e) => {
                    println!("File {:?} failed to generate: {}", file, e);
                    failures.push(file.clone());
                }
            }
        }

        if !failures.is_empty() {
            panic!(
                "Sample files should generate successfully, but {} files failed",
                failures.len()
            );
        }
    }

    #[test]
    fn ensure_broken_fail() {
        let dir = Path::new("tests/broken/");

        assert!(dir.exists(), "broken directory missing");

        let files = json_files(dir);
        assert!(!files.is_empty(), "No .json files found in broken directory");

        let mut unexpected_successes = Vec::new();

        for file in &files {
            let content = schema::load(&file)
                .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));
            let schema = schema::parse(&file, &content)
                .unwrap_or_else(|e| panic!("Failed to parse file {:?}: {:?}", file, e));

            match impostor::generate(&schema, &Identity) {
                Ok(_) => {
                    println!("File {:?} unexpectedly generated", file);
                    unexpected_successes.push(file.clone());
                }
                Err(GenerationError::Schema { .. }) => {}
                Err(e) => {
                    println!("File {:?} failed for the wrong reason: {}", file, e);
                    unexpected_successes.push(file.clone());
                }
            }
        }

        if !unexpected_successes.is_empty() {
            panic!(
                "Broken files should fail with a schema error, but {} files did not",
                unexpected_successes.len()
            );
        }
    }
}
