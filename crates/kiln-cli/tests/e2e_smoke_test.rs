use std::{fs, path::PathBuf};

use kiln_cli::Args;

/// Directory holding the demo build files.
fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

/// Collects all .build files from a directory
fn collect_build_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("build")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn args_for(path: &PathBuf) -> Args {
    Args {
        build_file: path.to_string_lossy().to_string(),
        log_level: "off".to_string(),
        ..Args::default()
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let valid_demos = collect_build_files(demos_dir());

    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        if let Err(e) = kiln_cli::run(&args_for(demo_path)) {
            failed_demos.push((demo_path.clone(), e));
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }

    println!("✅ All {} valid demos passed", valid_demos.len());
}

#[test]
fn e2e_smoke_test_invalid_demos() {
    let invalid_demos = collect_build_files(demos_dir().join("invalid"));

    assert!(
        !invalid_demos.is_empty(),
        "No invalid demos found in demos/invalid/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &invalid_demos {
        let args = Args {
            strict: true,
            ..args_for(demo_path)
        };
        if kiln_cli::run(&args).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nInvalid demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} invalid demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }

    println!(
        "✅ All {} invalid demos failed as expected",
        invalid_demos.len()
    );
}

#[test]
fn e2e_command_line_properties() {
    let path = demos_dir().join("properties.build");
    let args = Args {
        properties: vec![("config".to_string(), "Release".to_string())],
        list: true,
        ..args_for(&path)
    };

    assert!(kiln_cli::run(&args).is_ok());
}
