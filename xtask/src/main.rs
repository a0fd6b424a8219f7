use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::Command;

use dotgrid_core::DotgridConfig;

const CONFIG_PATTERNS: [&str; 2] = [
    "dotgrid_core/src/data/*.json",
    "integration_tests/tests/fixtures/*.json",
];

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        Some("check-config") => check_config(),
        Some("bench") => bench(),
        Some("help") | None => {
            print_usage();
            Ok(())
        }
        Some(cmd) => {
            eprintln!("Unknown xtask '{cmd}'.");
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: cargo xtask check-config");
    eprintln!("       cargo xtask bench");
    eprintln!("       cargo xtask help");
}

/// Parse every checked-in configuration document and make sure its shapes and
/// animations fit the grid it declares.
fn check_config() -> Result<(), Box<dyn Error>> {
    let mut checked = 0usize;
    let mut failures = Vec::new();

    for pattern in CONFIG_PATTERNS {
        for entry in glob::glob(pattern)? {
            let path = entry?;
            match check_config_file(&path) {
                Ok(()) => println!("ok    {}", path.display()),
                Err(err) => {
                    println!("FAIL  {}: {err}", path.display());
                    failures.push(path);
                }
            }
            checked += 1;
        }
    }

    if checked == 0 {
        return Err("no configuration files found; run from the workspace root".into());
    }
    if !failures.is_empty() {
        return Err(format!("{} of {checked} config files failed", failures.len()).into());
    }
    println!("Checked {checked} config files");
    Ok(())
}

fn check_config_file(path: &Path) -> Result<(), Box<dyn Error>> {
    let contents = fs::read_to_string(path)?;
    let config = DotgridConfig::from_json_str(&contents)?;
    let grid = config.grid();

    for name in config.shapes.keys() {
        let shape = config.shape(name).unwrap_or_default();
        if let Some(cell) = shape.iter().find(|cell| !grid.contains(**cell)) {
            return Err(format!("shape '{name}' has cell {cell} outside the grid").into());
        }
    }
    for name in config.animations.keys() {
        let frames = config.animation(name).unwrap_or_default();
        for (index, frame) in frames.iter().enumerate() {
            if let Some(cell) = frame.iter().find(|cell| !grid.contains(**cell)) {
                return Err(format!(
                    "animation '{name}' frame {index} has cell {cell} outside the grid"
                )
                .into());
            }
        }
    }
    Ok(())
}

fn bench() -> Result<(), Box<dyn Error>> {
    let status = Command::new("cargo")
        .args(["bench", "-p", "dotgrid_core", "--bench", "halftone_bench"])
        .status()?;

    if !status.success() {
        return Err("cargo bench failed".into());
    }
    Ok(())
}
