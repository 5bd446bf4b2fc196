// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Option that also reads a GitHub Action input variable
///
/// Mirrors `InputArgs` in src/cli.rs.
fn input_arg(
    id: &'static str,
    long: &'static str,
    env_var: &'static str,
    help: &'static str,
) -> Arg {
    Arg::new(id)
        .long(long)
        .value_name("VALUE")
        .env(env_var)
        .help(help)
}

fn build_cli() -> Command {
    Command::new("depmatrix")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Depmatrix Contributors")
        .about("Generate test matrices over the compatible versions of Python dependencies")
        .subcommand_required(false)
        .arg(
            input_arg(
                "path",
                "path",
                "INPUT_PATH",
                "Project directory holding pyproject.toml or setup.py",
            )
            .short('p'),
        )
        .arg(
            input_arg(
                "max_cases",
                "max-cases",
                "INPUT_MAX_CASES",
                "Maximum number of cases to emit (0 or empty for no limit)",
            )
            .short('m'),
        )
        .arg(input_arg("mode", "mode", "INPUT_MODE", "Candidate selection: full or first-last"))
        .arg(input_arg("seed", "seed", "INPUT_SEED", "Seed for reproducible case sampling"))
        .arg(input_arg(
            "index_url",
            "index-url",
            "INPUT_INDEX_URL",
            "Base URL of a PyPI-compatible JSON API",
        ))
        .arg(input_arg(
            "output_file",
            "output-file",
            "GITHUB_OUTPUT",
            "File receiving the case list as a step output",
        ))
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell type"),
                ),
        )
}

/// Render the man page for `cmd` into `man_dir` as `<page>.1`
fn write_page(cmd: Command, page: &str, man_dir: &Path) -> Result<PathBuf, String> {
    let mut buffer = Vec::new();
    Man::new(cmd)
        .render(&mut buffer)
        .map_err(|e| format!("Failed to render {} man page: {}", page, e))?;

    let man_path = man_dir.join(format!("{}.1", page));
    fs::write(&man_path, buffer)
        .map_err(|e| format!("Failed to write {}: {}", man_path.display(), e))?;
    Ok(man_path)
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/cli.rs");

    let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") else {
        println!("cargo:warning=CARGO_MANIFEST_DIR not set, skipping man pages");
        return;
    };
    let man_dir = PathBuf::from(manifest_dir).join("man");
    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    // One page for the tool, one per subcommand (depmatrix-completions.1)
    let cli = build_cli();
    let mut pages = vec![("depmatrix".to_string(), cli.clone())];
    for sub in cli.get_subcommands() {
        pages.push((format!("depmatrix-{}", sub.get_name()), sub.clone()));
    }

    for (page, cmd) in pages {
        match write_page(cmd, &page, &man_dir) {
            Ok(path) => println!("cargo:warning=Man page generated at {}", path.display()),
            Err(e) => println!("cargo:warning={}", e),
        }
    }
}
