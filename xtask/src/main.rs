use anyhow::Context;
use clap::{Parser, Subcommand};
use fs_err as fs;
use std::process::Command as ProcessCommand;
use versionfix_snapshot::{Snapshot, snapshot_to_json};
use versionfix_types::schema;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print schema identifiers used by versionfix.
    PrintSchemas,
    /// Write an empty snapshot to fill in by hand.
    InitSnapshot {
        #[arg(long, default_value = "versionfix.snapshot.json")]
        path: String,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Bless golden fixtures (overwrite expected outputs).
    BlessFixtures,
    /// Run `versionfix check` against every fixture snapshot.
    CheckFixtures,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintSchemas => {
            println!("{}", schema::VERSIONFIX_REPORT_V1);
            println!("{}", schema::VERSIONFIX_SNAPSHOT_V1);
        }
        Command::InitSnapshot { path, force } => {
            if fs::metadata(&path).is_ok() && !force {
                anyhow::bail!("{path} already exists (use --force to overwrite)");
            }
            let snapshot = Snapshot {
                schema: Some(schema::VERSIONFIX_SNAPSHOT_V1.to_string()),
                ..Snapshot::default()
            };
            fs::write(&path, snapshot_to_json(&snapshot)?)?;
            println!("wrote {path}");
        }
        Command::BlessFixtures => {
            let status = ProcessCommand::new("cargo")
                .args(["test", "-p", "versionfix-domain", "--test", "golden_fixtures"])
                .env("VERSIONFIX_BLESS", "1")
                .status()
                .context("run golden fixture blessing")?;
            if !status.success() {
                anyhow::bail!("bless-fixtures failed");
            }
        }
        Command::CheckFixtures => {
            let mut failed = Vec::new();
            let mut entries: Vec<_> = fs::read_dir("tests/fixtures")?
                .filter_map(Result::ok)
                .map(|e| e.path())
                .filter(|p| p.join("snapshot.json").exists())
                .collect();
            entries.sort();
            for dir in entries {
                let snapshot = dir.join("snapshot.json");
                let out_dir = std::env::temp_dir().join("versionfix-xtask").join(
                    dir.file_name()
                        .context("fixture directory name")?,
                );
                let status = ProcessCommand::new("cargo")
                    .args(["run", "-q", "-p", "versionfix", "--", "check", "--snapshot"])
                    .arg(&snapshot)
                    .arg("--out-dir")
                    .arg(&out_dir)
                    .status()
                    .with_context(|| format!("run versionfix check on {}", snapshot.display()))?;
                // Exit code 2 only means the fixture has issues, which most do.
                match status.code() {
                    Some(0) | Some(2) => {}
                    _ => failed.push(dir.display().to_string()),
                }
            }
            if !failed.is_empty() {
                anyhow::bail!("versionfix check errored on: {}", failed.join(", "));
            }
        }
    }
    Ok(())
}
