mod config;
mod explain;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::{CheckOverrides, ConfigMerger};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use versionfix_core::ThreadSleeper;
use versionfix_core::adapters::{FsSnapshotSource, FsWritePort};
use versionfix_core::pipeline::{ToolError, run_check, write_check_artifacts, write_snapshot};
use versionfix_core::settings::CheckSettings;
use versionfix_types::report::{ToolInfo, VersionfixReport};
use versionfix_types::summary::RunMode;

const DEFAULT_SNAPSHOT: &str = "versionfix.snapshot.json";
const DEFAULT_OUT_DIR: &str = "artifacts/versionfix";

#[derive(Debug, Parser)]
#[command(
    name = "versionfix",
    version,
    about = "Validate and repair floating version tags, branches and releases."
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a repository snapshot, then print or apply the remediation.
    Check(CheckArgs),
    /// Explain an issue type and how it is remediated.
    Explain(ExplainArgs),
    /// List the validation rules in evaluation order.
    ListRules(ListRulesArgs),
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Snapshot JSON with tags, branches and releases (default: versionfix.snapshot.json).
    #[arg(long, env = "VERSIONFIX_SNAPSHOT")]
    snapshot: Option<Utf8PathBuf>,

    /// Config file (default: ./versionfix.toml when present).
    #[arg(long, env = "VERSIONFIX_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Output directory for report.json and summary.md (default: artifacts/versionfix).
    #[arg(long, env = "VERSIONFIX_OUT_DIR")]
    out_dir: Option<Utf8PathBuf>,

    /// Apply remediation to the snapshot instead of only printing commands.
    #[arg(long, env = "VERSIONFIX_AUTO_FIX", default_value_t = false)]
    auto_fix: bool,

    /// Where auto-fix writes the updated snapshot (default: overwrite --snapshot).
    #[arg(long)]
    write_snapshot: Option<Utf8PathBuf>,

    /// error, warning or none.
    #[arg(long, env = "VERSIONFIX_CHECK_MINOR_VERSION")]
    check_minor_version: Option<String>,

    /// error, warning or none.
    #[arg(long, env = "VERSIONFIX_CHECK_RELEASES")]
    check_releases: Option<String>,

    /// error, warning or none.
    #[arg(long, env = "VERSIONFIX_CHECK_RELEASE_IMMUTABILITY")]
    check_release_immutability: Option<String>,

    /// tags or branches.
    #[arg(long, env = "VERSIONFIX_FLOATING_VERSIONS_USE")]
    floating_versions_use: Option<String>,

    /// true or false.
    #[arg(long, env = "VERSIONFIX_IGNORE_PREVIEW_RELEASES")]
    ignore_preview_releases: Option<String>,

    /// Version globs to ignore (repeatable or comma-separated).
    #[arg(long, env = "VERSIONFIX_IGNORE_VERSIONS", value_delimiter = ',')]
    ignore_versions: Vec<String>,

    /// Retries after the first attempt for transient failures.
    #[arg(long, env = "VERSIONFIX_MAX_RETRIES")]
    max_retries: Option<u32>,

    /// Initial backoff delay; doubles on each retry.
    #[arg(long, env = "VERSIONFIX_RETRY_DELAY_MS")]
    retry_delay_ms: Option<u64>,
}

impl CheckArgs {
    fn overrides(&self) -> CheckOverrides {
        CheckOverrides {
            check_minor_version: self.check_minor_version.clone(),
            check_releases: self.check_releases.clone(),
            check_release_immutability: self.check_release_immutability.clone(),
            floating_versions_use: self.floating_versions_use.clone(),
            ignore_preview_releases: self.ignore_preview_releases.clone(),
            ignore_versions: self.ignore_versions.clone(),
            max_retries: self.max_retries,
            retry_delay_ms: self.retry_delay_ms,
        }
    }
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Issue type to explain (e.g., "draft-release", "incorrect_version").
    issue_type: String,
}

#[derive(Debug, Parser)]
struct ListRulesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match real_main(cli) {
        Ok(()) => ExitCode::from(0),
        Err(ToolError::IssuesRemain) => {
            info!("unresolved error-severity issues remain");
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn real_main(cli: Cli) -> Result<(), ToolError> {
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Explain(args) => cmd_explain(args).map_err(ToolError::from),
        Command::ListRules(args) => cmd_list_rules(args).map_err(ToolError::from),
    }
}

fn cmd_check(args: CheckArgs) -> Result<(), ToolError> {
    let file_config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::load_or_default(Utf8Path::new("."))
            .context("load versionfix.toml config")?,
    };
    let merged = ConfigMerger::new(file_config)
        .merge_check_args(&args.overrides())
        .context("resolve configuration")?;

    debug!(config = ?merged.validator, retry = ?merged.retry, "merged config");

    let settings = CheckSettings {
        snapshot: args
            .snapshot
            .clone()
            .or(merged.snapshot)
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_SNAPSHOT)),
        out_dir: args
            .out_dir
            .clone()
            .or(merged.out_dir)
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUT_DIR)),
        config: merged.validator,
        mode: if args.auto_fix {
            RunMode::AutoFix
        } else {
            RunMode::Manual
        },
        retry: merged.retry,
        write_snapshot: args.write_snapshot.clone(),
    };

    let source = FsSnapshotSource::new(settings.snapshot.clone());
    let outcome = run_check(&settings, &source, &ThreadSleeper, tool_info())?;

    let writer = FsWritePort;
    write_check_artifacts(&outcome, &settings.out_dir, &writer)?;
    if settings.mode == RunMode::AutoFix {
        write_snapshot(&outcome, settings.snapshot_output(), &writer)?;
    }

    print_summary(&outcome.report);
    info!("wrote check artifacts to {}", settings.out_dir);

    if outcome.issues_remain {
        return Err(ToolError::IssuesRemain);
    }
    Ok(())
}

fn print_summary(report: &VersionfixReport) {
    let s = &report.summary;
    if report.issues.is_empty() {
        println!("No issues found.");
        return;
    }
    for entry in &report.issues {
        let issue = &entry.issue;
        println!(
            "{:<7} {:<24} {:<10} {} [{}]",
            issue.severity.as_str(),
            issue.issue_type.as_str(),
            issue.version,
            issue.message,
            issue.status()
        );
    }
    println!();
    println!(
        "{} issue(s): {} error(s), {} warning(s)",
        s.total_issues, s.errors, s.warnings
    );
    if s.mode == RunMode::AutoFix {
        println!(
            "fixed {}, failed {}, unfixable {}, manual fix required {}",
            s.fixed, s.failed, s.unfixable, s.manual_fix_required
        );
    }
    if !s.manual_commands.is_empty() {
        println!();
        println!("Manual commands:");
        for cmd in &s.manual_commands {
            println!("  {}", cmd);
        }
    }
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "versionfix".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    use explain::{list_issue_keys, lookup_issue};

    let Some(entry) = lookup_issue(&args.issue_type) else {
        let available = list_issue_keys().join(", ");
        anyhow::bail!(
            "Unknown issue type: '{}'\n\nAvailable issue types: {}",
            args.issue_type,
            available
        );
    };

    println!("================================================================================");
    println!("ISSUE: {}", entry.title);
    println!("================================================================================");
    println!();
    println!("Type:           {}", entry.issue_type);
    println!(
        "Controlled by:  {}",
        entry.controlled_by.unwrap_or("always checked")
    );
    println!();

    println!("DESCRIPTION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", entry.description);
    println!();

    println!("AUTO-FIX");
    println!("--------------------------------------------------------------------------------");
    println!("{}", entry.remediation);
    println!();

    println!("MANUAL REMEDIATION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", entry.manual);
    println!();

    Ok(())
}

fn cmd_list_rules(args: ListRulesArgs) -> anyhow::Result<()> {
    let rules = versionfix_core::builtin_rule_metas();

    match args.format {
        OutputFormat::Text => {
            println!("Validation rules:\n");
            println!("  {:<4} {:<24} {:<26} TITLE", "PRI", "ID", "ISSUE TYPE");
            println!("  {:<4} {:<24} {:<26} -----", "---", "--", "----------");
            for rule in &rules {
                println!(
                    "  {:<4} {:<24} {:<26} {}",
                    rule.priority,
                    rule.id,
                    rule.issue_type.as_str(),
                    rule.title
                );
            }
            println!();
            println!("Use 'versionfix explain <issue-type>' for details.");
        }
        OutputFormat::Json => {
            let rules: Vec<_> = rules
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "id": r.id,
                        "issue_type": r.issue_type,
                        "priority": r.priority,
                        "title": r.title,
                        "description": r.description,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rules)?);
        }
    }
    Ok(())
}
