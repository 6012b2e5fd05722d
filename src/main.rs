//! idshift CLI: remap the UID/GID range of a filesystem subtree.
//!
//! Exit codes: 0 on full success; 1 for usage or validation errors, a failed
//! preflight/dry-run aggregation, or a commit-phase abort.

use std::path::PathBuf;

use clap::Parser;
use log::Level;
use serde_json::Value;

use idshift::logging::{AuditSink, FactsEmitter};
use idshift::types::IdMapping;
use idshift::IdShift;

const OPERATION_HELP: &str = "\
The specified directory is walked. Every object in the tree rooted at
<DIRECTORY> must have a UID and GID between <FROM_ID> and <FROM_ID> + <COUNT>:

    from <= id < from + count

The UID and GID of each object is updated to fall in the range starting at
<TO_ID>:

    newid = id - from + to

<FROM_ID> may be greater than or less than <TO_ID>. The ranges must not
overlap. A preflight pass checks the whole tree and nothing is changed unless
it finds zero problems.";

#[derive(Parser)]
#[command(
    name = "idshift",
    version,
    about = "Remap file ownership from one contiguous UID/GID range to another",
    after_help = OPERATION_HELP
)]
struct Cli {
    /// Root of the subtree to remap
    directory: PathBuf,
    /// First identifier of the source range
    from_id: u32,
    /// First identifier of the target range
    to_id: u32,
    /// Number of identifiers in each range
    count: u32,
    /// Check owner and group after modifying
    #[arg(short = 'c', long = "check")]
    check: bool,
    /// Dry run: walk the directory but make no changes
    #[arg(short = 'n', long = "dry-run")]
    dry_run: bool,
    /// Log one line per visited object
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Prints per-object fact rows to stdout (verbose) and diagnostics to stderr.
#[derive(Clone)]
struct CliReporter {
    verbose: bool,
}

impl FactsEmitter for CliReporter {
    fn emit(&self, _subsystem: &str, event: &str, _decision: &str, fields: Value) {
        if !self.verbose || !matches!(event, "scan" | "remap.result") {
            return;
        }
        let s = |key: &str| fields.get(key).and_then(Value::as_str).unwrap_or("-");
        let n = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_u64)
                .map_or_else(|| "-".to_string(), |v| v.to_string())
        };
        println!(
            "{}\t{}\tuid {} -> {}\tgid {} -> {}\t{}",
            s("phase"),
            s("path"),
            n("uid"),
            n("new_uid"),
            n("gid"),
            n("new_gid"),
            s("kind"),
        );
    }
}

impl AuditSink for CliReporter {
    fn log(&self, level: Level, msg: &str) {
        if level <= Level::Warn || self.verbose {
            eprintln!("idshift: {msg}");
        }
    }
}

fn main() {
    std::process::exit(run_cli());
}

fn run_cli() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap exits 2 on usage errors; the documented contract is 0/1.
            let code = i32::from(e.use_stderr());
            let _ = e.print();
            return code;
        }
    };

    let mapping = match IdMapping::new(cli.from_id, cli.to_id, cli.count) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("idshift: {e}");
            return 1;
        }
    };

    if cli.verbose {
        println!(
            "Mapping UID and GID {} - {} to {} - {} under {}",
            mapping.from(),
            mapping.from() + mapping.count() - 1,
            mapping.to(),
            mapping.to() + mapping.count() - 1,
            cli.directory.display()
        );
    }

    let reporter = CliReporter {
        verbose: cli.verbose,
    };
    let api = IdShift::new(reporter.clone(), reporter, mapping).with_verify(cli.check);

    let ok = if cli.dry_run {
        api.dry_run(&cli.directory).ok()
    } else {
        api.run(&cli.directory).ok()
    };
    i32::from(!ok)
}
