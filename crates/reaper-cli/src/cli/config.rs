use anyhow::bail;
use clap::{ArgAction, Parser};
use reaper::{DEFAULT_NUM_WORKERS, DeleteConfig, FailurePolicy, FileType, OutputMode};
use std::{path::PathBuf, time::Duration};

/// Command-line arguments for the `reaper` binary.
///
/// Every option with an environment variable can also be set in a `.env`
/// file in the working directory.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "reaper",
    version,
    about = "Delete objects from a backup repository with a bounded worker pool"
)]
pub struct CliArgs {
    /// Root directory of the repository.
    ///
    /// Environment variable: `REAPER_REPO`
    #[arg(short, long, env = "REAPER_REPO")]
    pub repo: PathBuf,

    /// Type of the objects to delete.
    ///
    /// One of `data`, `keys`, `locks`, `snapshots`, `index` or `config`. Every
    /// ID given is removed from that part of the repository.
    ///
    /// Environment variable: `REAPER_TYPE`
    #[arg(short = 't', long = "type", env = "REAPER_TYPE", default_value_t = FileType::Pack)]
    pub file_type: FileType,

    /// Number of removals running at the same time.
    ///
    /// Environment variable: `REAPER_WORKERS`
    #[arg(short, long, env = "REAPER_WORKERS", default_value_t = DEFAULT_NUM_WORKERS)]
    pub workers: usize,

    /// Stop at the first failed removal and exit with an error.
    ///
    /// Without this flag every failure is reported as a warning and the
    /// remaining objects are still deleted.
    #[arg(long, default_value_t = false)]
    pub checked: bool,

    /// Cancel the run after this many seconds.
    ///
    /// Environment variable: `REAPER_TIMEOUT`
    #[arg(long, env = "REAPER_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print the summary as JSON and suppress all other output.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Suppress the progress line and the summary.
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Increase verbosity. `-vvv` prints every removed object.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Read IDs from standard input, one per line.
    #[arg(long, default_value_t = false)]
    pub stdin: bool,

    /// IDs of the objects to delete, as 64 hex characters.
    #[arg(value_name = "ID")]
    pub ids: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub repo: PathBuf,
    pub file_type: FileType,
    pub delete: DeleteConfig,
    pub policy: FailurePolicy,
    pub timeout: Option<Duration>,
    pub output: OutputMode,
    pub ids: Vec<String>,
    pub stdin: bool,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.workers == 0 {
            bail!("REAPER_WORKERS must be greater than 0");
        }

        if args.timeout == Some(0) {
            bail!("REAPER_TIMEOUT must be greater than 0 seconds");
        }

        if args.quiet && args.verbose > 0 {
            bail!("--quiet and --verbose cannot be used together");
        }

        if args.ids.is_empty() && !args.stdin {
            bail!("no IDs given: pass them as arguments or use --stdin");
        }

        let policy = if args.checked {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::BestEffort
        };

        Ok(Self {
            repo: args.repo,
            file_type: args.file_type,
            delete: DeleteConfig {
                num_workers: args.workers,
            },
            policy,
            timeout: args.timeout.map(Duration::from_secs),
            output: OutputMode {
                json: args.json,
                quiet: args.quiet,
                verbosity: args.verbose,
            },
            ids: args.ids,
            stdin: args.stdin,
        })
    }
}
