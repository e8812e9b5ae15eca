use clap::{Args, Parser, Subcommand, ValueEnum};
use nestkv::config::CONFIG_ENV;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw bytes for binary names, one entry per line otherwise
    #[default]
    Text,
    /// One JSON document per entry
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "nestkv", bin_name = "nestkv", version = get_version())]
#[command(
    about = "Inspect and edit nested bucket stores",
    long_about = "Inspect and edit nested bucket stores.\n\n\
Bucket and key names are byte strings. On the command line a name is taken \
verbatim, or written as a binary literal (0x[00ff]) or as a list of parts \
([foo, 0x[00], 'a b', #7]) that are concatenated."
)]
pub struct Cli {
    /// Database file
    pub file: PathBuf,

    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(
        long,
        value_enum,
        default_value_t = OutputFormat::Text,
        global = true,
        help_heading = "Options"
    )]
    pub output: OutputFormat,

    /// Open the database read-only
    #[arg(long, global = true, help_heading = "Options")]
    pub read_only: bool,

    /// How long to wait for the write lock, in milliseconds (0 waits forever)
    #[arg(long, global = true, help_heading = "Options")]
    pub timeout_ms: Option<u64>,

    /// Configuration file
    #[arg(long, env = CONFIG_ENV, global = true, help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

/// Bucket path, one `-b` per level.
#[derive(Args, Debug, Clone, Default)]
pub struct BucketArgs {
    /// Bucket name; repeat for nested buckets (-b foo -b bar is foo -> bar)
    #[arg(short = 'b', long = "bucket", value_name = "NAME")]
    pub bucket: Vec<String>,
}

/// Name rendering and filtering for listings.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only include names matching this regular expression
    #[arg(long = "match", value_name = "REGEX")]
    pub pattern: Option<String>,

    /// How names are printed: binary, stringify, text, hex, HEX
    #[arg(long, value_name = "MODE", default_value = "binary")]
    pub format: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List child buckets
    Buckets {
        #[command(flatten)]
        path: BucketArgs,
        #[command(flatten)]
        list: ListArgs,
    },

    /// List keys (child buckets are not included)
    Keys {
        #[command(flatten)]
        path: BucketArgs,
        #[command(flatten)]
        list: ListArgs,
    },

    /// Print a value, or every key/value pair when no key is given
    Get {
        #[command(flatten)]
        path: BucketArgs,
        /// Key name
        #[arg(short, long, value_name = "NAME")]
        key: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },

    /// Store a value, read from DATA or from stdin
    Set {
        #[command(flatten)]
        path: BucketArgs,
        /// Key name
        #[arg(short, long, value_name = "NAME")]
        key: String,
        /// Value, as a name literal; stdin is read when omitted
        data: Option<String>,
    },

    /// Create buckets, including missing parents
    Add {
        #[command(flatten)]
        path: BucketArgs,
    },

    /// Delete a key, or the last bucket of the path when no key is given
    #[command(alias = "rm")]
    Delete {
        #[command(flatten)]
        path: BucketArgs,
        /// Key name
        #[arg(short, long, value_name = "NAME")]
        key: Option<String>,
    },

    /// Database statistics, or bucket statistics when a bucket is given
    Stat {
        #[command(flatten)]
        path: BucketArgs,
    },

    /// Bucket structure
    Info {
        #[command(flatten)]
        path: BucketArgs,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Buckets { .. } => "buckets",
            Commands::Keys { .. } => "keys",
            Commands::Get { .. } => "get",
            Commands::Set { .. } => "set",
            Commands::Add { .. } => "add",
            Commands::Delete { .. } => "delete",
            Commands::Stat { .. } => "stat",
            Commands::Info { .. } => "info",
        }
    }

    /// Only these actions may create a missing database.
    pub fn creates_database(&self) -> bool {
        matches!(self, Commands::Add { .. } | Commands::Set { .. })
    }

    pub fn writes(&self) -> bool {
        matches!(
            self,
            Commands::Add { .. } | Commands::Set { .. } | Commands::Delete { .. }
        )
    }
}
