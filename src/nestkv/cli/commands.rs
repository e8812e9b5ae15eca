use super::print;
use super::setup::{BucketArgs, Cli, Commands, ListArgs, OutputFormat};
use clap::Parser;
use nestkv::api::{parse_location, NestApi};
use nestkv::config::NestConfig;
use nestkv::error::{NestError, Result};
use nestkv::name::{parse_name, RenderMode};
use nestkv::store::fs::{FileStore, StoreOptions};
use std::io::{self, BufWriter, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Environment variable holding the log filter, e.g. `NESTKV_LOG=debug`.
const LOG_ENV: &str = "NESTKV_LOG";

struct AppContext {
    file: PathBuf,
    options: StoreOptions,
    output: OutputFormat,
}

impl AppContext {
    fn open(&self) -> Result<NestApi<FileStore>> {
        let store = FileStore::open(&self.file, self.options.clone())?;
        Ok(NestApi::new(store))
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ctx = init_context(&cli)?;
    debug!(action = cli.command.name(), file = %ctx.file.display(), "dispatching");

    let result = match cli.command {
        Commands::Buckets { path, list } => handle_buckets(&ctx, path, list),
        Commands::Keys { path, list } => handle_keys(&ctx, path, list),
        Commands::Get { path, key, list } => handle_get(&ctx, path, key, list),
        Commands::Set { path, key, data } => handle_set(&ctx, path, key, data),
        Commands::Add { path } => handle_add(&ctx, path),
        Commands::Delete { path, key } => handle_delete(&ctx, path, key),
        Commands::Stat { path } => handle_stat(&ctx, path),
        Commands::Info { path } => handle_info(&ctx, path),
    };

    match result {
        // reader went away (e.g. `| head`), nothing left to report
        Err(NestError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(io::stderr)
        .with_filter(env_filter);

    let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config_path = cli.config.clone().or_else(NestConfig::default_path);
    let config = match &config_path {
        Some(path) => NestConfig::load(path)?,
        None => NestConfig::default(),
    };
    debug!(?config_path, ?config, "loaded configuration");

    let options = StoreOptions {
        timeout: cli
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| config.timeout()),
        read_only: cli.read_only || config.read_only,
        file_mode: config.file_mode,
        create: cli.command.creates_database() && !config.must_exist,
    };
    if options.read_only && cli.command.writes() {
        return Err(NestError::ReadOnly);
    }

    Ok(AppContext {
        file: cli.file.clone(),
        options,
        output: cli.output,
    })
}

fn render_mode(list: &ListArgs) -> Result<RenderMode> {
    list.format.parse()
}

fn stdout() -> BufWriter<io::StdoutLock<'static>> {
    BufWriter::new(io::stdout().lock())
}

fn handle_buckets(ctx: &AppContext, path: BucketArgs, list: ListArgs) -> Result<()> {
    let mode = render_mode(&list)?;
    let location = parse_location(&path.bucket, None)?;
    let api = ctx.open()?;

    let mut out = stdout();
    api.buckets(&location, list.pattern.as_deref(), mode, |name| {
        print::write_name(&mut out, &name, ctx.output)
    })?;
    out.flush()?;
    Ok(())
}

fn handle_keys(ctx: &AppContext, path: BucketArgs, list: ListArgs) -> Result<()> {
    let mode = render_mode(&list)?;
    let location = parse_location(&path.bucket, None)?;
    let api = ctx.open()?;

    let mut out = stdout();
    api.keys(&location, list.pattern.as_deref(), mode, |name| {
        print::write_name(&mut out, &name, ctx.output)
    })?;
    out.flush()?;
    Ok(())
}

fn handle_get(
    ctx: &AppContext,
    path: BucketArgs,
    key: Option<String>,
    list: ListArgs,
) -> Result<()> {
    let mode = render_mode(&list)?;
    let location = parse_location(&path.bucket, key.as_deref())?;
    let api = ctx.open()?;

    let mut out = stdout();
    if location.key.is_some() {
        let result = api.get(&location, mode)?;
        if let Some(value) = &result.value {
            print::write_value(&mut out, value, ctx.output)?;
        }
    } else {
        api.records(&location, list.pattern.as_deref(), mode, |record| {
            print::write_record(&mut out, &record, ctx.output)
        })?;
    }
    out.flush()?;
    Ok(())
}

fn handle_set(
    ctx: &AppContext,
    path: BucketArgs,
    key: String,
    data: Option<String>,
) -> Result<()> {
    let location = parse_location(&path.bucket, Some(&key))?;
    let value = match data {
        Some(data) => parse_name(&data)
            .map_err(|e| NestError::InvalidArgs(format!("invalid data: {}", e)))?,
        None => read_stdin()?,
    };
    let mut api = ctx.open()?;
    let result = api.set(&location, &value)?;
    print::print_messages(&result.messages, ctx.output);
    Ok(())
}

fn read_stdin() -> Result<Vec<u8>> {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(NestError::InvalidArgs(
            "input value is missing, pass DATA or pipe it to stdin".to_string(),
        ));
    }
    let mut buffer = Vec::new();
    stdin.read_to_end(&mut buffer)?;
    debug!(bytes = buffer.len(), "read value from stdin");
    Ok(buffer)
}

fn handle_add(ctx: &AppContext, path: BucketArgs) -> Result<()> {
    let location = parse_location(&path.bucket, None)?;
    let mut api = ctx.open()?;
    let result = api.add(&location)?;
    print::print_messages(&result.messages, ctx.output);
    Ok(())
}

fn handle_delete(ctx: &AppContext, path: BucketArgs, key: Option<String>) -> Result<()> {
    let location = parse_location(&path.bucket, key.as_deref())?;
    let mut api = ctx.open()?;
    let result = api.delete(&location)?;
    print::print_messages(&result.messages, ctx.output);
    Ok(())
}

fn handle_stat(ctx: &AppContext, path: BucketArgs) -> Result<()> {
    let location = parse_location(&path.bucket, None)?;
    let api = ctx.open()?;
    let result = api.stat(&location)?;

    let mut out = stdout();
    if let Some(stats) = &result.db_stats {
        print::write_db_stats(&mut out, stats, ctx.output)?;
    }
    if let Some(stats) = &result.bucket_stats {
        print::write_bucket_stats(&mut out, stats, ctx.output)?;
    }
    out.flush()?;
    Ok(())
}

fn handle_info(ctx: &AppContext, path: BucketArgs) -> Result<()> {
    let location = parse_location(&path.bucket, None)?;
    let api = ctx.open()?;
    let result = api.info(&location)?;

    let mut out = stdout();
    if let Some(structure) = &result.structure {
        print::write_structure(&mut out, structure, ctx.output)?;
    }
    out.flush()?;
    Ok(())
}
