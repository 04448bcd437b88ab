use std::fs;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use md2gdoc::{
    translate_from_path, translate_from_reader, CheckboxSlicing, TranslateOptions,
    Translation,
};
use md2gdoc_client::{
    publish, ClientError, Credentials, EmailAddress, ExitCode, PlanService, PublishRequest, Role,
    ShareTarget,
};
use md2gdoc_config::{Config, ConfigError, LoadOptions};

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version land here too and are not failures.
            let code = if err.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            err.print().context("Failed to print usage")?;
            return Ok(code as i32);
        }
    };
    init_logging(cli.verbose);

    let mut options = LoadOptions::default();
    if let Some(path) = &cli.config {
        options = options.with_override_path(path);
    }
    let config = Config::load(options)?;

    match cli.command {
        Command::Render(args) => handle_render(&config, args),
        Command::Publish(args) => handle_publish(&config, args),
    }
}

/// Maps a failure that escaped [`run`] to the process exit code.
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    if let Some(client) = err.downcast_ref::<ClientError>() {
        return client.exit_code();
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return ExitCode::InvalidArguments;
    }
    if err.downcast_ref::<io::Error>().is_some() {
        return ExitCode::Io;
    }
    ExitCode::InvalidArguments
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };

    // RUST_LOG, when set, takes precedence over -v.
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn translate_options(config: &Config, slicing: Option<SlicingValue>) -> TranslateOptions {
    TranslateOptions {
        checkbox_slicing: slicing
            .map(CheckboxSlicing::from)
            .unwrap_or(config.translate.checkbox_slicing),
    }
}

fn handle_render(config: &Config, args: RenderArgs) -> Result<i32> {
    let RenderArgs {
        path,
        format,
        checkbox_slicing,
    } = args;

    let options = translate_options(config, checkbox_slicing);
    let translation = translate_input(&path, options)
        .with_context(|| format!("Unable to read markdown at path or stream: {}", path.display()))?;
    log::info!(
        "translated {} into {} operations",
        path.display(),
        translation.operations.len()
    );

    let rendered = match format.unwrap_or(RenderFormatValue::Requests) {
        RenderFormatValue::Requests => translation.batch_update().to_json_pretty()?,
        RenderFormatValue::Operations => serde_json::to_string_pretty(&translation.operations)?,
    };

    emit(&rendered)?;
    Ok(ExitCode::Success as i32)
}

fn handle_publish(config: &Config, args: PublishArgs) -> Result<i32> {
    let PublishArgs {
        path,
        plan_dir,
        title,
        share_with,
        role,
        no_share,
        credentials,
        checkbox_slicing,
    } = args;

    let markdown = read_markdown(&path)?;
    let credentials_path = credentials.or_else(|| config.credentials.path.clone()).ok_or_else(
        || {
            ClientError::Auth(
                "no credential file configured (use --credentials or [credentials].path)".into(),
            )
        },
    )?;
    let credentials = Credentials::load(&credentials_path, &config.credentials.scopes)?;
    log::info!("authenticated as {}", credentials.principal());

    let share = if no_share {
        None
    } else {
        share_with
            .or_else(|| config.share.email.clone())
            .map(|principal| ShareTarget {
                principal,
                role: role.map(Role::from).unwrap_or(config.share.role),
            })
    };

    let request = PublishRequest {
        title: title.unwrap_or_else(|| config.document.title.clone()),
        markdown,
        options: translate_options(config, checkbox_slicing),
        share,
    };

    let mut service = PlanService::new(plan_dir, credentials)?;
    let outcome = publish(&mut service, request)?;

    emit(&format!("Created document with ID: {}", outcome.document_id))?;
    emit(&format!("Document updated successfully: {}", outcome.url))?;
    if let Some(target) = &outcome.shared_with {
        emit(&format!(
            "Shared document with {} ({})",
            target.principal, target.role
        ))?;
    }
    emit(&format!(
        "Wrote {} request files to {}",
        service.written().len(),
        service.dir().display()
    ))?;

    Ok(ExitCode::Success as i32)
}

fn translate_input(path: &Path, options: TranslateOptions) -> io::Result<Translation> {
    if path == Path::new("-") {
        let stdin = io::stdin();
        let mut reader = BufReader::new(stdin.lock());
        translate_from_reader(&mut reader, options)
    } else {
        translate_from_path(path, options)
    }
}

fn read_markdown(path: &Path) -> Result<String> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read markdown from stdin")?;
        buffer
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read markdown file: {}", path.display()))?
    };
    Ok(content)
}

fn emit(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let result = if content.ends_with('\n') {
        write!(handle, "{content}")
    } else {
        writeln!(handle, "{content}")
    };

    match result.and_then(|_| handle.flush()) {
        Ok(()) => Ok(()),
        Err(err) if should_ignore_pipe_error(&err) => Ok(()),
        Err(err) => Err(err).context("Failed to write to stdout"),
    }
}

fn should_ignore_pipe_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::WouldBlock
    )
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Publish markdown as a styled hosted document",
    propagate_version = true
)]
struct Cli {
    /// Override config file (highest precedence layer)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the edit operations for a markdown file
    Render(RenderArgs),
    /// Authenticate, create, update and share a document, writing each request body to disk
    Publish(PublishArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// Markdown file ('-' for stdin)
    #[arg(value_name = "FILE", allow_hyphen_values = true)]
    path: PathBuf,
    /// Output shape (batch-update requests or abstract operations)
    #[arg(long, value_enum)]
    format: Option<RenderFormatValue>,
    /// How task-list markers are sliced
    #[arg(long = "checkbox-slicing", value_enum)]
    checkbox_slicing: Option<SlicingValue>,
}

#[derive(Args)]
struct PublishArgs {
    /// Markdown file ('-' for stdin)
    #[arg(value_name = "FILE", allow_hyphen_values = true)]
    path: PathBuf,
    /// Directory that receives the request bodies
    #[arg(long = "plan-dir", value_name = "DIR")]
    plan_dir: PathBuf,
    /// Document title
    #[arg(long)]
    title: Option<String>,
    /// Share the document with this address
    #[arg(long = "share-with", value_name = "EMAIL", value_parser = parse_email)]
    share_with: Option<EmailAddress>,
    /// Permission granted to the shared address
    #[arg(long, value_enum)]
    role: Option<RoleValue>,
    /// Skip sharing even when an address is configured
    #[arg(long = "no-share", conflicts_with = "share_with")]
    no_share: bool,
    /// Service-account key file
    #[arg(long, value_name = "PATH")]
    credentials: Option<PathBuf>,
    /// How task-list markers are sliced
    #[arg(long = "checkbox-slicing", value_enum)]
    checkbox_slicing: Option<SlicingValue>,
}

fn parse_email(value: &str) -> Result<EmailAddress, String> {
    EmailAddress::parse(value)
}

#[derive(Clone, Copy, ValueEnum)]
enum RenderFormatValue {
    Requests,
    Operations,
}

#[derive(Clone, Copy, ValueEnum)]
enum SlicingValue {
    Preserve,
    Exact,
}

impl From<SlicingValue> for CheckboxSlicing {
    fn from(value: SlicingValue) -> Self {
        match value {
            SlicingValue::Preserve => CheckboxSlicing::Preserve,
            SlicingValue::Exact => CheckboxSlicing::Exact,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleValue {
    Reader,
    Writer,
}

impl From<RoleValue> for Role {
    fn from(value: RoleValue) -> Self {
        match value {
            RoleValue::Reader => Role::Reader,
            RoleValue::Writer => Role::Writer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_client_failures_to_their_exit_codes() {
        let service = anyhow::Error::new(ClientError::Service("share failed".into()));
        assert_eq!(exit_code_for(&service), ExitCode::Service);

        let auth = anyhow::Error::new(ClientError::Auth("bad key".into()))
            .context("publishing notes.md");
        assert_eq!(exit_code_for(&auth), ExitCode::Auth);
    }

    #[test]
    fn maps_io_and_unknown_failures() {
        let io = anyhow::Error::new(io::Error::new(io::ErrorKind::NotFound, "gone"))
            .context("Failed to read markdown file: notes.md");
        assert_eq!(exit_code_for(&io), ExitCode::Io);
        assert_eq!(
            exit_code_for(&anyhow::anyhow!("anything else")),
            ExitCode::InvalidArguments
        );
    }
}
