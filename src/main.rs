//! Command-line interface for the static API generator.
//!
//! `generate` executes a configuration document; `announcement create` writes
//! a configuration document that publishes a single announcement.

use std::{io, path::PathBuf, process, sync::Arc};

use clap::{Args, Parser, Subcommand};
use static_api::{
    AnnouncementConfig, AnnouncementContent, ArtifactWriter, Config, DEFAULT_CONFIG_FILE, Error,
    GeneratorConfig, GeneratorRegistry, GitHubApi, Orchestrator, RunReport, load_config,
    save_config,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Top-level CLI options parsed from user input.
#[derive(Debug, Parser,)]
#[command(name = "static-api", version, about = "Generate a static JSON API from GitHub data")]
struct Cli
{
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Run every generator listed in the configuration file.
    Generate(GenerateArgs,),
    /// Manage announcements.
    Announcement(AnnouncementArgs,),
}

#[derive(Debug, Args,)]
/// Arguments accepted by the `generate` subcommand.
struct GenerateArgs
{
    /// Path to the JSON configuration file.
    #[arg(long = "config", value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// GitHub token used to authenticate API requests.
    #[arg(long = "token", env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String,>,
}

#[derive(Debug, Args,)]
struct AnnouncementArgs
{
    #[command(subcommand)]
    command: AnnouncementCommand,
}

#[derive(Debug, Subcommand,)]
enum AnnouncementCommand
{
    /// Write a configuration file publishing one announcement.
    Create(AnnouncementCreateArgs,),
}

#[derive(Debug, Args,)]
struct AnnouncementCreateArgs
{
    #[arg(long = "title")]
    title: String,

    #[arg(long = "channel")]
    channel: String,

    #[arg(long = "author")]
    author: Option<String,>,

    #[arg(long = "message")]
    message: Option<String,>,

    /// URL of an attachment; may be repeated.
    #[arg(long = "attachment-url", value_name = "URL")]
    attachment_urls: Vec<String,>,

    #[arg(long = "level", default_value_t = 0)]
    level: i64,

    /// Where the configuration file is written.
    #[arg(long = "config", value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main()
{
    init_tracing();

    if let Err(error,) = run(Cli::parse(),).await {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

/// Logs to stderr, filtered by `RUST_LOG` and `info` by default.
fn init_tracing()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),);
    tracing_subscriber::fmt().with_env_filter(filter,).with_writer(io::stderr,).init();
}

/// Executes the parsed command.
///
/// # Errors
///
/// Propagates configuration, client construction and output directory errors.
/// Failures of individual generators are logged and do not surface here.
async fn run(cli: Cli,) -> Result<(), Error,>
{
    match cli.command {
        Command::Generate(args,) => run_generate(args,).await.map(drop,),
        Command::Announcement(AnnouncementArgs {
            command: AnnouncementCommand::Create(args,),
        },) => run_announcement_create(args,),
    }
}

async fn run_generate(args: GenerateArgs,) -> Result<RunReport, Error,>
{
    let config = load_config(&args.config,)?;
    let api = GitHubApi::new(args.token.as_deref(),)?;
    let registry =
        GeneratorRegistry::with_defaults(Arc::new(api,), Arc::new(ArtifactWriter::new(),),)?;

    Orchestrator::new(Arc::new(registry,),).with_progress(true,).run(&config,).await
}

fn run_announcement_create(args: AnnouncementCreateArgs,) -> Result<(), Error,>
{
    let config = announcement_config(&args,);
    save_config(&config, &args.config,)?;
    info!("Wrote announcement configuration to {}", args.config.display());
    Ok((),)
}

fn announcement_config(args: &AnnouncementCreateArgs,) -> Config
{
    Config {
        configs: vec![GeneratorConfig {
            generators: vec!["announcement".to_owned()],
            announcement: Some(AnnouncementConfig {
                author:  args.author.clone(),
                title:   args.title.clone(),
                content: AnnouncementContent {
                    message:         args.message.clone(),
                    attachment_urls: args.attachment_urls.clone(),
                },
                channel: args.channel.clone(),
                level:   args.level,
            },),
            ..GeneratorConfig::default()
        }],
        ..Config::default()
    }
}

#[cfg(test)]
mod tests
{
    use std::path::Path;

    use clap::Parser;
    use static_api::{Error, load_config};
    use tempfile::tempdir;

    use super::{AnnouncementCommand, Cli, Command, run, run_generate};

    #[test]
    fn generate_defaults_to_config_json()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "generate",],)
            .expect("failed to parse CLI",);

        match cli.command {
            Command::Generate(args,) => assert_eq!(args.config, Path::new("config.json")),
            other => panic!("unexpected command variant: {other:?}"),
        }
    }

    #[test]
    fn announcement_create_requires_title_and_channel()
    {
        let result = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "announcement",
            "create",
            "--title",
            "Release",
        ],);
        assert!(result.is_err());
    }

    #[test]
    fn attachment_urls_may_be_repeated()
    {
        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "announcement",
            "create",
            "--title",
            "Release",
            "--channel",
            "general",
            "--attachment-url",
            "https://example.com/a.png",
            "--attachment-url",
            "https://example.com/b.png",
        ],)
        .expect("failed to parse CLI",);

        let Command::Announcement(args,) = cli.command else {
            panic!("expected announcement command");
        };
        let AnnouncementCommand::Create(create,) = args.command;
        assert_eq!(create.attachment_urls, [
            "https://example.com/a.png",
            "https://example.com/b.png"
        ]);
        assert_eq!(create.level, 0);
        assert!(create.author.is_none());
    }

    #[tokio::test]
    async fn announcement_create_writes_loadable_config()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("config.json",);

        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "announcement",
            "create",
            "--title",
            "Maintenance",
            "--channel",
            "status",
            "--message",
            "Downtime tonight",
            "--level",
            "2",
            "--config",
            path.to_str().expect("utf8",),
        ],)
        .expect("failed to parse CLI",);
        run(cli,).await.expect("announcement create failed",);

        let config = load_config(&path,).expect("failed to load written config",);
        assert_eq!(config.configs.len(), 1);
        let block = &config.configs[0];
        assert_eq!(block.generators, ["announcement"]);
        let announcement = block.announcement.as_ref().expect("missing announcement",);
        assert_eq!(announcement.title, "Maintenance");
        assert_eq!(announcement.channel, "status");
        assert_eq!(announcement.level, 2);
        assert_eq!(announcement.content.message.as_deref(), Some("Downtime tonight"));
    }

    #[tokio::test]
    async fn generate_reports_missing_config()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let missing = temp.path().join("missing.json",);

        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "generate",
            "--config",
            missing.to_str().expect("utf8",),
        ],)
        .expect("failed to parse CLI",);
        let Command::Generate(args,) = cli.command else {
            panic!("expected generate command");
        };

        let error = run_generate(args,).await.expect_err("expected config error",);
        assert!(matches!(error, Error::ConfigIo { .. }));
    }
}
