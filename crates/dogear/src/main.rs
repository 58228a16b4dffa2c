use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use dogear_core::commands::{self, Status, conclude};
use dogear_core::console::{Console, StdConsole};
use dogear_core::runtime::{
    PathOverrides, ResolutionContext, ResolvedRuntime, current_directory, resolve_config_path,
    resolve_runtime,
};
use log::debug;

const SHELL_SNIPPET: &str = r#"# Add to your shell profile, then `flipto <bookmark name>` changes directory.
flipto() {
    local target
    target="$(dogear find "$1")" && cd "$target"
}"#;

#[derive(Debug, Parser)]
#[command(
    name = "dogear",
    version,
    about = "Bookmark directories for easy access in the future",
    after_help = "Bookmarks are stored in ~/.dogear_store unless --store, DOGEAR_STORE, or the config file says otherwise."
)]
struct Cli {
    #[arg(long, global = true, value_name = "PATH", help = "Bookmark store file")]
    store: Option<PathBuf>,
    #[arg(long, global = true, value_name = "PATH", help = "Config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Print resolved runtime diagnostics")]
    diagnostics: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Create a bookmark of the current working directory")]
    Fold(NameArgs),
    #[command(about = "Remove the bookmark of the current working directory")]
    Unfold,
    #[command(about = "Print the path associated with a bookmark")]
    Find(NameArgs),
    #[command(about = "List bookmarks whose name or path contains a term")]
    Like(LikeArgs),
    #[command(about = "Display the most recently accessed bookmarks")]
    Recent(RecentArgs),
    #[command(about = "Review bookmarks one by one and delete the unwanted ones")]
    Edit,
    #[command(about = "Remove bookmarks pointing to nonexistent directories")]
    Clean,
    #[command(about = "Print the `flipto` shell function")]
    Shell,
}

#[derive(Debug, Args)]
struct NameArgs {
    name: Option<String>,
}

#[derive(Debug, Args)]
struct LikeArgs {
    term: Option<String>,
}

#[derive(Debug, Args)]
struct RecentArgs {
    #[arg(value_name = "N", help = "How many bookmarks to show")]
    limit: Option<usize>,
}

fn main() -> ExitCode {
    init_logging();
    let status = run();
    ExitCode::from(status.exit_code())
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("DOGEAR_LOG", "warn"))
        .format_timestamp(None)
        .init();
}

fn run() -> Status {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return match error.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => Status::Success,
                _ => Status::UsageError,
            };
        }
    };

    let mut console = StdConsole;
    let Some(command) = cli.command else {
        let mut command = Cli::command();
        let _ = command.print_help();
        println!();
        return Status::Success;
    };
    if matches!(command, Commands::Shell) {
        console.say(SHELL_SNIPPET);
        return Status::Success;
    }

    let overrides = PathOverrides {
        store: cli.store,
        config: cli.config,
    };
    let result = resolve(&overrides).and_then(|(context, runtime)| {
        if cli.diagnostics {
            console.warn(&format!("[diagnostics]\n{}", runtime.diagnostics()));
        }
        dispatch(command, &context, &runtime, &mut console)
    });
    conclude(result, &mut console)
}

fn resolve(overrides: &PathOverrides) -> Result<(ResolutionContext, ResolvedRuntime)> {
    let context = ResolutionContext::from_process();

    let (config_path, _) = resolve_config_path(&context, overrides)?;
    if let Some(env_path) = config_path.and_then(|path| path.parent().map(|dir| dir.join(".env")))
        && env_path.exists()
    {
        debug!("loading environment from {}", env_path.display());
        let _ = dotenvy::from_path(&env_path);
    }

    let runtime = resolve_runtime(&context, overrides)?;
    Ok((context, runtime))
}

fn dispatch(
    command: Commands,
    context: &ResolutionContext,
    runtime: &ResolvedRuntime,
    console: &mut StdConsole,
) -> Result<Status> {
    let file = runtime.bookmark_file();
    debug!("using bookmark store {}", file.path().display());

    match command {
        Commands::Fold(NameArgs { name }) => {
            let current_dir = current_directory(context)?;
            commands::fold(&file, name.as_deref().unwrap_or_default(), &current_dir, console)
        }
        Commands::Unfold => {
            let current_dir = current_directory(context)?;
            commands::unfold(&file, &current_dir, console)
        }
        Commands::Find(NameArgs { name }) => {
            commands::find(&file, name.as_deref().unwrap_or_default(), console)
        }
        Commands::Like(LikeArgs { term }) => commands::like(&file, term.as_deref(), console),
        Commands::Recent(RecentArgs { limit }) => {
            commands::recent(&file, limit.unwrap_or(runtime.recent_limit), console)
        }
        Commands::Edit => commands::edit(&file, console),
        Commands::Clean => commands::clean(&file, console),
        Commands::Shell => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Commands};

    #[test]
    fn parses_fold_with_global_store_flag() {
        let cli = Cli::try_parse_from(["dogear", "fold", "proj", "--store", "/tmp/store"])
            .expect("parse");
        assert_eq!(cli.store.as_deref(), Some(std::path::Path::new("/tmp/store")));
        match cli.command {
            Some(Commands::Fold(args)) => assert_eq!(args.name.as_deref(), Some("proj")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn recent_accepts_optional_count() {
        let cli = Cli::try_parse_from(["dogear", "recent", "3"]).expect("parse");
        match cli.command {
            Some(Commands::Recent(args)) => assert_eq!(args.limit, Some(3)),
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["dogear", "recent", "many"]).is_err());
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["dogear", "flip"]).is_err());
    }

    #[test]
    fn command_surface_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
