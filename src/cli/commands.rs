//! Command dispatch: maps parsed CLI arguments onto the gist service

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::annotate::set_position_annotation;
use crate::application::services::{CloneArgs, CreateArgs, ListArgs, UpdateArgs};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `gisty --help`".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    // init and path must work while the config file is missing or broken
    if let Commands::Config { command } = command {
        if !matches!(command, ConfigCommands::Show) {
            return config(command, None, cli.config.as_deref());
        }
    }

    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.no_annotate {
        settings.annotate_errors = false;
    }
    set_position_annotation(settings.annotate_errors);
    debug!("settings: {:?}", settings);

    if let Commands::Config { command } = command {
        return config(command, Some(&settings), cli.config.as_deref());
    }

    let container = ServiceContainer::new(settings);
    match command {
        Commands::Create {
            files,
            desc,
            public,
            filename,
        } => create(&container, files, desc.as_deref(), *public, filename.as_deref()),
        Commands::List {
            limit,
            public,
            secret,
        } => list(&container, *limit, *public, *secret, cli.json),
        Commands::Read { gist } => read(&container, gist, cli.json),
        Commands::Cat { gist, file } => cat(&container, gist, file),
        Commands::Delete { gist } => delete(&container, gist),
        Commands::Clone {
            gist,
            directory,
            git_flags,
        } => clone(&container, gist, directory.as_deref(), git_flags),
        Commands::Sync {
            repo,
            branch,
            destination,
            source,
            force,
        } => {
            let args = UpdateArgs {
                path_dir_repo: match repo {
                    Some(repo) => repo.clone(),
                    None => std::env::current_dir()
                        .map_err(|e| InfraError::io("get current directory", e))?,
                },
                branch: branch.clone(),
                destination: destination.clone(),
                source: source.clone(),
                force: *force,
            };
            sync(&container, &args)
        }
        Commands::Comments { gist_id } => comments(&container, gist_id, cli.json),
        Commands::Stars { gist_id } => stars(&container, gist_id),
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        CliError::from(ApplicationError::OperationFailed {
            context: "serialize JSON output".into(),
            source: Box::new(e),
        })
    })?;
    output::info(&json);
    Ok(())
}

#[instrument(skip(container))]
fn create(
    container: &ServiceContainer,
    files: &[PathBuf],
    desc: Option<&str>,
    public: bool,
    filename: Option<&str>,
) -> CliResult<()> {
    let stdin = if files.iter().any(|f| f.as_os_str() == "-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| InfraError::io("read stdin", e))?;
        Some(buf)
    } else {
        None
    };

    let args = CreateArgs {
        description: desc.unwrap_or_default().to_string(),
        file_paths: files.to_vec(),
        as_public: public,
        filename: filename.map(str::to_string),
        stdin,
    };
    let url = container.gists.create(&args)?;
    output::action("Created", &url);
    Ok(())
}

#[instrument(skip(container))]
fn list(
    container: &ServiceContainer,
    limit: Option<u32>,
    public: bool,
    secret: bool,
    json: bool,
) -> CliResult<()> {
    let args = ListArgs {
        limit: Some(limit.unwrap_or(container.settings.list_limit)),
        only_public: public,
        only_secret: secret,
    };
    let gists = container.gists.list(&args)?;

    if json {
        return print_json(&gists);
    }
    if gists.is_empty() {
        output::warning("no gists found");
    }
    for gist in &gists {
        output::info(&output::gist_row(gist));
    }
    Ok(())
}

#[instrument(skip(container))]
fn read(container: &ServiceContainer, gist: &str, json: bool) -> CliResult<()> {
    let gist = container.gists.read(gist)?;
    if json {
        return print_json(&gist);
    }
    output::print_gist(&gist);
    Ok(())
}

#[instrument(skip(container))]
fn cat(container: &ServiceContainer, gist: &str, file: &str) -> CliResult<()> {
    let content = container.gists.read_file(gist, file)?;
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&content)
        .and_then(|_| stdout.flush())
        .map_err(|e| InfraError::io("write stdout", e))?;
    Ok(())
}

#[instrument(skip(container))]
fn delete(container: &ServiceContainer, gist: &str) -> CliResult<()> {
    container.gists.delete(gist)?;
    output::success(&format!("Deleted gist {gist}"));
    Ok(())
}

#[instrument(skip(container))]
fn clone(
    container: &ServiceContainer,
    gist: &str,
    directory: Option<&Path>,
    git_flags: &[String],
) -> CliResult<()> {
    let directory = directory.map(Path::to_path_buf).or_else(|| {
        container
            .settings
            .clone_dir
            .as_ref()
            .and_then(|base| gist_dir_name(gist).map(|name| base.join(name)))
    });

    let args = CloneArgs {
        gist: gist.to_string(),
        directory,
        git_flags: git_flags.to_vec(),
    };
    container.gists.clone(&args)?;
    output::success(&format!("Cloned gist {gist}"));
    Ok(())
}

/// Directory name for a gist clone below `clone_dir`.
fn gist_dir_name(gist: &str) -> Option<String> {
    crate::domain::gist_id_from_url(gist).ok()
}

#[instrument(skip(container))]
fn sync(container: &ServiceContainer, args: &UpdateArgs) -> CliResult<()> {
    let message = container.gists.update(args)?;
    if message.trim().is_empty() {
        output::success(&format!("Synced {}", args.path_dir_repo.display()));
    } else {
        output::info(message.trim_end());
    }
    Ok(())
}

#[instrument(skip(container))]
fn comments(container: &ServiceContainer, gist_id: &str, json: bool) -> CliResult<()> {
    let comments = container.gists.comments(gist_id)?;
    if json {
        return print_json(&comments);
    }
    if comments.is_empty() {
        output::warning("no comments");
    }
    for comment in &comments {
        output::print_comment(comment);
    }
    Ok(())
}

#[instrument(skip(container))]
fn stars(container: &ServiceContainer, gist_id: &str) -> CliResult<()> {
    let count = container.gists.stargazer(gist_id)?;
    output::info(&count);
    Ok(())
}

#[instrument(skip(settings))]
fn config(
    command: &ConfigCommands,
    settings: Option<&Settings>,
    explicit: Option<&Path>,
) -> CliResult<()> {
    let path = explicit.map(Path::to_path_buf).or_else(global_config_path);

    match command {
        ConfigCommands::Show => {
            let settings = match settings {
                Some(settings) => settings.clone(),
                None => Settings::load(explicit)?,
            };
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => match path {
            Some(path) => output::info(&path.display()),
            None => return Err(CliError::Usage("cannot determine config directory".into())),
        },
        ConfigCommands::Init { force } => {
            let path = path.ok_or_else(|| CliError::Usage("cannot determine config directory".into()))?;
            if path.exists() && !force {
                return Err(CliError::InvalidArgs(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
        }
    }
    Ok(())
}
