//! Gist service
//!
//! Every operation assembles a `gh` argument vector, runs it through the
//! [`CommandRunner`] and decodes the captured stdout. The captured streams of
//! the last invocation stay available via [`GistService::captured`].

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;
use url::Url;

use crate::annotated;
use crate::application::annotate::{Annotate, AnnotatedError};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    gist_id_from_url, parse_gist_list, sample_comment, sanitize_gist_id, Comment, DomainError,
    Gist, GistInfo, SAMPLE_GIST_ID,
};
use crate::infrastructure::traits::CommandRunner;
use crate::infrastructure::InfraError;

/// Prefix `gh repo sync` prints on success (TTY only).
pub const SYNC_SUCCESS_PREFIX: &str = "✓ Synced";

const STARGAZER_TEMPLATE: &str = "{{.data.viewer.gist.stargazerCount}}";
const COMMENTS_JQ: &str = "[.data.viewer.gist.comments.edges[].node]";

/// Arguments for [`GistService::create`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateArgs {
    /// Gist description
    pub description: String,
    /// Files to upload; `-` reads from `stdin`
    pub file_paths: Vec<PathBuf>,
    /// Create as public gist (secret otherwise)
    pub as_public: bool,
    /// Filename used for content read from stdin
    pub filename: Option<String>,
    /// Content fed to `gh` on stdin
    pub stdin: Option<String>,
}

/// Arguments for [`GistService::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListArgs {
    /// Maximum number of gists to fetch; `None`/0 keeps gh's default
    pub limit: Option<u32>,
    /// Show only public gists
    pub only_public: bool,
    /// Show only secret gists; wins over `only_public`
    pub only_secret: bool,
}

/// Arguments for [`GistService::clone`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneArgs {
    /// Gist ID or URL
    pub gist: String,
    /// Target directory (gh picks `<id>` in cwd if unset)
    pub directory: Option<PathBuf>,
    /// Extra flags passed to `git clone`
    pub git_flags: Vec<String>,
}

/// Arguments for [`GistService::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateArgs {
    /// Path to the local repository to sync
    pub path_dir_repo: PathBuf,
    /// Sync a specific branch
    pub branch: Option<String>,
    /// Sync this remote repository instead of the local one
    pub destination: Option<String>,
    /// Sync from this source repository instead of the parent
    pub source: Option<String>,
    /// Hard reset instead of fast-forward
    pub force: bool,
}

impl UpdateArgs {
    pub fn new(path_dir_repo: impl Into<PathBuf>) -> Self {
        Self {
            path_dir_repo: path_dir_repo.into(),
            ..Self::default()
        }
    }
}

/// Streams captured from the last `gh` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedIo {
    pub stdin: String,
    pub stdout: String,
    pub stderr: String,
}

/// Gist management on top of the `gh` CLI.
pub struct GistService {
    cmd: Arc<dyn CommandRunner>,
    settings: Arc<Settings>,
    io: Mutex<CapturedIo>,
}

impl GistService {
    /// Create a new gist service.
    pub fn new(cmd: Arc<dyn CommandRunner>, settings: Arc<Settings>) -> Self {
        Self {
            cmd,
            settings,
            io: Mutex::new(CapturedIo::default()),
        }
    }

    /// Streams of the last `gh` invocation.
    pub fn captured(&self) -> CapturedIo {
        self.io
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn stdout(&self) -> String {
        self.captured().stdout
    }

    pub fn stderr(&self) -> String {
        self.captured().stderr
    }

    fn reset_io(&self) {
        *self.io.lock().unwrap_or_else(PoisonError::into_inner) = CapturedIo::default();
    }

    /// Create a gist and return its URL.
    pub fn create(&self, args: &CreateArgs) -> ApplicationResult<Url> {
        self.reset_io();
        let mut argv = vec!["gist".to_string(), "create".to_string()];
        if args.as_public {
            argv.push("--public".into());
        }
        if !args.description.is_empty() {
            argv.push(format!("--desc={}", args.description));
        }
        if let Some(filename) = &args.filename {
            argv.push(format!("--filename={filename}"));
        }
        argv.extend(
            args.file_paths
                .iter()
                .map(|p| p.to_string_lossy().into_owned()),
        );

        let stdout = self
            .gh(&argv, None, args.stdin.as_deref())
            .wrap_err("failed to create gist")?;

        let url = Url::parse(stdout.trim()).wrap_err("failed to parse gist URL")?;
        debug!("create: url={}", url);
        Ok(url)
    }

    /// List gists of the authenticated user.
    pub fn list(&self, args: &ListArgs) -> ApplicationResult<Vec<GistInfo>> {
        self.reset_io();
        let mut argv = vec!["gist".to_string(), "list".to_string()];
        if let Some(limit) = args.limit.filter(|l| *l > 0) {
            argv.push(format!("--limit={limit}"));
        }
        if args.only_secret {
            argv.push("--secret".into());
        } else if args.only_public {
            argv.push("--public".into());
        }

        let stdout = self
            .gh(&argv, None, None)
            .wrap_err("failed to execute 'gist list' command")?;

        let gists = parse_gist_list(&stdout).wrap_err("failed to parse 'gist list' output")?;
        debug!("list: {} gists", gists.len());
        Ok(gists)
    }

    /// Fetch a gist (ID or URL) including file contents.
    pub fn read(&self, gist: &str) -> ApplicationResult<Gist> {
        self.reset_io();
        let gist_id = gist_id_from_url(gist).wrap_err("failed to parse gist ID from URL")?;
        let argv = vec!["api".to_string(), format!("gists/{gist_id}")];

        let stdout = self
            .gh(&argv, None, None)
            .wrap_err("failed to read gist")?;

        let gist: Gist =
            serde_json::from_str(&stdout).wrap_err("failed to decode gist response")?;
        debug!("read: id={} files={}", gist.id, gist.files.len());
        Ok(gist)
    }

    /// Content of a single file of a gist.
    pub fn read_file(&self, gist: &str, file: &str) -> ApplicationResult<Vec<u8>> {
        let info = self.read(gist).wrap_err("failed to read gist info")?;

        match info.files.get(file) {
            Some(gist_file) => Ok(gist_file.content.clone().into_bytes()),
            None => Err(AnnotatedError::wrap(
                ApplicationError::FileNotFound {
                    gist: gist.to_string(),
                    file: file.to_string(),
                },
                "file not found",
            )
            .into()),
        }
    }

    /// Delete a gist (ID or URL).
    pub fn delete(&self, gist: &str) -> ApplicationResult<()> {
        self.reset_io();
        let argv = vec![
            "gist".to_string(),
            "delete".to_string(),
            gist.to_string(),
            "--yes".to_string(),
        ];

        self.gh(&argv, None, None)
            .wrap_err("failed to delete gist")?;
        Ok(())
    }

    /// Clone a gist repository.
    pub fn clone(&self, args: &CloneArgs) -> ApplicationResult<()> {
        self.reset_io();
        let mut argv = vec!["gist".to_string(), "clone".to_string(), args.gist.clone()];
        if let Some(dir) = &args.directory {
            argv.push(dir.to_string_lossy().into_owned());
        }
        if !args.git_flags.is_empty() {
            argv.push("--".into());
            argv.extend(args.git_flags.iter().cloned());
        }

        self.gh(&argv, None, None)
            .wrap_err("failed to execute gist clone")?;
        Ok(())
    }

    /// Sync a cloned gist repository with its remote.
    ///
    /// `gh` runs with `path_dir_repo` as working directory; the process-wide
    /// cwd is left alone.
    pub fn update(&self, args: &UpdateArgs) -> ApplicationResult<String> {
        self.reset_io();
        if args.path_dir_repo.as_os_str().is_empty() {
            return Err(AnnotatedError::msg("path to local repository is required").into());
        }
        if !args.path_dir_repo.is_dir() {
            let err = InfraError::io(
                format!("{} is not a directory", args.path_dir_repo.display()),
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            );
            return Err(AnnotatedError::wrap(
                err,
                format!(
                    "failed to change working directory to {}",
                    args.path_dir_repo.display()
                ),
            )
            .into());
        }

        let mut argv = vec!["repo".to_string(), "sync".to_string()];
        if let Some(branch) = &args.branch {
            argv.push(format!("--branch={branch}"));
        }
        if let Some(destination) = &args.destination {
            argv.push(destination.clone());
        }
        if let Some(source) = &args.source {
            argv.push(format!("--source={source}"));
        }
        if args.force {
            argv.push("--force".into());
        }

        let stdout = self
            .gh(&argv, Some(&args.path_dir_repo), None)
            .wrap_err("failed to execute update/sync command")?;

        if !stdout.trim().is_empty() && !stdout.starts_with(SYNC_SUCCESS_PREFIX) {
            return Err(annotated!("failed to sync gist. Output: '{}'", stdout).into());
        }
        Ok(stdout)
    }

    /// Most recent comments of one of the viewer's gists.
    pub fn comments(&self, gist_id: &str) -> ApplicationResult<Vec<Comment>> {
        self.reset_io();
        if gist_id == SAMPLE_GIST_ID {
            return Ok(vec![sample_comment()]);
        }

        let sanitized = sanitize_gist_id(gist_id);
        if sanitized.trim().is_empty() {
            return Err(AnnotatedError::wrap(
                DomainError::InvalidGistId(gist_id.to_string()),
                "invalid gist ID",
            )
            .into());
        }

        let query = comments_query(&sanitized, self.settings.comment_window());
        let argv = vec![
            "api".to_string(),
            "graphql".to_string(),
            "-f".to_string(),
            format!("query={query}"),
            "--jq".to_string(),
            COMMENTS_JQ.to_string(),
        ];

        let stdout = self
            .gh(&argv, None, None)
            .wrap_err("failed to execute GitHub API request")?;

        let comments: Vec<Comment> = serde_json::from_str(&stdout)
            .wrap_err("failed to parse GitHub API response. malformed JSON")?;
        debug!("comments: {} comments", comments.len());
        Ok(comments)
    }

    /// Number of stars of one of the viewer's gists.
    pub fn stargazer(&self, gist_id: &str) -> ApplicationResult<u64> {
        self.reset_io();
        let query = format!(
            "query {{ viewer {{ gist (name: \"{}\" ) {{ name, stargazerCount }} }} }}",
            sanitize_gist_id(gist_id)
        );
        let argv = vec![
            "api".to_string(),
            "graphql".to_string(),
            "-f".to_string(),
            format!("query={query}"),
            format!("--template={STARGAZER_TEMPLATE}"),
        ];

        let stdout = self
            .gh(&argv, None, None)
            .wrap_err("failed to execute GitHub API request")?;

        let count = stdout
            .trim()
            .trim_matches('\'')
            .parse::<u64>()
            .wrap_err_with(|| format!("failed to parse GitHub API response.\nAPI response={stdout:?}"))?;
        Ok(count)
    }

    /// Run `gh` and return its stdout; non-zero exit becomes [`InfraError::Gh`].
    fn gh(
        &self,
        args: &[String],
        dir: Option<&Path>,
        stdin: Option<&str>,
    ) -> Result<String, AnnotatedError> {
        let gh = self.settings.gh_command.as_str();
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        debug!("gh: {} {:?} dir={:?}", gh, argv, dir);

        let result = match (dir, stdin) {
            (Some(dir), _) => self.cmd.run_in_dir(dir, gh, &argv),
            (None, Some(input)) => self.cmd.run_with_stdin(gh, &argv, input),
            (None, None) => self.cmd.run(gh, &argv),
        };
        let output = result
            .map_err(|e| InfraError::io(format!("spawn {gh}"), e))
            .wrap_err_with(|| format!("failed to run {gh}"))?;

        let captured = CapturedIo {
            stdin: stdin.unwrap_or_default().to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        *self.io.lock().unwrap_or_else(PoisonError::into_inner) = captured.clone();

        if !output.status.success() {
            debug!("gh: failed status={:?} stderr={}", output.status.code(), captured.stderr);
            return Err(InfraError::Gh {
                message: captured.stderr.trim().to_string(),
                exit_code: output.status.code(),
            })
            .annotate();
        }
        Ok(captured.stdout)
    }
}

fn comments_query(gist_id: &str, last: u32) -> String {
    format!(
        r#"{{
	viewer {{
		gist(name: "{gist_id}") {{
			comments(last: {last}) {{
				edges {{
					node {{
						id
						authorAssociation
						author {{
							avatarUrl
							login
						}}
						createdAt
						publishedAt
						lastEditedAt
						body
						bodyHTML
						bodyText
						isMinimized
						minimizedReason
					}}
				}}
			}}
		}}
	}}
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_query_embeds_id_and_window() {
        let query = comments_query("abc123", 25);
        assert!(query.contains(r#"gist(name: "abc123")"#));
        assert!(query.contains("comments(last: 25)"));
        assert!(query.starts_with('{'));
        assert!(query.ends_with('}'));
    }

    #[test]
    fn test_update_args_new_defaults() {
        let args = UpdateArgs::new("/tmp/repo");
        assert_eq!(args.path_dir_repo, PathBuf::from("/tmp/repo"));
        assert!(args.branch.is_none());
        assert!(!args.force);
    }
}
