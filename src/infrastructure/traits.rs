//! I/O boundary traits for testability
//!
//! The gist service never spawns processes itself; it goes through
//! [`CommandRunner`], so tests can script `gh` responses.

use std::io;
use std::path::Path;
use std::process::Output;

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a command with arguments.
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output>;

    /// Run a command with arguments, feeding `stdin` to the child.
    fn run_with_stdin(&self, cmd: &str, args: &[&str], stdin: &str) -> io::Result<Output>;

    /// Run a command with `dir` as the child's working directory.
    fn run_in_dir(&self, dir: &Path, cmd: &str, args: &[&str]) -> io::Result<Output>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        std::process::Command::new(cmd).args(args).output()
    }

    fn run_with_stdin(&self, cmd: &str, args: &[&str], stdin: &str) -> io::Result<Output> {
        use std::io::Write;
        use std::process::Stdio;

        let mut child = std::process::Command::new(cmd)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        let child_stdin = child.stdin.take();

        // stdin is fed from its own thread while stdout/stderr drain, so a
        // child that writes before it finished reading cannot block on a full pipe
        std::thread::scope(|scope| {
            let writer = scope.spawn(move || -> io::Result<()> {
                if let Some(mut pipe) = child_stdin {
                    pipe.write_all(stdin.as_bytes())?;
                }
                Ok(())
            });

            let output = child.wait_with_output()?;
            match writer.join() {
                Ok(Ok(())) => {}
                // child exited without reading all of its input
                Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => return Err(e),
                Err(_) => return Err(io::Error::other("stdin writer thread panicked")),
            }
            Ok(output)
        })
    }

    fn run_in_dir(&self, dir: &Path, cmd: &str, args: &[&str]) -> io::Result<Output> {
        std::process::Command::new(cmd)
            .args(args)
            .current_dir(dir)
            .output()
    }
}
