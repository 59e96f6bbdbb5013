//! Git-backed publish client invoked as a child process
//!
//! The sequence is stage → commit → push against a fixed remote and branch.
//! Only the listed files are ever staged. Each step captures the child
//! process output; a failing step aborts the remaining steps and the captured
//! output is carried back to the caller in a typed result. Publish failures
//! are never fatal to a reconciliation run.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::debug;

/// Step of the publish sequence that was executing when a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStep {
    Stage,
    Commit,
    Push,
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stage => write!(f, "stage"),
            Self::Commit => write!(f, "commit"),
            Self::Push => write!(f, "push"),
        }
    }
}

/// Typed result of a publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Files were staged, committed and pushed.
    Committed,
    /// Nothing was staged; commit and push were skipped.
    NoOp,
    /// A step failed; later steps were not attempted.
    Failed {
        step: PublishStep,
        output: String,
    },
}

impl PublishOutcome {
    /// Whether the attempt changed the published history.
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }
}

/// Stages, commits and pushes changed artifact files.
pub trait PublishClient {
    /// Publish the listed files with the given commit message.
    fn publish(&self, files: &[PathBuf], message: &str) -> PublishOutcome;
}

/// Publishes by shelling out to `git` against a fixed remote and branch.
///
/// The exit code of each sub-command determines success; stdout and stderr
/// are captured for diagnostics.
#[derive(Debug, Clone)]
pub struct GitPublisher {
    repo_root: PathBuf,
    remote: String,
    branch: String,
}

impl GitPublisher {
    pub fn new(
        repo_root: impl Into<PathBuf>,
        remote: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            repo_root: repo_root.into(),
            remote: remote.into(),
            branch: branch.into(),
        }
    }

    fn git(&self, args: &[&str]) -> std::io::Result<Output> {
        Command::new("git")
            .args(args)
            .current_dir(&self.repo_root)
            .output()
    }

    /// Run one git step, returning the failure outcome if it did not succeed.
    fn step(&self, step: PublishStep, args: &[&str]) -> Option<PublishOutcome> {
        match self.git(args) {
            Ok(output) if output.status.success() => {
                debug!(%step, "git step succeeded");
                None
            }
            Ok(output) => Some(PublishOutcome::Failed {
                step,
                output: combined_output(&output),
            }),
            Err(e) => Some(PublishOutcome::Failed {
                step,
                output: format!("failed to invoke git: {e}"),
            }),
        }
    }
}

impl PublishClient for GitPublisher {
    fn publish(&self, files: &[PathBuf], message: &str) -> PublishOutcome {
        if files.is_empty() {
            return PublishOutcome::NoOp;
        }

        // Stage only the listed files, never a blanket stage-all.
        let mut stage_args = vec!["add".to_string(), "--".to_string()];
        stage_args.extend(
            files
                .iter()
                .map(|f| resolve_for_staging(f).display().to_string()),
        );
        let stage_refs: Vec<&str> = stage_args.iter().map(String::as_str).collect();
        if let Some(failed) = self.step(PublishStep::Stage, &stage_refs) {
            return failed;
        }

        // An empty staged diff means there is nothing to commit.
        match self.git(&["diff", "--cached", "--quiet"]) {
            Ok(output) if output.status.success() => {
                debug!("no staged changes, skipping commit and push");
                return PublishOutcome::NoOp;
            }
            Ok(_) => {}
            Err(e) => {
                return PublishOutcome::Failed {
                    step: PublishStep::Stage,
                    output: format!("failed to invoke git: {e}"),
                };
            }
        }

        if let Some(failed) = self.step(PublishStep::Commit, &["commit", "-m", message]) {
            return failed;
        }
        if let Some(failed) = self.step(PublishStep::Push, &["push", &self.remote, &self.branch]) {
            return failed;
        }

        PublishOutcome::Committed
    }
}

/// File paths arrive relative to the invoking process, while git runs inside
/// the repository root. Staging absolute paths keeps the two frames
/// consistent. A path that cannot be resolved is passed through unchanged so
/// the failing git step reports it.
fn resolve_for_staging(file: &Path) -> PathBuf {
    fs::canonicalize(file).unwrap_or_else(|_| file.to_path_buf())
}

fn combined_output(output: &Output) -> String {
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    if !combined.is_empty() && !output.stderr.is_empty() {
        combined.push('\n');
    }
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn run_git(dir: &Path, args: &[&str]) {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap_or_else(|e| panic!("failed to run git {args:?}: {e}"));
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    /// Work repo with one commit, pushing to a sibling bare repo named `origin`.
    fn repo_with_bare_remote(temp: &TempDir) -> PathBuf {
        let bare = temp.path().join("remote.git");
        fs::create_dir_all(&bare).unwrap();
        run_git(&bare, &["init", "--bare", "--initial-branch=main", "."]);

        let work = temp.path().join("work");
        fs::create_dir_all(&work).unwrap();
        run_git(&work, &["init", "--initial-branch=main", "."]);
        run_git(&work, &["config", "user.email", "test@example.com"]);
        run_git(&work, &["config", "user.name", "Test"]);
        run_git(&work, &["config", "commit.gpgsign", "false"]);
        run_git(&work, &["remote", "add", "origin", bare.to_str().unwrap()]);

        fs::write(work.join("README.md"), "seed\n").unwrap();
        run_git(&work, &["add", "README.md"]);
        run_git(&work, &["commit", "-m", "initial"]);
        run_git(&work, &["push", "origin", "main"]);

        work
    }

    #[test]
    fn publish_commits_and_pushes_changed_file() {
        let temp = TempDir::new().unwrap();
        let work = repo_with_bare_remote(&temp);

        fs::write(work.join("data.json"), "{\"a\": 1}\n").unwrap();
        let publisher = GitPublisher::new(&work, "origin", "main");

        let outcome = publisher.publish(&[work.join("data.json")], "Update data");
        assert_eq!(outcome, PublishOutcome::Committed);

        // The commit must exist on the remote branch.
        let output = Command::new("git")
            .args(["log", "--oneline", "origin/main"])
            .current_dir(&work)
            .output()
            .unwrap();
        let log = String::from_utf8_lossy(&output.stdout).into_owned();
        assert!(log.contains("Update data"), "log was: {log}");
    }

    #[test]
    fn publish_is_noop_when_file_unchanged() {
        let temp = TempDir::new().unwrap();
        let work = repo_with_bare_remote(&temp);

        let publisher = GitPublisher::new(&work, "origin", "main");
        let outcome = publisher.publish(&[work.join("README.md")], "No change");
        assert_eq!(outcome, PublishOutcome::NoOp);
    }

    #[test]
    fn publish_is_noop_for_empty_file_list() {
        let temp = TempDir::new().unwrap();
        let publisher = GitPublisher::new(temp.path(), "origin", "main");
        assert_eq!(publisher.publish(&[], "Nothing"), PublishOutcome::NoOp);
    }

    #[test]
    fn publish_fails_at_push_for_missing_remote() {
        let temp = TempDir::new().unwrap();
        let work = temp.path().join("work");
        fs::create_dir_all(&work).unwrap();
        run_git(&work, &["init", "--initial-branch=main", "."]);
        run_git(&work, &["config", "user.email", "test@example.com"]);
        run_git(&work, &["config", "user.name", "Test"]);
        run_git(&work, &["config", "commit.gpgsign", "false"]);

        fs::write(work.join("data.json"), "{}\n").unwrap();
        let publisher = GitPublisher::new(&work, "origin", "main");

        match publisher.publish(&[work.join("data.json")], "Update data") {
            PublishOutcome::Failed { step, output } => {
                assert_eq!(step, PublishStep::Push);
                assert!(!output.is_empty(), "captured output should not be empty");
            }
            other => panic!("expected push failure, got {other:?}"),
        }
    }

    #[test]
    fn publish_fails_at_stage_outside_a_repository() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("data.json"), "{}\n").unwrap();
        let publisher = GitPublisher::new(temp.path(), "origin", "main");

        match publisher.publish(&[temp.path().join("data.json")], "Update data") {
            PublishOutcome::Failed { step, .. } => assert_eq!(step, PublishStep::Stage),
            other => panic!("expected stage failure, got {other:?}"),
        }
    }

    #[test]
    fn staged_paths_resolve_to_the_invoking_process_frame() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("nested").join("data.json");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, "{}\n").unwrap();

        let resolved = resolve_for_staging(&file);
        assert!(resolved.is_absolute());
        assert_eq!(resolved, fs::canonicalize(&file).unwrap());

        // Unresolvable paths pass through so the git step reports them.
        let missing = Path::new("no/such/file.json");
        assert_eq!(resolve_for_staging(missing), missing.to_path_buf());
    }

    #[test]
    fn publish_commits_a_file_referenced_from_outside_the_repository_root() {
        let temp = TempDir::new().unwrap();
        let work = repo_with_bare_remote(&temp);

        // Absolute path, as handed over by a caller whose working directory
        // is not the repository root.
        let file = work.join("data").join("kits.json");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, "{\"home\": {}}\n").unwrap();

        let publisher = GitPublisher::new(&work, "origin", "main");
        let outcome = publisher.publish(&[file], "Sync kits");
        assert_eq!(outcome, PublishOutcome::Committed);
    }

    #[test]
    fn publish_step_display_names() {
        assert_eq!(PublishStep::Stage.to_string(), "stage");
        assert_eq!(PublishStep::Commit.to_string(), "commit");
        assert_eq!(PublishStep::Push.to_string(), "push");
    }
}
