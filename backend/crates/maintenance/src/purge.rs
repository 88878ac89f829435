//! Migration Artifact Purge
//!
//! Walks the artifacts directory of every module living directly under
//! the base directory. At each directory level the files are listed and
//! the operator must answer exactly `yes` before that batch is removed;
//! any other answer aborts the whole run. Batches confirmed earlier stay
//! deleted. Directories themselves are left in place.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::{PurgeError, PurgeResult};

pub const DEFAULT_ARTIFACTS_DIR: &str = "migrations";
pub const DEFAULT_KEEP: &str = "mod.rs";

pub const WARNING: &str = "These files and directories will be permanently deleted!";
pub const PROMPT: &str = "Type 'yes' to continue, or 'no' to cancel: ";

#[derive(Debug, Clone)]
pub struct PurgeOptions {
    pub base_dir: PathBuf,
    /// Explicit module directories; empty means every module under
    /// `base_dir` that has an artifacts directory
    pub modules: Vec<PathBuf>,
    pub artifacts_dir: String,
    /// Initializer file kept in each artifacts directory
    pub keep: String,
}

impl PurgeOptions {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            modules: Vec::new(),
            artifacts_dir: DEFAULT_ARTIFACTS_DIR.to_string(),
            keep: DEFAULT_KEEP.to_string(),
        }
    }
}

/// Files removed by a completed run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub deleted: Vec<PathBuf>,
}

pub struct PurgeCommand<I, O> {
    input: I,
    output: O,
    options: PurgeOptions,
    deleted: Vec<PathBuf>,
}

impl<I, O> PurgeCommand<I, O>
where
    I: BufRead,
    O: Write,
{
    pub fn new(input: I, output: O, options: PurgeOptions) -> Self {
        Self {
            input,
            output,
            options,
            deleted: Vec::new(),
        }
    }

    pub fn run(mut self) -> PurgeResult<PurgeReport> {
        for module in self.modules()? {
            let artifacts = module.join(&self.options.artifacts_dir);
            if !artifacts.is_dir() {
                tracing::debug!(module = %module.display(), "No artifacts directory");
                continue;
            }

            let (files, dirs) = self.entries(&artifacts, Some(self.options.keep.as_str()))?;
            self.purge_level(files, dirs)?;
        }

        tracing::info!(count = self.deleted.len(), "Migration files flushed");
        Ok(PurgeReport {
            deleted: self.deleted,
        })
    }

    /// Modules whose parent is the base directory, sorted
    fn modules(&self) -> PurgeResult<Vec<PathBuf>> {
        let base = &self.options.base_dir;

        let mut modules = if self.options.modules.is_empty() {
            let mut found = Vec::new();
            for entry in fs::read_dir(base).map_err(|e| PurgeError::io(base, e))? {
                let path = entry.map_err(|e| PurgeError::io(base, e))?.path();
                if path.join(&self.options.artifacts_dir).is_dir() {
                    found.push(path);
                }
            }
            found
        } else {
            self.options
                .modules
                .iter()
                .map(|m| if m.is_relative() { base.join(m) } else { m.clone() })
                .filter(|m| {
                    let local = m.parent() == Some(base.as_path());
                    if !local {
                        tracing::warn!(module = %m.display(), "Module outside the base directory");
                    }
                    local
                })
                .collect()
        };

        modules.sort();
        modules.dedup();
        Ok(modules)
    }

    /// Files and subdirectories of `dir`, each sorted
    fn entries(&self, dir: &Path, keep: Option<&str>) -> PurgeResult<(Vec<PathBuf>, Vec<PathBuf>)> {
        let mut files = Vec::new();
        let mut dirs = Vec::new();

        for entry in fs::read_dir(dir).map_err(|e| PurgeError::io(dir, e))? {
            let path = entry.map_err(|e| PurgeError::io(dir, e))?.path();
            if keep.is_some_and(|k| path.file_name().is_some_and(|n| n == k)) {
                continue;
            }
            if path.is_dir() {
                dirs.push(path);
            } else {
                files.push(path);
            }
        }

        files.sort();
        dirs.sort();
        Ok((files, dirs))
    }

    /// Files first, then each subdirectory as its own level
    fn purge_level(&mut self, files: Vec<PathBuf>, dirs: Vec<PathBuf>) -> PurgeResult<()> {
        if !files.is_empty() {
            self.confirm(&files)?;
            for file in files {
                fs::remove_file(&file).map_err(|e| PurgeError::io(&file, e))?;
                tracing::debug!(path = %file.display(), "Deleted");
                self.deleted.push(file);
            }
        }

        for dir in dirs {
            let (files, subdirs) = self.entries(&dir, None)?;
            self.purge_level(files, subdirs)?;
        }
        Ok(())
    }

    fn confirm(&mut self, files: &[PathBuf]) -> PurgeResult<()> {
        for file in files {
            writeln!(self.output, "{}", file.display())?;
        }
        write!(self.output, "\n{WARNING}\n\n{PROMPT}")?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        let answer = answer
            .strip_suffix('\n')
            .map(|a| a.strip_suffix('\r').unwrap_or(a))
            .unwrap_or(&answer);

        if answer == "yes" {
            Ok(())
        } else {
            tracing::warn!(answer, "Purge refused by operator");
            Err(PurgeError::Cancelled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"-- generated\n").unwrap();
    }

    /// accounts/ and diary/ with two artifacts each, plus a nested level
    fn project() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        for module in ["accounts", "diary"] {
            touch(&base.join(module).join("migrations").join("mod.rs"));
            touch(&base.join(module).join("migrations").join("0001_initial.sql"));
            touch(&base.join(module).join("migrations").join("0002_auto.sql"));
        }
        touch(&base.join("diary/migrations/archive/0000_legacy.sql"));
        touch(&base.join("docs/readme.md"));
        dir
    }

    fn run(base: &Path, answers: &str) -> (PurgeResult<PurgeReport>, String) {
        let mut output = Vec::new();
        let result = PurgeCommand::new(
            Cursor::new(answers.as_bytes().to_vec()),
            &mut output,
            PurgeOptions::new(base),
        )
        .run();
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_refusal_at_first_prompt_deletes_nothing() {
        let dir = project();
        let base = dir.path();

        let (result, output) = run(base, "no\n");
        assert!(matches!(result, Err(PurgeError::Cancelled)));
        assert!(output.contains("0001_initial.sql\n"));
        assert!(output.ends_with(PROMPT));
        assert!(base.join("accounts/migrations/0001_initial.sql").exists());
        assert!(base.join("accounts/migrations/0002_auto.sql").exists());
    }

    #[test]
    fn test_confirmed_levels_delete_files_and_keep_initializer() {
        let dir = project();
        let base = dir.path();

        // accounts top level, diary top level, diary/archive
        let (result, output) = run(base, "yes\nyes\r\nyes\n");
        let report = result.unwrap();
        assert_eq!(report.deleted.len(), 5);
        assert_eq!(output.matches(PROMPT).count(), 3);

        assert!(base.join("accounts/migrations/mod.rs").exists());
        assert!(base.join("diary/migrations/mod.rs").exists());
        assert!(!base.join("diary/migrations/0002_auto.sql").exists());
        assert!(base.join("diary/migrations/archive").is_dir());
        assert!(!base.join("diary/migrations/archive/0000_legacy.sql").exists());
        assert!(base.join("docs/readme.md").exists());
    }

    #[test]
    fn test_earlier_batches_stay_deleted() {
        let dir = project();
        let base = dir.path();

        let (result, _) = run(base, "yes\nYes\n");
        assert!(matches!(result, Err(PurgeError::Cancelled)));
        assert!(!base.join("accounts/migrations/0001_initial.sql").exists());
        assert!(base.join("diary/migrations/0001_initial.sql").exists());
    }

    #[test]
    fn test_end_of_input_cancels() {
        let dir = project();
        let (result, _) = run(dir.path(), "");
        assert!(matches!(result, Err(PurgeError::Cancelled)));
    }

    #[test]
    fn test_only_local_modules_processed() {
        let dir = project();
        let base = dir.path();
        let outside = tempfile::tempdir().unwrap();
        touch(&outside.path().join("vendor/migrations/0001.sql"));

        let mut options = PurgeOptions::new(base);
        options.modules = vec![PathBuf::from("diary"), outside.path().join("vendor")];
        let report = PurgeCommand::new(Cursor::new(b"yes\nyes\n".to_vec()), Vec::new(), options)
            .run()
            .unwrap();

        assert_eq!(report.deleted.len(), 3);
        assert!(outside.path().join("vendor/migrations/0001.sql").exists());
        assert!(base.join("accounts/migrations/0001_initial.sql").exists());
    }
}
