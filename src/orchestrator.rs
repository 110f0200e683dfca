// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Runs every generator requested by a configuration document.
///
/// A run resolves and validates all invocations up front, purges stale paths,
/// then spawns one task per `(block, generator)` pair and waits for all of
/// them. Failures stay scoped to their invocation and end up in the
/// [`RunReport`].
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::{fs, task::JoinHandle};
use tracing::{debug, error, info, warn};

use crate::{
    config::{Config, GeneratorConfig},
    error::{self, Error},
    generator::Generator,
    registry::GeneratorRegistry,
};

/// Invocation that could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct InvocationFailure
{
    /// Name of the failing generator.
    pub generator: String,
    /// Position of the configuration block in `configs`.
    pub block:     usize,
    /// Display form of the error.
    pub reason:    String,
}

/// Summary of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize,)]
pub struct RunReport
{
    /// Number of invocations that were started.
    pub attempted: usize,
    /// Number of invocations that completed without error.
    pub succeeded: usize,
    /// Generator names that are not registered.
    pub skipped:   Vec<String,>,
    /// Invocations that failed.
    pub failed:    Vec<InvocationFailure,>,
}

impl std::fmt::Display for RunReport
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_,>,) -> std::fmt::Result
    {
        write!(
            f,
            "{} attempted, {} succeeded, {} skipped, {} failed",
            self.attempted,
            self.succeeded,
            self.skipped.len(),
            self.failed.len()
        )
    }
}

struct Invocation
{
    block:     usize,
    generator: Arc<Generator,>,
    config:    Arc<GeneratorConfig,>,
}

/// Drives generation runs against a shared [`GeneratorRegistry`].
#[derive(Debug, Clone,)]
pub struct Orchestrator
{
    registry: Arc<GeneratorRegistry,>,
    progress: bool,
}

impl Orchestrator
{
    pub fn new(registry: Arc<GeneratorRegistry,>,) -> Self
    {
        Self {
            registry, progress: false,
        }
    }

    /// Shows a progress bar while invocations complete.
    pub fn with_progress(mut self, progress: bool,) -> Self
    {
        self.progress = progress;
        self
    }

    /// Executes `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a block lacks a key one of its
    /// generators requires; nothing is purged or generated in that case.
    /// Returns [`Error::Io`] when the output directory cannot be created.
    /// Failures of individual generators are reported in the [`RunReport`]
    /// instead.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::{path::Path, sync::Arc};
    ///
    /// use static_api::{ArtifactWriter, GeneratorRegistry, GitHubApi, Orchestrator, load_config};
    ///
    /// # async fn example() -> Result<(), static_api::Error> {
    /// let config = load_config(Path::new("config.json",),)?;
    /// let registry = GeneratorRegistry::with_defaults(
    ///     Arc::new(GitHubApi::new(None,)?,),
    ///     Arc::new(ArtifactWriter::new(),),
    /// )?;
    /// let report = Orchestrator::new(Arc::new(registry,),).run(&config,).await?;
    /// println!("{report}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(&self, config: &Config,) -> Result<RunReport, Error,>
    {
        let mut report = RunReport::default();
        let invocations = self.resolve(config, &mut report,)?;

        purge(&config.purge,).await;

        fs::create_dir_all(&config.output,)
            .await
            .map_err(|source| error::io_error(&config.output, source,),)?;

        let progress = self.progress_bar(invocations.len(),);
        let handles: Vec<(&'static str, usize, JoinHandle<Result<(), Error,>,>,),> = invocations
            .into_iter()
            .map(|invocation| {
                let output = config.output.clone();
                let name = invocation.generator.name();
                debug!("Starting {} for block {}", name, invocation.block);
                let handle = tokio::spawn(async move {
                    invocation.generator.generate(&invocation.config, &output,).await
                },);
                (name, invocation.block, handle,)
            },)
            .collect();
        report.attempted = handles.len();

        for (name, block, handle,) in handles {
            match handle.await.map_err(Error::from,).and_then(|outcome| outcome,) {
                Ok((),) => {
                    info!("Generator {} finished for block {}", name, block);
                    report.succeeded += 1;
                }
                Err(failure,) => {
                    error!("Generator {} failed for block {}: {}", name, block, failure);
                    report.failed.push(InvocationFailure {
                        generator: name.to_owned(),
                        block,
                        reason: failure.to_display_string(),
                    },);
                }
            }
            progress.inc(1,);
        }

        progress.finish_and_clear();
        info!("Generation finished: {}", report);
        Ok(report,)
    }

    fn resolve(&self, config: &Config, report: &mut RunReport,) -> Result<Vec<Invocation,>, Error,>
    {
        let mut invocations = Vec::new();

        for (block, generator_config,) in config.configs.iter().enumerate() {
            let shared = Arc::new(generator_config.clone(),);
            for name in &generator_config.generators {
                let Some(generator,) = self.registry.get(name,) else {
                    warn!(
                        "Generator {} not found, skipping (known: {})",
                        name,
                        self.registry.names().join(", ")
                    );
                    report.skipped.push(name.clone(),);
                    continue;
                };

                generator.validate(&shared,).map_err(|error| match error {
                    Error::Config {
                        message,
                    } => Error::config(format!("block {block}: {message}"),),
                    other => other,
                },)?;

                invocations.push(Invocation {
                    block,
                    generator,
                    config: Arc::clone(&shared,),
                },);
            }
        }

        Ok(invocations,)
    }

    fn progress_bar(&self, len: usize,) -> ProgressBar
    {
        if !self.progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(len as u64,);
        if let Ok(style,) =
            ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] {bar:30} {pos}/{len}",)
        {
            bar.set_style(style,);
        }
        bar
    }
}

/// Deletes every path in `paths`.
///
/// Directories are removed recursively, files and symlinks are unlinked and
/// missing paths are skipped. Failures are logged and do not stop the purge.
pub async fn purge(paths: &[PathBuf],)
{
    for path in paths {
        if let Err(failure,) = purge_path(path,).await {
            warn!("Failed to purge {}: {}", path.display(), failure);
        }
    }
}

async fn purge_path(path: &Path,) -> Result<(), Error,>
{
    let metadata = match fs::symlink_metadata(path,).await {
        Ok(metadata,) => metadata,
        Err(source,) if source.kind() == ErrorKind::NotFound => {
            debug!("Nothing to purge at {}", path.display());
            return Ok((),);
        }
        Err(source,) => return Err(error::io_error(path, source,),),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path,).await
    } else {
        fs::remove_file(path,).await
    }
    .map_err(|source| error::io_error(path, source,),)?;

    info!("Purged {}", path.display());
    Ok((),)
}

#[cfg(test)]
mod tests
{
    use std::{collections::HashMap, fs};

    use tempfile::tempdir;

    use super::*;
    use crate::{
        ArtifactWriter,
        api::Member,
        config::parse_config,
        generator::testing::{StubApi, member, release},
    };

    fn orchestrator(api: StubApi,) -> Orchestrator
    {
        let registry =
            GeneratorRegistry::with_defaults(api.shared(), Arc::new(ArtifactWriter::new(),),)
                .expect("built-in generator names are unique",);
        Orchestrator::new(Arc::new(registry,),)
    }

    fn config(output: &Path, blocks: &str,) -> Config
    {
        let mut config =
            parse_config(&format!(r#"{{"configs": {blocks}}}"#),).expect("invalid test config",);
        config.output = output.to_path_buf();
        config
    }

    #[tokio::test]
    async fn team_end_to_end()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let output = temp.path().join("out",);
        let api = StubApi {
            members: HashMap::from([("acme".to_owned(), vec![member("ada",), member("linus",)],)],),
            ..StubApi::default()
        };

        let report = orchestrator(api,)
            .run(&config(&output, r#"[{"generators": ["team"], "organization": "acme"}]"#,),)
            .await
            .expect("run failed",);

        assert_eq!(report.attempted, 1);
        assert_eq!(report.succeeded, 1);
        let team: Vec<Member,> = serde_json::from_str(
            &fs::read_to_string(output.join("team.json",),).expect("missing team file",),
        )
        .expect("invalid team file",);
        assert_eq!(team, vec![member("ada"), member("linus")]);
    }

    #[tokio::test]
    async fn unknown_generator_is_skipped()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let output = temp.path().join("out",);
        let api = StubApi::default();
        api.set_release("acme/app", release("v1.0.0", "2024-01-01T00:00:00Z",),);

        let report = orchestrator(api,)
            .run(&config(
                &output,
                r#"[
                    {"generators": ["nonexistent", "donation"], "links": ["https://example.com"]},
                    {"generators": ["release"], "repositories": ["acme/app"]}
                ]"#,
            ),)
            .await
            .expect("run failed",);

        assert_eq!(report.skipped, vec!["nonexistent".to_owned()]);
        assert_eq!(report.attempted, 2);
        assert!(report.failed.is_empty());
        assert!(output.join("donation.json",).is_file());
        assert!(output.join("release/app.json",).is_file());
    }

    #[tokio::test]
    async fn failing_generator_does_not_affect_siblings()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let output = temp.path().join("out",);

        let report = orchestrator(StubApi::default(),)
            .run(&config(
                &output,
                r#"[{"generators": ["team", "donation"], "organization": "ghost"}]"#,
            ),)
            .await
            .expect("run failed",);

        assert_eq!(report.attempted, 2);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].generator, "team");
        assert_eq!(report.failed[0].block, 0);
        assert!(report.failed[0].reason.contains("404"));
        assert!(output.join("donation.json",).is_file());
    }

    #[tokio::test]
    async fn same_repository_in_two_blocks_is_indexed_once()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let output = temp.path().join("out",);
        let api = StubApi::default();
        api.set_release("acme/app", release("v3.1.0", "2024-01-01T00:00:00Z",),);

        let report = orchestrator(api,)
            .run(&config(
                &output,
                r#"[
                    {"generators": ["release"], "repositories": ["acme/app"]},
                    {"generators": ["release"], "repositories": ["acme/app"]}
                ]"#,
            ),)
            .await
            .expect("run failed",);

        assert_eq!(report.succeeded, 2);
        let index: Vec<String,> = serde_json::from_str(
            &fs::read_to_string(output.join("release/app.json",),).expect("missing index",),
        )
        .expect("invalid index",);
        assert_eq!(index, vec!["v3.1.0".to_owned()]);
    }

    #[tokio::test]
    async fn missing_required_key_aborts_before_purge()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let output = temp.path().join("out",);
        let stale = temp.path().join("stale.json",);
        fs::write(&stale, "[]",).expect("failed to write stale file",);

        let mut config = config(&output, r#"[{"generators": ["donation"]}, {"generators": ["team"]}]"#,);
        config.purge = vec![stale.clone()];

        let error = orchestrator(StubApi::default(),).run(&config,).await.unwrap_err();
        match error {
            Error::Config {
                message,
            } => assert_eq!(message, "block 1: generator 'team' requires 'organization'"),
            other => panic!("expected config error, got {other:?}"),
        }
        assert!(stale.exists());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn purge_removes_directories_and_files_and_skips_missing()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let existing_dir = temp.path().join("existing_dir",);
        fs::create_dir_all(existing_dir.join("nested",),).expect("failed to create dir",);
        fs::write(existing_dir.join("nested/file.json",), "{}",).expect("failed to write",);
        let existing_file = temp.path().join("existing_file.txt",);
        fs::write(&existing_file, "stale",).expect("failed to write",);

        purge(&[temp.path().join("does/not/exist",), existing_dir.clone(), existing_file.clone()],)
            .await;

        assert!(!existing_dir.exists());
        assert!(!existing_file.exists());
        assert!(temp.path().exists());
    }

    #[tokio::test]
    async fn purge_runs_before_generation()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let output = temp.path().join("out",);
        fs::create_dir_all(output.join("release/old",),).expect("failed to create dir",);

        let mut config = config(&output, r#"[{"generators": ["donation"]}]"#,);
        config.purge = vec![output.join("release",)];

        let report = orchestrator(StubApi::default(),).run(&config,).await.expect("run failed",);

        assert_eq!(report.succeeded, 1);
        assert!(!output.join("release",).exists());
        assert!(output.join("donation.json",).is_file());
    }

    #[test]
    fn report_display_summarizes_counts()
    {
        let report = RunReport {
            attempted: 3,
            succeeded: 2,
            skipped:   vec!["nonexistent".to_owned()],
            failed:    vec![InvocationFailure {
                generator: "team".to_owned(),
                block:     0,
                reason:    "upstream request failed".to_owned(),
            }],
        };
        assert_eq!(report.to_string(), "3 attempted, 2 succeeded, 1 skipped, 1 failed");
    }
}
