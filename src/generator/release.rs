// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Release artifacts and the per-repository tag index.
///
/// For every repository the generator writes:
///
/// - `release/<repository>/<tag>.json`: written once, the first payload wins.
/// - `release/<repository>/latest.json`: overwritten on every run.
/// - `release/<repository>.json`: append-only list of every tag seen so far.
///
/// A prerelease promoted to a final release under the same tag keeps the
/// prerelease payload in `<tag>.json`; only `latest.json` reflects the
/// promotion. Tags containing `/` are written into nested directories
/// (`release/<repository>/release/1.0.json` for `release/1.0`).
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, info};

use super::{for_each_repository, require};
use crate::{
    api::{UpstreamApi, repository_name},
    artifact::ArtifactWriter,
    config::GeneratorConfig,
    error::Error,
};

pub(super) const NAME: &str = "release";

#[derive(Clone,)]
pub struct ReleaseGenerator
{
    api:    Arc<dyn UpstreamApi,>,
    writer: Arc<ArtifactWriter,>,
}

impl ReleaseGenerator
{
    pub fn new(api: Arc<dyn UpstreamApi,>, writer: Arc<ArtifactWriter,>,) -> Self
    {
        Self {
            api, writer,
        }
    }

    pub(super) async fn generate(
        &self,
        block: &GeneratorConfig,
        output: &Path,
    ) -> Result<(), Error,>
    {
        let repositories = require(block.repositories.as_ref(), NAME, "repositories",)?;
        let root = output.join(NAME,);
        let prerelease = block.prerelease;

        let generator = self.clone();
        for_each_repository(NAME, repositories, move |repository| {
            let generator = generator.clone();
            let root = root.clone();
            async move { generator.publish(&repository, prerelease, &root,).await }
        },)
        .await
    }

    async fn publish(&self, repository: &str, prerelease: bool, root: &Path,) -> Result<(), Error,>
    {
        let release = self.api.get_release(repository, prerelease,).await?;
        let name = repository_name(repository,);
        let release_dir = root.join(name,);

        let tag_path = release_dir.join(format!("{}.json", release.tag),);
        self.writer.ensure_dir(tag_path.parent().unwrap_or(&release_dir,),).await?;

        let payload = serde_json::to_string_pretty(&release,)?;
        if !self.writer.write(payload.as_str(), &tag_path, false,).await? {
            debug!("Release {} of {} already published", release.tag, repository);
        }
        self.writer.write(payload.as_str(), &release_dir.join("latest.json",), true,).await?;

        let index_path = index_path(root, name,);
        let appended = self
            .writer
            .update(&index_path, Vec::new(), |index: &mut Vec<String,>| append_tag(index, &release.tag,),)
            .await?;

        if appended {
            info!("Indexed release {} of {}", release.tag, repository);
        }
        Ok((),)
    }
}

fn index_path(root: &Path, repository_name: &str,) -> PathBuf
{
    root.join(format!("{repository_name}.json"),)
}

/// Appends `tag` unless the index already holds it; returns whether it was
/// appended. Existing entries are never reordered or removed.
fn append_tag(index: &mut Vec<String,>, tag: &str,) -> bool
{
    if index.iter().any(|existing| existing == tag,) {
        return false;
    }
    index.push(tag.to_owned(),);
    true
}
