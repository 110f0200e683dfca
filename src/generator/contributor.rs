// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Contributor lists, one `contributor/<repository>.json` per repository.
use std::{path::Path, sync::Arc};

use tracing::info;

use super::{for_each_repository, require};
use crate::{
    api::{UpstreamApi, repository_name},
    artifact::ArtifactWriter,
    config::GeneratorConfig,
    error::Error,
};

pub(super) const NAME: &str = "contributor";

#[derive(Clone,)]
pub struct ContributorGenerator
{
    api:    Arc<dyn UpstreamApi,>,
    writer: Arc<ArtifactWriter,>,
}

impl ContributorGenerator
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
        self.writer.ensure_dir(&root,).await?;

        let generator = self.clone();
        for_each_repository(NAME, repositories, move |repository| {
            let generator = generator.clone();
            let root = root.clone();
            async move {
                let contributors = generator.api.get_contributor(&repository,).await?;
                let path = root.join(format!("{}.json", repository_name(&repository)),);
                generator.writer.write(&contributors, &path, true,).await?;
                info!("Wrote {} contributors of {}", contributors.len(), repository);
                Ok((),)
            }
        },)
        .await
    }
}
