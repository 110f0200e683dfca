// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Organization members written to `team.json`.
use std::{path::Path, sync::Arc};

use tracing::info;

use super::require;
use crate::{
    api::UpstreamApi, artifact::ArtifactWriter, config::GeneratorConfig, error::Error,
};

pub(super) const NAME: &str = "team";

pub struct TeamGenerator
{
    api:    Arc<dyn UpstreamApi,>,
    writer: Arc<ArtifactWriter,>,
}

impl TeamGenerator
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
        let organization = require(block.organization.as_ref(), NAME, "organization",)?;

        let team = self.api.get_members(organization,).await?;
        self.writer.write(&team, &output.join("team.json",), true,).await?;

        info!("Wrote {} members of {}", team.len(), organization);
        Ok((),)
    }
}
