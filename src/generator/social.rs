// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Social links copied from the configuration into `social.json` or
/// `connections.json`.
use std::{path::Path, sync::Arc};

use serde_json::Value;
use tracing::info;

use super::require;
use crate::{artifact::ArtifactWriter, config::GeneratorConfig, error::Error};

/// Which configuration key the generator copies and where it writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub enum SocialKind
{
    /// Reads `socials`, writes `social.json`.
    Social,
    /// Reads `connections`, writes `connections.json`.
    Connections,
}

impl SocialKind
{
    pub fn name(self,) -> &'static str
    {
        match self {
            Self::Social => "social",
            Self::Connections => "connections",
        }
    }

    fn key(self,) -> &'static str
    {
        match self {
            Self::Social => "socials",
            Self::Connections => "connections",
        }
    }

    fn select(self, block: &GeneratorConfig,) -> Option<&Value,>
    {
        match self {
            Self::Social => block.socials.as_ref(),
            Self::Connections => block.connections.as_ref(),
        }
    }
}

pub struct SocialGenerator
{
    kind:   SocialKind,
    writer: Arc<ArtifactWriter,>,
}

impl SocialGenerator
{
    pub fn new(kind: SocialKind, writer: Arc<ArtifactWriter,>,) -> Self
    {
        Self {
            kind, writer,
        }
    }

    pub fn kind(&self,) -> SocialKind
    {
        self.kind
    }

    pub(super) fn validate(&self, block: &GeneratorConfig,) -> Result<(), Error,>
    {
        require(self.kind.select(block,), self.kind.name(), self.kind.key(),).map(drop,)
    }

    pub(super) async fn generate(
        &self,
        block: &GeneratorConfig,
        output: &Path,
    ) -> Result<(), Error,>
    {
        let links = require(self.kind.select(block,), self.kind.name(), self.kind.key(),)?;
        let path = output.join(format!("{}.json", self.kind.name()),);

        self.writer.write(links, &path, true,).await?;
        info!("Wrote {}", path.display());
        Ok((),)
    }
}
