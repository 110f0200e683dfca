// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Donation links and wallets written to `donation.json`.
use std::{path::Path, sync::Arc};

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::{artifact::ArtifactWriter, config::GeneratorConfig, error::Error};

pub(super) const NAME: &str = "donation";

#[derive(Debug, Serialize,)]
struct Donation<'a,>
{
    links:   &'a [Value],
    wallets: &'a [Value],
}

pub struct DonationGenerator
{
    writer: Arc<ArtifactWriter,>,
}

impl DonationGenerator
{
    pub fn new(writer: Arc<ArtifactWriter,>,) -> Self
    {
        Self {
            writer,
        }
    }

    pub(super) async fn generate(
        &self,
        block: &GeneratorConfig,
        output: &Path,
    ) -> Result<(), Error,>
    {
        let donation = Donation {
            links:   block.links.as_deref().unwrap_or_default(),
            wallets: block.wallets.as_deref().unwrap_or_default(),
        };

        self.writer.write(&donation, &output.join("donation.json",), true,).await?;
        info!("Wrote {} donation links and {} wallets", donation.links.len(), donation.wallets.len());
        Ok((),)
    }
}

#[cfg(test)]
mod tests
{
    use std::fs;

    use serde_json::json;
    use tempfile::tempdir;

    use super::*;

    fn read(path: &Path,) -> Value
    {
        serde_json::from_str(&fs::read_to_string(path,).expect("missing donation file",),)
            .expect("invalid donation file",)
    }

    #[tokio::test]
    async fn missing_lists_default_to_empty()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let generator = DonationGenerator::new(Arc::new(ArtifactWriter::new(),),);

        let block = GeneratorConfig {
            generators: vec![NAME.to_owned()],
            ..GeneratorConfig::default()
        };
        generator.generate(&block, temp.path(),).await.expect("generation failed",);

        assert_eq!(read(&temp.path().join("donation.json",),), json!({"links": [], "wallets": []}));
    }

    #[tokio::test]
    async fn links_and_wallets_are_copied()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let generator = DonationGenerator::new(Arc::new(ArtifactWriter::new(),),);

        let block = GeneratorConfig {
            generators: vec![NAME.to_owned()],
            links: Some(vec![json!("https://opencollective.com/acme")],),
            wallets: Some(vec![json!({"network": "BTC", "address": "bc1q"})],),
            ..GeneratorConfig::default()
        };
        generator.generate(&block, temp.path(),).await.expect("generation failed",);

        assert_eq!(
            read(&temp.path().join("donation.json",),),
            json!({
                "links": ["https://opencollective.com/acme"],
                "wallets": [{"network": "BTC", "address": "bc1q"}]
            })
        );
    }
}
