// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Generators turning configuration blocks into JSON artifacts.
//!
//! Every generator is a concrete type wrapped by the closed [`Generator`]
//! enum. Generators receive their collaborators (the upstream API and the
//! artifact writer) at construction time and keep no state between
//! invocations besides the files they write.

mod announcement;
mod contributor;
mod donation;
mod release;
mod social;
mod team;

use std::{future::Future, path::Path};

use tokio::task::JoinSet;
use tracing::warn;

pub use self::{
    announcement::{Announcement, AnnouncementGenerator},
    contributor::ContributorGenerator,
    donation::DonationGenerator,
    release::ReleaseGenerator,
    social::{SocialGenerator, SocialKind},
    team::TeamGenerator,
};
use crate::{config::GeneratorConfig, error::Error};

/// A named unit of work registered in the [`GeneratorRegistry`].
///
/// [`GeneratorRegistry`]: crate::GeneratorRegistry
pub enum Generator
{
    Release(ReleaseGenerator,),
    Contributor(ContributorGenerator,),
    Team(TeamGenerator,),
    Social(SocialGenerator,),
    Donation(DonationGenerator,),
    Announcement(AnnouncementGenerator,),
}

impl Generator
{
    /// Name used to reference the generator from configuration blocks.
    pub fn name(&self,) -> &'static str
    {
        match self {
            Self::Release(_,) => release::NAME,
            Self::Contributor(_,) => contributor::NAME,
            Self::Team(_,) => team::NAME,
            Self::Social(generator,) => generator.kind().name(),
            Self::Donation(_,) => donation::NAME,
            Self::Announcement(_,) => announcement::NAME,
        }
    }

    /// Checks that `block` carries every key this generator reads.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the missing key.
    pub fn validate(&self, block: &GeneratorConfig,) -> Result<(), Error,>
    {
        match self {
            Self::Release(_,) => require(block.repositories.as_ref(), release::NAME, "repositories",)
                .map(drop,),
            Self::Contributor(_,) => {
                require(block.repositories.as_ref(), contributor::NAME, "repositories",).map(drop,)
            }
            Self::Team(_,) => require(
                block.organization.as_ref().filter(|organization| !organization.trim().is_empty(),),
                team::NAME,
                "organization",
            )
            .map(drop,),
            Self::Social(generator,) => generator.validate(block,),
            Self::Donation(_,) => Ok((),),
            Self::Announcement(_,) => require(
                block.announcement.as_ref().filter(|announcement| !announcement.channel.is_empty(),),
                announcement::NAME,
                "announcement.channel",
            )
            .map(drop,),
        }
    }

    /// Runs the generator for `block`, writing artifacts below `output`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the block misses a required key,
    /// [`Error::Upstream`] when the API rejects a request and [`Error::Io`]
    /// when an artifact cannot be written. Artifacts written before the
    /// failure are kept.
    pub async fn generate(&self, block: &GeneratorConfig, output: &Path,) -> Result<(), Error,>
    {
        match self {
            Self::Release(generator,) => generator.generate(block, output,).await,
            Self::Contributor(generator,) => generator.generate(block, output,).await,
            Self::Team(generator,) => generator.generate(block, output,).await,
            Self::Social(generator,) => generator.generate(block, output,).await,
            Self::Donation(generator,) => generator.generate(block, output,).await,
            Self::Announcement(generator,) => generator.generate(block, output,).await,
        }
    }
}

impl std::fmt::Debug for Generator
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_,>,) -> std::fmt::Result
    {
        f.debug_tuple("Generator",).field(&self.name(),).finish()
    }
}

/// Returns the value of a required configuration key.
fn require<'a, T,>(value: Option<&'a T,>, generator: &str, key: &str,) -> Result<&'a T, Error,>
where
    T: ?Sized,
{
    value.ok_or_else(|| Error::config(format!("generator '{generator}' requires '{key}'"),),)
}

/// Runs `task` for every repository concurrently and waits for all of them.
///
/// A failing repository does not stop the others; the first failure observed
/// is returned once every task finished.
async fn for_each_repository<F, Fut,>(
    generator: &str,
    repositories: &[String],
    task: F,
) -> Result<(), Error,>
where
    F: Fn(String,) -> Fut,
    Fut: Future<Output = Result<(), Error,>,> + Send + 'static,
{
    let mut tasks = JoinSet::new();
    for repository in repositories {
        tasks.spawn(task(repository.clone(),),);
    }

    let mut first_error = None;
    while let Some(joined,) = tasks.join_next().await {
        if let Err(error,) = joined.map_err(Error::from,).and_then(|outcome| outcome,) {
            warn!("{} generator failed for a repository: {}", generator, error);
            first_error.get_or_insert(error,);
        }
    }

    first_error.map_or(Ok((),), Err,)
}
