// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Name-based lookup of generators.
//!
//! The registry is assembled once, before any generation starts, and is only
//! read afterwards; tasks share it through an `Arc` without locking.

use std::{collections::HashMap, sync::Arc};

use crate::{
    api::UpstreamApi,
    artifact::ArtifactWriter,
    error::Error,
    generator::{
        AnnouncementGenerator, ContributorGenerator, DonationGenerator, Generator,
        ReleaseGenerator, SocialGenerator, SocialKind, TeamGenerator,
    },
};

/// Read-only map from generator names to generators.
#[derive(Debug,)]
pub struct GeneratorRegistry
{
    generators: HashMap<&'static str, Arc<Generator,>,>,
}

impl GeneratorRegistry
{
    /// Builds a registry from `generators`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when two generators share a name.
    pub fn new(generators: Vec<Generator,>,) -> Result<Self, Error,>
    {
        let mut registered = HashMap::with_capacity(generators.len(),);
        for generator in generators {
            let name = generator.name();
            if registered.insert(name, Arc::new(generator,),).is_some() {
                return Err(Error::config(format!("generator '{name}' is registered twice"),),);
            }
        }

        Ok(Self {
            generators: registered,
        },)
    }

    /// Builds the registry of every built-in generator.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Config`] from [`new`](Self::new).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use static_api::{ArtifactWriter, GeneratorRegistry, GitHubApi};
    ///
    /// # fn example() -> Result<(), static_api::Error> {
    /// let registry = GeneratorRegistry::with_defaults(
    ///     Arc::new(GitHubApi::new(None,)?,),
    ///     Arc::new(ArtifactWriter::new(),),
    /// )?;
    /// assert!(registry.get("release").is_some());
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_defaults(
        api: Arc<dyn UpstreamApi,>,
        writer: Arc<ArtifactWriter,>,
    ) -> Result<Self, Error,>
    {
        Self::new(vec![
            Generator::Release(ReleaseGenerator::new(api.clone(), writer.clone(),),),
            Generator::Contributor(ContributorGenerator::new(api.clone(), writer.clone(),),),
            Generator::Team(TeamGenerator::new(api, writer.clone(),),),
            Generator::Social(SocialGenerator::new(SocialKind::Social, writer.clone(),),),
            Generator::Social(SocialGenerator::new(SocialKind::Connections, writer.clone(),),),
            Generator::Donation(DonationGenerator::new(writer.clone(),),),
            Generator::Announcement(AnnouncementGenerator::new(writer,),),
        ],)
    }

    /// Returns the generator registered under `name`.
    pub fn get(&self, name: &str,) -> Option<Arc<Generator,>,>
    {
        self.generators.get(name,).cloned()
    }

    /// Sorted names of every registered generator.
    pub fn names(&self,) -> Vec<&'static str,>
    {
        let mut names: Vec<_,> = self.generators.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
