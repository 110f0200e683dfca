//! Static JSON API generator.
//!
//! The library reads a JSON configuration document listing generator
//! invocations, fetches what each generator needs from GitHub and writes the
//! results as a tree of JSON files that can be served by any static host.
//!
//! A run is driven by the [`Orchestrator`]: every `(block, generator)` pair is
//! executed concurrently on the tokio runtime, and artifacts shared between
//! invocations (release indexes, announcement feeds) are updated under
//! per-path locks held by the [`ArtifactWriter`].

mod api;
mod artifact;
mod config;
mod error;
mod generator;
mod orchestrator;
mod registry;

pub use api::{
    Asset, Contributor, ContributorRecord, GitHubApi, Member, Release, UpstreamApi,
    rank_contributors, repository_name,
};
pub use artifact::{ArtifactWriter, PathLocks};
pub use config::{
    AnnouncementConfig, AnnouncementContent, Config, DEFAULT_CONFIG_FILE, DEFAULT_OUTPUT_DIR,
    GeneratorConfig, load_config, parse_config, save_config,
};
pub use error::{Error, io_error};
pub use generator::{
    Announcement, AnnouncementGenerator, ContributorGenerator, DonationGenerator, Generator,
    ReleaseGenerator, SocialGenerator, SocialKind, TeamGenerator,
};
pub use orchestrator::{InvocationFailure, Orchestrator, RunReport, purge};
pub use registry::GeneratorRegistry;
