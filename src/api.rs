// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Upstream API access for organization metadata.
///
/// Fetches releases, contributors and organization members from the GitHub
/// REST API and normalizes them into the shapes persisted by the generators.
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Error;

/// Release asset exposed to the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct Asset
{
    pub name:         String,
    pub download_url: String,
}

/// Normalized release record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct Release
{
    /// Tag name; unique per repository.
    pub tag:          String,
    pub prerelease:   bool,
    /// Upstream publication timestamp, `None` for unpublished drafts.
    pub published_at: Option<String,>,
    pub assets:       Vec<Asset,>,
}

/// Contributor as written to `contributor/<repository>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct Contributor
{
    pub username: String,
    pub avatar:   String,
    pub link:     String,
}

/// Contributor together with the contribution count used for ranking.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct ContributorRecord
{
    pub contributor:   Contributor,
    pub contributions: u64,
}

/// Organization member as written to `team.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct Member
{
    pub username: String,
    pub avatar:   String,
    pub link:     String,
}

/// Source of upstream metadata consumed by the generators.
///
/// Implementations must be shareable across tasks; generators hold them behind
/// an `Arc`.
#[async_trait]
pub trait UpstreamApi: Send + Sync
{
    /// Returns the latest release of `repository` (`owner/name`).
    ///
    /// When `prerelease` is `false` only final releases are considered.
    async fn get_release(&self, repository: &str, prerelease: bool,) -> Result<Release, Error,>;

    /// Returns the contributors of `repository`, most active first.
    async fn get_contributor(&self, repository: &str,) -> Result<Vec<Contributor,>, Error,>;

    /// Returns the public members of `organization` in API order.
    async fn get_members(&self, organization: &str,) -> Result<Vec<Member,>, Error,>;
}

/// Orders contributors by contribution count, highest first, and strips the
/// count.
///
/// Contributors with equal counts keep their relative input order.
///
/// # Example
///
/// ```
/// use static_api::{Contributor, ContributorRecord, rank_contributors};
///
/// let record = |name: &str, contributions| ContributorRecord {
///     contributor: Contributor {
///         username: name.to_owned(),
///         avatar:   String::new(),
///         link:     String::new(),
///     },
///     contributions,
/// };
/// let ranked = rank_contributors(vec![record("a", 1,), record("b", 7,)],);
/// assert_eq!(ranked[0].username, "b");
/// ```
pub fn rank_contributors(mut records: Vec<ContributorRecord,>,) -> Vec<Contributor,>
{
    records.sort_by(|a, b| b.contributions.cmp(&a.contributions,),);
    records.into_iter().map(|record| record.contributor,).collect()
}

/// Returns the final segment of an `owner/name` repository identifier.
pub fn repository_name(repository: &str,) -> &str
{
    repository.rsplit('/',).next().unwrap_or(repository,)
}

#[derive(Debug, Deserialize,)]
struct RawRelease
{
    tag_name:     String,
    #[serde(default)]
    prerelease:   bool,
    #[serde(default)]
    published_at: Option<String,>,
    #[serde(default)]
    assets:       Vec<RawAsset,>,
}

#[derive(Debug, Deserialize,)]
struct RawAsset
{
    name:                 String,
    browser_download_url: String,
}

#[derive(Debug, Deserialize,)]
struct RawUser
{
    login:      String,
    avatar_url: String,
    html_url:   String,
}

#[derive(Debug, Deserialize,)]
struct RawContributor
{
    #[serde(flatten)]
    user:          RawUser,
    contributions: u64,
}

impl From<RawRelease,> for Release
{
    fn from(raw: RawRelease,) -> Self
    {
        Self {
            tag:          raw.tag_name,
            prerelease:   raw.prerelease,
            published_at: raw.published_at,
            assets:       raw
                .assets
                .into_iter()
                .map(|asset| Asset {
                    name: asset.name, download_url: asset.browser_download_url,
                },)
                .collect(),
        }
    }
}

impl From<RawContributor,> for ContributorRecord
{
    fn from(raw: RawContributor,) -> Self
    {
        Self {
            contributor:   Contributor {
                username: raw.user.login,
                avatar:   raw.user.avatar_url,
                link:     raw.user.html_url,
            },
            contributions: raw.contributions,
        }
    }
}

impl From<RawUser,> for Member
{
    fn from(raw: RawUser,) -> Self
    {
        Self {
            username: raw.login, avatar: raw.avatar_url, link: raw.html_url,
        }
    }
}

/// [`UpstreamApi`] backed by the GitHub REST API.
#[derive(Clone,)]
pub struct GitHubApi
{
    client: Octocrab,
}

impl GitHubApi
{
    /// Builds a client, optionally sending `token` with every request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Service`] when the HTTP client cannot be constructed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use static_api::{GitHubApi, UpstreamApi};
    ///
    /// # async fn example() -> Result<(), static_api::Error> {
    /// let api = GitHubApi::new(None,)?;
    /// let members = api.get_members("octo-org",).await?;
    /// println!("{} members", members.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(token: Option<&str,>,) -> Result<Self, Error,>
    {
        let mut builder = Octocrab::builder();
        if let Some(token,) = token {
            builder = builder.personal_token(token,);
        }

        let client = builder
            .build()
            .map_err(|e| Error::service(format!("failed to initialize GitHub client: {e}"),),)?;

        Ok(Self {
            client,
        },)
    }
}

#[async_trait]
impl UpstreamApi for GitHubApi
{
    async fn get_release(&self, repository: &str, prerelease: bool,) -> Result<Release, Error,>
    {
        let release = if prerelease {
            let route = format!("/repos/{repository}/releases");
            debug!("Fetching newest release for {}", repository);
            let releases: Vec<RawRelease,> = self
                .client
                .get(&route, Some(&[("per_page", 1,)],),)
                .await
                .map_err(|e| upstream_error(&route, e,),)?;
            releases.into_iter().next().ok_or_else(|| Error::UpstreamPayload {
                resource: route.clone(),
                message:  "repository has no releases".to_owned(),
            },)?
        } else {
            let route = format!("/repos/{repository}/releases/latest");
            debug!("Fetching latest release for {}", repository);
            self.client
                .get::<RawRelease, _, (),>(&route, None,)
                .await
                .map_err(|e| upstream_error(&route, e,),)?
        };

        let release = Release::from(release,);
        info!("Latest release of {} is {}", repository, release.tag);
        Ok(release,)
    }

    async fn get_contributor(&self, repository: &str,) -> Result<Vec<Contributor,>, Error,>
    {
        let route = format!("/repos/{repository}/contributors");
        debug!("Fetching contributors for {}", repository);

        let raw: Vec<RawContributor,> = self
            .client
            .get(&route, None::<&(),>,)
            .await
            .map_err(|e| upstream_error(&route, e,),)?;

        let contributors =
            rank_contributors(raw.into_iter().map(ContributorRecord::from,).collect(),);
        info!("Found {} contributors for {}", contributors.len(), repository);
        Ok(contributors,)
    }

    async fn get_members(&self, organization: &str,) -> Result<Vec<Member,>, Error,>
    {
        let route = format!("/orgs/{organization}/members");
        debug!("Fetching members of {}", organization);

        let raw: Vec<RawUser,> = self
            .client
            .get(&route, None::<&(),>,)
            .await
            .map_err(|e| upstream_error(&route, e,),)?;

        info!("Found {} members in {}", raw.len(), organization);
        Ok(raw.into_iter().map(Member::from,).collect(),)
    }
}

fn upstream_error(resource: &str, error: octocrab::Error,) -> Error
{
    match error {
        octocrab::Error::GitHub {
            source, ..
        } => Error::Upstream {
            resource: resource.to_owned(),
            status:   source.status_code.as_u16(),
            message:  source.message.clone(),
        },
        other => Error::UpstreamPayload {
            resource: resource.to_owned(), message: other.to_string(),
        },
    }
}
