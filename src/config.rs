//! Configuration document types describing generator invocations.
//!
//! The types in this module mirror the structure of the `config.json` document
//! consumed by the CLI. Generator-specific keys stay optional at the document
//! level; each generator checks the presence of the keys it needs before a run
//! starts, see [`crate::Generator::validate`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{self, Error};

/// Output directory used when the document does not specify one.
pub const DEFAULT_OUTPUT_DIR: &str = "static";
/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Root configuration document.
///
/// # Examples
///
/// ```
/// use static_api::parse_config;
///
/// let config = parse_config(
///     r#"{"configs": [{"generators": ["team"], "organization": "acme"}]}"#,
/// )
/// .expect("valid configuration",);
/// assert_eq!(config.output.to_str(), Some("static"));
/// assert!(config.purge.is_empty());
/// assert_eq!(config.configs.len(), 1);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize,)]
pub struct Config
{
    /// Directory receiving every generated artifact.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Paths deleted before generation starts.
    #[serde(default)]
    pub purge: Vec<PathBuf,>,

    /// Ordered generator invocation blocks.
    #[serde(default, alias = "api")]
    pub configs: Vec<GeneratorConfig,>,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            output: default_output(), purge: Vec::new(), configs: Vec::new(),
        }
    }
}

fn default_output() -> PathBuf
{
    PathBuf::from(DEFAULT_OUTPUT_DIR,)
}

/// A single invocation block: the generators to run and the keys they read.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq,)]
pub struct GeneratorConfig
{
    /// Names of the generators invoked with this block.
    pub generators: Vec<String,>,

    /// Repositories in `owner/name` form read by `release` and `contributor`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repositories: Option<Vec<String,>,>,

    /// Whether `release` may pick a prerelease as the latest release.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub prerelease: bool,

    /// Organization whose members are published by `team`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String,>,

    /// Donation links, written verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Value,>,>,

    /// Donation wallets, written verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallets: Option<Vec<Value,>,>,

    /// Social links, written verbatim by `social`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socials: Option<Value,>,

    /// Connections, written verbatim by `connections`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Value,>,

    /// Announcement appended by `announcement`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement: Option<AnnouncementConfig,>,
}

/// Announcement as written in the configuration, before an id is assigned.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq,)]
pub struct AnnouncementConfig
{
    /// Author shown next to the announcement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String,>,

    /// Headline of the announcement.
    pub title: String,

    /// Body of the announcement.
    #[serde(default)]
    pub content: AnnouncementContent,

    /// Channel the announcement is published to.
    pub channel: String,

    /// Severity level; higher is more important.
    #[serde(default)]
    pub level: i64,
}

/// Message and attachments of an announcement.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq,)]
pub struct AnnouncementContent
{
    /// Optional message body.
    #[serde(default)]
    pub message: Option<String,>,

    /// URLs of attached resources.
    #[serde(default)]
    pub attachment_urls: Vec<String,>,
}

/// Loads the configuration document from `path`.
///
/// # Errors
///
/// Returns [`Error::ConfigIo`] when the file cannot be read and
/// [`Error::ConfigParse`] when it is not a valid configuration document.
pub fn load_config(path: &Path,) -> Result<Config, Error,>
{
    let contents =
        fs::read_to_string(path,).map_err(|source| error::config_io_error(path, source,),)?;
    parse_config(&contents,)
}

/// Parses a configuration document from a JSON string.
///
/// # Errors
///
/// Returns [`Error::ConfigParse`] when the document cannot be decoded, for
/// example when a block lacks its `generators` list.
pub fn parse_config(contents: &str,) -> Result<Config, Error,>
{
    serde_json::from_str(contents,).map_err(|source| Error::ConfigParse {
        source,
    },)
}

/// Writes the configuration document to `path` as formatted JSON.
///
/// # Errors
///
/// Returns [`Error::ConfigIo`] when the file cannot be written.
pub fn save_config(config: &Config, path: &Path,) -> Result<(), Error,>
{
    let contents = serde_json::to_string_pretty(config,)?;
    fs::write(path, contents,).map_err(|source| error::config_io_error(path, source,),)
}
