// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Announcement feeds.
///
/// Each invocation appends the configured announcement to:
///
/// - `announcements.json`: every announcement across channels.
/// - `announcements/<channel>.json`: announcements of one channel.
///
/// and points `announcements/latest.json` and
/// `announcements/<channel>/latest.json` at it. Ids are assigned as one more
/// than the highest id already published, starting at zero.
///
/// The lock on `announcements.json` is held until both pointers are written,
/// so channel feeds and pointers follow id order. Published entries are kept
/// as raw JSON; keys this crate does not model survive later appends.
use std::{path::Path, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::require;
use crate::{
    artifact::ArtifactWriter,
    config::{AnnouncementConfig, GeneratorConfig},
    error::Error,
};

pub(super) const NAME: &str = "announcement";

/// Published announcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize,)]
pub struct Announcement
{
    pub id:   u64,
    #[serde(flatten)]
    pub body: AnnouncementConfig,
}

pub struct AnnouncementGenerator
{
    writer: Arc<ArtifactWriter,>,
}

impl AnnouncementGenerator
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
        let body = require(block.announcement.as_ref(), NAME, "announcement",)?;
        let feed_dir = output.join("announcements",);
        let channel_dir = feed_dir.join(&body.channel,);
        self.writer.ensure_dir(&channel_dir,).await?;

        let feed_path = output.join("announcements.json",);
        let _feed = self.writer.lock(&feed_path,).await;

        let mut feed: Vec<Value,> = self.writer.read(&feed_path, Vec::new(),).await?;
        let announcement = Announcement {
            id: next_id(&feed,), body: body.clone(),
        };
        let entry = serde_json::to_value(&announcement,)?;
        feed.push(entry.clone(),);
        self.writer.write(&feed, &feed_path, true,).await?;

        let channel_path = feed_dir.join(format!("{}.json", body.channel),);
        self.writer
            .update(&channel_path, Vec::new(), |channel: &mut Vec<Value,>| channel.push(entry,),)
            .await?;

        self.writer.write(&announcement, &feed_dir.join("latest.json",), true,).await?;
        self.writer.write(&announcement, &channel_dir.join("latest.json",), true,).await?;

        info!("Published announcement {} to channel {}", announcement.id, body.channel);
        Ok((),)
    }
}

/// Entries without a numeric `id` are ignored.
fn next_id(feed: &[Value],) -> u64
{
    feed.iter()
        .filter_map(|entry| entry.get("id",).and_then(Value::as_u64,),)
        .map(|id| id + 1,)
        .max()
        .unwrap_or(0,)
}
