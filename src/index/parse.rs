use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::util::id_title;

use super::model::{ContentIndex, ContentItem};

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawIndexEntry {
    #[serde(default)]
    pub(super) title: Option<String>,
    #[serde(default)]
    pub(super) links: Vec<String>,
    #[serde(default)]
    pub(super) tags: Vec<String>,
}

pub(super) fn parse_content_index(raw: &str) -> Result<ContentIndex> {
    let parsed: BTreeMap<String, RawIndexEntry> =
        serde_json::from_str(raw).context("invalid content index JSON")?;

    if parsed.is_empty() {
        return Err(anyhow!("content index contains no items"));
    }

    let mut items = BTreeMap::new();
    for (id, entry) in parsed {
        if id.is_empty() {
            continue;
        }

        let title = entry
            .title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| id_title(&id).to_string());

        let mut links = entry.links;
        links.sort();
        links.dedup();

        let mut tags = entry.tags;
        tags.sort();
        tags.dedup();

        items.insert(
            id.clone(),
            ContentItem {
                id,
                title,
                outgoing_links: links,
                tags,
            },
        );
    }

    let index = ContentIndex::new(items);
    if index.is_empty() {
        return Err(anyhow!("content index contains no usable items"));
    }

    Ok(index)
}
