use std::collections::BTreeMap;

/// One entry of the content index, read-only for the lifetime of a session.
#[derive(Clone, Debug)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub outgoing_links: Vec<String>,
    pub tags: Vec<String>,
}

/// The whole content index. Ordered so traversals and node numbering are
/// deterministic for a given input file.
#[derive(Clone, Debug, Default)]
pub struct ContentIndex {
    items: BTreeMap<String, ContentItem>,
}

impl ContentIndex {
    pub fn new(items: BTreeMap<String, ContentItem>) -> Self {
        Self { items }
    }

    pub fn get(&self, id: &str) -> Option<&ContentItem> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.items.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ContentItem)> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Test fixture: `(id, links, tags)` triples into a full index.
#[cfg(test)]
pub(crate) fn index_from(entries: &[(&str, &[&str], &[&str])]) -> ContentIndex {
    let items = entries
        .iter()
        .map(|(id, links, tags)| {
            (
                id.to_string(),
                ContentItem {
                    id: id.to_string(),
                    title: crate::util::id_title(id).to_string(),
                    outgoing_links: links.iter().map(|link| link.to_string()).collect(),
                    tags: tags.iter().map(|tag| tag.to_string()).collect(),
                },
            )
        })
        .collect();
    ContentIndex::new(items)
}
