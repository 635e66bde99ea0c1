//! Navigation tree over the sorted document list.

use crate::record::DocumentRecord;
use serde::Serialize;
use std::cmp::Ordering;

/// A directory in the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    /// Display name, the directory segment.
    pub title: String,
    /// Directory segment; unique among siblings.
    pub slug: String,
    /// Route of the directory.
    pub link: String,
    /// Subdirectories.
    pub children: Vec<TreeNode>,
    /// Documents directly inside this directory.
    pub items: Vec<TreeItem>,
}

/// A document leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeItem {
    /// Document title.
    pub title: String,
    /// Document route.
    pub link: String,
}

impl TreeNode {
    fn directory(segment: &str, link: String) -> Self {
        Self {
            title: segment.to_string(),
            slug: segment.to_string(),
            link,
            children: Vec::new(),
            items: Vec::new(),
        }
    }
}

/// Builds the tree from records in canonical order.
///
/// Each document is filed under its parent directories, one node per
/// distinct segment per level. Documents with a single segment live in the
/// synthetic root, which is not returned; the root page (no segments) is
/// skipped.
pub fn build_tree<'a>(docs: impl IntoIterator<Item = &'a DocumentRecord>) -> Vec<TreeNode> {
    let mut root = TreeNode::directory("", "/".to_string());

    for doc in docs {
        let Some((_, dirs)) = doc.segments.split_last() else {
            continue;
        };

        let mut node = &mut root;
        for (depth, segment) in dirs.iter().enumerate() {
            let index = match node.children.iter().position(|c| &c.slug == segment) {
                Some(index) => index,
                None => {
                    let link = format!("/{}", doc.segments[..=depth].join("/"));
                    node.children.push(TreeNode::directory(segment, link));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[index];
        }

        node.items.push(TreeItem {
            title: doc.title.clone(),
            link: doc.link.clone(),
        });
    }

    if !root.items.is_empty() {
        log::trace!("{} top-level documents left out of the tree", root.items.len());
    }

    let mut nodes = root.children;
    sort_nodes(&mut nodes);
    nodes
}

/// Case-insensitive title order, code point order on ties.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn sort_nodes(nodes: &mut [TreeNode]) {
    nodes.sort_by(|a, b| compare_titles(&a.title, &b.title));
    for node in nodes {
        sort_nodes(&mut node.children);
        node.items.sort_by(|a, b| compare_titles(&a.title, &b.title));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawDocument;

    fn docs(entries: &[(&str, &str)]) -> Vec<DocumentRecord> {
        let mut docs: Vec<DocumentRecord> = entries
            .iter()
            .map(|(path, text)| DocumentRecord::from_raw(&RawDocument::new(*path, *text), "/docs"))
            .collect();
        docs.sort_by(|a, b| a.link.cmp(&b.link));
        docs
    }

    #[test]
    fn one_node_per_directory() {
        let docs = docs(&[
            ("/docs/guide/b.md", "---\ntitle: Beta\n---\n"),
            ("/docs/guide/a.md", "---\ntitle: Alpha\n---\n"),
        ]);
        let tree = build_tree(&docs);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].slug, "guide");
        assert_eq!(tree[0].link, "/guide");
        let titles: Vec<&str> = tree[0].items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn nested_directories() {
        let docs = docs(&[
            ("/docs/guide/advanced/config.md", ""),
            ("/docs/guide/intro.md", ""),
        ]);
        let tree = build_tree(&docs);

        assert_eq!(tree[0].items[0].link, "/guide/intro");
        assert_eq!(tree[0].children.len(), 1);
        let advanced = &tree[0].children[0];
        assert_eq!(advanced.link, "/guide/advanced");
        assert_eq!(advanced.items[0].link, "/guide/advanced/config");
    }

    #[test]
    fn top_level_and_root_documents_are_not_nodes() {
        let docs = docs(&[("/docs/index.md", ""), ("/docs/about.md", "")]);
        assert!(build_tree(&docs).is_empty());
    }

    #[test]
    fn index_page_is_an_item_of_its_parent() {
        let docs = docs(&[("/docs/guide/index.md", ""), ("/docs/guide/setup/index.md", "")]);
        let tree = build_tree(&docs);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].slug, "guide");
        assert_eq!(tree[0].items[0].link, "/guide/setup");
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn siblings_sorted_case_insensitively() {
        let docs = docs(&[
            ("/docs/beta/x.md", ""),
            ("/docs/Alpha/x.md", ""),
            ("/docs/alpha/x.md", ""),
            ("/docs/Gamma/x.md", ""),
        ]);
        let titles: Vec<String> = build_tree(&docs).into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["Alpha", "alpha", "beta", "Gamma"]);
    }

    #[test]
    fn title_comparison() {
        assert_eq!(compare_titles("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_titles("B", "b"), Ordering::Less);
        assert_eq!(compare_titles("same", "same"), Ordering::Equal);
    }
}
