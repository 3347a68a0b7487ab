//! Atom activity-stream parsing.
//!
//! Only direct children in the Atom namespace are read. Activity-stream
//! extensions (`activity:object`, `usr:username`, ...) are skipped.

use chrono::{DateTime, FixedOffset};
use roxmltree::{Document, Node};
use tracing::warn;

use super::decode::ResourceKind;
use super::error::{ApiError, Result};
use super::types::{ActivityFeed, ActivityItem, Category, Link, Person, Text};

/// The Atom XML namespace.
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

fn feed_error(message: impl Into<String>) -> ApiError {
    ApiError::decode(ResourceKind::ActivityFeed, message)
}

/// Parse an Atom `<feed>` document.
pub fn parse_feed(xml: &str) -> Result<ActivityFeed> {
    let doc = Document::parse(xml).map_err(|e| feed_error(e.to_string()))?;
    let root = doc.root_element();

    if !is_atom(&root, "feed") {
        return Err(feed_error(format!(
            "expected <feed> in {}, found <{}>",
            ATOM_NS,
            root.tag_name().name()
        )));
    }

    // A bad feed-level timestamp only loses that field, never the entries.
    let updated = child(&root, "updated")
        .map(|n| text_of(&n))
        .or_else(|| root.attribute("updated").map(str::to_string))
        .and_then(|value| match parse_timestamp(&value) {
            Ok(ts) => Some(ts),
            Err(e) => {
                warn!("Ignoring feed timestamp: {}", e);
                None
            }
        });

    let entries = root
        .children()
        .filter(|n| is_atom(n, "entry"))
        .enumerate()
        .map(|(index, entry)| parse_entry(&entry, index))
        .collect::<Result<Vec<_>>>()?;

    Ok(ActivityFeed {
        title: child_text(&root, "title"),
        id: child_text(&root, "id"),
        links: links(&root),
        updated,
        author: child(&root, "author").map(|n| person(&n)).unwrap_or_default(),
        entries,
    })
}

fn parse_entry(entry: &Node, index: usize) -> Result<ActivityItem> {
    let updated = child(entry, "updated")
        .map(|n| text_of(&n))
        .ok_or_else(|| feed_error(format!("entry {} has no <updated>", index)))?;

    Ok(ActivityItem {
        title: child_text(entry, "title"),
        id: child_text(entry, "id"),
        links: links(entry),
        updated: parse_timestamp(&updated)?,
        author: child(entry, "author").map(|n| person(&n)).unwrap_or_default(),
        summary: child(entry, "summary")
            .map(|n| Text {
                kind: n.attribute("type").map(str::to_string),
                body: text_of(&n),
            })
            .unwrap_or_default(),
        category: Category {
            term: child(entry, "category")
                .and_then(|n| n.attribute("term"))
                .unwrap_or_default()
                .to_string(),
        },
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map_err(|e| feed_error(format!("invalid timestamp '{}': {}", value, e)))
}

fn is_atom(node: &Node, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(ATOM_NS)
}

fn child<'a, 'input>(node: &Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is_atom(n, name))
}

fn child_text(node: &Node, name: &str) -> String {
    child(node, name).map(|n| text_of(&n)).unwrap_or_default()
}

/// All character data below `node`, in document order.
fn text_of(node: &Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

fn links(node: &Node) -> Vec<Link> {
    node.children()
        .filter(|n| is_atom(n, "link"))
        .map(|n| Link {
            rel: n.attribute("rel").map(str::to_string),
            href: n.attribute("href").unwrap_or_default().to_string(),
        })
        .collect()
}

fn person(node: &Node) -> Person {
    Person {
        name: child_text(node, "name"),
        uri: child_text(node, "uri"),
        email: child_text(node, "email"),
    }
}
