//! Comment threading.

use crate::models::Comment;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A comment with its replies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentNode {
    pub comment: Comment,
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    /// Number of comments in this subtree, the node included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(CommentNode::count).sum::<usize>()
    }
}

/// Build the reply tree of one page of comments.
///
/// A comment whose parent is on the page becomes that parent's child;
/// everything else is a root. Input order is kept at every level.
/// Comments whose parents form a cycle are never reached from a root, so
/// the first of them is promoted to a root after the regular ones.
pub fn build_comment_tree(comments: &[Comment]) -> Vec<CommentNode> {
    let ids: HashSet<i64> = comments.iter().map(|c| c.id).collect();
    let mut children: HashMap<i64, Vec<&Comment>> = HashMap::new();
    let mut roots = Vec::new();

    for comment in comments {
        match comment.parent_id.filter(|p| ids.contains(p) && *p != comment.id) {
            Some(parent) => children.entry(parent).or_default().push(comment),
            None => roots.push(comment),
        }
    }

    let mut visited = HashSet::new();
    let mut tree: Vec<CommentNode> = roots
        .into_iter()
        .map(|root| build_node(root, &children, &mut visited))
        .collect();

    for comment in comments {
        if !visited.contains(&comment.id) {
            tree.push(build_node(comment, &children, &mut visited));
        }
    }
    tree
}

fn build_node(
    comment: &Comment,
    children: &HashMap<i64, Vec<&Comment>>,
    visited: &mut HashSet<i64>,
) -> CommentNode {
    visited.insert(comment.id);
    let replies = children
        .get(&comment.id)
        .map(|list| {
            list.iter()
                .filter(|c| !visited.contains(&c.id))
                .copied()
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    CommentNode {
        comment: comment.clone(),
        children: replies
            .into_iter()
            .map(|reply| build_node(reply, children, visited))
            .collect(),
    }
}
