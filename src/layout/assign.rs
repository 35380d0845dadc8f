//! Recursive angle assignment. A node's `[start, end)` span becomes the
//! section its children partition; which share each sibling takes depends on
//! the wheel variant's strategy.

use tracing::debug;

use crate::error::WheelError;
use crate::ir::{Node, WheelKind};

use super::angle::span;

const PERCENT_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleStrategy {
    /// Explicit percentages; siblings without one split the remainder evenly.
    Percentage,
    /// Shares proportional to each sibling's leaf descendant count.
    LeafCount,
}

impl AngleStrategy {
    pub fn for_kind(kind: WheelKind) -> Self {
        match kind {
            WheelKind::Generic | WheelKind::Percentage => Self::Percentage,
            WheelKind::Flavor => Self::LeafCount,
        }
    }

    pub fn assign(
        self,
        nodes: &mut [Node],
        start: f64,
        end: f64,
        level: u32,
    ) -> Result<(), WheelError> {
        match self {
            Self::Percentage => assign_by_percentage(nodes, start, end, level),
            Self::LeafCount => assign_by_leaf_count(nodes, start, end, level),
        }
    }
}

fn assign_by_percentage(
    nodes: &mut [Node],
    start: f64,
    end: f64,
    level: u32,
) -> Result<(), WheelError> {
    let total = span(start, end);

    let specified: f64 = nodes.iter().filter_map(|node| node.percentage).sum();
    if specified > 100.0 + PERCENT_EPS {
        return Err(WheelError::Validation(format!(
            "sibling percentages sum to {specified} (over 100) at level {level}"
        )));
    }

    let full_count = nodes
        .iter()
        .filter(|node| node.percentage == Some(100.0))
        .count();
    if full_count > 1 {
        return Err(WheelError::Validation(format!(
            "more than one sibling claims 100% at level {level}"
        )));
    }
    if full_count == 1 {
        // The full-span sibling owns the whole section; every other sibling
        // is skipped and never recursed into.
        for node in nodes.iter_mut() {
            if node.percentage != Some(100.0) {
                continue;
            }
            node.start_angle = Some(start.rem_euclid(1.0));
            node.end_angle = Some(end.rem_euclid(1.0));
            debug!(label = %node.label, level, "sibling takes the full section");
            if !node.sub_nodes.is_empty() {
                assign_by_percentage(&mut node.sub_nodes, start, end, level + 1)?;
            }
        }
        return Ok(());
    }

    let unspecified = nodes
        .iter()
        .filter(|node| node.percentage.is_none())
        .count();
    let remaining = 100.0 - specified;
    let even_share = if unspecified > 0 {
        remaining / unspecified as f64
    } else {
        0.0
    };

    let shares: Vec<f64> = nodes
        .iter()
        .map(|node| node.percentage.unwrap_or(even_share))
        .collect();
    let active_total: f64 = shares.iter().filter(|share| **share > 0.0).sum();
    // Close the ring exactly on the section boundary when the shares cover
    // it, so cumulative rounding never leaves a sliver.
    let last_active = if (active_total - 100.0).abs() < PERCENT_EPS {
        shares.iter().rposition(|share| *share > 0.0)
    } else {
        None
    };

    let mut current = start.rem_euclid(1.0);
    for (idx, node) in nodes.iter_mut().enumerate() {
        let share = shares[idx];
        if share <= 0.0 {
            debug!(label = %node.label, level, "zero share, skipping node");
            continue;
        }
        let node_end = if last_active == Some(idx) {
            end.rem_euclid(1.0)
        } else {
            (current + total * share / 100.0).rem_euclid(1.0)
        };
        node.start_angle = Some(current);
        node.end_angle = Some(node_end);
        debug!(label = %node.label, level, start = current, end = node_end, "assigned span");
        if !node.sub_nodes.is_empty() {
            assign_by_percentage(&mut node.sub_nodes, current, node_end, level + 1)?;
        }
        current = node_end;
    }
    Ok(())
}

fn assign_by_leaf_count(
    nodes: &mut [Node],
    start: f64,
    end: f64,
    level: u32,
) -> Result<(), WheelError> {
    let total = span(start, end);
    let total_leaves: usize = nodes.iter().map(Node::leaf_count).sum();
    if total_leaves == 0 {
        return Ok(());
    }

    let count = nodes.len();
    let mut current = start.rem_euclid(1.0);
    for (idx, node) in nodes.iter_mut().enumerate() {
        let leaves = node.leaf_count();
        let node_end = if idx + 1 == count {
            end.rem_euclid(1.0)
        } else {
            (current + total * leaves as f64 / total_leaves as f64).rem_euclid(1.0)
        };
        node.start_angle = Some(current);
        node.end_angle = Some(node_end);
        debug!(label = %node.label, level, leaves, start = current, end = node_end, "assigned span");
        if !node.sub_nodes.is_empty() {
            assign_by_leaf_count(&mut node.sub_nodes, current, node_end, level + 1)?;
        }
        current = node_end;
    }
    Ok(())
}
