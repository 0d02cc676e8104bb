//! Pure functions collecting the nodes reachable along each supported axis.

use crate::ast::Axis;
use crate::datasource::DataSourceNode;
use std::collections::HashSet;

/// Accumulates axis results, dropping nodes already seen from another context node.
pub struct AxisCollector<N> {
    seen: HashSet<N>,
    results: Vec<N>,
}

impl<'a, N: DataSourceNode<'a>> AxisCollector<N> {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
            results: Vec::new(),
        }
    }

    fn add(&mut self, node: N) {
        if self.seen.insert(node) {
            self.results.push(node);
        }
    }

    pub fn collect(&mut self, axis: Axis, node: N) {
        match axis {
            Axis::SelfAxis => self.add(node),
            Axis::Child => node.children().for_each(|child| self.add(child)),
            Axis::Attribute => node.attributes().for_each(|attr| self.add(attr)),
            Axis::Descendant => self.descendants(node),
            Axis::DescendantOrSelf => {
                self.add(node);
                self.descendants(node);
            }
            Axis::Parent => {
                if let Some(parent) = node.parent() {
                    self.add(parent);
                }
            }
            Axis::Ancestor => {
                let mut current = node.parent();
                while let Some(parent) = current {
                    self.add(parent);
                    current = parent.parent();
                }
            }
            Axis::FollowingSibling => {
                if let Some(parent) = node.parent() {
                    parent
                        .children()
                        .skip_while(|sibling| *sibling != node)
                        .skip(1)
                        .for_each(|sibling| self.add(sibling));
                }
            }
            Axis::PrecedingSibling => {
                if let Some(parent) = node.parent() {
                    parent
                        .children()
                        .take_while(|sibling| *sibling != node)
                        .for_each(|sibling| self.add(sibling));
                }
            }
        }
    }

    // Pre-order walk, so descendants come out in document order.
    fn descendants(&mut self, node: N) {
        let mut stack: Vec<N> = node.children().collect();
        stack.reverse();
        while let Some(current) = stack.pop() {
            self.add(current);
            let mut children: Vec<N> = current.children().collect();
            children.reverse();
            stack.extend(children);
        }
    }

    pub fn into_nodes(self) -> Vec<N> {
        self.results
    }
}

impl<'a, N: DataSourceNode<'a>> Default for AxisCollector<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects all unique nodes along `axis` from every node of the context set.
pub fn collect_axis_nodes<'a, N: DataSourceNode<'a>>(axis: Axis, context_nodes: &[N]) -> Vec<N> {
    let mut collector = AxisCollector::new();
    for &node in context_nodes {
        collector.collect(axis, node);
    }
    collector.into_nodes()
}
