//! Social network of originators
//!
//! Directed, weighted hand-off graph between originators. Edge weights only
//! ever grow while a network is built; two networks merge into a fresh
//! network whose weights are the per-edge sums of both operands.

use super::combine::Combine;
use crate::error::{ErrorCode, ProcMinerError, Result};
use crate::model::{Originator, ProcessInstance};
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// One weighted edge of a [`SocialNetwork`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Handover {
    pub source: Originator,
    pub target: Originator,
    pub weight: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SocialNetwork {
    graph: Graph<Originator, f64>,
    node_index: HashMap<Originator, NodeIndex>,
}

#[derive(Serialize)]
struct NetworkSnapshot {
    originators: Vec<Originator>,
    edges: Vec<Handover>,
}

impl SocialNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handover-of-work network: one unit of weight per pair of consecutive
    /// events in a case, self hand-offs included
    pub fn from_instances<'a, I>(instances: I) -> Self
    where
        I: IntoIterator<Item = &'a ProcessInstance>,
    {
        let mut network = Self::new();
        for instance in instances {
            network.add_handovers(instance);
        }
        network
    }

    pub fn add_handovers(&mut self, instance: &ProcessInstance) {
        for pair in instance.events().windows(2) {
            self.bump(pair[0].originator(), pair[1].originator(), 1.0);
        }
    }

    /// Add `weight` to the edge `source -> target`, creating it at zero first
    pub fn add_relation(
        &mut self,
        source: &Originator,
        target: &Originator,
        weight: f64,
    ) -> Result<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ProcMinerError::validation_with_code(
                ErrorCode::VALIDATION_NEGATIVE_WEIGHT,
                format!(
                    "relation {} -> {} has invalid weight {}",
                    source, target, weight
                ),
                Some("weight".to_string()),
            ));
        }
        self.bump(source, target, weight);
        Ok(())
    }

    /// Owned variant of [`Self::add_relation`]
    pub fn with_relation(
        mut self,
        source: impl Into<Originator>,
        target: impl Into<Originator>,
        weight: f64,
    ) -> Result<Self> {
        self.add_relation(&source.into(), &target.into(), weight)?;
        Ok(self)
    }

    fn bump(&mut self, source: &Originator, target: &Originator, weight: f64) {
        let from = self.node(source);
        let to = self.node(target);
        match self.graph.find_edge(from, to) {
            Some(edge) => self.graph[edge] += weight,
            None => {
                self.graph.add_edge(from, to, weight);
            }
        }
    }

    fn node(&mut self, originator: &Originator) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(originator) {
            return idx;
        }
        let idx = self.graph.add_node(originator.clone());
        self.node_index.insert(originator.clone(), idx);
        idx
    }

    /// Weight of `source -> target`, zero when there is no such edge
    pub fn weight(&self, source: &Originator, target: &Originator) -> f64 {
        let from = self.node_index.get(source);
        let to = self.node_index.get(target);
        match (from, to) {
            (Some(&from), Some(&to)) => self
                .graph
                .find_edge(from, to)
                .map(|edge| self.graph[edge])
                .unwrap_or(0.0),
            _ => 0.0,
        }
    }

    fn edge_table(&self) -> BTreeMap<(&Originator, &Originator), f64> {
        self.graph
            .edge_indices()
            .filter_map(|edge| {
                let (from, to) = self.graph.edge_endpoints(edge)?;
                Some(((&self.graph[from], &self.graph[to]), self.graph[edge]))
            })
            .collect()
    }

    /// Every edge, ordered by source then target
    pub fn edges(&self) -> Vec<Handover> {
        self.edge_table()
            .into_iter()
            .map(|((source, target), weight)| Handover {
                source: source.clone(),
                target: target.clone(),
                weight,
            })
            .collect()
    }

    /// Originators in name order
    pub fn originators(&self) -> Vec<&Originator> {
        let mut originators: Vec<_> = self.node_index.keys().collect();
        originators.sort();
        originators
    }

    /// Direct hand-off targets of `originator` with their weights, in name order
    pub fn successors(&self, originator: &Originator) -> Vec<(&Originator, f64)> {
        let Some(&idx) = self.node_index.get(originator) else {
            return Vec::new();
        };
        let mut successors: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge| (&self.graph[edge.target()], *edge.weight()))
            .collect();
        successors.sort_by(|a, b| a.0.cmp(b.0));
        successors
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn total_weight(&self) -> f64 {
        self.graph.edge_weights().sum()
    }

    /// New network holding the union of both edge sets with summed weights
    ///
    /// The edge table is assembled from the two read-only operands and only
    /// then turned into a graph.
    pub fn merge(&self, other: &SocialNetwork) -> SocialNetwork {
        let mut table = self.edge_table();
        for (key, weight) in other.edge_table() {
            *table.entry(key).or_insert(0.0) += weight;
        }

        let mut merged = SocialNetwork::new();
        for ((source, target), weight) in table {
            let from = merged.node(source);
            let to = merged.node(target);
            merged.graph.add_edge(from, to, weight);
        }
        debug!(
            "Merged networks into {} originators and {} edges",
            merged.node_count(),
            merged.edge_count()
        );
        merged
    }
}

impl PartialEq for SocialNetwork {
    fn eq(&self, other: &Self) -> bool {
        self.originators() == other.originators() && self.edge_table() == other.edge_table()
    }
}

impl Combine for SocialNetwork {
    fn identity() -> Self {
        SocialNetwork::new()
    }

    fn combine(&self, other: &Self) -> Self {
        self.merge(other)
    }
}

impl Serialize for SocialNetwork {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        NetworkSnapshot {
            originators: self.originators().into_iter().cloned().collect(),
            edges: self.edges(),
        }
        .serialize(serializer)
    }
}
