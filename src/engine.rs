//! Log analysis driver
//!
//! Runs the three aggregations over one event set in two phases:
//!
//! 1. the event stream is partitioned and each partition folds its event
//!    counts, activity durations and case groups;
//! 2. the merged case groups become process instances, which are
//!    partitioned again and folded into case statistics and the hand-off
//!    network.
//!
//! With `partitions == 1` both phases fold on the calling thread.

use crate::config::AnalysisConfig;
use crate::core::{
    distribute, map_reduce, ActivityClassOverview, ActivityDurations, CaseGroups, CaseTally,
    EventTally, LogSummary, LogSummaryBuilder, SocialNetwork,
};
use crate::error::Result;
use crate::model::{Event, ProcessInstance};
use serde::Serialize;
use tracing::{debug, info};

const DEFAULT_LOG_NAME: &str = "event log";

/// The three artifacts of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogAnalysis {
    summary: LogSummary,
    overview: ActivityClassOverview,
    network: SocialNetwork,
}

impl LogAnalysis {
    pub fn summary(&self) -> &LogSummary {
        &self.summary
    }

    pub fn overview(&self) -> &ActivityClassOverview {
        &self.overview
    }

    pub fn network(&self) -> &SocialNetwork {
        &self.network
    }

    pub fn into_parts(self) -> (LogSummary, ActivityClassOverview, SocialNetwork) {
        (self.summary, self.overview, self.network)
    }
}

#[derive(Debug, Clone)]
pub struct LogAnalyzer {
    config: AnalysisConfig,
}

impl Default for LogAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl LogAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn summary_builder(&self) -> LogSummaryBuilder {
        let name = self.config.log_name.as_deref().unwrap_or(DEFAULT_LOG_NAME);
        let description = self.config.log_description.as_deref().unwrap_or_default();
        LogSummaryBuilder::new(name, description)
            .time_unit(self.config.time_unit)
            .day_bucket(self.config.day_bucket)
    }

    pub fn analyze(&self, events: &[Event]) -> Result<LogAnalysis> {
        self.config.validate()?;
        let builder = self.summary_builder();
        let unit = builder.unit();
        let zone = *builder.zone();

        let event_partitions = distribute(events, self.config.partitions);
        debug!(
            "Folding {} events in {} partitions",
            events.len(),
            event_partitions.len()
        );
        let (tally, (durations, groups)) = map_reduce(&event_partitions, |partition| {
            let tally = EventTally::from_events(partition.items, &zone);
            let durations = ActivityDurations::from_events(partition.items, unit)?;
            let groups = CaseGroups::from_slice(partition.start_index, partition.items);
            Ok((tally, (durations, groups)))
        })?;

        let instances: Vec<ProcessInstance> = groups.into_instances().into_values().collect();
        let instance_partitions = distribute(&instances, self.config.partitions);
        debug!(
            "Folding {} process instances in {} partitions",
            instances.len(),
            instance_partitions.len()
        );
        let (cases, network) = map_reduce(&instance_partitions, |partition| {
            let cases = CaseTally::from_instances(partition.items, unit)?;
            let network = SocialNetwork::from_instances(partition.items);
            Ok((cases, network))
        })?;

        let analysis = LogAnalysis {
            summary: builder.finish(tally, cases),
            overview: durations.finish(unit),
            network,
        };

        info!(
            "Analyzed {} events across {} cases ({} activity classes, {} hand-off edges)",
            analysis.summary.number_of_events(),
            analysis.summary.number_of_process_instances(),
            analysis.overview.len(),
            analysis.network.edge_count()
        );

        Ok(analysis)
    }
}
