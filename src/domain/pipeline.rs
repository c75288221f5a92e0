// src/domain/pipeline.rs

use crate::domain::commission::CommissionCalculator;
use crate::domain::deal::{Deal, StatusKind};

/// Board columns, left to right.
pub const PIPELINE_STAGES: [StatusKind; 5] = StatusKind::ALL;

/// One board column: the deals in a stage, in the order they came in.
#[derive(Debug)]
pub struct StageColumn<'a> {
    pub stage: StatusKind,
    pub deals: Vec<&'a Deal>,
    pub commission_total: f64,
}

impl StageColumn<'_> {
    pub fn label(&self) -> &'static str {
        self.stage.label()
    }

    pub fn count(&self) -> usize {
        self.deals.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineMetrics {
    pub total_deals: usize,
    pub active_deals: usize,
    pub won_deals: usize,
    pub total_pipeline_value: f64,
    pub total_under_contract_value: f64,
    /// Shown as "Total Commission".
    pub total_closed_value: f64,
    /// Deals whose stored status is not a pipeline stage. Counted in
    /// `total_deals` and as active, left out of every column.
    pub unrecognized_deals: usize,
}

#[derive(Debug)]
pub struct PipelineBoard<'a> {
    pub columns: Vec<StageColumn<'a>>,
    pub metrics: PipelineMetrics,
}

impl<'a> PipelineBoard<'a> {
    pub fn column(&self, stage: StatusKind) -> Option<&StageColumn<'a>> {
        self.columns.iter().find(|c| c.stage == stage)
    }
}

/// Partitions `deals` into `stages` and computes the dashboard metrics in
/// one pass. Always recomputed from the input; nothing is cached.
pub fn aggregate_pipeline<'a>(
    deals: &'a [Deal],
    stages: &[StatusKind],
    calc: &CommissionCalculator,
) -> PipelineBoard<'a> {
    let mut columns: Vec<StageColumn<'a>> = stages
        .iter()
        .map(|&stage| StageColumn {
            stage,
            deals: Vec::new(),
            commission_total: 0.0,
        })
        .collect();

    let mut metrics = PipelineMetrics {
        total_deals: deals.len(),
        ..Default::default()
    };

    for deal in deals {
        let commission = deal.commission(calc);

        // Not terminal, so still active, but there is no column to put it in.
        let Some(kind) = deal.status.kind() else {
            metrics.unrecognized_deals += 1;
            metrics.active_deals += 1;
            metrics.total_pipeline_value += commission;
            continue;
        };

        if let Some(col) = columns.iter_mut().find(|c| c.stage == kind) {
            col.deals.push(deal);
            col.commission_total += commission;
        }

        if kind.is_won() {
            metrics.won_deals += 1;
            metrics.total_closed_value += commission;
        } else if !kind.is_terminal() {
            metrics.active_deals += 1;
            metrics.total_pipeline_value += commission;
        }

        if kind == StatusKind::UnderContract {
            metrics.total_under_contract_value += commission;
        }
    }

    if metrics.unrecognized_deals > 0 {
        tracing::warn!(
            count = metrics.unrecognized_deals,
            "deals with unrecognized status left off the pipeline board"
        );
    }

    PipelineBoard { columns, metrics }
}
