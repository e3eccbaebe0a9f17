use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use serde::Serialize;

use crate::analytics::{AgeDistribution, AgeSummary, BmiAnalysis, IncomeDistribution, VaccinationAnalysis};
use crate::charts::ChartConfig;
use crate::error::FetchError;
use crate::models::{ChronicDiseaseAnalysis, Metric};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgePanel {
    pub distribution: AgeDistribution,
    /// Life-stage percentages rounded for display.
    pub summary: AgeSummary,
    pub probability_chart: ChartConfig,
    pub frequency_chart: ChartConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomePanel {
    pub distribution: IncomeDistribution,
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BmiPanel {
    pub analysis: BmiAnalysis,
    pub histogram: ChartConfig,
    pub scatter: ChartConfig,
    pub pie: ChartConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VaccinationPanel {
    pub analysis: VaccinationAnalysis,
    pub age_chart: ChartConfig,
    pub vaccine_chart: ChartConfig,
    pub gender_chart: ChartConfig,
}

/// Rendered content of a successful panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "metric", rename_all = "snake_case")]
pub enum PanelView {
    Age(AgePanel),
    Income(IncomePanel),
    Bmi(BmiPanel),
    Vaccination(VaccinationPanel),
    ChronicDisease(ChronicDiseaseAnalysis),
}

/// `idle -> loading -> success | empty | error`, restarted on every
/// region change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PanelState {
    Idle,
    Loading,
    Success { panel: Box<PanelView> },
    Empty { message: String },
    Error { error: FetchError },
}

impl PanelState {
    pub fn success(view: PanelView) -> Self {
        Self::Success {
            panel: Box::new(view),
        }
    }

    pub fn empty(message: &str) -> Self {
        Self::Empty {
            message: message.to_string(),
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Empty { .. } | Self::Error { .. })
    }

    pub fn view(&self) -> Option<&PanelView> {
        match self {
            Self::Success { panel } => Some(panel.as_ref()),
            _ => None,
        }
    }
}

impl From<Result<PanelState, FetchError>> for PanelState {
    fn from(result: Result<PanelState, FetchError>) -> Self {
        result.unwrap_or_else(|error| Self::Error { error })
    }
}

/// Issued on region selection. Panel updates carry the ticket they were
/// fetched under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionTicket {
    pub generation: u64,
    pub region_id: String,
}

impl RegionTicket {
    /// The lease every panel holds right after selection.
    pub fn lease(&self, metric: Metric) -> PanelLease {
        PanelLease {
            ticket: self.clone(),
            metric,
            sequence: 0,
        }
    }
}

/// Right to write one panel. A later `Dashboard::begin` on the same panel
/// supersedes every earlier lease.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLease {
    pub ticket: RegionTicket,
    pub metric: Metric,
    pub sequence: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOutcome {
    Applied,
    /// The region changed or a newer request took over the panel; the
    /// update was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub generation: u64,
    pub region_id: Option<String>,
    pub panels: BTreeMap<Metric, PanelState>,
}

struct DashboardInner {
    generation: u64,
    region_id: Option<String>,
    panels: BTreeMap<Metric, PanelState>,
    sequences: BTreeMap<Metric, u64>,
}

impl DashboardInner {
    fn reset(&mut self, state: PanelState) {
        self.panels = Metric::ALL.iter().map(|m| (*m, state.clone())).collect();
        self.sequences = Metric::ALL.iter().map(|m| (*m, 0)).collect();
    }

    fn is_current(&self, ticket: &RegionTicket) -> bool {
        ticket.generation == self.generation
            && self.region_id.as_deref() == Some(ticket.region_id.as_str())
    }

    fn holds(&self, lease: &PanelLease) -> bool {
        self.is_current(&lease.ticket)
            && self.sequences.get(&lease.metric).copied().unwrap_or(0) == lease.sequence
    }
}

/// Panel states for the selected region.
///
/// The lease check and the write happen under one lock, so an update
/// fetched for an earlier selection, or overtaken by a newer request for
/// the same panel, can never land.
pub struct Dashboard {
    inner: RwLock<DashboardInner>,
}

impl Dashboard {
    pub fn new() -> Self {
        let mut inner = DashboardInner {
            generation: 0,
            region_id: None,
            panels: BTreeMap::new(),
            sequences: BTreeMap::new(),
        };
        inner.reset(PanelState::Idle);
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Switch to `region_id`: bump the generation and put every panel
    /// into `loading`.
    pub fn select_region(&self, region_id: &str) -> Result<RegionTicket, FetchError> {
        let region_id = region_id.trim();
        if region_id.is_empty() {
            return Err(FetchError::validation("Region id must not be empty"));
        }

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.generation += 1;
        inner.region_id = Some(region_id.to_string());
        inner.reset(PanelState::Loading);

        tracing::info!(region_id, generation = inner.generation, "Region selected");
        Ok(RegionTicket {
            generation: inner.generation,
            region_id: region_id.to_string(),
        })
    }

    pub fn current_ticket(&self) -> Option<RegionTicket> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.region_id.as_ref().map(|region_id| RegionTicket {
            generation: inner.generation,
            region_id: region_id.clone(),
        })
    }

    /// Put one panel back into `loading` for a re-fetch under `ticket`.
    ///
    /// Returns `None` when `ticket` is no longer current. Results still in
    /// flight under older leases for this panel are dropped on arrival.
    pub fn begin(&self, ticket: &RegionTicket, metric: Metric) -> Option<PanelLease> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !inner.is_current(ticket) {
            return None;
        }
        let sequence = inner.sequences.entry(metric).or_insert(0);
        *sequence += 1;
        let sequence = *sequence;
        inner.panels.insert(metric, PanelState::Loading);
        Some(PanelLease {
            ticket: ticket.clone(),
            metric,
            sequence,
        })
    }

    /// Store a panel result if `lease` is still the panel's latest.
    pub fn apply(&self, lease: &PanelLease, state: PanelState) -> ApplyOutcome {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !inner.holds(lease) {
            tracing::debug!(
                metric = lease.metric.as_str(),
                region_id = %lease.ticket.region_id,
                ticket_generation = lease.ticket.generation,
                current_generation = inner.generation,
                lease_sequence = lease.sequence,
                "Discarding stale panel update"
            );
            return ApplyOutcome::Stale;
        }
        inner.panels.insert(lease.metric, state);
        ApplyOutcome::Applied
    }

    pub fn panel(&self, metric: Metric) -> PanelState {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.panels.get(&metric).cloned().unwrap_or(PanelState::Idle)
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        DashboardSnapshot {
            generation: inner.generation,
            region_id: inner.region_id.clone(),
            panels: inner.panels.clone(),
        }
    }

    /// Drop the selection and return every panel to `idle`. Outstanding
    /// tickets become stale.
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.generation += 1;
        inner.region_id = None;
        inner.reset(PanelState::Idle);
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}
