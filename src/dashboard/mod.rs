//! Region dashboard: per-metric panel states for the selected region,
//! guarded against out-of-order responses by a generation counter and
//! per-panel leases.

pub mod panels;
pub mod refresh;
pub mod state;

pub use panels::load_panel;
pub use refresh::{generate_chronic, refresh_region};
pub use state::{
    AgePanel, ApplyOutcome, BmiPanel, Dashboard, DashboardSnapshot, IncomePanel, PanelLease,
    PanelState, PanelView, RegionTicket, VaccinationPanel,
};
