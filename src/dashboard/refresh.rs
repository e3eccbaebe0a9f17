use std::sync::Arc;

use futures_util::future::join_all;

use crate::analysis_service::AnalysisService;
use crate::backend::RecordStore;
use crate::error::FetchError;
use crate::models::{ChronicDiseaseAnalysis, Metric};

use super::panels::load_panel;
use super::state::{ApplyOutcome, Dashboard, PanelState, PanelView, RegionTicket};

/// Load every panel for `ticket` concurrently and apply the results.
///
/// Each metric runs on its own blocking thread; one failure only affects
/// its own panel. Results are written under the selection's initial lease,
/// so they are dropped when the ticket is superseded or a newer request
/// has taken over the panel.
pub async fn refresh_region(
    dashboard: Arc<Dashboard>,
    store: Arc<dyn RecordStore>,
    ticket: RegionTicket,
) -> Vec<(Metric, ApplyOutcome)> {
    let tasks = Metric::ALL.iter().map(|&metric| {
        let dashboard = Arc::clone(&dashboard);
        let store = Arc::clone(&store);
        let ticket = ticket.clone();
        async move {
            let region_id = ticket.region_id.clone();
            let state: PanelState = tokio::task::spawn_blocking(move || {
                load_panel(store.as_ref(), metric, &region_id)
            })
            .await
            .map_err(FetchError::from)
            .and_then(|result| result)
            .into();

            if let PanelState::Error { error } = &state {
                tracing::warn!(
                    metric = metric.as_str(),
                    region_id = %ticket.region_id,
                    kind = ?error.kind,
                    error = %error,
                    "Panel load failed"
                );
            }
            (metric, dashboard.apply(&ticket.lease(metric), state))
        }
    });

    let outcomes = join_all(tasks).await;
    let applied = outcomes
        .iter()
        .filter(|(_, o)| *o == ApplyOutcome::Applied)
        .count();
    tracing::info!(
        region_id = %ticket.region_id,
        generation = ticket.generation,
        applied,
        "Region refresh finished"
    );
    outcomes
}

/// Ask the analysis service for a fresh chronic disease report.
///
/// When `region_id` is the dashboard's current selection the chronic panel
/// follows the request through `loading` to its result.
pub async fn generate_chronic(
    dashboard: &Dashboard,
    service: Arc<dyn AnalysisService>,
    region_id: &str,
) -> Result<ChronicDiseaseAnalysis, FetchError> {
    let lease = dashboard
        .current_ticket()
        .filter(|t| t.region_id == region_id.trim())
        .and_then(|ticket| dashboard.begin(&ticket, Metric::ChronicDisease));

    let region = region_id.to_string();
    let result = tokio::task::spawn_blocking(move || service.chronic_disease(&region))
        .await
        .map_err(FetchError::from)
        .and_then(|result| result);

    if let Some(lease) = &lease {
        let state = match &result {
            Ok(analysis) => PanelState::success(PanelView::ChronicDisease(analysis.clone())),
            Err(error) => PanelState::Error {
                error: error.clone(),
            },
        };
        dashboard.apply(lease, state);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::analysis_service::MockAnalysisService;
    use crate::backend::MemoryStore;
    use crate::error::FetchErrorKind;
    use crate::fetch;
    use crate::models::{
        AnalysisSection, AnalysisSections, AnalysisStatistics, METRICS_TITLE, PATTERNS_TITLE,
        RECOMMENDATIONS_TITLE, RELATIONSHIPS_TITLE,
    };
    use serde_json::json;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_table(
                fetch::APPOINTMENTS,
                vec![
                    json!({"id": "a1", "region_id": "A", "age": 80}),
                    json!({"id": "a2", "region_id": "A", "age": 82}),
                    json!({"id": "b1", "region_id": "B", "age": 8}),
                ],
            )
            .with_table(
                fetch::HEALTH_RECORDS,
                vec![json!({"patient_id": "b1", "region_id": "B", "gender": "female",
                            "income_level": "middle", "bmi": 17.2, "weight": 25.0, "height": 1.2,
                            "childhood_vaccines": ["Polio-1"]})],
            )
    }

    fn analysis() -> ChronicDiseaseAnalysis {
        ChronicDiseaseAnalysis {
            analysis_sections: AnalysisSections {
                metrics: AnalysisSection::new(METRICS_TITLE, Some("m".into())),
                relationships: AnalysisSection::new(RELATIONSHIPS_TITLE, None),
                patterns: AnalysisSection::new(PATTERNS_TITLE, None),
                recommendations: AnalysisSection::new(RECOMMENDATIONS_TITLE, Some("r".into())),
            },
            statistics: AnalysisStatistics {
                total_records: 3,
                features: vec![],
                risk_scores: json!({}),
            },
        }
    }

    fn age_total(dashboard: &Dashboard) -> u64 {
        match dashboard.panel(Metric::Age).view() {
            Some(PanelView::Age(panel)) => panel.distribution.total,
            other => panic!("age panel not loaded: {other:?}"),
        }
    }

    #[tokio::test]
    async fn refresh_settles_every_panel() {
        let dashboard = Arc::new(Dashboard::new());
        let store: Arc<dyn RecordStore> = Arc::new(store());
        let ticket = dashboard.select_region("B").unwrap();

        let outcomes = refresh_region(dashboard.clone(), store, ticket).await;
        assert_eq!(outcomes.len(), Metric::ALL.len());
        assert!(outcomes.iter().all(|(_, o)| *o == ApplyOutcome::Applied));

        let snapshot = dashboard.snapshot();
        assert!(snapshot.panels.values().all(PanelState::is_settled));
        assert_eq!(age_total(&dashboard), 1);
        assert!(matches!(
            dashboard.panel(Metric::ChronicDisease),
            PanelState::Empty { .. }
        ));
    }

    #[tokio::test]
    async fn one_failing_metric_leaves_others_intact() {
        let memory = store();
        memory.fail_table(fetch::HEALTH_RECORDS, "timeout");
        let dashboard = Arc::new(Dashboard::new());
        let ticket = dashboard.select_region("B").unwrap();

        refresh_region(dashboard.clone(), Arc::new(memory), ticket).await;

        assert!(matches!(dashboard.panel(Metric::Bmi), PanelState::Error { .. }));
        assert!(matches!(dashboard.panel(Metric::Income), PanelState::Error { .. }));
        assert_eq!(age_total(&dashboard), 1);
    }

    #[tokio::test]
    async fn late_response_for_previous_region_is_discarded() {
        let memory = store();
        memory.delay_region("A", Duration::from_millis(300));
        let store: Arc<dyn RecordStore> = Arc::new(memory);
        let dashboard = Arc::new(Dashboard::new());

        let ticket_a = dashboard.select_region("A").unwrap();
        let slow = tokio::spawn(refresh_region(dashboard.clone(), store.clone(), ticket_a));

        let ticket_b = dashboard.select_region("B").unwrap();
        refresh_region(dashboard.clone(), store, ticket_b).await;
        assert_eq!(age_total(&dashboard), 1);

        let stale = slow.await.unwrap();
        assert!(stale.iter().all(|(_, o)| *o == ApplyOutcome::Stale));

        // Region A (two elderly patients) never replaced region B's panel.
        assert_eq!(dashboard.snapshot().region_id.as_deref(), Some("B"));
        assert_eq!(age_total(&dashboard), 1);
    }

    #[tokio::test]
    async fn generated_report_survives_slower_refresh_of_same_region() {
        let memory = store();
        memory.delay_region("B", Duration::from_millis(300));
        let store: Arc<dyn RecordStore> = Arc::new(memory);
        let dashboard = Arc::new(Dashboard::new());

        let ticket = dashboard.select_region("B").unwrap();
        let refresh = tokio::spawn(refresh_region(dashboard.clone(), store, ticket));
        tokio::time::sleep(Duration::from_millis(20)).await;

        let service = Arc::new(MockAnalysisService::new().with_chronic(Ok(analysis())));
        generate_chronic(&dashboard, service, "B").await.unwrap();

        let outcomes = refresh.await.unwrap();
        let chronic = outcomes
            .iter()
            .find(|(m, _)| *m == Metric::ChronicDisease)
            .map(|(_, o)| *o);
        assert_eq!(chronic, Some(ApplyOutcome::Stale));
        assert!(matches!(
            dashboard.panel(Metric::ChronicDisease).view(),
            Some(PanelView::ChronicDisease(_))
        ));
        // Same-region panels without a newer request still landed.
        assert_eq!(age_total(&dashboard), 1);
    }

    #[tokio::test]
    async fn generate_chronic_updates_current_panel() {
        let dashboard = Dashboard::new();
        dashboard.select_region("B").unwrap();
        let service = Arc::new(MockAnalysisService::new().with_chronic(Ok(analysis())));

        let result = generate_chronic(&dashboard, service.clone(), "B").await.unwrap();
        assert_eq!(result.statistics.total_records, 3);
        assert_eq!(service.calls(), 1);
        assert!(matches!(
            dashboard.panel(Metric::ChronicDisease).view(),
            Some(PanelView::ChronicDisease(_))
        ));
    }

    #[tokio::test]
    async fn generate_chronic_for_other_region_leaves_dashboard_alone() {
        let dashboard = Dashboard::new();
        dashboard.select_region("B").unwrap();
        let service = Arc::new(MockAnalysisService::new());

        let err = generate_chronic(&dashboard, service, "A").await.unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::NotFound);
        assert_eq!(dashboard.panel(Metric::ChronicDisease), PanelState::Loading);
    }
}
