//! Scripted session that exercises every part of the sync layer: cached
//! reads, in-flight deduplication, debounced search, mutations, injected
//! failures, export and logout.

use std::time::Duration;

use serde::Serialize;
use tokio::time::sleep;

use crmsync_core::cache::QueryKey;
use crmsync_core::customer::{CreateCustomerRequest, CustomerStatus, UpdateCustomerRequest};
use crmsync_core::listing::StatusFilter;

use crate::api::ApiError;
use crate::state::AppState;
use crate::timer::DEBOUNCE_DELAY;

const SIMULATED_FAILURE: &str = "Error de red simulado";

/// One step of the demo and what it observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoStep {
    pub step: &'static str,
    pub outcome: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DemoReport {
    pub steps: Vec<DemoStep>,
}

impl DemoReport {
    fn record(&mut self, step: &'static str, outcome: impl Into<String>) {
        let outcome = outcome.into();
        tracing::info!(step, outcome = %outcome, "Demo step");
        self.steps.push(DemoStep { step, outcome });
    }
}

/// Runs the scripted session. Expects `state` to be logged in and leaves it
/// logged out.
pub async fn run(state: &AppState) -> anyhow::Result<DemoReport> {
    let mut report = DemoReport::default();
    let key = QueryKey::customers();
    let mut mutations = state.mutations.subscribe();

    let mut view = state.list_view()?;
    let page = view.render().await?;
    report.record(
        "list",
        format!(
            "page {}/{} with {} of {} customers",
            page.current_page,
            page.total_pages,
            page.items.len(),
            page.total_items
        ),
    );

    state.cache.invalidate(&key);
    let fetches = state.customers.fetch_count();
    let (a, b, c) = tokio::join!(
        state.list_customers(),
        state.list_customers(),
        state.list_customers()
    );
    a?;
    b?;
    c?;
    report.record(
        "concurrent reads",
        format!("3 reads, {} fetch", state.customers.fetch_count() - fetches),
    );

    for input in ["j", "ju", "jua", "juan"] {
        view.type_search(input);
        sleep(Duration::from_millis(100)).await;
    }
    sleep(DEBOUNCE_DELAY).await;
    let page = view.render().await?;
    report.record(
        "debounced search",
        format!(
            "\"{}\" matched {} customer(s)",
            view.filters().search,
            page.total_items
        ),
    );

    view.commit_search("");
    view.set_status_filter(StatusFilter::Pending);
    let page = view.render().await?;
    report.record("status filter", format!("{} pending", page.total_items));
    view.set_status_filter(StatusFilter::All);

    let created = state
        .create_customer(
            CreateCustomerRequest::new(
                "Lucía Fernández",
                "lucia@example.com",
                "+34 611 222 333",
                "Nube Sistemas",
                CustomerStatus::Pending,
            )
            .with_notes("Alta desde la demo"),
        )
        .await?;
    let total = state.list_customers().await?.len();
    report.record(
        "create",
        format!("id {} added, {} customers", created.id, total),
    );

    let updated = state
        .update_customer(
            &created.id,
            UpdateCustomerRequest::new().with_status(CustomerStatus::Active),
        )
        .await?;
    report.record("update", format!("id {} is now {}", updated.id, updated.status));

    state.delete_customer("no-existe").await?;
    report.record("delete missing", "no-op success");
    state.list_customers().await?;

    state.customers.inject_failures(1, SIMULATED_FAILURE);
    let rejected = state
        .create_customer(CreateCustomerRequest::new(
            "Rafael Gil",
            "rafael@example.com",
            "+34 699 888 777",
            "Gil Hermanos",
            CustomerStatus::Active,
        ))
        .await;
    let message = match rejected {
        Err(error) => error.to_string(),
        Ok(customer) => anyhow::bail!("create of {} should have failed", customer.id),
    };
    let fresh = state
        .cache
        .snapshot(&key)
        .is_some_and(|entry| entry.is_fresh());
    report.record(
        "failed mutation",
        format!("\"{message}\", cache still fresh: {fresh}"),
    );

    state.cache.invalidate(&key);
    state.customers.inject_failures(1, SIMULATED_FAILURE);
    let total = state.list_customers().await?.len();
    report.record("read retry", format!("recovered after 1 failure, {total} customers"));

    let csv = view.export_csv().await?;
    report.record("export", format!("{} rows", csv.lines().count() - 1));

    state.delete_customer(&created.id).await?;
    let total = state.list_customers().await?.len();
    report.record("delete", format!("id {} removed, {} customers", created.id, total));

    let mut messages = Vec::new();
    while let Ok(event) = mutations.try_recv() {
        messages.extend(event.mutation.outcome_message());
    }
    report.record("notifications", messages.join("; "));

    state.logout().await?;
    let cleared = state.cache.snapshot(&key).is_none();
    let after_logout = state.list_customers().await;
    let gated = matches!(
        after_logout.as_ref().map_err(|e| e.fetch_error()),
        Err(Some(ApiError::Unauthenticated))
    );
    report.record(
        "logout",
        format!(
            "cache cleared: {}, reads refused: {}",
            cleared, gated
        ),
    );

    Ok(report)
}
