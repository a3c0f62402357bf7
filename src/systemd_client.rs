use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{
    discovery::{
        CommandRunner, Discovery, JournalEntry, SystemCommandRunner, Tool, UnitRecord,
        UnitStatusResult,
    },
    errors::DiscoveryError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalQuery {
    pub unit: String,
    pub limit: i64,
    pub since: Option<String>,
}

#[async_trait]
pub trait UnitProvider: Send + Sync {
    async fn list_units(&self) -> Result<Vec<UnitRecord>, DiscoveryError>;

    async fn status_for_units(
        &self,
        units: Vec<String>,
    ) -> Result<Vec<UnitStatusResult>, DiscoveryError>;

    async fn journal_entries(
        &self,
        query: &JournalQuery,
    ) -> Result<Vec<JournalEntry>, DiscoveryError>;
}

/// Runs the blocking discovery engine on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct CliSystemdClient<R = SystemCommandRunner> {
    discovery: Arc<Discovery<R>>,
}

impl CliSystemdClient {
    pub fn new() -> Self {
        Self::with_runner(SystemCommandRunner)
    }
}

impl Default for CliSystemdClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner + 'static> CliSystemdClient<R> {
    pub fn with_runner(runner: R) -> Self {
        Self {
            discovery: Arc::new(Discovery::new(runner)),
        }
    }

    async fn run_blocking<T, F>(&self, task: F) -> Result<T, DiscoveryError>
    where
        T: Send + 'static,
        F: FnOnce(&Discovery<R>) -> Result<T, DiscoveryError> + Send + 'static,
    {
        let discovery = Arc::clone(&self.discovery);
        tokio::task::spawn_blocking(move || task(&discovery))
            .await
            .map_err(|err| DiscoveryError::Worker(err.to_string()))?
    }
}

#[async_trait]
impl<R: CommandRunner + 'static> UnitProvider for CliSystemdClient<R> {
    async fn list_units(&self) -> Result<Vec<UnitRecord>, DiscoveryError> {
        self.run_blocking(|discovery| discovery.list_units()).await
    }

    async fn status_for_units(
        &self,
        units: Vec<String>,
    ) -> Result<Vec<UnitStatusResult>, DiscoveryError> {
        self.run_blocking(move |discovery| Ok(discovery.status_for_units(&units)))
            .await
    }

    async fn journal_entries(
        &self,
        query: &JournalQuery,
    ) -> Result<Vec<JournalEntry>, DiscoveryError> {
        let query = query.clone();
        self.run_blocking(move |discovery| {
            discovery.journal_entries(&query.unit, query.limit, query.since.as_deref())
        })
        .await
    }
}

/// Missing tools are not fatal; each request that needs one reports it.
pub fn report_tool_availability() {
    for tool in [Tool::Systemctl, Tool::Journalctl] {
        match tool.location() {
            Some(path) => {
                info!(program = tool.program(), path = %path.display(), "located executable")
            }
            None => warn!(program = tool.program(), "executable not found on PATH"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CliSystemdClient, JournalQuery, UnitProvider};
    use crate::discovery::{testing::ScriptedRunner, ProbeStatus};
    use crate::errors::DiscoveryError;

    #[tokio::test]
    async fn bridges_listing_onto_blocking_pool() {
        let client = CliSystemdClient::with_runner(
            ScriptedRunner::new().respond("custom.service loaded active running Custom", 0),
        );

        let units = client.list_units().await.expect("listing succeeds");

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].name, "custom.service");
        assert!(!units[0].is_standard_service);
    }

    #[tokio::test]
    async fn status_batch_is_never_an_error() {
        let client = CliSystemdClient::with_runner(ScriptedRunner::new().fail(
            DiscoveryError::ExecutableUnavailable {
                program: "systemctl",
            },
        ));

        let results = client
            .status_for_units(vec!["a.service".to_string()])
            .await
            .expect("batch completes");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, ProbeStatus::Error);
    }

    #[tokio::test]
    async fn journal_query_surfaces_contract_errors() {
        let client = CliSystemdClient::with_runner(ScriptedRunner::new());

        let err = client
            .journal_entries(&JournalQuery {
                unit: String::new(),
                limit: 10,
                since: None,
            })
            .await
            .expect_err("empty unit must fail");

        assert!(matches!(err, DiscoveryError::MissingUnit));
    }
}
