use crate::repository::project_repo::ProjectRepository;
use crate::util::error::ServiceError;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

/// Periodic removal of projects past their `expiresAt`.
pub struct CleanupService {
    pub project_repo: Arc<dyn ProjectRepository>,
}

impl CleanupService {
    pub fn new(project_repo: Arc<dyn ProjectRepository>) -> Self {
        Self { project_repo }
    }

    #[instrument(skip(self))]
    pub async fn delete_expired_projects(&self) -> Result<u64, ServiceError> {
        let deleted = self.project_repo.delete_expired(Utc::now()).await?;
        if deleted > 0 {
            info!("Deleted {} expired projects", deleted);
        }
        Ok(deleted)
    }

    /// Runs one pass immediately, then one per `period`. Failed passes are
    /// logged and the loop keeps going.
    pub fn spawn(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        info!("Project cleanup scheduled every {:?}", period);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                if let Err(e) = self.delete_expired_projects().await {
                    error!("Project cleanup failed: {}", e);
                }
            }
        })
    }
}
