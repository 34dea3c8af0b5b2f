use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    errors::AppError,
    repositories::{matching::MatchRepository, profile::ProfileRepository},
};

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub developers: i64,
    pub companies: i64,
    pub matches: BTreeMap<String, i64>,
    pub conversations: i64,
    pub messages: i64,
}

pub struct AdminHandler<P, M>
where
    P: ProfileRepository,
    M: MatchRepository,
{
    pub profile_repo: P,
    pub match_repo: M,
}

impl<P, M> AdminHandler<P, M>
where
    P: ProfileRepository,
    M: MatchRepository,
{
    pub fn new(profile_repo: P, match_repo: M) -> Self {
        AdminHandler { profile_repo, match_repo }
    }

    pub async fn dashboard(&self) -> Result<DashboardResponse, AppError> {
        let (counts, by_status) = tokio::try_join!(self.profile_repo.platform_counts(), self.match_repo.count_by_status())?;

        let mut matches: BTreeMap<String, i64> = ["pending", "mutual", "declined"]
            .into_iter()
            .map(|status| (status.to_string(), 0))
            .collect();
        for row in by_status {
            matches.insert(row.status, row.count);
        }

        Ok(DashboardResponse {
            developers: counts.developers,
            companies: counts.companies,
            matches,
            conversations: counts.conversations,
            messages: counts.messages,
        })
    }

    pub async fn database_healthy(&self) -> bool {
        self.profile_repo.check_connection().await.is_ok()
    }
}
