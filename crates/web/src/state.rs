use std::sync::Arc;

use storage::services::aggregation::ScoreAggregator;
use storage::services::contributions::ContributionService;
use storage::store::{CompanyStore, ContributionStore};

/// Shared handles every handler works with.
#[derive(Clone)]
pub struct AppState {
    pub companies: Arc<dyn CompanyStore>,
    pub contributions: Arc<dyn ContributionStore>,
    pub aggregator: Arc<ScoreAggregator>,
    pub writes: ContributionService,
}

impl AppState {
    pub fn new(
        companies: Arc<dyn CompanyStore>,
        contributions: Arc<dyn ContributionStore>,
        aggregator: Arc<ScoreAggregator>,
    ) -> Self {
        let writes = ContributionService::new(Arc::clone(&contributions), Arc::clone(&aggregator));

        Self {
            companies,
            contributions,
            aggregator,
            writes,
        }
    }
}
