pub mod config;
pub mod error;
pub mod features;
pub mod middleware;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use features::{admin, analysis, companies, promise_votes, reputation, reviews, votes};
use middleware::auth::ApiKeys;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        companies::handlers::list_companies,
        companies::handlers::create_company,
        companies::handlers::get_company,
        companies::handlers::get_score_history,
        companies::handlers::record_view,
        companies::handlers::adjust_followers,
        companies::handlers::set_growth_rate,
        votes::handlers::submit_vote,
        votes::handlers::retract_vote,
        reviews::handlers::submit_review,
        reviews::handlers::moderate_review,
        promise_votes::handlers::submit_promise_vote,
        promise_votes::handlers::retract_promise_vote,
        reputation::handlers::get_user_reputation,
        admin::handlers::recompute_company,
        admin::handlers::recompute_trending,
        analysis::handlers::analyze_text,
    ),
    components(
        schemas(
            storage::dto::common::PaginationMeta,
            storage::dto::common::ScoreStatus,
            storage::dto::common::SortOrder,
            storage::dto::company::CreateCompanyRequest,
            storage::dto::company::CompanyResponse,
            storage::dto::company::ScoreHistoryResponse,
            storage::dto::company::AdjustFollowersRequest,
            storage::dto::company::UpdateGrowthRateRequest,
            storage::dto::company::TrendingSweepResponse,
            storage::dto::vote::SubmitVoteRequest,
            storage::dto::vote::VoteReceipt,
            storage::dto::review::DimensionRatingInput,
            storage::dto::review::SubmitReviewRequest,
            storage::dto::review::ModerateReviewRequest,
            storage::dto::review::ReviewModerationResponse,
            storage::dto::promise_vote::SubmitPromiseVoteRequest,
            storage::dto::promise_vote::PromiseVoteReceipt,
            storage::dto::reputation::ReputationResponse,
            storage::dto::analysis::AnalyzeTextRequest,
            storage::dto::analysis::TextAnalysisResponse,
            storage::models::Dimension,
            storage::models::ScoreSnapshot,
            storage::models::VerificationTier,
            storage::models::Vote,
            storage::models::Review,
            storage::models::ReviewStatus,
            storage::models::DimensionRating,
            storage::models::PromiseVote,
            storage::services::heuristics::EthicsAssessment,
        )
    ),
    tags(
        (name = "companies", description = "Company profiles, scores and engagement"),
        (name = "votes", description = "Per-dimension user votes"),
        (name = "reviews", description = "Reviews and moderation"),
        (name = "promise-votes", description = "Votes on whether public promises were kept"),
        (name = "reputation", description = "User reputation"),
        (name = "admin", description = "Administrative recomputation"),
        (name = "analysis", description = "Keyword heuristics for free text"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

/// The full HTTP surface: `/api` routes, Swagger UI and CORS.
pub fn app(state: AppState, api_keys: ApiKeys) -> Router {
    let api = Router::new()
        .merge(companies::routes::routes(api_keys.clone()))
        .merge(votes::routes::routes())
        .merge(reviews::routes::routes(api_keys.clone()))
        .merge(promise_votes::routes::routes())
        .merge(reputation::routes::routes())
        .merge(admin::routes::routes(api_keys))
        .merge(analysis::routes::routes());

    Router::new()
        .nest("/api", api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
