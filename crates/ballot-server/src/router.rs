use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use ballot_protocol::endpoints;

use crate::config::ServerConfig;
use crate::handler;
use crate::state::AppState;

/// Build the axum router with all ballot endpoints.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::INFO, get(handler::info_handler))
        .route(endpoints::DESCRIPTOR, get(handler::descriptor_handler))
        .route(
            endpoints::PROPOSALS,
            get(handler::list_proposals_handler).post(handler::add_proposal_handler),
        )
        .route(endpoints::PROPOSAL_COUNT, get(handler::count_handler))
        .route(endpoints::PROPOSAL, get(handler::get_proposal_handler))
        .route(endpoints::VOTES, post(handler::vote_handler))
        .route(endpoints::VOTER, get(handler::has_voted_handler))
        .route(endpoints::WINNER, get(handler::winner_handler))
        .route(endpoints::EVENTS, get(handler::events_handler))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins = if config.allow_origins.is_empty() {
        AllowOrigin::any()
    } else {
        // Origins are checked by `ServerConfig::validate`.
        AllowOrigin::list(
            config
                .allow_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        )
    };
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_origin(origins)
}
