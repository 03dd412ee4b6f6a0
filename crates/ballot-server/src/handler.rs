use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use serde_json::Number;

use ballot_ledger::{LedgerReader, LedgerWriter, ProposalView};
use ballot_protocol::{
    AddProposalRequest, AddProposalResponse, CountResponse, DeploymentDescriptor, EventsResponse,
    HasVotedResponse, HealthResponse, InfoResponse, ProposalListResponse, VoteRequest,
    VoteResponse, WinnerResponse, PROTOCOL_VERSION,
};
use ballot_types::AccountId;

use crate::auth::Caller;
use crate::error::{ServerError, ServerResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

/// Index from a path segment. Whole numbers outside `u64` can never name a
/// proposal, so they are out of range rather than malformed.
fn path_index(raw: &str) -> ServerResult<u64> {
    if let Ok(index) = raw.parse::<u64>() {
        return Ok(index);
    }
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Err(ServerError::IndexOutOfRange(raw.to_string()))
    } else {
        Err(ServerError::malformed(format!("proposal index {raw:?} is not an integer")))
    }
}

/// Index from a JSON body. Integers past `u64::MAX` are decoded as floats.
fn body_index(index: &Number) -> ServerResult<u64> {
    if let Some(index) = index.as_u64() {
        return Ok(index);
    }
    match index.as_f64() {
        Some(f) if f.fract() == 0.0 && (f < 0.0 || f >= u64::MAX as f64) => {
            Err(ServerError::IndexOutOfRange(index.to_string()))
        }
        _ => Err(ServerError::malformed(format!("proposal index {index} is not an integer"))),
    }
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

pub async fn info_handler(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "ballot-server".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        protocol_version: PROTOCOL_VERSION,
        address: state.descriptor.address.clone(),
        owner: state.ledger.owner().clone(),
    })
}

pub async fn descriptor_handler(State(state): State<AppState>) -> Json<DeploymentDescriptor> {
    Json(state.descriptor.as_ref().clone())
}

pub async fn list_proposals_handler(
    State(state): State<AppState>,
) -> ServerResult<Json<ProposalListResponse>> {
    let proposals = state.ledger.proposals()?;
    Ok(Json(ProposalListResponse {
        count: proposals.len() as u64,
        proposals,
    }))
}

pub async fn count_handler(State(state): State<AppState>) -> ServerResult<Json<CountResponse>> {
    Ok(Json(CountResponse {
        count: state.ledger.count()?,
    }))
}

pub async fn get_proposal_handler(
    State(state): State<AppState>,
    ApiPath(index): ApiPath<String>,
) -> ServerResult<Json<ProposalView>> {
    let index = path_index(&index)?;
    let proposal = state.ledger.get_proposal(index)?;
    Ok(Json(ProposalView::new(index, &proposal)))
}

pub async fn add_proposal_handler(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiJson(request): ApiJson<AddProposalRequest>,
) -> ServerResult<(StatusCode, Json<AddProposalResponse>)> {
    let index = state.ledger.add_proposal(&request.name, &caller)?;
    Ok((StatusCode::CREATED, Json(AddProposalResponse { index })))
}

pub async fn vote_handler(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiJson(request): ApiJson<VoteRequest>,
) -> ServerResult<Json<VoteResponse>> {
    let index = body_index(&request.index)?;
    state.ledger.vote(index, &caller)?;
    Ok(Json(VoteResponse {
        voter: caller,
        index,
    }))
}

pub async fn has_voted_handler(
    State(state): State<AppState>,
    ApiPath(account): ApiPath<String>,
) -> ServerResult<Json<HasVotedResponse>> {
    let account = AccountId::from_hex(&account)?;
    let has_voted = state.ledger.has_voted(&account)?;
    Ok(Json(HasVotedResponse { account, has_voted }))
}

pub async fn winner_handler(State(state): State<AppState>) -> ServerResult<Json<WinnerResponse>> {
    let winner = state.ledger.winner()?;
    Ok(Json(WinnerResponse {
        has_proposals: winner.name().is_some(),
        winner: winner.text().to_string(),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    #[serde(default)]
    pub since: u64,
}

pub async fn events_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EventsQuery>,
) -> ServerResult<Json<EventsResponse>> {
    let events = state.ledger.events_since(query.since)?;
    let cursor = events.last().map_or(query.since, |event| event.seq);
    Ok(Json(EventsResponse { events, cursor }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_index_bounds() {
        assert_eq!(path_index("0").unwrap(), 0);
        assert_eq!(path_index("18446744073709551615").unwrap(), u64::MAX);
        assert!(matches!(path_index("-1"), Err(ServerError::IndexOutOfRange(_))));
        assert!(matches!(
            path_index("18446744073709551616"),
            Err(ServerError::IndexOutOfRange(_))
        ));
        assert!(matches!(path_index("two"), Err(ServerError::Malformed { .. })));
        assert!(matches!(path_index("-"), Err(ServerError::Malformed { .. })));
    }

    #[test]
    fn body_index_bounds() {
        let parse = |json: &str| body_index(&serde_json::from_str::<Number>(json).unwrap());
        assert_eq!(parse("3").unwrap(), 3);
        assert!(matches!(parse("-3"), Err(ServerError::IndexOutOfRange(_))));
        assert!(matches!(
            parse("18446744073709551616"),
            Err(ServerError::IndexOutOfRange(_))
        ));
        assert!(matches!(parse("1.5"), Err(ServerError::Malformed { .. })));
    }
}
