use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::models::{
    MatchRecord, OpponentRecord, Outcome, PlayerStats, PlayerSummary, WinLoss,
};
use crate::roster::{tiers_present, RosterQuery, SortField, SortOrder};

#[derive(Debug, Deserialize)]
pub struct ListPlayersParams {
    pub search: Option<String>,
    pub tier: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListPlayersParams {
    fn roster_query(&self) -> Result<RosterQuery, ApiError> {
        let sort = match self.sort.as_deref() {
            Some(s) => s.parse::<SortField>().map_err(ApiError::BadRequest)?,
            None => SortField::default(),
        };
        let order = match self.order.as_deref() {
            Some(s) => s.parse::<SortOrder>().map_err(ApiError::BadRequest)?,
            None => SortOrder::default(),
        };
        Ok(RosterQuery {
            search: self.search.clone(),
            tier: self.tier.clone().filter(|t| !t.is_empty() && t != "all"),
            sort,
            order,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerListResponse {
    pub players: Vec<PlayerSummary>,
    /// Tier labels available for filtering
    pub tiers: Vec<String>,
    pub pagination: PaginationMeta,
}

pub async fn list_players(
    State(state): State<AppState>,
    Query(params): Query<ListPlayersParams>,
) -> Result<Json<PlayerListResponse>, ApiError> {
    let query = params.roster_query()?;
    let summaries = &state.dataset.player_summaries;
    let rows = query.apply(summaries);

    let pagination = Pagination::new(params.page, params.page_size);
    let total_items = rows.len() as u32;
    let players = pagination
        .page_of(&rows)
        .iter()
        .map(|s| (*s).clone())
        .collect();

    Ok(Json(PlayerListResponse {
        players,
        tiers: tiers_present(summaries)
            .into_iter()
            .map(str::to_string)
            .collect(),
        pagination: PaginationMeta::new(&pagination, total_items),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetailResponse {
    #[serde(flatten)]
    pub stats: PlayerStats,
    pub main_race: String,
    pub tier: String,
}

fn find_player<'a>(state: &'a AppState, id: &str) -> Result<&'a PlayerStats, ApiError> {
    state
        .dataset
        .player(id)
        .ok_or_else(|| ApiError::NotFound(format!("Player '{}' not found", id)))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlayerDetailResponse>, ApiError> {
    let stats = find_player(&state, &id)?;
    let tier = state
        .dataset
        .player_summaries
        .iter()
        .find(|s| s.player_id == stats.player_id)
        .map(|s| s.tier.clone())
        .unwrap_or_default();

    Ok(Json(PlayerDetailResponse {
        main_race: stats.main_race().unwrap_or_default().to_string(),
        stats: stats.clone(),
        tier,
    }))
}

#[derive(Debug, Deserialize)]
pub struct OpponentSearchParams {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentSearchResponse {
    pub player_id: String,
    pub opponents: Vec<OpponentRecord>,
}

pub async fn search_opponents(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<OpponentSearchParams>,
) -> Result<Json<OpponentSearchResponse>, ApiError> {
    let stats = find_player(&state, &id)?;
    let opponents = stats
        .search_opponents(params.search.as_deref().unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(OpponentSearchResponse {
        player_id: stats.player_id.clone(),
        opponents,
    }))
}

/// One game seen from a player's side.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub no: String,
    pub date: String,
    pub tournament: String,
    pub round: String,
    pub map: String,
    pub map_name: String,
    pub race: String,
    pub opponent_id: String,
    pub opponent_display_name: String,
    pub opponent_race: String,
    pub outcome: Outcome,
}

impl MatchView {
    fn new(record: &MatchRecord, player_id: &str, state: &AppState) -> Option<Self> {
        let side = record.sides_of(player_id).next()?;
        let me = record.competitor(side);
        let opponent = record.competitor(side.opposite());
        Some(Self {
            no: record.no.clone(),
            date: record.date.clone(),
            tournament: record.tournament.clone(),
            round: record.round.clone(),
            map: record.map.clone(),
            map_name: state.maps.name_for(&record.map).to_string(),
            race: me.race.clone(),
            opponent_id: opponent.id.clone(),
            opponent_display_name: opponent.display_name.clone(),
            opponent_race: opponent.race.clone(),
            outcome: record.winner().outcome_for(side),
        })
    }
}

fn match_views(records: &[&MatchRecord], player_id: &str, state: &AppState) -> Vec<MatchView> {
    records
        .iter()
        .filter_map(|r| MatchView::new(r, player_id, state))
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadResponse {
    pub player_id: String,
    pub opponent_id: String,
    pub record: WinLoss,
    pub matches: Vec<MatchView>,
}

pub async fn head_to_head(
    State(state): State<AppState>,
    Path((id, opponent)): Path<(String, String)>,
) -> Result<Json<HeadToHeadResponse>, ApiError> {
    let stats = find_player(&state, &id)?;
    let opponent_id = opponent.trim().to_lowercase();
    let record = stats
        .opponent_record(&opponent_id)
        .map(|o| o.record.clone())
        .unwrap_or_default();
    let found = state.dataset.matches_between(&stats.player_id, &opponent_id);

    Ok(Json(HeadToHeadResponse {
        matches: match_views(&found, &stats.player_id, &state),
        player_id: stats.player_id.clone(),
        opponent_id,
        record,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMapResponse {
    pub player_id: String,
    pub map: String,
    pub map_name: String,
    pub record: WinLoss,
    pub matches: Vec<MatchView>,
}

pub async fn player_on_map(
    State(state): State<AppState>,
    Path((id, map)): Path<(String, String)>,
) -> Result<Json<PlayerMapResponse>, ApiError> {
    let stats = find_player(&state, &id)?;
    let map = map.trim().to_lowercase();
    let record = stats
        .map_record(&map)
        .map(|m| m.record.clone())
        .unwrap_or_default();
    let found = state.dataset.matches_on_map(&stats.player_id, &map);

    Ok(Json(PlayerMapResponse {
        matches: match_views(&found, &stats.player_id, &state),
        player_id: stats.player_id.clone(),
        map_name: state.maps.name_for(&map).to_string(),
        map,
        record,
    }))
}
