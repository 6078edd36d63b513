use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{MapMatchupStats, MapStatistics};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSummary {
    pub map: String,
    pub name: String,
    pub total_games: u32,
    pub matchups: Vec<MapMatchupStats>,
}

impl MapSummary {
    fn new(stats: &MapStatistics, state: &AppState) -> Self {
        Self {
            map: stats.map.clone(),
            name: state.maps.name_for(&stats.map).to_string(),
            total_games: stats.total_games,
            matchups: stats.matchups.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MapListResponse {
    pub maps: Vec<MapSummary>,
}

pub async fn list_maps(State(state): State<AppState>) -> Json<MapListResponse> {
    let maps = state
        .dataset
        .map_statistics
        .iter()
        .map(|m| MapSummary::new(m, &state))
        .collect();
    Json(MapListResponse { maps })
}

pub async fn get_map(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<MapSummary>, ApiError> {
    let stats = state
        .dataset
        .map(&code)
        .ok_or_else(|| ApiError::NotFound(format!("Map '{}' not found", code)))?;
    Ok(Json(MapSummary::new(stats, &state)))
}
