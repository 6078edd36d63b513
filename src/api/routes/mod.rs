pub mod maps;
pub mod players;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub records: usize,
    pub players: usize,
    pub maps: usize,
    pub loaded_at: DateTime<Utc>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let data = &state.dataset;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        records: data.records.len(),
        players: data.player_stats.len(),
        maps: data.map_statistics.len(),
        loaded_at: data.loaded_at,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::dataset::Dataset;
    use crate::models::{Competitor, MapCatalog, MatchRecord, TierTable};

    fn competitor((name, race): (&str, &str), won: bool) -> Competitor {
        Competitor {
            id: name.to_lowercase(),
            display_name: name.to_string(),
            race: race.to_string(),
            result: if won { "1" } else { "" }.to_string(),
            ..Default::default()
        }
    }

    pub fn game(
        date: &str,
        category: &str,
        map: &str,
        first: (&str, &str),
        second: (&str, &str),
        first_won: bool,
    ) -> MatchRecord {
        MatchRecord {
            date: date.to_string(),
            tournament: "Cup".to_string(),
            map: map.to_string(),
            first: competitor(first, first_won),
            second: competitor(second, !first_won),
            remark: category.to_string(),
            category: category.to_string(),
            ..Default::default()
        }
    }

    pub fn test_app() -> axum::Router {
        let records = vec![
            game("2025-01-01", "AXL", "dejavu", ("Flash", "T"), ("Bisu", "P"), true),
            game("2025-01-02", "AXL", "dejavu", ("Bisu", "P"), ("Flash", "T"), true),
            game("2025-01-03", "개인전", "eclipse", ("Flash", "T"), ("Jaedong", "Z"), true),
            game("2025-01-04", "AXPL", "dejavu", ("Jaedong", "Z"), ("Bisu", "P"), false),
            game("2025-01-05", "AXL", "newmap", ("Flash", "T"), ("Bisu", "P"), true),
        ];
        let mut tiers = TierTable::new();
        tiers.insert("jaedong", "1");
        let dataset = Dataset::build(records, tiers);
        build_router(AppState::new(dataset, MapCatalog::default()))
    }

    pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{get_json, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health() {
        let (status, json) = get_json(test_app(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["records"], 5);
        assert_eq!(json["players"], 3);
        assert_eq!(json["maps"], 3);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _) = get_json(test_app(), "/api/nothing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
