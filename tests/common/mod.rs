//! Shared fixtures: a local stand-in for the Steam Web API and Community
//! site, and a deterministic embedding provider.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    routing::get,
    Json, Router,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use steam_mcp::config::Config;
use steam_mcp::steam::SteamClient;
use steam_mcp::tools::ToolContext;
use steam_mcp_core::embedding::EmbeddingProvider;
use steam_mcp_core::index::FlatL2Backend;
use steam_mcp_core::Retriever;

// ─── Mock Steam ─────────────────────────────────────────────────────

#[derive(Clone)]
struct MockState {
    base: String,
    guide_hits: Arc<AtomicUsize>,
}

pub struct MockSteam {
    pub base: String,
    pub guide_hits: Arc<AtomicUsize>,
}

fn guide_page(sections: &[(String, String)]) -> String {
    let boxes: String = sections
        .iter()
        .map(|(title, body)| {
            format!(
                r#"<div class="subSection detailBox"><div class="subSectionTitle">{}</div><div class="subSectionDesc">{}</div></div>"#,
                title, body
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="guide subSections">{}</div></body></html>"#,
        boxes
    )
}

/// 40 sections of roughly 1000 characters. Section 17 is the only one
/// about the final boss.
pub fn long_guide_sections() -> Vec<(String, String)> {
    (0..40)
        .map(|i| {
            let topic = if i == 17 {
                "final boss strategy: bait the slam, then punish"
            } else {
                "collectibles and side quests"
            };
            let filler = "lorem ipsum ".repeat(80);
            (format!("Part {}", i), format!("{}<br>{}", topic, filler))
        })
        .collect()
}

async fn filedetails(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
) -> Html<String> {
    state.guide_hits.fetch_add(1, Ordering::SeqCst);
    let id = query.get("id").map(String::as_str).unwrap_or_default();
    let page = match id {
        "100" => guide_page(&[
            ("Intro".to_string(), "Welcome.<br>Short guide.".to_string()),
            ("Tips".to_string(), "Save often.".to_string()),
        ]),
        "200" => guide_page(&long_guide_sections()),
        "300" => format!(
            r#"<html><body><button onclick="Proceed()">View Page</button>
            <script>function Proceed() {{ document.location = "{}/sharedfiles/filedetails/?id=100"; }}</script>
            </body></html>"#,
            state.base
        ),
        "400" => r#"<div class="guide subSections"></div>"#.to_string(),
        _ => "<html><body><p>This item has been removed.</p></body></html>".to_string(),
    };
    Html(page)
}

async fn guide_listing(Path(app_id): Path<u64>) -> Html<String> {
    if app_id != 620 {
        return Html("<html><body><div class=\"workshopBrowseItems\"></div></body></html>".to_string());
    }
    Html(
        r#"<div class="workshopBrowseItems">
          <div class="workshopItemCollectionContainer">
            <a class="workshopItemCollection" href="https://steamcommunity.com/sharedfiles/filedetails/?id=111">
              <div class="workshopItemTitle">Portal Gun 101</div>
              <div class="workshopItemShortDesc">Portals explained</div>
            </a>
          </div>
          <div class="workshopItemCollectionContainer">
            <a class="workshopItemCollection" href="https://steamcommunity.com/sharedfiles/filedetails/?id=222">
              <div class="workshopItemTitle">Achievements</div>
              <div class="workshopItemShortDesc">All of them</div>
            </a>
          </div>
        </div>"#
            .to_string(),
    )
}

async fn homecontent(Path(_app_id): Path<u64>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "results_html": r#"<a class="workshopItemCollection" href="https://steamcommunity.com/sharedfiles/filedetails/?id=333"><div class="workshopItemTitle">Hub Guide</div><div class="workshopItemShortDesc">From the hub feed</div></a>"#
    }))
}

async fn owned_games(Query(query): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
    assert_eq!(query.get("key").map(String::as_str), Some("test-key"));
    Json(serde_json::json!({
        "response": {
            "game_count": 2,
            "games": [
                { "appid": 620, "name": "Portal 2", "playtime_forever": 600 },
                { "appid": 400, "name": "Portal", "playtime_forever": 90 }
            ]
        }
    }))
}

async fn recent_games() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "response": { "total_count": 0 } }))
}

async fn player_achievements() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "playerstats": {
            "achievements": [
                { "apiname": "ACH_WAKE_UP", "achieved": 1 },
                { "apiname": "ACH_LASER", "achieved": 0 }
            ]
        }
    }))
}

async fn schema() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "game": { "availableGameStats": { "achievements": [
            { "name": "ACH_WAKE_UP", "displayName": "Wake Up Call", "description": "Survive the manual override" },
            { "name": "ACH_LASER", "displayName": "You Monster" }
        ] } }
    }))
}

async fn global_percentages() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "achievementpercentages": { "achievements": [
            { "name": "ACH_WAKE_UP", "percent": "91.5" },
            { "name": "ACH_LASER", "percent": 40.25 }
        ] }
    }))
}

/// Start the mock on an ephemeral port.
pub async fn start_mock_steam() -> MockSteam {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let guide_hits = Arc::new(AtomicUsize::new(0));
    let state = MockState {
        base: base.clone(),
        guide_hits: guide_hits.clone(),
    };

    let app = Router::new()
        .route("/sharedfiles/filedetails/", get(filedetails))
        .route("/app/{app_id}/guides/", get(guide_listing))
        .route("/app/{app_id}/homecontent/", get(homecontent))
        .route("/IPlayerService/GetOwnedGames/v1/", get(owned_games))
        .route("/IPlayerService/GetRecentlyPlayedGames/v1/", get(recent_games))
        .route(
            "/ISteamUserStats/GetPlayerAchievements/v1/",
            get(player_achievements),
        )
        .route("/ISteamUserStats/GetSchemaForGame/v2/", get(schema))
        .route(
            "/ISteamUserStats/GetGlobalAchievementPercentagesForApp/v0002/",
            get(global_percentages),
        )
        .with_state(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockSteam { base, guide_hits }
}

// ─── Embedding double ───────────────────────────────────────────────

/// Embeds text as counts of a few guide keywords.
#[derive(Default)]
pub struct KeywordEmbedder {
    pub calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn model_name(&self) -> &str {
        "keywords"
    }
    fn dims(&self) -> usize {
        3
    }
    async fn embed(&self, texts: &[String]) -> steam_mcp_core::error::Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| {
                vec![
                    t.matches("boss").count() as f32,
                    t.matches("strategy").count() as f32,
                    t.matches("collectibles").count() as f32,
                ]
            })
            .collect())
    }
}

// ─── Config and context ─────────────────────────────────────────────

/// Config pointing both Steam hosts at the mock, with credentials set.
pub fn mock_config(mock: &MockSteam, extra_toml: &str) -> Config {
    let content = format!(
        r#"
[steam]
api_key = "test-key"
steam_id = "76561190000000000"
api_base = "{base}"
community_base = "{base}"
timeout_secs = 5

[embedding]
provider = "disabled"

{extra}
"#,
        base = mock.base,
        extra = extra_toml
    );
    steam_mcp::config::parse_config(&content).unwrap()
}

/// Tool context using `embedder` and a flat index backend.
pub fn context_with_embedder(config: Config, embedder: Arc<dyn EmbeddingProvider>) -> ToolContext {
    let steam = SteamClient::new(config.steam.clone()).unwrap();
    let retriever = Retriever::new(embedder, config.retrieval.params())
        .with_index_backend(Arc::new(FlatL2Backend));
    ToolContext::new(Arc::new(config), steam, retriever)
}
