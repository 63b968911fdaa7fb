//! Tool behaviour against a local mock of the Steam endpoints.

mod common;

use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{context_with_embedder, mock_config, start_mock_steam, KeywordEmbedder};
use steam_mcp::tools::{ToolContext, ToolRegistry};

async fn call(ctx: &ToolContext, tool: &str, params: serde_json::Value) -> String {
    ToolRegistry::with_builtins()
        .call(tool, params, ctx)
        .await
        .unwrap()
}

// ─── fetch_steam_guide ──────────────────────────────────────────────

#[tokio::test]
async fn test_short_guide_returned_whole() {
    let mock = start_mock_steam().await;
    let embedder = Arc::new(KeywordEmbedder::default());
    let ctx = context_with_embedder(mock_config(&mock, ""), embedder.clone());

    let text = call(
        &ctx,
        "fetch_steam_guide",
        json!({ "guide_id": "100", "query": "anything" }),
    )
    .await;

    assert_eq!(text, "Intro\nWelcome.\nShort guide.\n\nTips\nSave often.");
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_long_guide_returns_ranked_sections() {
    let mock = start_mock_steam().await;
    let embedder = Arc::new(KeywordEmbedder::default());
    let ctx = context_with_embedder(mock_config(&mock, ""), embedder.clone());

    let text = call(
        &ctx,
        "fetch_steam_guide",
        json!({ "guide_id": "200", "query": "final boss strategy" }),
    )
    .await;

    let entries: Vec<&str> = text.split("\n\n---\n\n").collect();
    assert_eq!(entries.len(), 5);
    assert!(entries[0].starts_with("[Score: 0.00]\nPart 17\nfinal boss strategy"));
    assert!(entries[1].starts_with("[Score: 3.00]\nPart 0\n"));
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_per_call_top_k_and_threshold() {
    let mock = start_mock_steam().await;
    let ctx = context_with_embedder(
        mock_config(&mock, ""),
        Arc::new(KeywordEmbedder::default()),
    );

    let text = call(
        &ctx,
        "fetch_steam_guide",
        json!({ "guide_id": "100", "query": "save", "top_k": 1, "size_threshold": 10 }),
    )
    .await;
    assert_eq!(text.matches("[Score: ").count(), 1);
}

#[tokio::test]
async fn test_configured_retrieval_defaults_apply() {
    let mock = start_mock_steam().await;
    let config = mock_config(&mock, "[retrieval]\ntop_k = 2\n");
    let ctx = context_with_embedder(config, Arc::new(KeywordEmbedder::default()));

    let text = call(
        &ctx,
        "fetch_steam_guide",
        json!({ "guide_id": "200", "query": "boss" }),
    )
    .await;
    assert_eq!(text.matches("[Score: ").count(), 2);
}

#[tokio::test]
async fn test_age_gate_is_followed() {
    let mock = start_mock_steam().await;
    let ctx = context_with_embedder(
        mock_config(&mock, ""),
        Arc::new(KeywordEmbedder::default()),
    );

    let text = call(
        &ctx,
        "fetch_steam_guide",
        json!({ "guide_id": "300", "query": "q" }),
    )
    .await;
    assert!(text.starts_with("Intro\nWelcome."));
    assert_eq!(mock.guide_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_removed_guide_and_empty_guide() {
    let mock = start_mock_steam().await;
    let ctx = context_with_embedder(
        mock_config(&mock, ""),
        Arc::new(KeywordEmbedder::default()),
    );

    let removed = call(
        &ctx,
        "fetch_steam_guide",
        json!({ "guide_id": "999", "query": "q" }),
    )
    .await;
    assert_eq!(removed, "Info: No subsections found for guide ID 999.");

    let empty = call(
        &ctx,
        "fetch_steam_guide",
        json!({ "guide_id": "400", "query": "q" }),
    )
    .await;
    assert_eq!(empty, "Info: No sections found in guide.");
}

#[tokio::test]
async fn test_long_guide_without_index_backend() {
    let mock = start_mock_steam().await;
    let config = mock_config(
        &mock,
        "[retrieval]\nindex_backend = \"none\"\n",
    );
    let ctx = ToolContext::from_config(Arc::new(config)).unwrap();

    let long = call(
        &ctx,
        "fetch_steam_guide",
        json!({ "guide_id": "200", "query": "boss" }),
    )
    .await;
    assert!(long.starts_with("Error: A vector search backend is required"));

    let short = call(
        &ctx,
        "fetch_steam_guide",
        json!({ "guide_id": "100", "query": "boss" }),
    )
    .await;
    assert!(short.starts_with("Intro\n"));
}

#[tokio::test]
async fn test_long_guide_with_disabled_embeddings() {
    let mock = start_mock_steam().await;
    let ctx = ToolContext::from_config(Arc::new(mock_config(&mock, ""))).unwrap();

    let text = call(
        &ctx,
        "fetch_steam_guide",
        json!({ "guide_id": "200", "query": "boss" }),
    )
    .await;
    assert!(text.starts_with("Error: Embedding model unavailable"));
}

#[tokio::test]
async fn test_unreachable_community_reports_fetch_error() {
    let mock = start_mock_steam().await;
    let mut config = mock_config(&mock, "");
    config.steam.community_base = "http://127.0.0.1:9".to_string();
    let ctx = ToolContext::from_config(Arc::new(config)).unwrap();

    let text = call(
        &ctx,
        "fetch_steam_guide",
        json!({ "guide_id": "100", "query": "q" }),
    )
    .await;
    assert!(text.starts_with("Error fetching guide: "));
}

// ─── search_steam_guides ────────────────────────────────────────────

#[tokio::test]
async fn test_search_guides_listing() {
    let mock = start_mock_steam().await;
    let ctx = ToolContext::from_config(Arc::new(mock_config(&mock, ""))).unwrap();

    let text = call(
        &ctx,
        "search_steam_guides",
        json!({ "app_id": 620, "query": "portal gun" }),
    )
    .await;
    assert_eq!(
        text,
        "Top 2 guides for 'portal gun':\n\
         1. ID: 111\n   Name: Portal Gun 101\n   Description: Portals explained\n\
         2. ID: 222\n   Name: Achievements\n   Description: All of them"
    );
}

#[tokio::test]
async fn test_search_guides_falls_back_to_hub_feed() {
    let mock = start_mock_steam().await;
    let ctx = ToolContext::from_config(Arc::new(mock_config(&mock, ""))).unwrap();

    let text = call(
        &ctx,
        "search_steam_guides",
        json!({ "app_id": 10, "query": "aim" }),
    )
    .await;
    assert_eq!(
        text,
        "Top 1 guides for 'aim':\n1. ID: 333\n   Name: Hub Guide\n   Description: From the hub feed"
    );
}

#[tokio::test]
async fn test_search_guides_respects_limit() {
    let mock = start_mock_steam().await;
    let mut config = mock_config(&mock, "");
    config.steam.guide_search_limit = 1;
    let ctx = ToolContext::from_config(Arc::new(config)).unwrap();

    let text = call(
        &ctx,
        "search_steam_guides",
        json!({ "app_id": 620, "query": "portal" }),
    )
    .await;
    assert!(text.starts_with("Top 1 guides for 'portal':"));
}

// ─── Web API tools ──────────────────────────────────────────────────

#[tokio::test]
async fn test_owned_and_recent_games() {
    let mock = start_mock_steam().await;
    let ctx = ToolContext::from_config(Arc::new(mock_config(&mock, ""))).unwrap();

    let owned = call(&ctx, "get_owned_games", json!({})).await;
    assert_eq!(
        owned,
        "Total games owned: 2\n\
         Portal 2 (AppID: 620) - Playtime: 600 mins\n\
         Portal (AppID: 400) - Playtime: 90 mins"
    );

    let recent = call(&ctx, "get_recently_played_games", json!({})).await;
    assert_eq!(recent, "No games played in the last two weeks.");
}

#[tokio::test]
async fn test_achievements() {
    let mock = start_mock_steam().await;
    let ctx = ToolContext::from_config(Arc::new(mock_config(&mock, ""))).unwrap();

    let text = call(&ctx, "get_game_achievements", json!({ "app_id": 620 })).await;
    assert_eq!(
        text,
        "Achievements for AppID 620:\n\n\
         Wake Up Call | Unlocked: Yes | Global Unlock Rate: 91.50%\n\
         Description: Survive the manual override\n\n\
         You Monster | Unlocked: No | Global Unlock Rate: 40.25%\n\
         Description: No description"
    );
}

#[tokio::test]
async fn test_missing_credentials_message() {
    let mock = start_mock_steam().await;
    let mut config = mock_config(&mock, "");
    config.steam.api_key = None;
    let ctx = ToolContext::from_config(Arc::new(config)).unwrap();

    let text = call(&ctx, "get_owned_games", json!({})).await;
    assert_eq!(text, "Error: Missing environment variables API_KEY or STEAM_ID.");
}

// ─── Registry dispatch ──────────────────────────────────────────────

#[tokio::test]
async fn test_registry_rejects_bad_calls() {
    let mock = start_mock_steam().await;
    let ctx = ToolContext::from_config(Arc::new(mock_config(&mock, ""))).unwrap();
    let registry = ToolRegistry::with_builtins();

    let unknown = registry.call("nope", json!({}), &ctx).await.unwrap_err();
    assert!(unknown.to_string().contains("unknown tool"));

    let missing = registry
        .call("get_game_achievements", json!({}), &ctx)
        .await
        .unwrap_err();
    assert!(missing.to_string().contains("app_id"));

    let negative = registry
        .call("get_game_achievements", json!({ "app_id": -1 }), &ctx)
        .await
        .unwrap_err();
    assert!(negative.to_string().contains("non-negative"));
}
