//! Steam Web API: library, recent activity, and achievements.
//!
//! Each call returns the text shown to the tool caller. Conditions that are
//! answers rather than failures (no credentials, no recent games, a game
//! without achievements) come back as `Ok` text; HTTP and decoding failures
//! are `Err` and get a per-tool prefix in [`crate::tools`].

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

use super::SteamClient;

pub const MISSING_CREDENTIALS: &str = "Error: Missing environment variables API_KEY or STEAM_ID.";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    response: Option<T>,
}

#[derive(Debug, Deserialize, Default)]
struct GamesResponse {
    #[serde(default)]
    games: Vec<Game>,
}

/// One entry of an owned or recently-played game list.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Game {
    pub appid: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub playtime_forever: u64,
    #[serde(default)]
    pub playtime_2weeks: u64,
}

#[derive(Debug, Deserialize, Default)]
struct PlayerStatsResponse {
    #[serde(default)]
    playerstats: PlayerStats,
}

#[derive(Debug, Deserialize, Default)]
struct PlayerStats {
    #[serde(default)]
    achievements: Vec<PlayerAchievement>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlayerAchievement {
    pub apiname: String,
    #[serde(default)]
    pub achieved: u8,
}

#[derive(Debug, Deserialize, Default)]
struct SchemaResponse {
    #[serde(default)]
    game: SchemaGame,
}

#[derive(Debug, Deserialize, Default)]
struct SchemaGame {
    #[serde(default, rename = "availableGameStats")]
    available_game_stats: AvailableGameStats,
}

#[derive(Debug, Deserialize, Default)]
struct AvailableGameStats {
    #[serde(default)]
    achievements: Vec<SchemaAchievement>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SchemaAchievement {
    pub name: String,
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct GlobalResponse {
    #[serde(default)]
    achievementpercentages: GlobalPercentages,
}

#[derive(Debug, Deserialize, Default)]
struct GlobalPercentages {
    #[serde(default)]
    achievements: Vec<GlobalAchievement>,
}

#[derive(Debug, Clone, Deserialize)]
struct GlobalAchievement {
    name: String,
    #[serde(default)]
    percent: serde_json::Value,
}

/// Steam reports the rate as a number on older responses and a string on
/// newer ones.
fn percent_value(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

impl SteamClient {
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.api_url(path);
        tracing::debug!(%url, "steam api request");
        self.http
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", path))?
            .error_for_status()
            .with_context(|| format!("Steam API returned an error for {}", path))?
            .json::<T>()
            .await
            .with_context(|| format!("Invalid JSON from {}", path))
    }

    /// All games in the configured user's library.
    pub async fn owned_games(&self) -> Result<String> {
        let Some((key, steam_id)) = self.credentials() else {
            return Ok(MISSING_CREDENTIALS.to_string());
        };
        let envelope: Envelope<GamesResponse> = self
            .get_json(
                "IPlayerService/GetOwnedGames/v1/",
                &[
                    ("key", key.to_string()),
                    ("steamid", steam_id.to_string()),
                    ("include_appinfo", "true".to_string()),
                    ("include_played_free_games", "true".to_string()),
                ],
            )
            .await?;
        Ok(format_owned_games(
            &envelope.response.unwrap_or_default().games,
        ))
    }

    /// Games played in the last two weeks.
    pub async fn recently_played_games(&self) -> Result<String> {
        let Some((key, steam_id)) = self.credentials() else {
            return Ok(MISSING_CREDENTIALS.to_string());
        };
        let envelope: Envelope<GamesResponse> = self
            .get_json(
                "IPlayerService/GetRecentlyPlayedGames/v1/",
                &[("key", key.to_string()), ("steamid", steam_id.to_string())],
            )
            .await?;
        Ok(format_recent_games(
            &envelope.response.unwrap_or_default().games,
        ))
    }

    /// The user's unlock state for every achievement of `app_id`, with
    /// global unlock rates.
    pub async fn game_achievements(&self, app_id: u64) -> Result<String> {
        let Some((key, steam_id)) = self.credentials() else {
            return Ok(MISSING_CREDENTIALS.to_string());
        };

        let player: PlayerStatsResponse = self
            .get_json(
                "ISteamUserStats/GetPlayerAchievements/v1/",
                &[
                    ("key", key.to_string()),
                    ("steamid", steam_id.to_string()),
                    ("appid", app_id.to_string()),
                ],
            )
            .await?;
        if player.playerstats.achievements.is_empty() {
            return Ok(format!(
                "Info: No achievement data available for AppID {}.",
                app_id
            ));
        }

        let schema: SchemaResponse = self
            .get_json(
                "ISteamUserStats/GetSchemaForGame/v2/",
                &[("key", key.to_string()), ("appid", app_id.to_string())],
            )
            .await?;
        let schema = schema.game.available_game_stats.achievements;
        if schema.is_empty() {
            return Ok(format!(
                "Info: No achievement schema found for AppID {}.",
                app_id
            ));
        }

        let global: GlobalResponse = self
            .get_json(
                "ISteamUserStats/GetGlobalAchievementPercentagesForApp/v0002/",
                &[("gameid", app_id.to_string()), ("format", "json".to_string())],
            )
            .await?;
        let rates: HashMap<String, f64> = global
            .achievementpercentages
            .achievements
            .iter()
            .map(|a| (a.name.clone(), percent_value(&a.percent)))
            .collect();

        Ok(format_achievements(
            app_id,
            &player.playerstats.achievements,
            &schema,
            &rates,
        ))
    }
}

pub fn format_owned_games(games: &[Game]) -> String {
    let mut lines = vec![format!("Total games owned: {}", games.len())];
    lines.extend(games.iter().map(|g| {
        format!(
            "{} (AppID: {}) - Playtime: {} mins",
            g.name, g.appid, g.playtime_forever
        )
    }));
    lines.join("\n")
}

pub fn format_recent_games(games: &[Game]) -> String {
    if games.is_empty() {
        return "No games played in the last two weeks.".to_string();
    }
    let mut lines = vec![format!("Recently played games ({} found):", games.len())];
    lines.extend(games.iter().map(|g| {
        format!(
            "{} (AppID: {}) - Played {} mins in last 2 weeks",
            g.name, g.appid, g.playtime_2weeks
        )
    }));
    lines.join("\n")
}

/// One block per schema entry, in schema order.
pub fn format_achievements(
    app_id: u64,
    player: &[PlayerAchievement],
    schema: &[SchemaAchievement],
    global_rates: &HashMap<String, f64>,
) -> String {
    let unlocked: HashMap<&str, bool> = player
        .iter()
        .map(|a| (a.apiname.as_str(), a.achieved == 1))
        .collect();

    let entries: Vec<String> = schema
        .iter()
        .map(|a| {
            let display = a.display_name.as_deref().unwrap_or(&a.name);
            let done = unlocked.get(a.name.as_str()).copied().unwrap_or(false);
            let rate = global_rates.get(&a.name).copied().unwrap_or(0.0);
            format!(
                "{} | Unlocked: {} | Global Unlock Rate: {:.2}%\nDescription: {}",
                display,
                if done { "Yes" } else { "No" },
                rate,
                a.description.as_deref().unwrap_or("No description")
            )
        })
        .collect();

    format!(
        "Achievements for AppID {}:\n\n{}",
        app_id,
        entries.join("\n\n")
    )
}
