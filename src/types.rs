use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Match summary (list view)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Finished,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Live => "live",
            MatchStatus::Finished => "finished",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub summary: String,
    /// Subjective entertainment score, conventionally 0.0–10.0.
    pub fun_rating: f64,
    pub status: MatchStatus,
}

// ---------------------------------------------------------------------------
// Match detail (detail view)
// ---------------------------------------------------------------------------

/// A `{home, away}` counter pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatPair {
    pub home: f64,
    pub away: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStats {
    pub shots: StatPair,
    pub shots_on_target: StatPair,
    /// Percentage pair by convention. Not required to sum to 100.
    pub possession: StatPair,
}

impl MatchStats {
    /// Rows in display order: `(label, pair)`.
    pub fn rows(&self) -> [(&'static str, StatPair); 3] {
        [
            ("슈팅", self.shots),
            ("유효슈팅", self.shots_on_target),
            ("점유율", self.possession),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Home => write!(f, "home"),
            Side::Away => write!(f, "away"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcePlayer {
    pub name: String,
    pub team: Side,
    pub rating: f64,
    pub description: String,
}

/// Qualitative label describing the entertainment character of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunRatingBadge {
    #[serde(rename = "🔥 난타전")]
    Slugfest,
    #[serde(rename = "⚖️ 팽팽한 경기")]
    TightContest,
    #[serde(rename = "😴 비교적 지루")]
    FairlyDull,
}

impl FunRatingBadge {
    pub fn label(&self) -> &'static str {
        match self {
            FunRatingBadge::Slugfest => "🔥 난타전",
            FunRatingBadge::TightContest => "⚖️ 팽팽한 경기",
            FunRatingBadge::FairlyDull => "😴 비교적 지루",
        }
    }
}

impl std::fmt::Display for FunRatingBadge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetail {
    #[serde(flatten)]
    pub summary: MatchSummary,
    pub stats: MatchStats,
    pub ace_player: AcePlayer,
    pub fun_rating_badge: FunRatingBadge,
}

impl MatchDetail {
    pub fn id(&self) -> &str {
        &self.summary.id
    }

    /// Display name of the team the ace player plays for.
    pub fn ace_team_name(&self) -> &str {
        match self.ace_player.team {
            Side::Home => &self.summary.home_team,
            Side::Away => &self.summary.away_team,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_JSON: &str = r#"{
        "id": "9",
        "homeTeam": "A",
        "awayTeam": "B",
        "homeScore": 0,
        "awayScore": 2,
        "summary": "s",
        "funRating": 5.5,
        "status": "live",
        "stats": {
            "shots": {"home": 3, "away": 9},
            "shotsOnTarget": {"home": 1, "away": 4},
            "possession": {"home": 40, "away": 60}
        },
        "acePlayer": {"name": "P", "team": "away", "rating": 7.1, "description": "d"},
        "funRatingBadge": "⚖️ 팽팽한 경기"
    }"#;

    #[test]
    fn detail_decodes_flattened_summary_fields() {
        let detail: MatchDetail = serde_json::from_str(DETAIL_JSON).unwrap();
        assert_eq!(detail.id(), "9");
        assert_eq!(detail.summary.status, MatchStatus::Live);
        assert_eq!(detail.stats.shots_on_target.away, 4.0);
        assert_eq!(detail.ace_player.team, Side::Away);
        assert_eq!(detail.ace_team_name(), "B");
        assert_eq!(detail.fun_rating_badge, FunRatingBadge::TightContest);
    }

    #[test]
    fn detail_without_ace_player_is_rejected() {
        let value: serde_json::Value = serde_json::from_str(DETAIL_JSON).unwrap();
        let mut obj = value.as_object().unwrap().clone();
        obj.remove("acePlayer");
        let raw = serde_json::Value::Object(obj).to_string();
        assert!(serde_json::from_str::<MatchDetail>(&raw).is_err());
    }

    #[test]
    fn unknown_badge_label_is_rejected() {
        let raw = DETAIL_JSON.replace("⚖️ 팽팽한 경기", "🤷 unknown");
        assert!(serde_json::from_str::<MatchDetail>(&raw).is_err());
    }

    #[test]
    fn badge_label_matches_wire_value() {
        for badge in [
            FunRatingBadge::Slugfest,
            FunRatingBadge::TightContest,
            FunRatingBadge::FairlyDull,
        ] {
            let wire = serde_json::to_string(&badge).unwrap();
            assert_eq!(wire, format!("\"{}\"", badge.label()));
        }
    }
}
