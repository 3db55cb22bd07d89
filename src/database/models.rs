use chrono::NaiveDateTime;

#[derive(Debug, Clone)]
pub struct League {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub season: Option<String>,
    pub class: Option<String>,
    pub region: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct LeagueEvent {
    pub id: i64,
    pub league_id: i64,
    pub event_id: i64,
    /// Scales raw points from this event; float >= 0, default 1.0.
    pub multiplier: f64,
    /// 0-100, default 100. Stored and exposed; not part of the points formula.
    pub weight: i64,
}

#[derive(Debug, Clone)]
pub struct Discipline {
    pub id: i64,
    pub league_id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub created_at: Option<NaiveDateTime>,
}

/// One immutable raw upload for one (event, result type).
#[derive(Debug, Clone)]
pub struct UploadedResult {
    pub id: i64,
    pub event_id: i64,
    pub result_type: String,
    pub uploaded_by: Option<String>,
    pub raw_data: Vec<u8>,
    pub file_name: String,
    /// Validated column mapping as JSON; lets the recalculation engine
    /// replay parsing without re-deriving the mapping.
    pub mapping_json: Option<String>,
    pub is_final: bool,
    pub uploaded_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct BracketEntry {
    pub id: i64,
    pub result_id: i64,
    pub competitor_name: String,
    pub profile_id: Option<i64>,
    pub position: i64,
    pub discipline: String,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeagueStanding {
    pub id: i64,
    pub league_id: i64,
    pub discipline: String,
    pub competitor_name: String,
    pub profile_id: Option<i64>,
    pub points: i64,
    pub events_competed: i64,
    pub position: Option<i64>,
    pub average_rank: f64,
    /// Per-event contributions, JSON map of event id -> {points, position}.
    pub event_results_json: String,
}
