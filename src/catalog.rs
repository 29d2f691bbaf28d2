//! Game catalog and the search query that backs the games/tournaments lists.
//!
//! The catalog is built once at startup, either from the TOML embedded in the
//! binary or from a file named in config.toml. Records are never mutated after
//! they are created; every list the UI shows is a fresh `query` result.

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;
use uuid::Uuid;

use crate::location::Coordinate;

const DEFAULT_CATALOG: &str = include_str!("../defaults/games.toml");

/// Which list a query runs against. Both lists use identical query semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    #[default]
    Games,
    Tournaments,
}

impl ListKind {
    pub fn label(&self) -> &'static str {
        match self {
            ListKind::Games => "Games",
            ListKind::Tournaments => "Tournaments",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ListKind::Games => ListKind::Tournaments,
            ListKind::Tournaments => ListKind::Games,
        }
    }
}

/// One game as written in a catalog file (everything except the id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSeed {
    pub home_team: String,
    pub away_team: String,
    pub date: NaiveDateTime,
    pub time: String,
    pub venue: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub league: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_price: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// A single game listing
///
/// Identity is the generated `id` only: two records with identical fields but
/// different ids are different games.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub id: Uuid,
    pub home_team: String,
    pub away_team: String,
    pub date: NaiveDateTime,
    pub time: String,
    pub venue: String,
    pub address: String,
    pub coordinate: Coordinate,
    pub league: String,
    pub ticket_price: Option<String>,
    pub description: String,
}

impl PartialEq for GameRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GameRecord {}

impl Hash for GameRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl GameRecord {
    /// Create a record with a freshly generated id
    pub fn new(seed: GameSeed) -> Self {
        Self {
            id: Uuid::new_v4(),
            home_team: seed.home_team,
            away_team: seed.away_team,
            date: seed.date,
            time: seed.time,
            venue: seed.venue,
            address: seed.address,
            coordinate: Coordinate::new(seed.latitude, seed.longitude),
            league: seed.league,
            ticket_price: seed.ticket_price,
            description: seed.description,
        }
    }

    /// "Home vs Away"
    pub fn matchup(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }

    /// Case-insensitive substring match against team names, venue and league.
    /// `needle` must already be lowercased.
    fn matches_lowercase(&self, needle: &str) -> bool {
        [&self.home_team, &self.away_team, &self.venue, &self.league]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Filter `catalog` by `search_text` and sort by date.
///
/// An empty search returns every record. Otherwise a record is kept when the
/// search text appears, ignoring case, in its home team, away team, venue or
/// league. Results are ordered by `date` ascending; records on the same date
/// keep their catalog order.
pub fn query(catalog: &[GameRecord], search_text: &str) -> Vec<GameRecord> {
    let mut results: Vec<GameRecord> = if search_text.is_empty() {
        catalog.to_vec()
    } else {
        let needle = search_text.to_lowercase();
        catalog
            .iter()
            .filter(|game| game.matches_lowercase(&needle))
            .cloned()
            .collect()
    };

    // sort_by_key is stable
    results.sort_by_key(|game| game.date);
    results
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    games: Vec<GameSeed>,
    #[serde(default)]
    tournaments: Vec<GameSeed>,
}

/// Games and tournaments loaded at startup
#[derive(Debug, Clone, Default)]
pub struct GameCatalog {
    games: Vec<GameRecord>,
    tournaments: Vec<GameRecord>,
}

impl GameCatalog {
    /// The catalog compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(DEFAULT_CATALOG).context("Failed to parse built-in catalog")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {:?}", path))?;
        let catalog = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse catalog file: {:?}", path))?;
        tracing::info!(
            "Loaded catalog from {:?} ({} games, {} tournaments)",
            path,
            catalog.games.len(),
            catalog.tournaments.len()
        );
        Ok(catalog)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(contents)?;
        Ok(Self {
            games: build_records("games", file.games)?,
            tournaments: build_records("tournaments", file.tournaments)?,
        })
    }

    pub fn records(&self, kind: ListKind) -> &[GameRecord] {
        match kind {
            ListKind::Games => &self.games,
            ListKind::Tournaments => &self.tournaments,
        }
    }

    pub fn query(&self, kind: ListKind, search_text: &str) -> Vec<GameRecord> {
        query(self.records(kind), search_text)
    }

    /// Look up a record by id in either list
    pub fn find(&self, id: Uuid) -> Option<&GameRecord> {
        self.games
            .iter()
            .chain(self.tournaments.iter())
            .find(|game| game.id == id)
    }

    pub fn len(&self) -> usize {
        self.games.len() + self.tournaments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn build_records(section: &str, seeds: Vec<GameSeed>) -> Result<Vec<GameRecord>> {
    let mut records = Vec::with_capacity(seeds.len());
    for (idx, seed) in seeds.into_iter().enumerate() {
        if seed.home_team.trim().is_empty() || seed.away_team.trim().is_empty() {
            bail!("{} entry #{} is missing a team name", section, idx + 1);
        }
        records.push(GameRecord::new(seed));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn game(home: &str, away: &str, venue: &str, league: &str, day: u32) -> GameRecord {
        GameRecord::new(GameSeed {
            home_team: home.to_string(),
            away_team: away.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 11, day)
                .unwrap()
                .and_hms_opt(19, 0, 0)
                .unwrap(),
            time: "7:00 PM".to_string(),
            venue: venue.to_string(),
            address: "Hawk Street".to_string(),
            latitude: 41.0,
            longitude: -87.0,
            league: league.to_string(),
            ticket_price: Some("Kings Ransom".to_string()),
            description: "Hawks and Kings everywhere".to_string(),
        })
    }

    fn sample() -> Vec<GameRecord> {
        vec![
            game("Hawks", "Kings", "North Gym", "Rec", 20),
            game("Owls", "Lynx", "South Gym", "Classic", 5),
            game("Storm", "Eagles", "Annex", "High School", 12),
            game("Kings", "Owls", "North Gym", "Classic", 5),
        ]
    }

    fn is_sorted_by_date(games: &[GameRecord]) -> bool {
        games.windows(2).all(|w| w[0].date <= w[1].date)
    }

    #[test]
    fn test_empty_search_returns_everything_sorted() {
        let catalog = sample();
        let result = query(&catalog, "");
        assert_eq!(result.len(), catalog.len());
        assert!(is_sorted_by_date(&result));
        // Ties on the 5th keep catalog order: Owls game before Kings game
        assert_eq!(result[0], catalog[1]);
        assert_eq!(result[1], catalog[3]);
        assert_eq!(result[2], catalog[2]);
        assert_eq!(result[3], catalog[0]);
    }

    #[test]
    fn test_search_is_case_insensitive_across_four_fields() {
        let catalog = sample();

        let kings = query(&catalog, "kINGS");
        assert_eq!(kings.len(), 2);
        assert_eq!(kings[0], catalog[3]);
        assert_eq!(kings[1], catalog[0]);

        let venue = query(&catalog, "north gym");
        assert_eq!(venue.len(), 2);

        let league = query(&catalog, "classic");
        assert_eq!(league.len(), 2);
        assert!(is_sorted_by_date(&league));
    }

    #[test]
    fn test_filtered_ties_keep_catalog_order() {
        let catalog = sample();
        // Both Classic games fall on the 5th
        assert_eq!(
            query(&catalog, "classic"),
            vec![catalog[1].clone(), catalog[3].clone()]
        );
        assert_eq!(
            query(&catalog, "OWLS"),
            vec![catalog[1].clone(), catalog[3].clone()]
        );
    }

    #[test]
    fn test_other_fields_do_not_match() {
        let catalog = sample();
        // Present only in address / ticket price / description / time
        assert!(query(&catalog, "Hawk Street").is_empty());
        assert!(query(&catalog, "Ransom").is_empty());
        assert!(query(&catalog, "everywhere").is_empty());
        assert!(query(&catalog, "7:00").is_empty());
    }

    #[test]
    fn test_search_is_not_trimmed() {
        let catalog = sample();
        // A lone space matches "North Gym" etc. but not single-word fields only
        let result = query(&catalog, " ");
        assert!(result.iter().all(|g| {
            [&g.home_team, &g.away_team, &g.venue, &g.league]
                .iter()
                .any(|f| f.contains(' '))
        }));
        assert!(query(&catalog, " hawks").is_empty());
    }

    #[test]
    fn test_result_partition_matches_predicate() {
        let catalog = sample();
        for needle in ["o", "gym", "zzz", "Eagles", "school"] {
            let result = query(&catalog, needle);
            let lower = needle.to_lowercase();
            let ids: HashSet<Uuid> = result.iter().map(|g| g.id).collect();
            assert_eq!(ids.len(), result.len(), "duplicates for {:?}", needle);
            for g in &catalog {
                assert_eq!(g.matches_lowercase(&lower), ids.contains(&g.id));
            }
            assert!(is_sorted_by_date(&result));
        }
    }

    #[test]
    fn test_no_match_and_empty_catalog() {
        assert!(query(&sample(), "nobody plays here").is_empty());
        assert!(query(&[], "").is_empty());
        assert!(query(&[], "hawks").is_empty());
    }

    #[test]
    fn test_query_is_deterministic_and_pure() {
        let catalog = sample();
        let before: Vec<Uuid> = catalog.iter().map(|g| g.id).collect();
        let first = query(&catalog, "o");
        let second = query(&catalog, "o");
        assert_eq!(first, second);
        let after: Vec<Uuid> = catalog.iter().map(|g| g.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_identity_is_id_only() {
        let a = game("Hawks", "Kings", "Gym", "Rec", 1);
        let mut b = a.clone();
        assert_eq!(a, b);
        b.id = Uuid::new_v4();
        assert_ne!(a, b);

        let mut renamed = a.clone();
        renamed.home_team = "Someone Else".to_string();
        assert_eq!(a, renamed);

        let set: HashSet<GameRecord> = [a.clone(), renamed].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = GameCatalog::builtin().expect("built-in catalog parses");
        assert!(!catalog.records(ListKind::Games).is_empty());
        assert!(!catalog.records(ListKind::Tournaments).is_empty());
        assert_eq!(
            catalog.query(ListKind::Games, "").len(),
            catalog.records(ListKind::Games).len()
        );

        let first = &catalog.records(ListKind::Tournaments)[0];
        assert_eq!(catalog.find(first.id), Some(first));
        assert!(catalog.find(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_lists_share_query_semantics() {
        let catalog = GameCatalog::builtin().unwrap();
        for kind in [ListKind::Games, ListKind::Tournaments] {
            assert_eq!(
                catalog.query(kind, "welsh"),
                query(catalog.records(kind), "welsh")
            );
        }
        assert_eq!(ListKind::Games.toggle(), ListKind::Tournaments);
        assert_eq!(ListKind::Tournaments.toggle(), ListKind::Games);
    }

    #[test]
    fn test_missing_team_name_rejected() {
        let toml = r#"
            [[games]]
            home_team = ""
            away_team = "Kings"
            date = "2025-11-01T19:00:00"
            time = "7 PM"
            venue = "Gym"
            address = "Somewhere"
            latitude = 0.0
            longitude = 0.0
            league = "Rec"
        "#;
        let err = GameCatalog::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("games entry #1"));
    }

    #[test]
    fn test_optional_fields_default() {
        let toml = r#"
            [[tournaments]]
            home_team = "Cup"
            away_team = "Field"
            date = "2025-11-01T09:00:00"
            time = "9 AM"
            venue = "Gym"
            address = "Somewhere"
            latitude = 1.5
            longitude = 2.5
            league = "Rec"
        "#;
        let catalog = GameCatalog::from_toml_str(toml).unwrap();
        assert!(catalog.records(ListKind::Games).is_empty());
        let cup = &catalog.records(ListKind::Tournaments)[0];
        assert_eq!(cup.ticket_price, None);
        assert_eq!(cup.description, "");
        assert_eq!(cup.coordinate, Coordinate::new(1.5, 2.5));
        assert_eq!(catalog.len(), 1);
    }
}
