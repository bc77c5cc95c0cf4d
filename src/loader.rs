//! Readers for the pool's CSV input sheets.
//!
//! Every sheet starts with a header row, which is skipped. Cells are trimmed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

use crate::bracket::{Bracket, Round, Schedule};
use crate::error::PoolError;
use crate::forced::ForcedOutcomes;
use crate::pool::PickSet;
use crate::team::Team;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("{path}:{line}: {detail}")]
    Parse {
        path: PathBuf,
        line: u64,
        detail: String,
    },

    #[error("{0}")]
    Pool(#[from] PoolError),
}

/// Rows of a sheet with enough context to report a bad cell.
struct Sheet {
    path: PathBuf,
    records: Vec<StringRecord>,
}

impl Sheet {
    fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref().to_path_buf();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_path(&path)?;
        let records = reader
            .records()
            .filter(|record| !matches!(record, Ok(record) if record.iter().all(str::is_empty)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Sheet { path, records })
    }

    fn error(&self, record: &StringRecord, detail: impl Into<String>) -> LoadError {
        LoadError::Parse {
            path: self.path.clone(),
            line: record.position().map(|pos| pos.line()).unwrap_or_default(),
            detail: detail.into(),
        }
    }

    fn cell<'r>(&self, record: &'r StringRecord, index: usize) -> Result<&'r str, LoadError> {
        record
            .get(index)
            .ok_or_else(|| self.error(record, format!("missing column {}", index + 1)))
    }

    fn number(&self, record: &StringRecord, index: usize) -> Result<f64, LoadError> {
        let cell = self.cell(record, index)?;
        cell.parse()
            .map_err(|_| self.error(record, format!("{cell:?} is not a number")))
    }

    /// Game slots are whole numbers, possibly written as decimals (`15.0`).
    fn slot(&self, record: &StringRecord, index: usize) -> Result<u32, LoadError> {
        let value = self.number(record, index)?;
        if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
            return Err(self.error(record, format!("{value} is not a game number")));
        }
        Ok(value as u32)
    }
}

/// Team ratings: `team, ..., rating`. The rating is the last column.
pub fn read_ratings(path: impl AsRef<Path>) -> Result<HashMap<String, Team>, LoadError> {
    let sheet = Sheet::open(path)?;
    let mut ratings = HashMap::with_capacity(sheet.records.len());
    for record in &sheet.records {
        if record.len() < 2 {
            return Err(sheet.error(record, "expected a team and a rating"));
        }
        let name = sheet.cell(record, 0)?.to_string();
        let rating = sheet.number(record, record.len() - 1)?;
        if ratings.contains_key(&name) {
            return Err(sheet.error(record, format!("team {name:?} listed twice")));
        }
        ratings.insert(name.clone(), Team::new(name, rating));
    }
    Ok(ratings)
}

/// Bracket topology: `team, elite_8_game, final_4_game, championship_game, champion_game[, aux]`.
pub fn read_schedules(path: impl AsRef<Path>) -> Result<Bracket, LoadError> {
    let sheet = Sheet::open(path)?;
    let mut schedules = Vec::with_capacity(sheet.records.len());
    for record in &sheet.records {
        let name = sheet.cell(record, 0)?.to_string();
        let mut slots = [0; 4];
        for (i, slot) in slots.iter_mut().enumerate() {
            *slot = sheet.slot(record, i + 1)?;
        }
        let aux = match record.get(5) {
            Some(cell) if !cell.is_empty() => Some(sheet.number(record, 5)?),
            _ => None,
        };
        schedules.push((name, Schedule { slots, aux }));
    }
    Ok(Bracket::new(schedules)?)
}

/// Participant picks: `participant, stage, team`.
///
/// Rows may come in any order; participants keep the order of their first row.
pub fn read_picks(path: impl AsRef<Path>) -> Result<Vec<(String, PickSet)>, LoadError> {
    let sheet = Sheet::open(path)?;
    let mut picks: Vec<(String, PickSet)> = Vec::new();
    for record in &sheet.records {
        let name = sheet.cell(record, 0)?;
        let stage = sheet.cell(record, 1)?;
        let team = sheet.cell(record, 2)?;
        let round: Round = stage
            .parse()
            .map_err(|_| sheet.error(record, format!("unknown stage {stage:?}")))?;

        let index = match picks.iter().position(|(existing, _)| existing == name) {
            Some(index) => index,
            None => {
                picks.push((name.to_string(), PickSet::new()));
                picks.len() - 1
            }
        };
        picks[index].1.push(round, team);
    }
    Ok(picks)
}

/// Points already earned: `participant, points`.
pub fn read_current_points(path: impl AsRef<Path>) -> Result<HashMap<String, i64>, LoadError> {
    let sheet = Sheet::open(path)?;
    let mut points = HashMap::with_capacity(sheet.records.len());
    for record in &sheet.records {
        let name = sheet.cell(record, 0)?;
        let cell = sheet.cell(record, 1)?;
        let value: i64 = cell
            .parse()
            .map_err(|_| sheet.error(record, format!("{cell:?} is not a whole number")))?;
        if points.insert(name.to_string(), value).is_some() {
            return Err(sheet.error(record, format!("participant {name:?} listed twice")));
        }
    }
    Ok(points)
}

/// Forced outcomes: `stage, team`.
pub fn read_forced(path: impl AsRef<Path>) -> Result<ForcedOutcomes, LoadError> {
    let sheet = Sheet::open(path)?;
    let mut forced = ForcedOutcomes::new();
    for record in &sheet.records {
        let stage = sheet.cell(record, 0)?;
        let round: Round = stage
            .parse()
            .map_err(|_| sheet.error(record, format!("unknown stage {stage:?}")))?;
        forced.force(round, sheet.cell(record, 1)?);
    }
    Ok(forced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::TournamentState;
    use crate::win_prob::ProbabilityMode;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::fs;

    fn write_sheet(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bracket_pool_loader_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_ratings_uses_last_column() {
        let path = write_sheet(
            "ratings.csv",
            "team,rd1,rd2,rd3,rd4,rating\nGonzaga,0.9,0.7,0.5,0.3,96.5\nBaylor, 0.8,0.6,0.4,0.2, 94.1\n",
        );
        let ratings = read_ratings(&path).unwrap();
        assert_eq!(ratings.len(), 2);
        assert!((ratings["Gonzaga"].rating - 96.5).abs() < 1e-10);
        assert!((ratings["Baylor"].rating - 94.1).abs() < 1e-10);
    }

    fn sweet_16_sheet() -> String {
        let mut sheet = "team,g1,g2,g3,g4,seed\n".to_string();
        for i in 0..16 {
            sheet += &format!("T{i:02},{},{},{},15.0,{}\n", i / 2 + 1, i / 4 + 9, i / 8 + 13, i + 1);
        }
        sheet
    }

    #[test]
    fn test_read_schedules() {
        let path = write_sheet("games.csv", &sweet_16_sheet());
        let bracket = read_schedules(&path).unwrap();
        assert_eq!(bracket.len(), 16);
        assert_eq!(bracket.slots(Round::EliteEight), &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(bracket.slots(Round::Championship), &[13, 14]);
        assert_eq!(bracket.slots(Round::Champion), &[15]);
        assert_eq!(bracket.schedule("T03").unwrap().aux, Some(4.0));

        // The loaded bracket plays a full tournament
        let ratings = (0..16)
            .map(|i| {
                let name = format!("T{i:02}");
                (name.clone(), Team::new(name, 90.0 - i as f64))
            })
            .collect();
        let state = TournamentState::new(bracket, ratings).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let trial = state
            .run_trial(&ForcedOutcomes::new(), ProbabilityMode::Scaled, &mut rng)
            .unwrap();
        assert!(trial.champion().is_some());
    }

    #[test]
    fn test_read_schedules_rejects_short_bracket() {
        let path = write_sheet(
            "short_games.csv",
            "team,g1,g2,g3,g4\nA,1,3,4,5\nB,1,3,4,5\nC,2,3,4,5\nD,2,3,4,5\n",
        );
        assert!(matches!(
            read_schedules(&path),
            Err(LoadError::Pool(PoolError::InvalidTopology(_)))
        ));
    }

    #[test]
    fn test_read_schedules_rejects_fractional_game() {
        let path = write_sheet("bad_games.csv", "team,g1,g2,g3,g4\nA,1.5,3,4,5\n");
        match read_schedules(&path) {
            Err(LoadError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_picks_groups_by_name_and_stage() {
        let path = write_sheet(
            "picks.csv",
            "name,stage,team\n\
             Stephen,Elite 8,A\n\
             Stephen,Final 4,A\n\
             Alex,Elite 8,B\n\
             Stephen,Elite 8,C\n\
             Stephen,Championship,A\n\
             Stephen,Champion,A\n",
        );
        let picks = read_picks(&path).unwrap();
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].0, "Stephen");
        assert_eq!(
            picks[0].1.get(Round::EliteEight).unwrap(),
            &["A".to_string(), "C".to_string()]
        );
        assert_eq!(picks[0].1.get(Round::Champion).unwrap(), &["A".to_string()]);
        assert_eq!(picks[1].0, "Alex");
        assert!(picks[1].1.get(Round::FinalFour).is_none());
    }

    #[test]
    fn test_read_picks_rejects_unknown_stage() {
        let path = write_sheet("bad_picks.csv", "name,stage,team\nStephen,Sweet 16,A\n");
        assert!(matches!(read_picks(&path), Err(LoadError::Parse { .. })));
    }

    #[test]
    fn test_duplicate_rows_rejected() {
        let path = write_sheet("dup_ratings.csv", "team,rating\nGonzaga,96.5\nBaylor,94.1\nGonzaga,90.0\n");
        match read_ratings(&path) {
            Err(LoadError::Parse { line, detail, .. }) => {
                assert_eq!(line, 4);
                assert!(detail.contains("Gonzaga"), "{detail}");
            }
            other => panic!("expected parse error, got {other:?}"),
        }

        let path = write_sheet("dup_points.csv", "name,points\nStephen,420\nStephen,440\n");
        match read_current_points(&path) {
            Err(LoadError::Parse { line, detail, .. }) => {
                assert_eq!(line, 3);
                assert!(detail.contains("Stephen"), "{detail}");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_current_points_and_forced() {
        let points = write_sheet("points.csv", "name,points\nStephen,420\nAlex,440\n");
        let points = read_current_points(&points).unwrap();
        assert_eq!(points["Alex"], 440);

        let forced = write_sheet("forced.csv", "stage,team\nFinal 4,Baylor\nChampion,Gonzaga\n");
        let forced = read_forced(&forced).unwrap();
        assert!(forced.forces(Round::FinalFour, "Baylor"));
        assert!(forced.forces(Round::Champion, "Gonzaga"));
        assert!(forced.elite_8.is_empty());
    }
}
