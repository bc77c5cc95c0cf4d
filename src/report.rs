//! Output of simulation results: the CSV results sheet and console tables.

use std::path::Path;

use csv::WriterBuilder;
use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};

use crate::aggregate::TrialRecord;
use crate::bracket::Round;
use crate::simulation::{OccupancyReport, SimulationReport};

/// Write one row per participant, then the tie row, under a one-line run description.
pub fn write_csv(report: &SimulationReport, path: impl AsRef<Path>) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new().flexible(true).from_path(path)?;
    writer.write_record([format!(
        "These are the results of a model run with {} iterations using a {} probability model.",
        report.iterations, report.mode
    )])?;
    writer.write_record(["player", "wins", "losses", "win pcts", "loss pcts"])?;
    for standing in &report.standings {
        writer.write_record([
            standing.placing.to_string(),
            standing.wins.to_string(),
            standing.losses.to_string(),
            standing.win_pct.to_string(),
            standing.loss_pct.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn tabulate_standings(report: &SimulationReport) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            vec![
                "Player".into(),
                "Wins".into(),
                "Losses".into(),
                "Win %".into(),
                "Loss %".into(),
            ],
        ));
    for standing in &report.standings {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                standing.placing.to_string().into(),
                standing.wins.to_string().into(),
                standing.losses.to_string().into(),
                format!("{:.3}", standing.win_pct).into(),
                format!("{:.3}", standing.loss_pct).into(),
            ],
        ));
    }
    table
}

pub fn tabulate_occupancy(occupancy: &OccupancyReport) -> Table {
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Left))];
            for _ in Round::ALL {
                cols.push(Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Right)));
            }
            cols
        })
        .with_row({
            let mut header_cells = vec!["Team".into()];
            for round in Round::ALL {
                header_cells.push(round.label().into());
            }
            Row::new(
                Styles::default().with(Header(true)).with(Separator(true)),
                header_cells,
            )
        });
    for team in &occupancy.teams {
        let mut row_cells = vec![team.team.clone().into()];
        for fraction in team.fractions {
            row_cells.push(format!("{fraction:.3}").into());
        }
        table.push_row(Row::new(Styles::default(), row_cells));
    }
    table
}

/// Multi-line summary of one example trial.
pub fn describe_trial(record: &TrialRecord) -> String {
    let mut lines = vec![format!("Winner: {}", record.winner)];
    for round in Round::ALL {
        lines.push(format!("{}: {:?}", round, record.rounds[round.index()]));
    }
    let scores = record
        .scores
        .iter()
        .map(|(name, score)| format!("{name}: {score}"))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("Scores: {scores}"));
    lines.join("\n")
}
