use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use bracket_pool::bracket::Round;
use bracket_pool::config::RunConfig;
use bracket_pool::loader;
use bracket_pool::pool::Pool;
use bracket_pool::report;
use bracket_pool::simulation::count_outcomes;
use bracket_pool::tournament::TournamentState;
use bracket_pool::win_prob::ProbabilityMode;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// team ratings CSV (team, ..., rating)
    #[clap(long)]
    ratings: Option<PathBuf>,

    /// team schedules CSV (team, game per remaining round)
    #[clap(long)]
    schedules: Option<PathBuf>,

    /// participant picks CSV (participant, stage, team)
    #[clap(long)]
    picks: Option<PathBuf>,

    /// current points CSV (participant, points)
    #[clap(long)]
    points: Option<PathBuf>,

    /// forced outcomes CSV (stage, team)
    #[clap(long)]
    forced: Option<PathBuf>,

    /// JSON run config; flags below override it
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// number of simulated tournaments
    #[clap(short = 'n', long)]
    iterations: Option<u64>,

    /// probability model: scaled or even
    #[clap(short = 'm', long, value_parser = parse_mode)]
    mode: Option<ProbabilityMode>,

    /// random seed
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// participant whose winning trials are examined
    #[clap(short = 'w', long)]
    win_check: Option<String>,

    /// print example trials won by the checked participant
    #[clap(long)]
    examples: bool,

    /// report how often each team reaches each round when the checked participant wins
    #[clap(long)]
    advanced: bool,

    /// teams forced into the Elite 8 (comma-separated)
    #[clap(long, value_delimiter = ',')]
    elite_8: Vec<String>,

    /// teams forced into the Final 4 (comma-separated)
    #[clap(long, value_delimiter = ',')]
    final_4: Vec<String>,

    /// teams forced into the championship game (comma-separated)
    #[clap(long, value_delimiter = ',')]
    championship: Vec<String>,

    /// team forced to win it all
    #[clap(long)]
    champion: Option<String>,

    /// results CSV
    #[clap(short = 'o', long, default_value = "ncaa_outcomes.csv")]
    out: PathBuf,
}
impl Args {
    fn inputs(&self) -> anyhow::Result<(&PathBuf, &PathBuf, &PathBuf, &PathBuf)> {
        let ratings = self
            .ratings
            .as_ref()
            .ok_or(anyhow!("ratings file must be specified"))?;
        let schedules = self
            .schedules
            .as_ref()
            .ok_or(anyhow!("schedules file must be specified"))?;
        let picks = self
            .picks
            .as_ref()
            .ok_or(anyhow!("picks file must be specified"))?;
        let points = self
            .points
            .as_ref()
            .ok_or(anyhow!("current points file must be specified"))?;
        Ok((ratings, schedules, picks, points))
    }

    fn run_config(&self) -> anyhow::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)
                .map_err(|err| anyhow!("cannot read config {}: {err}", path.display()))?,
            None => RunConfig::default(),
        };
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.win_check.is_some() {
            config.win_check = self.win_check.clone();
        }
        config.examples |= self.examples;
        config.advanced |= self.advanced;

        if let Some(path) = &self.forced {
            let from_file = loader::read_forced(path)?;
            for round in Round::ALL {
                for team in from_file.get(round) {
                    config.forced.force(round, team);
                }
            }
        }
        let flagged = [
            (Round::EliteEight, &self.elite_8),
            (Round::FinalFour, &self.final_4),
            (Round::Championship, &self.championship),
        ];
        for (round, teams) in flagged {
            for team in teams {
                config.forced.force(round, team);
            }
        }
        if let Some(team) = &self.champion {
            config.forced.force(Round::Champion, team);
        }
        Ok(config)
    }
}
fn parse_mode(s: &str) -> anyhow::Result<ProbabilityMode> {
    Ok(s.parse()?)
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let (ratings, schedules, picks, points) = args.inputs()?;
    debug!("args: {args:?}");

    let config = args.run_config()?;
    config.validate()?;
    debug!("config: {config:?}");

    let state = TournamentState::new(loader::read_schedules(schedules)?, loader::read_ratings(ratings)?)?;
    let pool = Pool::from_parts(loader::read_picks(picks)?, &loader::read_current_points(points)?)?;
    info!(
        "loaded {} teams and {} participants",
        state.bracket().len(),
        pool.len()
    );

    let results = count_outcomes(&state, &pool, &config)?;

    if let Some(win_check) = &config.win_check {
        for example in &results.examples {
            println!("{}\n", report::describe_trial(example));
        }
        if let Some(occupancy) = &results.occupancy {
            println!(
                "The percentage of times each team makes a certain round when {win_check} wins ({} wins)",
                occupancy.wins
            );
            println!("{}", Console::default().render(&report::tabulate_occupancy(occupancy)));
        }
    }
    println!("{}", Console::default().render(&report::tabulate_standings(&results)));

    report::write_csv(&results, &args.out)?;
    info!("results written to {}", args.out.display());
    Ok(())
}
