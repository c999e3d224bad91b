//! Pitch Rush headless runner
//!
//! Plays a full AI-vs-AI match from a JSON config (or the defaults) and
//! prints the final score.
//!
//! Usage: `pitch-rush [config.json] [--weather W] [--difficulty D] [--seed N]`

use std::cell::Cell;
use std::process::ExitCode;
use std::rc::Rc;

use pitch_rush::consts::SIM_DT;
use pitch_rush::sim::{MatchEvent, TickInput};
use pitch_rush::{Difficulty, FinalScore, MatchConfig, MatchSession, SkillBranch, Weather};

/// Command line options layered over the config file
#[derive(Debug, Default)]
struct Options {
    config_path: Option<String>,
    weather: Option<Weather>,
    difficulty: Option<Difficulty>,
    seed: Option<u64>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| args.next().ok_or_else(|| format!("{flag} needs a value"));
        match arg.as_str() {
            "--weather" => {
                let v = value("--weather")?;
                options.weather = Some(Weather::from_str(&v).ok_or_else(|| format!("unknown weather: {v}"))?);
            }
            "--difficulty" => {
                let v = value("--difficulty")?;
                options.difficulty =
                    Some(Difficulty::from_str(&v).ok_or_else(|| format!("unknown difficulty: {v}"))?);
            }
            "--seed" => {
                let v = value("--seed")?;
                options.seed = Some(v.parse().map_err(|_| format!("invalid seed: {v}"))?);
            }
            _ if arg.starts_with("--") => return Err(format!("unknown option: {arg}")),
            _ => options.config_path = Some(arg),
        }
    }
    Ok(options)
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Pitch Rush (headless) starting...");

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut config = match &options.config_path {
        Some(path) => match MatchConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => MatchConfig::default(),
    };
    if let Some(weather) = options.weather {
        config.weather = weather;
    }
    if let Some(difficulty) = options.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(seed) = options.seed {
        config.seed = seed;
    }

    if config.duration_secs == 0 && config.target().is_none() {
        log::error!("Config has neither a duration nor a target score; the match would never end");
        return ExitCode::FAILURE;
    }
    if let Some(skills) = &config.skills {
        for branch in SkillBranch::ALL {
            log::info!("Skill {}: level {}", branch.as_str(), skills.level(branch));
        }
    }
    let home = config.home.name.clone();
    let away = config.away.name.clone();

    let result = Rc::new(Cell::new(None));
    let sink = Rc::clone(&result);
    let mut session = MatchSession::new(config, move |score: FinalScore| sink.set(Some(score)));
    session.set_input(TickInput {
        idle_mode: true,
        ..Default::default()
    });

    while !session.is_over() {
        session.advance(SIM_DT);
        for event in session.drain_events() {
            match event {
                MatchEvent::Goal { scorer, home: h, away: a } => println!("GOAL {scorer:?}  {h}-{a}"),
                MatchEvent::PowerUpCollected { side, .. } => {
                    let buffs = session.state().powerups[side.index()].active();
                    log::info!("{side:?} buffs: {buffs:?}");
                }
                _ => {}
            }
        }
    }

    match result.get() {
        Some(score) => {
            println!("Full time: {home} {} - {} {away}", score.home, score.away);
            ExitCode::SUCCESS
        }
        None => {
            log::error!("Match ended without a result");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_overrides() {
        let options = parse_args(args(&["match.json", "--weather", "snow", "--difficulty", "HARD", "--seed", "7"]))
            .unwrap();
        assert_eq!(options.config_path.as_deref(), Some("match.json"));
        assert_eq!(options.weather, Some(Weather::Snow));
        assert_eq!(options.difficulty, Some(Difficulty::Hard));
        assert_eq!(options.seed, Some(7));
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(parse_args(args(&["--weather", "fog"])).is_err());
        assert!(parse_args(args(&["--difficulty"])).is_err());
        assert!(parse_args(args(&["--seed", "abc"])).is_err());
        assert!(parse_args(args(&["--turbo"])).is_err());
        assert!(parse_args(args(&[])).unwrap().config_path.is_none());
    }
}
