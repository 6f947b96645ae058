use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use spades_core::game::{GameError, SpadesGame};
use spades_core::model::player::PartnershipId;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{BenchmarkConfig, ResolvedOutputs};

/// Plays seeded games with a uniformly random legal-action driver and
/// records one JSONL row per game.
pub struct SelfPlayRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    logging_enabled: bool,
}

/// Summary details returned after a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub games_played: usize,
    pub games_finished: usize,
    pub wins: [usize; 2],
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
struct GameRow {
    run_id: String,
    game_index: usize,
    game_seed: u64,
    driver_seed: u64,
    hands_played: u32,
    finished: bool,
    winner: Option<PartnershipId>,
    scores: [i32; 2],
    running_bags: [u32; 2],
    game_bags: [u32; 2],
    actions: usize,
}

impl SelfPlayRunner {
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Self {
        Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
        }
    }

    /// Play every configured game, streaming rows to disk, then write the
    /// Markdown summary.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut rows = Vec::with_capacity(self.config.games.count);

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();
            let driver_seed = rng.next_u64();
            let row = self.play_game(game_index, game_seed, driver_seed)?;
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
            rows.push(row);
        }

        writer.flush()?;

        let mut wins = [0usize; 2];
        for winner in rows.iter().filter_map(|row| row.winner) {
            wins[winner.index()] += 1;
        }
        let games_finished = rows.iter().filter(|row| row.finished).count();

        write_markdown(&self.outputs.summary_md, &self.config.run_id, &rows)?;

        Ok(RunSummary {
            games_played: rows.len(),
            games_finished,
            wins,
            rows_written: rows.len(),
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        })
    }

    fn play_game(
        &self,
        game_index: usize,
        game_seed: u64,
        driver_seed: u64,
    ) -> Result<GameRow, RunnerError> {
        let mut game = SpadesGame::with_seed(game_seed)?;
        let mut driver = StdRng::seed_from_u64(driver_seed);
        let max_hands = self.config.games.max_hands;

        while !game.is_over() && game.hands_played() < max_hands {
            let legal = game.legal_actions();
            let action = *legal.choose(&mut driver).ok_or_else(|| {
                RunnerError::game(format!(
                    "no legal action for {} in game {game_index}",
                    game.current_player()
                ))
            })?;
            let outcome = game.step(action)?;

            if let Some(scores) = outcome.hand_scores {
                if self.logging_enabled && tracing::enabled!(Level::INFO) {
                    event!(
                        target: "spades_bench::hand",
                        Level::INFO,
                        run_id = %self.config.run_id,
                        game_index = game_index as u32,
                        hand = game.hands_played(),
                        ns_delta = scores[0],
                        ew_delta = scores[1],
                    );
                }
            }
        }

        let row = GameRow {
            run_id: self.config.run_id.clone(),
            game_index,
            game_seed,
            driver_seed,
            hands_played: game.hands_played(),
            finished: game.is_over(),
            winner: game.winner(),
            scores: game.scores(),
            running_bags: PartnershipId::BOTH.map(|id| game.partnership(id).running_bags()),
            game_bags: PartnershipId::BOTH.map(|id| game.partnership(id).game_bags()),
            actions: game.actions().len(),
        };

        if self.logging_enabled && tracing::enabled!(Level::INFO) {
            event!(
                target: "spades_bench::game",
                Level::INFO,
                run_id = %row.run_id,
                game_index = game_index as u32,
                hands = row.hands_played,
                finished = row.finished,
                winner = ?row.winner,
                scores = ?row.scores,
            );
        }

        Ok(row)
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_markdown(path: &Path, run_id: &str, rows: &[GameRow]) -> Result<(), RunnerError> {
    let mut out = BufWriter::new(File::create(path)?);
    let finished: Vec<&GameRow> = rows.iter().filter(|row| row.finished).collect();

    writeln!(out, "# Self-play summary: {run_id}")?;
    writeln!(out)?;
    writeln!(out, "- Games played: {}", rows.len())?;
    writeln!(out, "- Games finished: {}", finished.len())?;
    if !finished.is_empty() {
        let hands: u32 = finished.iter().map(|row| row.hands_played).sum();
        writeln!(
            out,
            "- Mean hands per finished game: {:.2}",
            hands as f64 / finished.len() as f64
        )?;
    }
    writeln!(out)?;
    writeln!(out, "| Partnership | Wins | Mean score | Mean game bags |")?;
    writeln!(out, "|---|---:|---:|---:|")?;

    for id in PartnershipId::BOTH {
        let wins = rows.iter().filter(|row| row.winner == Some(id)).count();
        let (score, bags) = if rows.is_empty() {
            (0.0, 0.0)
        } else {
            let n = rows.len() as f64;
            (
                rows.iter().map(|row| row.scores[id.index()] as f64).sum::<f64>() / n,
                rows.iter().map(|row| row.game_bags[id.index()] as f64).sum::<f64>() / n,
            )
        };
        writeln!(out, "| {id} | {wins} | {score:.1} | {bags:.1} |")?;
    }

    out.flush()?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("game rejected an action: {0}")]
    Rules(#[from] GameError),
    #[error("game execution failed: {message}")]
    Game { message: String },
}

impl RunnerError {
    fn game(message: impl Into<String>) -> Self {
        RunnerError::Game {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GamesConfig, LoggingConfig, OutputsConfig};

    fn config(dir: &Path, count: usize, max_hands: u32) -> BenchmarkConfig {
        BenchmarkConfig {
            run_id: "unit".to_string(),
            games: GamesConfig {
                seed: Some(9),
                count,
                max_hands,
            },
            outputs: OutputsConfig {
                jsonl: dir.join("games.jsonl").display().to_string(),
                summary_md: dir.join("summary.md").display().to_string(),
                telemetry: None,
            },
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn hand_cap_stops_undecided_games() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cfg = config(dir.path(), 3, 1);
        let outputs = cfg.resolved_outputs();
        let summary = SelfPlayRunner::new(cfg, outputs).run().expect("run");

        assert_eq!(summary.games_played, 3);
        assert_eq!(summary.rows_written, 3);
        assert!(summary.wins.iter().sum::<usize>() <= summary.games_finished);

        let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl");
        for line in jsonl.lines() {
            let row: serde_json::Value = serde_json::from_str(line).expect("row");
            assert_eq!(row["hands_played"], 1);
            assert_eq!(row["run_id"], "unit");
        }
    }

    #[test]
    fn summary_lists_both_partnerships() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cfg = config(dir.path(), 2, 2);
        let outputs = cfg.resolved_outputs();
        let summary = SelfPlayRunner::new(cfg, outputs).run().expect("run");

        let markdown = fs::read_to_string(&summary.summary_path).expect("summary");
        assert!(markdown.starts_with("# Self-play summary: unit"));
        assert!(markdown.contains("| North/South |"));
        assert!(markdown.contains("| East/West |"));
    }
}
