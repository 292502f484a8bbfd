//! Line-oriented engine protocol.
//!
//! One request per input line; responses are written to the given sink and
//! flushed immediately. Only protocol lines ever reach the sink, diagnostics
//! go through `tracing`.

use std::io::Write;

use anyhow::{anyhow, Result};
use engine_core::{ChessPosition, Position};
use mcts::{Evaluator, MctsConfig, MctsSearch};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info, warn};

use crate::time_control::{GoParams, TimeControl};

/// Move string for "no move available".
pub const NULL_MOVE: &str = "0000";

/// Whether the input loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Settings the protocol layer needs besides the evaluator.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub engine_name: String,
    pub engine_author: String,
    pub exploration_constant: f64,
    pub time_control: TimeControl,
}

/// Engine state between commands: the current position and the search setup.
pub struct UciEngine<E> {
    position: ChessPosition,
    evaluator: E,
    settings: EngineSettings,
    rng: ChaCha20Rng,
}

impl<E: Evaluator<ChessPosition>> UciEngine<E> {
    pub fn new(evaluator: E, settings: EngineSettings, rng: ChaCha20Rng) -> Self {
        Self {
            position: ChessPosition::startpos(),
            evaluator,
            settings,
            rng,
        }
    }

    #[cfg(test)]
    pub fn position(&self) -> &ChessPosition {
        &self.position
    }

    /// Handle one input line.
    ///
    /// Malformed or unknown input produces no output. Errors are returned only
    /// for failures the engine cannot continue from: a broken output sink or
    /// a search that violated its own invariants.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = tokens.split_first() else {
            return Ok(Flow::Continue);
        };

        match command {
            "uci" => {
                writeln!(out, "id name {}", self.settings.engine_name)?;
                writeln!(out, "id author {}", self.settings.engine_author)?;
                writeln!(out, "uciok")?;
            }
            "isready" => writeln!(out, "readyok")?,
            "ucinewgame" => {
                self.position = ChessPosition::startpos();
                debug!("New game");
            }
            "position" => match parse_position(args) {
                Ok(position) => {
                    debug!(fen = %position.fen(), "Position set");
                    self.position = position;
                }
                Err(e) => warn!(line, error = %e, "Ignoring position command"),
            },
            "go" => self.go(args, out)?,
            "quit" => return Ok(Flow::Quit),
            _ => debug!(line, "Ignoring unknown command"),
        }

        out.flush()?;
        Ok(Flow::Continue)
    }

    fn go<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<()> {
        let params = match GoParams::parse(args) {
            Ok(params) => params,
            Err(e) => {
                warn!(error = %e, "Ignoring go command");
                return Ok(());
            }
        };
        let budget = match self
            .settings
            .time_control
            .budget(&params, self.position.side_to_move())
        {
            Ok(budget) => budget,
            Err(e) => {
                warn!(error = %e, "Ignoring go command");
                return Ok(());
            }
        };

        let config =
            MctsConfig::new(budget).with_exploration(self.settings.exploration_constant);
        let mut search = MctsSearch::new(&self.evaluator, config, self.position.clone())?;
        let result = search.run(&mut self.rng)?;

        let best_move = result
            .best_move
            .map(|mv| self.position.uci_move(mv))
            .unwrap_or_else(|| NULL_MOVE.to_string());
        info!(
            best_move = %best_move,
            score = result.score,
            rounds = result.rounds,
            tree_size = result.tree_size,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "Search finished"
        );

        writeln!(out, "info score cp {}", result.score)?;
        writeln!(out, "bestmove {}", best_move)?;
        Ok(())
    }
}

/// Parse `startpos|fen <fields...> [moves <move>...]`.
///
/// A position that could claim a draw right away has its history dropped:
/// some GUIs replay a game that already contains a repetition, and a claim
/// inherited from that would make every move look drawn.
fn parse_position(args: &[&str]) -> Result<ChessPosition> {
    let moves_at = args.iter().position(|&t| t == "moves");
    let (setup, moves) = match moves_at {
        Some(index) => (&args[..index], &args[index + 1..]),
        None => (args, &[][..]),
    };

    let mut position = match setup.split_first() {
        Some((&"startpos", [])) => ChessPosition::startpos(),
        Some((&"fen", fields)) if !fields.is_empty() => ChessPosition::from_fen(&fields.join(" "))?,
        _ => return Err(anyhow!("expected 'startpos' or 'fen <fields>'")),
    };
    position = position.with_moves(moves)?;

    if position.can_claim_draw() {
        debug!(fen = %position.fen(), "Clearing inherited draw claim");
        position.clear_history()?;
    }
    Ok(position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcts::{ConstantEvaluator, PieceSquareModel, StaticEvaluator};
    use rand::SeedableRng;
    use std::sync::Arc;

    fn settings() -> EngineSettings {
        EngineSettings {
            engine_name: "MCTS NNUE Chess".into(),
            engine_author: "Code Monkey King".into(),
            exploration_constant: mcts::DEFAULT_EXPLORATION,
            time_control: TimeControl::default(),
        }
    }

    fn engine() -> UciEngine<StaticEvaluator<PieceSquareModel>> {
        let model =
            PieceSquareModel::from_toml_str(include_str!("../../data/weights.toml")).unwrap();
        UciEngine::new(
            StaticEvaluator::new(Arc::new(model)),
            settings(),
            ChaCha20Rng::seed_from_u64(42),
        )
    }

    /// Feed lines and collect everything written.
    fn run<E: Evaluator<ChessPosition>>(engine: &mut UciEngine<E>, lines: &[&str]) -> Vec<String> {
        let mut out = Vec::new();
        for line in lines {
            engine.handle_line(line, &mut out).unwrap();
        }
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_uci_handshake() {
        let output = run(&mut engine(), &["uci"]);
        assert_eq!(
            output,
            vec!["id name MCTS NNUE Chess", "id author Code Monkey King", "uciok"]
        );
    }

    #[test]
    fn test_isready() {
        assert_eq!(run(&mut engine(), &["isready"]), vec!["readyok"]);
    }

    #[test]
    fn test_quit() {
        let mut out = Vec::new();
        let flow = engine().handle_line("quit", &mut out).unwrap();
        assert_eq!(flow, Flow::Quit);
        assert!(out.is_empty());
    }

    #[test]
    fn test_blank_and_unknown_lines_are_silent() {
        let mut engine = engine();
        let output = run(&mut engine, &["", "   ", "register later", "debug on", "go nodes x"]);
        assert!(output.is_empty());
    }

    #[test]
    fn test_position_startpos_with_moves() {
        let mut engine = engine();
        run(&mut engine, &["position startpos moves e2e4 e7e5 g1f3"]);
        assert_eq!(
            engine.position().fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        );
    }

    #[test]
    fn test_position_fen() {
        let mut engine = engine();
        run(&mut engine, &["position fen 4K3/r7/6k1/8/8/8/8/q7 b - - 0 1"]);
        assert_eq!(engine.position().fen(), "4K3/r7/6k1/8/8/8/8/q7 b - - 0 1");
    }

    #[test]
    fn test_bad_position_keeps_previous() {
        let mut engine = engine();
        run(&mut engine, &["position startpos moves e2e4"]);
        let before = engine.position().fen();

        let output = run(
            &mut engine,
            &[
                "position fen not/a/fen w - - 0 1",
                "position startpos moves e2e5",
                "position",
            ],
        );
        assert!(output.is_empty());
        assert_eq!(engine.position().fen(), before);
    }

    #[test]
    fn test_ucinewgame_resets_position() {
        let mut engine = engine();
        run(&mut engine, &["position startpos moves d2d4", "ucinewgame"]);
        assert_eq!(engine.position().fen(), ChessPosition::startpos().fen());
    }

    #[test]
    fn test_inherited_repetition_is_cleared() {
        let mut engine = engine();
        run(
            &mut engine,
            &["position startpos moves g1f3 g8f6 f3g1 f6g8 g1f3 g8f6 f3g1 f6g8"],
        );
        assert!(!engine.position().can_claim_draw());
        assert!(!engine.position().is_terminal());
    }

    #[test]
    fn test_fifty_move_claim_is_cleared() {
        let mut engine = engine();
        run(&mut engine, &["position fen 4k3/8/8/8/8/8/8/R3K3 w - - 100 80"]);
        assert_eq!(engine.position().fen(), "4k3/8/8/8/8/8/8/R3K3 w - - 0 80");
        assert_eq!(engine.position().halfmoves(), 0);
        assert!(!engine.position().can_claim_draw());
    }

    #[test]
    fn test_seventy_five_move_rule_ends_game() {
        let mut engine = engine();
        let shuffle = ["a1a2", "e8d8", "a2a1", "d8e8"].repeat(12).join(" ");
        let line = format!(
            "position fen 4k3/8/8/8/8/8/8/R3K3 w - - 100 80 moves {shuffle} a1a2 e8d8"
        );
        let output = run(&mut engine, &[line.as_str(), "go nodes 10"]);
        assert_eq!(engine.position().halfmoves(), 150);
        assert!(engine.position().is_terminal());
        assert_eq!(output, vec!["info score cp 0", "bestmove 0000"]);
    }

    #[test]
    fn test_go_nodes_from_startpos() {
        let mut engine = engine();
        let output = run(&mut engine, &["position startpos", "go nodes 50"]);

        assert_eq!(output.len(), 2);
        let score: i32 = output[0]
            .strip_prefix("info score cp ")
            .unwrap()
            .parse()
            .unwrap();
        assert!(score.abs() < 10000);

        let best = output[1].strip_prefix("bestmove ").unwrap();
        let start = ChessPosition::startpos();
        let legal: Vec<String> = start
            .legal_moves()
            .into_iter()
            .map(|mv| start.uci_move(mv))
            .collect();
        assert!(legal.iter().any(|mv| mv == best), "{best} is not legal");
    }

    #[test]
    fn test_go_favours_side_with_material() {
        let mut engine = engine();
        let output = run(
            &mut engine,
            &["position fen 4K3/r7/6k1/8/8/8/8/q7 b - - 0 1", "go nodes 200"],
        );

        let score: i32 = output[0]
            .strip_prefix("info score cp ")
            .unwrap()
            .parse()
            .unwrap();
        assert!(score > 500, "score {score}");
        assert!(output[1].starts_with("bestmove "));
        assert_ne!(output[1], "bestmove 0000");
    }

    #[test]
    fn test_go_on_checkmated_position() {
        let mut engine = engine();
        let output = run(
            &mut engine,
            &["position startpos moves f2f3 e7e5 g2g4 d8h4", "go nodes 10"],
        );
        assert_eq!(output, vec!["info score cp -10000", "bestmove 0000"]);
    }

    #[test]
    fn test_go_movetime() {
        let mut engine = UciEngine::new(
            ConstantEvaluator(0),
            settings(),
            ChaCha20Rng::seed_from_u64(1),
        );
        let output = run(&mut engine, &["go movetime 20"]);
        assert_eq!(output.len(), 2);
        assert_eq!(output[0], "info score cp 0");
    }

    #[test]
    fn test_go_zero_nodes_is_ignored() {
        let mut engine = engine();
        assert!(run(&mut engine, &["go nodes 0"]).is_empty());
    }
}
