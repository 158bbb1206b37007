use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};
use sweeper_core::{Difficulty, GameSession, Response};

use render::BoardView;

mod render;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Starting difficulty: easy, medium or hard
    #[arg(short, long, default_value_t = Difficulty::Easy)]
    level: Difficulty,

    /// Draw every cell uncovered (debugging aid)
    #[arg(long)]
    reveal_all: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {seed}");

    let mut session = GameSession::new(args.level, seed)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let response = play(&mut session, stdin.lock(), stdout.lock(), args.reveal_all)?;
    log::debug!("Finished with {response:?}");
    Ok(())
}

/// Runs the prompt loop until the round ends, the player quits, or input runs out.
fn play<R: BufRead, W: Write>(
    session: &mut GameSession,
    mut input: R,
    mut output: W,
    reveal_all: bool,
) -> Result<Response> {
    let mut line = String::new();

    loop {
        writeln!(output, "{}", BoardView::new(session.grid(), reveal_all))?;
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(Response::Quit);
        }

        let args: Vec<&str> = line.split_whitespace().collect();
        let response = match session.execute(args.as_slice()) {
            Ok(response) => response,
            Err(err) => {
                log::debug!("Rejected {args:?}: {err:?}");
                writeln!(output, "{err}")?;
                continue;
            }
        };

        match response {
            Response::Won => {
                writeln!(output, "{}", BoardView::new(session.grid(), reveal_all))?;
                writeln!(output, "\nGame Won!")?;
            }
            Response::Lost => {
                writeln!(output, "{}", BoardView::new(session.grid(), reveal_all))?;
                writeln!(output, "\n{}", BoardView::new(session.grid(), true))?;
                writeln!(output, "\nGame Over!")?;
            }
            Response::Continue | Response::Quit => {}
        }

        if response.is_final() {
            return Ok(response);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweeper_core::Grid;

    fn run(mines: &[(u8, u8)], script: &str) -> (Response, String) {
        let grid = Grid::from_mine_coords((3, 3), mines).unwrap();
        let mut session = GameSession::with_grid(Difficulty::Easy, grid, 0);
        let mut output = Vec::new();

        let response = play(&mut session, script.as_bytes(), &mut output, false).unwrap();
        (response, String::from_utf8(output).unwrap())
    }

    #[test]
    fn flagging_the_mine_wins() {
        let (response, output) = run(&[(2, 2)], "pick 0 0\nflag 2 2\n");

        assert_eq!(response, Response::Won);
        assert!(output.contains(" o  o  o \n o  1  1 \n o  1  * \n"));
        assert!(output.ends_with("Game Won!\n"));
    }

    #[test]
    fn picking_a_mine_prints_uncovered_board() {
        let (response, output) = run(&[(1, 1)], "pick 1 1\n");

        assert_eq!(response, Response::Lost);
        assert!(output.contains(" 1  1  1 \n 1  X  1 \n 1  1  1 \n"));
        assert!(output.ends_with("Game Over!\n"));
    }

    #[test]
    fn errors_are_reported_and_play_continues() {
        let (response, output) = run(&[(1, 1)], "dig\npick 9 9\n\nquit\n");

        assert_eq!(response, Response::Quit);
        assert!(output.contains("Invalid command: dig!\n"));
        assert!(output.contains("Specified position is invalid!\n"));
        assert!(output.contains("No command given!\n"));
    }

    #[test]
    fn quit_stops_before_later_commands() {
        let (response, output) = run(&[(1, 1)], "quit\npick 0 0\n");

        assert_eq!(response, Response::Quit);
        assert_eq!(output.matches("> ").count(), 1);
    }

    #[test]
    fn continue_keeps_prompting() {
        let (response, output) = run(&[(1, 1)], "pick 0 0\nflag 0 1\nquit\n");

        assert_eq!(response, Response::Quit);
        assert_eq!(output.matches("> ").count(), 3);
        assert!(output.contains(" 1  *  . \n"));
    }

    #[test]
    fn end_of_input_quits() {
        let (response, _) = run(&[(1, 1)], "pick 0 0\n");

        assert_eq!(response, Response::Quit);
    }
}
