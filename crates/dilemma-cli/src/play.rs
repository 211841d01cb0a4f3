use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use contracts::{AdvanceOutcome, ApiError, ScenarioView, Side};
use dilemma_api::DilemmaApi;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use crate::render;
use crate::ticker::DisplayTicker;

const ESCAPE_ARROW_LEFT: &str = "\u{1b}[D";
const ESCAPE_ARROW_RIGHT: &str = "\u{1b}[C";

#[derive(Debug, thiserror::Error)]
pub enum PlayError {
    #[error("session rejected the action: {0}")]
    Api(#[from] ApiError),
    #[error("terminal io error: {0}")]
    Io(#[from] std::io::Error),
}

type SharedApi = Arc<Mutex<DilemmaApi>>;

fn lock(api: &SharedApi) -> MutexGuard<'_, DilemmaApi> {
    api.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reads a side from one line of terminal input. Arrow keys arrive as ANSI
/// escape sequences when the terminal is in line mode.
pub fn side_from_input(line: &str) -> Option<Side> {
    if line.contains(ESCAPE_ARROW_LEFT) {
        return Some(Side::Left);
    }
    if line.contains(ESCAPE_ARROW_RIGHT) {
        return Some(Side::Right);
    }
    line.parse::<Side>().ok()
}

pub async fn play(api: DilemmaApi, tick: Option<Duration>) -> Result<(), PlayError> {
    let api: SharedApi = Arc::new(Mutex::new(api));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let first = lock(&api).start()?;
        if !play_run(&api, first, tick, &mut lines).await? {
            return Ok(());
        }

        print!("Play again? [y/N] ");
        std::io::stdout().flush()?;
        match lines.next_line().await? {
            Some(answer) if answer.trim().eq_ignore_ascii_case("y") => {
                lock(&api).reset();
            }
            _ => return Ok(()),
        }
    }
}

/// Returns `false` when input ends before the run completes.
async fn play_run<R>(
    api: &SharedApi,
    first: ScenarioView,
    tick: Option<Duration>,
    lines: &mut Lines<R>,
) -> Result<bool, PlayError>
where
    R: AsyncBufRead + Unpin,
{
    let mut view = first;
    loop {
        println!();
        print!("{}", render::scenario_screen(&view));
        std::io::stdout().flush()?;

        let ticker = tick.map(|period| spawn_timer(api, period));
        let side = loop {
            let Some(line) = lines.next_line().await? else {
                return Ok(false);
            };
            match side_from_input(&line) {
                Some(side) => break side,
                None => {
                    print!("Please answer left or right (l/r): ");
                    std::io::stdout().flush()?;
                }
            }
        };
        if let Some(ticker) = ticker {
            ticker.cancel();
        }

        let outcome = lock(api).decide(side)?;
        eprintln!();
        println!();
        print!("{}", render::result_screen(&outcome));
        print!("Press Enter to continue ");
        std::io::stdout().flush()?;
        if lines.next_line().await?.is_none() {
            return Ok(false);
        }

        let advanced = lock(api).advance()?;
        match advanced {
            AdvanceOutcome::Next { view: next } => view = next,
            AdvanceOutcome::Complete => {
                let report = lock(api).analysis()?;
                println!();
                print!("{}", render::report_screen(&report));
                return Ok(true);
            }
        }
    }
}

fn spawn_timer(api: &SharedApi, period: Duration) -> DisplayTicker {
    let api = Arc::clone(api);
    DisplayTicker::spawn(period, move || {
        let elapsed = lock(&api).elapsed_seconds();
        if let Some(seconds) = elapsed {
            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "{}", render::timer_line(seconds));
            let _ = stderr.flush();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_escape_sequences_pick_a_side() {
        assert_eq!(side_from_input("\u{1b}[D"), Some(Side::Left));
        assert_eq!(side_from_input("\u{1b}[C"), Some(Side::Right));
    }

    #[test]
    fn words_and_letters_pick_a_side() {
        assert_eq!(side_from_input("l"), Some(Side::Left));
        assert_eq!(side_from_input("RIGHT"), Some(Side::Right));
        assert_eq!(side_from_input("ArrowLeft"), Some(Side::Left));
        assert_eq!(side_from_input(""), None);
        assert_eq!(side_from_input("maybe"), None);
    }
}
