//! Single-line countdown shown while waiting for the next cycle.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};
use tokio::time::Instant;
use tracing::debug;

/// Formats a wait as `"{m} min {s} s"`.
#[must_use]
pub fn format_wait(wait: Duration) -> String {
    let secs = wait.as_secs();
    format!("{} min {} s", secs / 60, secs % 60)
}

/// Sleeps for `total`, redrawing the remaining time once per second.
///
/// Falls back to a silent sleep if the terminal cannot be written.
pub async fn countdown(total: Duration) {
    let deadline = Instant::now() + total;
    let mut stdout = io::stdout();

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }

        if let Err(e) = draw(&mut stdout, remaining) {
            debug!("Countdown display disabled: {}", e);
            tokio::time::sleep(remaining).await;
            break;
        }

        tokio::time::sleep(remaining.min(Duration::from_secs(1))).await;
    }

    let _ = execute!(stdout, MoveToColumn(0), Clear(ClearType::CurrentLine));
}

fn draw(out: &mut impl Write, remaining: Duration) -> io::Result<()> {
    let now = chrono::Local::now().format("%H:%M:%S");
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(format!(
            "[{now}] [*] Waiting {} before the next cycle...",
            format_wait(remaining)
        ))
    )?;
    out.flush()
}
