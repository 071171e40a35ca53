use std::io::{self, BufRead, Write};

use crossterm::QueueableCommand;
use crossterm::cursor::MoveToColumn;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use crate::app::FetchResult;
use crate::domain::{MAX_ORGANISMS, OrganismInput};
use crate::output::RECONSTRUCT_MAPPER_URL;
use crate::report::{FetchStatus, ProgressEvent, ProgressSink};

const BAR_WIDTH: usize = 20;

/// Single-line progress bar on stderr, redrawn after every organism.
pub struct TerminalProgress;

impl ProgressSink for TerminalProgress {
    fn event(&self, event: ProgressEvent) {
        let _ = draw_progress(&mut io::stderr(), &event);
    }
}

fn draw_progress<W: Write>(out: &mut W, event: &ProgressEvent) -> io::Result<()> {
    let (color, mut detail) = match event.status {
        FetchStatus::Fetched { records } => (Color::Green, format!("{records} genes")),
        FetchStatus::Failed => (Color::Red, "failed".to_string()),
    };
    if let Some(elapsed) = event.elapsed {
        detail.push_str(&format!(", {:.1}s", elapsed.as_secs_f64()));
    }
    out.queue(MoveToColumn(0))?
        .queue(Clear(ClearType::CurrentLine))?
        .queue(Print(format!(
            "{} {:>3}% {}/{} ",
            progress_bar(event.percent()),
            event.percent(),
            event.completed,
            event.total
        )))?
        .queue(SetForegroundColor(color))?
        .queue(Print(format!("{} ({detail})", event.display_name)))?
        .queue(ResetColor)?;
    if event.completed == event.total {
        out.queue(Print("\n"))?;
    }
    out.flush()
}

fn progress_bar(percent: u8) -> String {
    let filled = (percent as usize * BAR_WIDTH) / 100;
    let mut out = String::from("[");
    for i in 0..BAR_WIDTH {
        out.push(if i < filled { '#' } else { '.' });
    }
    out.push(']');
    out
}

/// Asks for up to [`MAX_ORGANISMS`] code/name pairs. A blank code ends input.
pub fn prompt_organisms<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> io::Result<Vec<OrganismInput>> {
    let mut rows = Vec::new();
    for position in 1..=MAX_ORGANISMS {
        let Some(code) = prompt_line(
            input,
            out,
            &format!("KEGG organism code {position} (blank to finish): "),
        )?
        else {
            break;
        };
        if code.is_empty() {
            break;
        }
        let name = prompt_line(
            input,
            out,
            &format!("Name for organism {position} (optional): "),
        )?
        .filter(|name| !name.is_empty());
        rows.push(OrganismInput::new(code, name));
    }
    Ok(rows)
}

fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    out.write_all(prompt.as_bytes())?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

pub fn print_errors<W: Write>(out: &mut W, result: &FetchResult) -> io::Result<()> {
    for error in &result.errors {
        out.queue(SetForegroundColor(Color::Red))?
            .queue(Print(format!(
                "Error fetching data for {}: {}\n",
                error.display_name, error.message
            )))?
            .queue(ResetColor)?;
    }
    out.flush()
}

pub fn print_saved<W: Write>(out: &mut W, result: &FetchResult, path: &str) -> io::Result<()> {
    out.queue(SetForegroundColor(Color::Green))?
        .queue(Print(format!(
            "Data extraction complete: {} genes from {}/{} organisms saved to {path}\n",
            result.records, result.sections, result.requested
        )))?
        .queue(ResetColor)?
        .queue(Print(format!(
            "Next: open the KEGG Reconstruct Pathway Mapper at {RECONSTRUCT_MAPPER_URL}\n"
        )))?;
    out.flush()
}
