//! Terminal presenter and stdin manual entry.

use std::io::{BufRead, Write};

use galaxy_core::presenter::{NextAction, Presentation, ResultPresenter, Tone};
use galaxy_core::scan::ScanResult;
use galaxy_core::scan_list::ScanListPartition;
use tokio::sync::mpsc;

/// One line typed by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorInput {
    /// A ticket code for manual check-in.
    Code(String),
    /// "Scan another" or "close".
    Action(NextAction),
    /// Show pending and scanned tickets.
    ScanList,
}

impl OperatorInput {
    /// Blank lines are ignored; commands win over codes.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if matches!(line.to_ascii_lowercase().as_str(), "l" | "list") {
            return Some(OperatorInput::ScanList);
        }
        Some(match NextAction::parse(line) {
            Some(action) => OperatorInput::Action(action),
            None => OperatorInput::Code(line.to_string()),
        })
    }
}

fn marker(tone: Tone) -> &'static str {
    match tone {
        Tone::Success => "[OK]",
        Tone::Notice => "[USED]",
        Tone::Failure => "[INVALID]",
    }
}

/// Writes one block per outcome to any [`Write`].
pub struct ConsolePresenter<W: Write + Send> {
    out: W,
    show_next_actions: bool,
}

impl<W: Write + Send> ConsolePresenter<W> {
    /// With `show_next_actions`, each result is followed by the
    /// "scan another / close" hint.
    pub fn new(out: W, show_next_actions: bool) -> Self {
        Self {
            out,
            show_next_actions,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print the startup banner.
    pub fn greet(&mut self, camera: &str) {
        self.write(&format!(
            "Galaxy Cinema check-in ({camera}). Type a ticket code to check it in manually, l to list tickets, q to quit."
        ));
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to write to console");
        }
    }
}

impl<W: Write + Send> ResultPresenter for ConsolePresenter<W> {
    fn present(&mut self, result: &ScanResult) {
        let p = Presentation::from_result(result);
        self.write(&format!("{} {}", marker(p.tone), p.headline));
        self.write(&format!("    {}", p.detail));
        if self.show_next_actions {
            self.write("    [n] scan another  [q] close");
        }
    }

    fn camera_unavailable(&mut self, reason: &str) {
        self.write(&format!("[CAMERA] {reason}"));
        self.write("    Manual entry is still available: type the ticket code.");
    }

    fn scan_list(&mut self, list: &ScanListPartition) {
        self.write(&format!(
            "[LIST] {} pending, {} scanned",
            list.pending.len(),
            list.scanned.len()
        ));
        for ticket in &list.pending {
            self.write(&format!("    pending  {} seat {}", ticket.code, ticket.seat_label));
        }
        for ticket in &list.scanned {
            self.write(&format!("    scanned  {} seat {}", ticket.code, ticket.seat_label));
        }
    }

    fn scan_list_failed(&mut self, reason: &str) {
        self.write(&format!("[LIST] {reason}"));
    }
}

/// Forward operator lines from `reader` until EOF or until the receiver is
/// gone. Blocking; run it on its own thread.
pub fn read_operator_input<R: BufRead>(reader: R, tx: &mpsc::Sender<OperatorInput>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read operator input");
                break;
            }
        };
        if let Some(input) = OperatorInput::parse(&line) {
            if tx.blocking_send(input).is_err() {
                break;
            }
        }
    }
}

/// Read stdin on a detached thread.
///
/// A blocking stdin read would otherwise hold up runtime shutdown.
pub fn spawn_stdin_reader(tx: mpsc::Sender<OperatorInput>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("operator-input".into())
        .spawn(move || read_operator_input(std::io::stdin().lock(), &tx))
        .map(|_| ())
}
