use std::error;
use std::fmt;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::sync::Arc;

/// What the operator gets to see about an alternative route.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub summary: String,
    pub distance_km: f64,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({:.2} km)", self.summary, self.distance_km)
    }
}

#[derive(Debug, Clone)]
pub enum ChoiceError {
    /// Input ended before a valid choice was made.
    InputClosed,
    Io(Arc<io::Error>),
    OutOfRange { index: usize, candidates: usize },
}

impl error::Error for ChoiceError {}

impl fmt::Display for ChoiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChoiceError::InputClosed => write!(f, "Input closed before a route was chosen."),
            ChoiceError::Io(e) => write!(f, "IO error while choosing a route: {}", e),
            ChoiceError::OutOfRange { index, candidates } => write!(
                f,
                "Route #{} chosen, but only {} routes are available.",
                index, candidates
            ),
        }
    }
}

impl From<io::Error> for ChoiceError {
    fn from(e: io::Error) -> Self {
        ChoiceError::Io(Arc::new(e))
    }
}

/// Picks one of several alternative routes. Only asked when there is more
/// than one candidate.
pub trait RouteChooser: Send + Sync {
    fn choose(&mut self, candidates: &[Candidate]) -> Result<usize, ChoiceError>;
}

/// Always takes the first candidate, used in non-interactive mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl RouteChooser for FirstCandidate {
    fn choose(&mut self, _candidates: &[Candidate]) -> Result<usize, ChoiceError> {
        Ok(0)
    }
}

/// Lists the candidates and asks until a valid index is entered.
pub struct InteractiveChooser<R, W> {
    input: R,
    output: W,
}

impl InteractiveChooser<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R, W> InteractiveChooser<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R, W> RouteChooser for InteractiveChooser<R, W>
where
    R: BufRead + Send + Sync,
    W: Write + Send + Sync,
{
    fn choose(&mut self, candidates: &[Candidate]) -> Result<usize, ChoiceError> {
        writeln!(self.output, "Multiple routes found.\nChoose one:")?;
        for (i, candidate) in candidates.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i, candidate)?;
        }

        let mut line = String::new();
        loop {
            write!(self.output, "Choose #: ")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Err(ChoiceError::InputClosed);
            }
            if let Some(index) = parse_index(&line, candidates.len()) {
                return Ok(index);
            }
        }
    }
}

fn parse_index(line: &str, candidates: usize) -> Option<usize> {
    let line = line.trim();
    if line.is_empty() || !line.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    line.parse::<usize>()
        .ok()
        .filter(|&index| index < candidates)
}
