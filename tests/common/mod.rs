#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use pullseq::ExternalSource;

/// Error reported by [`ScriptedSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    Eof,
    Failed(&'static str),
}

/// Replays a fixed list of read outcomes, then reports `Eof` forever.
///
/// The read counter is shared so it stays observable after the source
/// has been moved into a producer.
pub struct ScriptedSource {
    script: VecDeque<Result<&'static str, MockError>>,
    reads: Rc<Cell<usize>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<&'static str, MockError>>) -> (Self, Rc<Cell<usize>>) {
        let reads = Rc::new(Cell::new(0));
        let source = Self {
            script: script.into(),
            reads: Rc::clone(&reads),
        };
        (source, reads)
    }

    /// Successful chunks followed by end-of-stream.
    pub fn chunks(chunks: &[&'static str]) -> (Self, Rc<Cell<usize>>) {
        Self::new(chunks.iter().map(|c| Ok(*c)).collect())
    }
}

impl ExternalSource for ScriptedSource {
    type Chunk = &'static str;
    type Error = MockError;

    fn read(&mut self) -> Result<&'static str, MockError> {
        self.reads.set(self.reads.get() + 1);
        self.script.pop_front().unwrap_or(Err(MockError::Eof))
    }
}
