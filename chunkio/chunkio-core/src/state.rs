/// Lifecycle of a chunk reader or cursor.
///
/// A reader starts `Opened` once its schema is known, moves to `Iterating`
/// with the first chunk, and ends in `Exhausted` (end of data) or `Failed`
/// (the error was already yielded). Both end states keep yielding `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    Opened,
    Iterating,
    Exhausted,
    Failed,
}

impl ReaderState {
    pub fn is_done(self) -> bool {
        matches!(self, ReaderState::Exhausted | ReaderState::Failed)
    }

    /// Records the outcome of one advance and passes it through.
    pub fn advance<T, E>(&mut self, next: Option<Result<T, E>>) -> Option<Result<T, E>> {
        *self = match &next {
            None => ReaderState::Exhausted,
            Some(Ok(_)) => ReaderState::Iterating,
            Some(Err(_)) => ReaderState::Failed,
        };
        next
    }
}
