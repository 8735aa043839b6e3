use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The deadline passed before every pending signaler reported back.
    /// `remaining` signalers are still pending on the waiter.
    #[error("deadline of {deadline:?} elapsed with {remaining} signaler(s) still pending")]
    Elapsed { deadline: Duration, remaining: usize },
}
