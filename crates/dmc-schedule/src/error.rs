use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("a tour needs at least two activities, got {0}")]
    TooFewActivities(usize),

    #[error("{trips} trips but {modes} initial modes")]
    ModeCountMismatch {
        trips: usize,
        modes: usize,
    },
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
