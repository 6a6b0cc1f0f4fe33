use std::fmt;

/// The five wizard screens, traversed linearly.
///
/// `Done` can loop back to `Reviewing` through an answer edit; everything
/// else only moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    NotStarted,
    Interviewing,
    Reviewing,
    Generating,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::NotStarted => "not-started",
            Stage::Interviewing => "interviewing",
            Stage::Reviewing => "reviewing",
            Stage::Generating => "generating",
            Stage::Done => "done",
        };
        write!(f, "{name}")
    }
}
