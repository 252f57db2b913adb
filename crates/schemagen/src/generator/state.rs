use derive_more::Display;

///
/// PassState
///
/// A pass walks these in order. `Failed` can follow any state except
/// `Done`; a failed pass never reaches `Persisting`'s save.
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
pub enum PassState {
    #[default]
    Idle,
    Loading,
    Discovering,
    Validating,
    Emitting,
    Compiling,
    Persisting,
    Done,
    Failed,
}

impl PassState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether `next` may follow `self` within one pass.
    #[must_use]
    pub const fn can_enter(self, next: Self) -> bool {
        match next {
            Self::Failed => !matches!(self, Self::Done | Self::Failed),
            Self::Idle => false,
            _ => self.successor() as u8 == next as u8,
        }
    }

    const fn successor(self) -> Self {
        match self {
            Self::Idle => Self::Loading,
            Self::Loading => Self::Discovering,
            Self::Discovering => Self::Validating,
            Self::Validating => Self::Emitting,
            Self::Emitting => Self::Compiling,
            Self::Compiling => Self::Persisting,
            Self::Persisting | Self::Done => Self::Done,
            Self::Failed => Self::Failed,
        }
    }
}

///
/// TESTS
///
