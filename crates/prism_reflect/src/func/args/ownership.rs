use core::fmt::{Display, Formatter};

/// The ownership of an argument or receiver.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ownership {
    /// The argument is a shared reference.
    Ref,
    /// The argument is a mutable reference.
    Mut,
    /// The argument is an owned value.
    Owned,
}

impl Ownership {
    /// Returns `true` if an argument of `received` ownership can be passed where `self` is
    /// expected.
    ///
    /// A mutable reference is accepted where a shared reference is expected.
    pub fn accepts(self, received: Ownership) -> bool {
        self == received || (self == Ownership::Ref && received == Ownership::Mut)
    }
}

impl Display for Ownership {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Ref => write!(f, "reference"),
            Self::Mut => write!(f, "mutable reference"),
            Self::Owned => write!(f, "owned"),
        }
    }
}
