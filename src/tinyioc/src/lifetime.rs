use std::fmt::{Display, Formatter, Result as FmtResult};

/// A type that represents how long an object handed out by a container lives.
///
/// A transient object is created on every request and only has its creation
/// managed by the container. A singleton object is created once, outside of
/// the container, and the same object is shared by every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    Transient,
    Singleton,
}

impl Lifetime {
    /// Returns the name of the lifetime in a string literal.
    pub fn to_str(&self) -> &'static str {
        match self {
            Self::Transient => "Transient",
            Self::Singleton => "Singleton",
        }
    }
}

impl Display for Lifetime {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_str())
    }
}
