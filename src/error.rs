use core::fmt;

/// Contract violations reported by the containers in this crate.
///
/// These signal misuse by the caller (looking up a key that was never
/// inserted, peeking into an empty list) rather than transient failures, so
/// nothing in the crate retries on them.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Error {
    /// A keyed lookup found no entry for the key.
    KeyNotFound,
    /// An operation needing at least one element ran on an empty container.
    EmptyContainer,
    /// A cursor positioned on the end sentinel was dereferenced.
    PastTheEnd,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::KeyNotFound => "no entry found for key",
            Error::EmptyContainer => "container is empty",
            Error::PastTheEnd => "cursor is past the end",
        })
    }
}

impl core::error::Error for Error {}
