use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Compared case-sensitively, exactly as stored.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct GenreName(String);

impl GenreName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}
