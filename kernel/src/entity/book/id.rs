use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }

    /// `None` when `id` is not in the store's key format.
    pub fn parse(id: &str) -> Option<Self> {
        Uuid::parse_str(id).ok().map(Self)
    }
}
