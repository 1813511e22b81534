use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct GenreId(Uuid);

impl GenreId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }

    pub fn parse(id: &str) -> Option<Self> {
        Uuid::parse_str(id).ok().map(Self)
    }
}
