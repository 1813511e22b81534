use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookDescription(String);

impl BookDescription {
    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }
}
