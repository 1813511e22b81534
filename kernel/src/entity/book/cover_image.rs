use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

// URL of the cover, empty when the book has none.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookCoverImage(String);

impl BookCoverImage {
    pub fn new(cover_image: impl Into<String>) -> Self {
        Self(cover_image.into())
    }
}
