use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct SelectLimit(i64);

impl SelectLimit {
    pub fn new(value: impl Into<i64>) -> Self {
        SelectLimit(value.into())
    }
}

impl Default for SelectLimit {
    fn default() -> Self {
        Self::new(10)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct SelectOffset(i64);

impl SelectOffset {
    pub fn new(value: impl Into<i64>) -> Self {
        SelectOffset(value.into())
    }
}

/// 1-based page number. Anything below 1 is treated as the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln)]
pub struct Page(i64);

impl Page {
    pub fn new(value: impl Into<i64>) -> Self {
        Page(value.into().max(1))
    }

    pub fn offset(&self, limit: &SelectLimit) -> SelectOffset {
        SelectOffset::new((self.0 - 1).saturating_mul(*limit.as_ref()))
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize)]
pub struct PageCount(i64);

impl PageCount {
    pub fn new(total: i64, limit: &SelectLimit) -> Self {
        let limit = *limit.as_ref();
        if total <= 0 || limit <= 0 {
            return Self(0);
        }
        Self((total + limit - 1) / limit)
    }
}
