mod book;
mod genre;
mod health;

pub use self::{book::*, genre::*, health::*};
