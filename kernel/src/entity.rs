mod book;
mod common;
mod genre;

pub use self::{book::*, common::*, genre::*};
