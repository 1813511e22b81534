mod operation;

pub use self::operation::*;
