//! Internal definition of the HashSet table.

pub mod capacity;
pub mod element;
pub mod table;

mod hooks;

pub use self::hooks::{DefaultHashHooks, HashHooks};

use super::failure;
