pub mod collapse;
pub mod combine;
pub mod error;
pub mod kotab;
pub mod lookup;
pub mod table;
pub mod terminal;
pub mod utils;

pub use crate::error::KotabError;
pub use crate::kotab::{Kotab, KotabConfig};
