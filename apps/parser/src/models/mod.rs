pub mod document;
pub mod record;

pub use document::{DocumentFormat, RawDocument};
pub use record::{EntityCategory, EntityMap, ResumeRecord};
