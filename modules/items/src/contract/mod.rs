pub mod model;

pub use model::{Item, ItemDraft, ItemPatch, ItemQuery, ItemSort};
