pub mod assembler;
pub mod docs;
pub mod dto;
pub mod hal;

pub use assembler::{LinkBuilder, ModelAssembler};
pub use docs::ApiDoc;
pub use hal::{CollectionModel, EntityModel, Links, Relation};
