//! Record kinds of the game-data wiki and their row transforms.

pub mod character;
pub mod event;
pub mod guide;
pub mod item;
pub mod row;
pub mod swimsuit;

pub use character::Character;
pub use event::Event;
pub use guide::Guide;
pub use item::Item;
pub use swimsuit::Swimsuit;

use crate::index::descriptor::{CollectionDescriptor, RawSource};

pub const CHARACTERS: &str = "characters";
pub const SWIMSUITS: &str = "swimsuits";
pub const ITEMS: &str = "items";
pub const EVENTS: &str = "events";
pub const GUIDES: &str = "guides";

pub fn characters(source: impl RawSource + 'static) -> CollectionDescriptor {
    CollectionDescriptor::new::<Character>(CHARACTERS, source)
}

pub fn swimsuits(source: impl RawSource + 'static) -> CollectionDescriptor {
    CollectionDescriptor::new::<Swimsuit>(SWIMSUITS, source)
}

pub fn items(source: impl RawSource + 'static) -> CollectionDescriptor {
    CollectionDescriptor::new::<Item>(ITEMS, source)
}

pub fn events(source: impl RawSource + 'static) -> CollectionDescriptor {
    CollectionDescriptor::new::<Event>(EVENTS, source)
}

pub fn guides(source: impl RawSource + 'static) -> CollectionDescriptor {
    CollectionDescriptor::new::<Guide>(GUIDES, source)
}
