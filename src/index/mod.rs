pub mod descriptor;
pub mod loader;
pub mod lookup;

pub use descriptor::{CollectionDescriptor, FnSource, RawSource, StaticSource};
pub use loader::RecordLoader;
pub use lookup::{CollectionIndex, LookupIndex};
