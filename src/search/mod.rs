pub mod executor;
pub mod results;

pub use executor::{CollectionView, QueryExecutor, ResultLimit, SearchOptions};
pub use results::{ResultGroup, SearchHit, SearchResults};
