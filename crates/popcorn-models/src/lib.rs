pub mod movie;
pub mod summary;
pub mod watched;

pub use movie::{MovieDetail, MovieSummary};
pub use summary::{format_average, WatchedSummary};
pub use watched::{WatchedEntry, MAX_USER_RATING};
