//! Operation timing: the [`Timer`] value object and the higher-order
//! wrappers that time database, API, cache, and external-service calls.

mod timer;
mod track;

pub use timer::Timer;
pub use track::{
    track_api_response, track_cache_operation, track_database_query, track_external_api,
};
