// Request / response DTOs shared by the routes and the providers.
// Nothing here outlives a single request.

pub mod chat;
pub mod content;
pub mod envelope;
pub mod resume;
pub mod system;
