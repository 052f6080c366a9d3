/// Operator-only operations: login, round results, listings, deletion.
pub mod admin_service;
/// Histogram rendering for the results page.
pub mod chart_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Participant submissions and the public counter.
pub mod public_service;
