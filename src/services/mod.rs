/// Bag clubs: creation, best stroke memory notes and ordering.
pub mod bag_service;
/// Home club layout and user courses.
pub mod course_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// CSV export of counted strokes.
pub mod export_service;
/// Health check service.
pub mod health_service;
/// Public contact and interest form intake.
pub mod intake_service;
/// Mental element list management.
pub mod mental_element_service;
/// Reordering and repacking of ordered per-user lists.
pub mod ordering;
/// Round lifecycle: start, hole capture, commit and completion.
pub mod round_service;
/// Summary, dashboard and history statistics.
pub mod stats_service;
/// Storage connection supervisor toggling degraded mode.
pub mod storage_supervisor;
