pub mod curriculum_service;
pub mod draft_service;
pub mod grading_service;
pub mod quiz_builder;
pub mod quiz_session;
pub mod review_service;
