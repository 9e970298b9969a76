pub mod curriculum_dto;
