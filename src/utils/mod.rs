pub mod id;
pub mod text;
pub mod time;
