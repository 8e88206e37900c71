pub mod competitors;
pub mod error;
pub mod health;
pub mod keywords;
pub mod openapi;
pub mod runs;
