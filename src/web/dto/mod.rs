pub mod achievements;
pub mod cards;
pub mod categories;
pub mod common;
pub mod courses;
pub mod exercises;
pub mod languages;
pub mod lessons;
pub mod modules;
pub mod plans;
pub mod richtext;
pub mod users;
pub mod words;
