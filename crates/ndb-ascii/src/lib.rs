//! ndb-ascii
//!
//! Loads the caret-delimited ASCII dump of the USDA National Nutrient Database
//! through the chunked reader and builds the food-name search index.
#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod error;
pub mod loader;
pub mod models;
pub mod schema;

pub use error::{LoadError, Result};
pub use loader::AsciiDb;
pub use models::{Food, FoodGroup, FoodNutrient, Nutrient, Weight};
pub use schema::Table;
