//! SeaORM entities
//!
//! Table definitions used by the PostgreSQL adapters. Domain code never sees
//! these types; adapters convert them into `domain::entities`.

pub mod posts;
pub mod users;
pub mod votes;
