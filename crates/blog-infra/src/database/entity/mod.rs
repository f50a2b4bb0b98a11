//! SeaORM entities. Table names follow the existing `tb_*` schema.

pub mod post;
pub mod theme;
pub mod user;
