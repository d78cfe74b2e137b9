//! CLI command implementations.

pub mod check_offsets;
pub mod game_code;
pub mod scan;
pub mod track;
