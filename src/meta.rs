//! Application identity shown in every panel's title block.

pub const NAME: &str = "Kliko's modloader";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
