//! Command implementations.

pub mod ask;
pub mod export;
pub mod fill;
pub mod ingest;
pub mod interview;
pub mod preview;
pub mod purge;
pub mod show;

pub use self::ask::execute_ask;
pub use self::export::execute_export;
pub use self::fill::execute_fill;
pub use self::ingest::execute_ingest;
pub use self::interview::execute_interview;
pub use self::preview::execute_preview;
pub use self::purge::execute_purge;
pub use self::show::execute_show;
