// crates/daisho-cli/src/services/mod.rs - Service layer modules
pub mod editor;
pub mod logging;

pub use editor::EditorService;
