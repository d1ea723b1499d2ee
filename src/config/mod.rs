pub mod kdl;
pub mod settings;


pub use kdl::{RawSettings, TestDeclaration, parse_manifest, parse_settings};
pub use settings::{MatrixContext, Settings};
