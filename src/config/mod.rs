//! Render configuration: typed fields, section schemas and the document parser

pub mod field;
pub mod map;
pub mod parser;
pub mod section;
pub mod validator;
pub mod world;

pub use field::{resolve, Field, FieldState};
pub use map::{parse_rotations, MapDefaults, MapSection, RotationError, RENDER_MODES};
pub use parser::{ConfigParseError, ConfigParser};
pub use section::{ConfigDocument, ConfigSection, FromConfigValue, ValueError};
pub use validator::{ValidationList, ValidationMap, ValidationMessage, ValidationSeverity};
pub use world::{WorldDefaults, WorldSection};
