pub mod decompile;
pub mod loader;
pub mod model;
pub mod reflect;
pub mod spv;

pub use decompile::disassemble_module;
pub use loader::{parse_module, words_from_bytes};
pub use model::Module;
pub use reflect::{reflect_module, Reflection};
