
pub mod bbox;
pub mod bounds;
pub mod commands;
pub mod error;
pub mod fitter;
pub mod interval;
pub mod json_parser;
pub mod json_structs;
pub mod materials;
pub mod mesh;
pub mod numeric;
pub mod scene;
pub mod shapes;
pub mod transform;

pub mod prelude;
