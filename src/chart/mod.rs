//! Interactive chart rendering.
//!
//! - Plotly figure JSON (`figure`)
//! - standalone HTML document (`html`)

pub mod figure;
pub mod html;

pub use figure::*;
pub use html::*;
