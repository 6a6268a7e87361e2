pub mod footer;
pub mod header;
pub mod utils;

pub use footer::{draw_footer, draw_prompt};
pub use header::draw_header;
pub use utils::era_color;
