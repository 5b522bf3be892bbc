pub mod footer;
pub mod header;
pub mod utils;

pub use footer::draw_footer;
pub use header::{draw_header, extract_domain, HeaderStatus};
pub use utils::{category_color, centered_rect, truncate};
