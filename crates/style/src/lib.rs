pub mod alignment;
pub mod border;
pub mod dimension;
pub mod parsers;

pub use alignment::VerticalAlignment;
pub use border::{collapse, Border, BorderStyle, Borders, Side};
pub use dimension::{Margins, PageSize};
pub use parsers::StyleParseError;
