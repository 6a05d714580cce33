mod fragment;
mod text;

pub use fragment::Fragment;
pub use text::{parse_number, substring_between};
