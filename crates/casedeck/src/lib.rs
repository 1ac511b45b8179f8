#![doc = include_str!("../README.md")]

mod error;
mod fields;
mod parse;
mod record;
mod section;
mod serialize;

pub use error::{DeckError, Result};
pub use fields::{DATE_FORMAT, Field, format_date};
pub use parse::{ParsedTest, parse_test};
pub use record::{CommitSig, GitInfo, Row, SectionInfo};
pub use section::{
    MAX_TITLE_LEN, SECTION_FILE_NAME, SECTION_SEPARATOR, TEST_FILE_SUFFIX, path_to_section,
    section_to_path, title_from_file_name,
};
pub use serialize::{RenderedTest, collapse_ws, render_row};
