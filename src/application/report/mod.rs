mod report_match;

pub use report_match::*;
