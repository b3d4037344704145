mod report;

pub(crate) use report::{format_update, format_validation};
