mod scan;
mod update;
mod validate;

pub use scan::{DEFAULT_BASE, DEFAULT_CONTEXT_LINES, ScanInput, ScanOperation};
pub use update::{
    BREAKING_PREFIX, PackageUpdate, PackageUpdateReport, UpdateInput, UpdateOperation,
    UpdateOutput, describe_bump,
};
pub use validate::{ValidateOperation, ValidationResult};
