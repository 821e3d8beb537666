mod confirmation;
mod container_engine;
mod host_files;
mod prerequisites;

pub use confirmation::ConfirmationProvider;
pub use container_engine::ContainerEngine;
pub use host_files::HostFiles;
pub use prerequisites::{CheckOutcome, PrerequisiteChecker};
