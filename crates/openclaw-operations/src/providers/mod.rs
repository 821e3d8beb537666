mod docker;
mod files;
mod prerequisites;

pub use docker::DockerEngine;
pub use files::FileSystemHost;
pub use prerequisites::SystemPrerequisites;
