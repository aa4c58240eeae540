pub mod distro;
pub mod http;
pub mod paths;
pub mod privilege;
pub mod progress;
pub mod shell;
pub mod workspace;
