/// Result structs for command output. Commands return these instead of printing
/// directly; main.rs formats them as human-readable or JSON based on --json.
mod init;
mod net;
mod run;
mod sysinfo;
mod terminal;

pub use init::*;
pub use net::*;
pub use run::*;
pub use sysinfo::*;
pub use terminal::*;
