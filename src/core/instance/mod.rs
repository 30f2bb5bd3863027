mod files;
mod layout;

pub use files::{ensure_eula, write_user_jvm_args};
pub use layout::{ServerLayout, WorkspaceLayout};
