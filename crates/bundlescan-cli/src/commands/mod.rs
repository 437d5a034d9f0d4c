mod discover;
mod init;

pub use discover::discover;
pub use init::init;
