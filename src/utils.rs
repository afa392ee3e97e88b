pub const VERSION: &str = concat!(env!("GIT_COUNT"), "-", env!("GIT_HASH"));

pub fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), VERSION)
}
