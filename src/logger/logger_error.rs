#[derive(Debug)]
/// Logger possible errors
pub enum LoggerError {
    SpawnThreadError,
    SendError(String),
    BadLogPathError(String),
}
