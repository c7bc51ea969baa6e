use thiserror::Error;

#[derive(Clone, PartialEq, Eq, Error, Debug)]
pub enum MountError {
    #[error("no element with id `{id}` to mount into")]
    MissingMountNode { id: String },

    #[error("JavaScript window.document undefined")]
    NoDocument,

    #[error("failed to register ready listener: {0}")]
    Listener(String),

    #[error("application already started")]
    AlreadyStarted,
}
