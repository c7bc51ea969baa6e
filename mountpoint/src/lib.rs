#![warn(clippy::use_self)]

mod bootstrap;

pub use mountpoint_nodes as nodes;

#[cfg(feature = "web")]
pub use mountpoint_web as web;

#[cfg(feature = "render")]
pub use mountpoint_render as render;

pub use bootstrap::{mount, Bootstrap, Phase, MOUNT_ID};

pub mod prelude {
    pub use crate::{
        nodes::{element, text, Host, MountError, Node},
        Bootstrap, MOUNT_ID,
    };
}

/// Mounts `root` into the browser document's `#react-node` once the markup is parsed.
#[cfg(feature = "web")]
pub fn start<F>(root: F) -> Result<(), nodes::MountError>
where
    F: FnOnce() -> web::DomNode + 'static,
{
    Bootstrap::new(web::WebDocument::current()?).start(root)
}
