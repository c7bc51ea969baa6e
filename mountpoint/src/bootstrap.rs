use std::{cell::Cell, mem, rc::Rc};

use mountpoint_nodes::{Host, MountError, Node};

/// Identifier of the element the application is rendered into.
pub const MOUNT_ID: &str = "react-node";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Nothing registered yet.
    Idle,
    AwaitingReady,
    Mounted,
    Failed,
}

/// One-time application startup against a [`Host`] document.
///
/// ```ignore
/// let doc = WebDocument::current()?;
/// Bootstrap::new(doc).start(app)?;
/// ```
pub struct Bootstrap<H> {
    host: H,
    mount_id: String,
    phase: Rc<Cell<Phase>>,
}

impl<H: Host> Bootstrap<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            mount_id: MOUNT_ID.to_string(),
            phase: Rc::new(Cell::new(Phase::Idle)),
        }
    }

    pub fn mount_id(mut self, id: impl Into<String>) -> Self {
        self.mount_id = id.into();
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    /// Registers `root` to be mounted once the host signals that the document is ready.
    ///
    /// Only the first call registers anything. The mount itself happens inside the host's ready
    /// callback, so a missing mount node surfaces wherever the host reports callback errors,
    /// unless the host was already ready and ran it right away.
    pub fn start<F>(&self, root: F) -> Result<(), MountError>
    where
        F: FnOnce() -> H::Node + 'static,
    {
        if self.phase() != Phase::Idle {
            return Err(MountError::AlreadyStarted);
        }
        self.phase.set(Phase::AwaitingReady);

        let host = self.host.clone();
        let id = self.mount_id.clone();
        let phase = self.phase.clone();

        tracing::debug!(mount_id = %id, "waiting for document ready");
        let res = self.host.on_ready(move || match mount(&host, &id, root) {
            Ok(target) => {
                phase.set(Phase::Mounted);
                // the tree lives as long as the page
                mem::forget(target);
                Ok(())
            }
            Err(err) => {
                phase.set(Phase::Failed);
                Err(err)
            }
        });

        if res.is_err() && self.phase() == Phase::AwaitingReady {
            self.phase.set(Phase::Failed);
        }
        res
    }
}

/// Replaces the content of the element `id` with the tree built by `root`.
///
/// `root` is only invoked once the element is found. Returns the mount node.
pub fn mount<H, F>(host: &H, id: &str, root: F) -> Result<H::Node, MountError>
where
    H: Host,
    F: FnOnce() -> H::Node,
{
    let Some(target) = host.element_by_id(id) else {
        tracing::error!(mount_id = id, "mount node not found");
        return Err(MountError::MissingMountNode { id: id.to_string() });
    };

    let node = root();
    target.clear();
    target.insert(&node, None);

    tracing::info!(mount_id = id, "application mounted");
    Ok(target)
}
