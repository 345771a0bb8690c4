//! Privilege drop
//!
//! The server runs under a dedicated unprivileged account for its whole
//! lifecycle. When started as root, ownership of the runtime root is
//! granted to that account first (it must be able to read the credential
//! artifact), then the process switches group, supplementary groups and
//! user. Continuing to serve as root is refused outright.

use std::fs;
use std::path::Path;

use nix::unistd::{chown, setgid, setgroups, setuid, Gid, Uid, User};
use tracing::{info, warn};

use crate::errors::{ForkliftError, Result};

/// Resolve the configured account on this host
pub fn lookup_account(name: &str) -> Result<User> {
    User::from_name(name)
        .map_err(|e| ForkliftError::privilege(format!("account lookup for '{}' failed: {}", name, e)))?
        .ok_or_else(|| {
            ForkliftError::privilege(format!(
                "account '{}' does not exist on this host; create it before serving",
                name
            ))
        })
}

/// Drop to the unprivileged account, chowning the runtime root first when
/// one is given. Credentialed images need this for the artifact to stay
/// readable; every image needs it for the heartbeat files.
///
/// Already-unprivileged processes pass through with at most a warning; the
/// account mismatch is an operator choice there, not a fault.
pub fn drop_privileges(account: &str, runtime_root: Option<&Path>) -> Result<()> {
    if !Uid::effective().is_root() {
        match User::from_name(account) {
            Ok(Some(user)) if user.uid != Uid::effective() => {
                warn!(
                    "running as uid {} rather than configured account '{}'",
                    Uid::effective(),
                    account
                );
            }
            Ok(_) => {}
            Err(e) => warn!("cannot verify run-as account '{}': {}", account, e),
        }
        return Ok(());
    }

    let user = lookup_account(account)?;

    if let Some(root) = runtime_root {
        chown_recursive(root, user.uid, user.gid)?;
        info!("runtime root {} owned by {}", root.display(), account);
    }

    setgroups(&[user.gid])
        .map_err(|e| ForkliftError::privilege(format!("setgroups failed: {}", e)))?;
    setgid(user.gid).map_err(|e| ForkliftError::privilege(format!("setgid failed: {}", e)))?;
    setuid(user.uid).map_err(|e| ForkliftError::privilege(format!("setuid failed: {}", e)))?;

    if Uid::effective().is_root() {
        return Err(ForkliftError::privilege(
            "refusing to serve: still running as root after privilege drop",
        ));
    }

    info!("privileges dropped to '{}' (uid {})", account, user.uid);
    Ok(())
}

fn chown_recursive(path: &Path, uid: Uid, gid: Gid) -> Result<()> {
    chown(path, Some(uid), Some(gid)).map_err(|e| {
        ForkliftError::privilege(format!("chown {} failed: {}", path.display(), e))
    })?;

    if path.is_dir() {
        let entries = fs::read_dir(path).map_err(|e| {
            ForkliftError::privilege(format!("cannot list {}: {}", path.display(), e))
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| {
                ForkliftError::privilege(format!("cannot list {}: {}", path.display(), e))
            })?;
            chown_recursive(&entry.path(), uid, gid)?;
        }
    }

    Ok(())
}
