// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Hermetic build sandbox assembly: a pure [`plan`] layer describing bind
//! mounts and symlinks, and an [`exec`] layer that actually enters namespaces
//! and applies them.

mod error;
mod exec;
mod plan;
mod traits;

pub use error::{Error, Result};
pub use exec::{
    apply_bind_mount, apply_symlink, check_can_sandbox, create_temp_root, enter_hermetic_sandbox,
    enter_nonhermetic_sandbox, enter_user_and_mount_namespace, write_minimal_user_db,
};
pub use plan::{BindMount, SandboxContext, SandboxPlan, Symlink, exchange_dir_symlinks, plan_sandbox};
pub use traits::{Chunk, FuseControl, RemoteBuilder};
