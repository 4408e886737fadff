// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! A real [`distri_build::ProcessRunner`]: one subprocess per build step,
//! output appended to the build's log file.

use std::path::PathBuf;

use distri_build::{BuildState, BuildStep, Error, ProcessRunner, Result};

pub struct CommandRunner {
    log_path: PathBuf,
}

impl CommandRunner {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self { log_path: log_path.into() }
    }
}

impl ProcessRunner for CommandRunner {
    fn run(&self, step: &BuildStep) -> Result<()> {
        let Some((program, args)) = step.argv.split_first() else {
            return Err(Error::BuildStepFailed {
                stage: BuildState::Built,
                cause: "empty argv".into(),
                log_path: self.log_path.display().to_string(),
            });
        };

        let log = std::fs::OpenOptions::new().create(true).append(true).open(&self.log_path)?;
        let mut cmd = std::process::Command::new(program);
        cmd.args(args).current_dir(&step.cwd).envs(&step.extra_env);
        cmd.stdout(log.try_clone()?).stderr(log);

        tracing::debug!(argv = ?step.argv, cwd = %step.cwd.display(), "running build step");
        let status = cmd.status()?;
        if !status.success() {
            return Err(Error::BuildStepFailed {
                stage: BuildState::Built,
                cause: format!("{program} exited with {status}"),
                log_path: self.log_path.display().to_string(),
            });
        }
        Ok(())
    }
}
