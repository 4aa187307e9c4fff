// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! kubectl invocation against a downstream cluster

use crate::error::{Result, WorkloadError};
use crate::kubernetes::client::{DownstreamCluster, RancherClient};
use std::io::Write;
use std::process::Stdio;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Run kubectl with `args` against `cluster_id` and return stdout followed by stderr.
///
/// A non-zero exit status is reported as [`WorkloadError::CommandFailed`] carrying the
/// same combined output.
#[instrument(skip(client))]
pub async fn command(client: &RancherClient, cluster_id: &str, args: &[String]) -> Result<String> {
    let downstream = client.downstream(cluster_id).await?;
    run(&client.config().kubectl_path, &downstream, args).await
}

async fn run(kubectl_path: &str, downstream: &DownstreamCluster, args: &[String]) -> Result<String> {
    let command_line = format!("{} {}", kubectl_path, args.join(" "));
    let io_error = |source| WorkloadError::CommandIo {
        command: command_line.clone(),
        source,
    };

    let mut cmd = Command::new(kubectl_path);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    // Held until the command exits; dropping it removes the file
    let kubeconfig_file = match downstream.kubeconfig() {
        Some(kubeconfig) => {
            let mut file = NamedTempFile::new().map_err(io_error)?;
            file.write_all(kubeconfig.as_bytes()).map_err(io_error)?;
            file.flush().map_err(io_error)?;
            cmd.arg("--kubeconfig").arg(file.path());
            Some(file)
        }
        None => None,
    };
    if let Some(server) = downstream.server_override() {
        cmd.arg(format!("--server={}", server));
    }
    cmd.args(args);

    debug!("Running {}", command_line);
    let output = cmd.output().await.map_err(io_error)?;
    drop(kubeconfig_file);

    let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
        return Err(WorkloadError::CommandFailed {
            command: command_line,
            status: output.status,
            output: combined,
        });
    }

    Ok(combined)
}
