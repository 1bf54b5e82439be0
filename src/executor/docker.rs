// ABOUTME: Bollard-based executor for Docker-compatible runtimes.
// ABOUTME: Start recreates the deployment container; stop tears down by label; backup archives locally.

use super::{ExecError, Executor, Verb, archive_data_dir};
use crate::context::Context;
use crate::types::{DeploymentName, ManifestId};
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::{
    ContainerCreateBody, HostConfig, Mount, MountTypeEnum, RestartPolicy, RestartPolicyNameEnum,
};
use bollard::query_parameters::{
    CreateContainerOptions, CreateImageOptions, ListContainersOptions, RemoveContainerOptions,
    StartContainerOptions, StopContainerOptions,
};
use futures::StreamExt;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Label marking containers this tool owns.
const LABEL_MANAGED: &str = "stager.managed";
/// Label carrying the deployment name a container belongs to.
const LABEL_DEPLOYMENT: &str = "stager.deployment";
/// Label listing the manifest set the container was started from.
const LABEL_MANIFESTS: &str = "stager.manifests";

/// Mount point for rendered configuration inside the container.
const CONFIG_MOUNT: &str = "/etc/stager";
/// Mount point for the data directory inside the container.
const DATA_MOUNT: &str = "/var/lib/stager";

fn map_image_pull_error(e: bollard::errors::Error, image: &str) -> ExecError {
    ExecError::ImagePull(format!("{image}: {e}"))
}

fn map_container_error(e: bollard::errors::Error) -> ExecError {
    ExecError::Container(e.to_string())
}

fn is_not_found(e: &bollard::errors::Error) -> bool {
    matches!(
        e,
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            ..
        }
    )
}

/// Whole seconds for the create-body `stop_timeout` field, saturating
/// instead of wrapping when the configured duration is out of range.
fn create_timeout_secs(timeout: Duration) -> i64 {
    i64::try_from(timeout.as_secs()).unwrap_or(i64::MAX)
}

/// Whole seconds for the stop-request `t` parameter, saturating instead of
/// wrapping when the configured duration is out of range.
fn stop_timeout_secs(timeout: Duration) -> i32 {
    i32::try_from(timeout.as_secs()).unwrap_or(i32::MAX)
}

fn is_not_modified(e: &bollard::errors::Error) -> bool {
    matches!(
        e,
        bollard::errors::Error::DockerResponseServerError {
            status_code: 304,
            ..
        }
    )
}

/// Executor backed by a Docker-compatible daemon socket.
pub struct DockerExecutor {
    client: Docker,
    name: DeploymentName,
    image: String,
    data_dir: String,
    stop_timeout: Duration,
}

impl DockerExecutor {
    /// Connect to the local daemon using Docker's environment conventions
    /// (`DOCKER_HOST` or the default socket).
    pub fn connect(context: &Context) -> Result<Self, ExecError> {
        let client = Docker::connect_with_local_defaults()
            .map_err(|e| ExecError::Connection(e.to_string()))?;

        Ok(DockerExecutor {
            client,
            name: context.name.clone(),
            image: context.image.clone(),
            data_dir: context.data_dir.clone(),
            stop_timeout: context.stop_timeout,
        })
    }

    async fn start(&self, work_dir: &Path, manifests: &[ManifestId]) -> Result<(), ExecError> {
        self.pull_image().await?;

        // A previous run may have left a container behind under the same
        // deployment label; start is re-runnable, so replace it.
        self.stop().await?;

        let id = self.create_container(work_dir, manifests).await?;

        match self
            .client
            .start_container(&id, None::<StartContainerOptions>)
            .await
        {
            Ok(()) => Ok(()),
            Err(ref e) if is_not_modified(e) => Ok(()),
            Err(e) => {
                // Remove the created container so a retry starts clean.
                let _ = self
                    .client
                    .remove_container(
                        &id,
                        Some(RemoveContainerOptions {
                            force: true,
                            ..Default::default()
                        }),
                    )
                    .await;
                Err(map_container_error(e))
            }
        }
    }

    async fn pull_image(&self) -> Result<(), ExecError> {
        let opts = CreateImageOptions {
            from_image: Some(self.image.clone()),
            ..Default::default()
        };

        // Pull returns a stream of progress updates - consume it
        let mut stream = self.client.create_image(Some(opts), None, None);
        while let Some(result) = stream.next().await {
            result.map_err(|e| map_image_pull_error(e, &self.image))?;
        }

        Ok(())
    }

    async fn create_container(
        &self,
        work_dir: &Path,
        manifests: &[ManifestId],
    ) -> Result<String, ExecError> {
        // Bind mounts need absolute host paths.
        let config_src = std::fs::canonicalize(work_dir).unwrap_or_else(|_| work_dir.to_path_buf());
        let data_src = config_src.join(&self.data_dir);

        let mut labels = HashMap::new();
        labels.insert(LABEL_MANAGED.to_string(), "true".to_string());
        labels.insert(LABEL_DEPLOYMENT.to_string(), self.name.to_string());
        labels.insert(
            LABEL_MANIFESTS.to_string(),
            manifests
                .iter()
                .map(ManifestId::as_str)
                .collect::<Vec<_>>()
                .join(","),
        );

        let mounts = vec![
            Mount {
                source: Some(config_src.display().to_string()),
                target: Some(CONFIG_MOUNT.to_string()),
                typ: Some(MountTypeEnum::BIND),
                read_only: Some(true),
                ..Default::default()
            },
            Mount {
                source: Some(data_src.display().to_string()),
                target: Some(DATA_MOUNT.to_string()),
                typ: Some(MountTypeEnum::BIND),
                read_only: Some(false),
                ..Default::default()
            },
        ];

        let host_config = HostConfig {
            mounts: Some(mounts),
            restart_policy: Some(RestartPolicy {
                name: Some(RestartPolicyNameEnum::UNLESS_STOPPED),
                maximum_retry_count: None,
            }),
            ..Default::default()
        };

        let body = ContainerCreateBody {
            image: Some(self.image.clone()),
            labels: Some(labels),
            host_config: Some(host_config),
            stop_timeout: Some(create_timeout_secs(self.stop_timeout)),
            ..Default::default()
        };

        let opts = CreateContainerOptions {
            name: Some(self.name.to_string()),
            ..Default::default()
        };

        let response = self
            .client
            .create_container(Some(opts), body)
            .await
            .map_err(map_container_error)?;

        Ok(response.id)
    }

    async fn stop(&self) -> Result<(), ExecError> {
        for id in self.managed_containers().await? {
            let opts = StopContainerOptions {
                t: Some(stop_timeout_secs(self.stop_timeout)),
                signal: None,
            };
            match self.client.stop_container(&id, Some(opts)).await {
                Ok(()) => {}
                Err(ref e) if is_not_found(e) || is_not_modified(e) => {}
                Err(e) => return Err(map_container_error(e)),
            }

            let opts = RemoveContainerOptions {
                force: true,
                ..Default::default()
            };
            match self.client.remove_container(&id, Some(opts)).await {
                Ok(()) => {}
                Err(ref e) if is_not_found(e) => {}
                Err(e) => return Err(map_container_error(e)),
            }

            tracing::debug!(container = %id, "container removed");
        }

        Ok(())
    }

    async fn managed_containers(&self) -> Result<Vec<String>, ExecError> {
        let mut filters: HashMap<String, Vec<String>> = HashMap::new();
        filters.insert(
            "label".to_string(),
            vec![
                format!("{LABEL_MANAGED}=true"),
                format!("{LABEL_DEPLOYMENT}={}", self.name),
            ],
        );

        let opts = ListContainersOptions {
            all: true,
            filters: Some(filters),
            ..Default::default()
        };

        let containers = self
            .client
            .list_containers(Some(opts))
            .await
            .map_err(map_container_error)?;

        Ok(containers.into_iter().filter_map(|c| c.id).collect())
    }
}

#[async_trait]
impl Executor for DockerExecutor {
    async fn execute(
        &self,
        work_dir: &Path,
        manifests: &[ManifestId],
        verb: Verb,
    ) -> Result<(), ExecError> {
        tracing::info!(deployment = %self.name, %verb, "executing runtime operation");
        match verb {
            Verb::Start => self.start(work_dir, manifests).await,
            Verb::Stop => self.stop().await,
            Verb::Backup => {
                archive_data_dir(work_dir, &self.data_dir, &self.name).await?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_seconds_pass_through_in_range() {
        let timeout = Duration::from_secs(30);
        assert_eq!(create_timeout_secs(timeout), 30);
        assert_eq!(stop_timeout_secs(timeout), 30);
    }

    #[test]
    fn oversized_timeouts_saturate_instead_of_wrapping() {
        // "100years" parses fine from config but exceeds i32 seconds.
        let century = Duration::from_secs(100 * 365 * 24 * 60 * 60);
        assert_eq!(stop_timeout_secs(century), i32::MAX);
        assert_eq!(create_timeout_secs(century), 3_153_600_000);

        let huge = Duration::from_secs(u64::MAX);
        assert_eq!(create_timeout_secs(huge), i64::MAX);
        assert_eq!(stop_timeout_secs(huge), i32::MAX);
    }
}
