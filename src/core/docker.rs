/// Docker engine integration
///
/// A stateless gateway over the bollard client: every call connects,
/// negotiates the API version, performs one request and drops the connection.

use async_trait::async_trait;
use bollard::container::{
    InspectContainerOptions, ListContainersOptions, LogsOptions, StartContainerOptions, Stats,
    StatsOptions, StopContainerOptions,
};
use bollard::image::ListImagesOptions;
use bollard::models::{
    ContainerInspectResponse, ContainerSummary as EngineContainer, ImageSummary as EngineImage,
    PortMap,
};
use bollard::Docker;
use futures::StreamExt;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::core::error::EngineError;
use crate::utils::{short_id, ContainerState, DEFAULT_LOG_TAIL, STOP_GRACE_PERIOD_SECS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSummary {
    pub id: String,
    pub image: String,
    pub status: String,
    pub names: Vec<String>,
}

impl ContainerSummary {
    pub fn short_id(&self) -> &str {
        short_id(&self.id)
    }

    pub fn state(&self) -> ContainerState {
        ContainerState::from(self.status.as_str())
    }

    pub fn is_running(&self) -> bool {
        self.state().is_running()
    }
}

impl From<EngineContainer> for ContainerSummary {
    fn from(summary: EngineContainer) -> Self {
        let names = summary
            .names
            .unwrap_or_default()
            .into_iter()
            .map(|n| n.trim_start_matches('/').to_string())
            .collect();

        Self {
            id: summary.id.unwrap_or_default(),
            image: summary.image.unwrap_or_default(),
            status: summary.status.unwrap_or_default(),
            names,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSummary {
    pub id: String,
    pub repo_tags: Vec<String>,
    pub size: u64,
}

impl From<EngineImage> for ImageSummary {
    fn from(image: EngineImage) -> Self {
        // Dangling images report a placeholder tag instead of none
        let repo_tags = image
            .repo_tags
            .into_iter()
            .filter(|tag| tag != "<none>:<none>")
            .collect();

        Self {
            id: image.id,
            repo_tags,
            size: u64::try_from(image.size).unwrap_or(0),
        }
    }
}

/// One point-in-time resource reading for a container
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResourceSample {
    pub cpu_percent: f64,
    pub memory_usage: u64,
    pub memory_limit: u64,
    pub memory_percent: f64,
}

/// Cumulative CPU counters as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuReading {
    pub total_usage: u64,
    pub system_usage: u64,
}

impl ResourceSample {
    pub fn new(cpu_percent: f64, memory_usage: u64, memory_limit: u64) -> Self {
        let memory_percent = if memory_limit > 0 {
            memory_usage as f64 / memory_limit as f64 * 100.0
        } else {
            0.0
        };

        Self {
            cpu_percent,
            memory_usage,
            memory_limit,
            memory_percent,
        }
    }

    fn from_stats(stats: &Stats) -> Self {
        let current = CpuReading {
            total_usage: stats.cpu_stats.cpu_usage.total_usage,
            system_usage: stats.cpu_stats.system_cpu_usage.unwrap_or(0),
        };
        let previous = CpuReading {
            total_usage: stats.precpu_stats.cpu_usage.total_usage,
            system_usage: stats.precpu_stats.system_cpu_usage.unwrap_or(0),
        };
        let online_cpus = stats.cpu_stats.online_cpus.unwrap_or(1) as u64;

        Self::new(
            cpu_percent(current, previous, online_cpus),
            stats.memory_stats.usage.unwrap_or(0),
            stats.memory_stats.limit.unwrap_or(0),
        )
    }
}

/// CPU utilisation between two readings, scaled by the number of online CPUs
pub fn cpu_percent(current: CpuReading, previous: CpuReading, online_cpus: u64) -> f64 {
    let cpu_delta = current.total_usage.saturating_sub(previous.total_usage);
    let system_delta = current.system_usage.saturating_sub(previous.system_usage);

    if system_delta == 0 {
        return 0.0;
    }

    (cpu_delta as f64 / system_delta as f64) * online_cpus.max(1) as f64 * 100.0
}

/// Fields of an inspect document shown in the detail pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDetails {
    pub id: String,
    pub name: String,
    pub image: String,
    pub status: String,
    pub created: String,
    pub ports: Vec<String>,
}

impl ContainerDetails {
    pub fn from_inspect(info: &ContainerInspectResponse) -> Self {
        let image = info
            .config
            .as_ref()
            .and_then(|config| config.image.clone())
            .or_else(|| info.image.clone())
            .unwrap_or_default();

        let status = info
            .state
            .as_ref()
            .and_then(|state| state.status.as_ref())
            .map(|status| status.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let created = info
            .created
            .as_deref()
            .map(crate::utils::format_rfc3339)
            .unwrap_or_default();

        let ports = info
            .network_settings
            .as_ref()
            .and_then(|settings| settings.ports.as_ref())
            .map(format_port_map)
            .unwrap_or_default();

        Self {
            id: info.id.clone().unwrap_or_default(),
            name: info
                .name
                .as_deref()
                .unwrap_or_default()
                .trim_start_matches('/')
                .to_string(),
            image,
            status,
            created,
            ports,
        }
    }
}

/// Render published ports as `ip:host->container/proto`, ordered by container port
pub fn format_port_map(ports: &PortMap) -> Vec<String> {
    let mut keys: Vec<&String> = ports.keys().collect();
    keys.sort_by_key(|key| {
        let number = key
            .split('/')
            .next()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(u16::MAX);
        (number, key.as_str())
    });

    let mut rendered = Vec::new();
    for key in keys {
        match ports.get(key).and_then(|bindings| bindings.as_ref()) {
            Some(bindings) if !bindings.is_empty() => {
                for binding in bindings {
                    rendered.push(format!(
                        "{}:{}->{}",
                        binding.host_ip.as_deref().filter(|ip| !ip.is_empty()).unwrap_or("0.0.0.0"),
                        binding.host_port.as_deref().unwrap_or(""),
                        key
                    ));
                }
            }
            _ => rendered.push(key.clone()),
        }
    }

    rendered
}

/// How many trailing log lines to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailSpec {
    Lines(usize),
    All,
}

impl Default for TailSpec {
    fn default() -> Self {
        TailSpec::Lines(DEFAULT_LOG_TAIL)
    }
}

impl fmt::Display for TailSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TailSpec::Lines(n) => write!(f, "{}", n),
            TailSpec::All => write!(f, "all"),
        }
    }
}

impl FromStr for TailSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(TailSpec::All);
        }
        s.parse::<usize>()
            .map(TailSpec::Lines)
            .map_err(|_| format!("invalid tail '{}': expected a line count or 'all'", s))
    }
}

/// Capabilities the dashboard and CLI need from a container engine
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Engine: Send + Sync {
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError>;

    async fn list_images(&self) -> Result<Vec<ImageSummary>, EngineError>;

    async fn start_container(&self, id: &str) -> Result<(), EngineError>;

    /// Graceful stop; the engine kills the process after the grace period
    async fn stop_container(&self, id: &str) -> Result<(), EngineError>;

    async fn inspect_container(&self, id: &str) -> Result<ContainerInspectResponse, EngineError>;

    /// Combined stdout and stderr in delivery order
    async fn fetch_logs(&self, id: &str, tail: TailSpec) -> Result<String, EngineError>;

    /// Single non-streaming stats request
    async fn sample_resource_usage(&self, id: &str) -> Result<ResourceSample, EngineError>;
}

/// Engine backed by the local Docker daemon
#[derive(Debug, Clone, Default)]
pub struct DockerEngine;

impl DockerEngine {
    pub fn new() -> Self {
        Self
    }

    /// Open a fresh connection from environment defaults and negotiate the API version
    async fn connect(&self) -> Result<Docker, EngineError> {
        let docker = Docker::connect_with_local_defaults().map_err(|e| {
            EngineError::connection(format!(
                "Failed to connect to Docker daemon. Is Docker running? ({})",
                e
            ))
        })?;

        docker
            .negotiate_version()
            .await
            .map_err(|e| EngineError::connection(format!("API version negotiation failed: {}", e)))
    }
}

#[async_trait]
impl Engine for DockerEngine {
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError> {
        let docker = self.connect().await?;

        let options = Some(ListContainersOptions::<String> {
            all: true,
            ..Default::default()
        });

        let containers = docker
            .list_containers(options)
            .await
            .map_err(|e| EngineError::from_bollard("list containers", e))?;

        debug!(count = containers.len(), "listed containers");
        Ok(containers.into_iter().map(ContainerSummary::from).collect())
    }

    async fn list_images(&self) -> Result<Vec<ImageSummary>, EngineError> {
        let docker = self.connect().await?;

        let options = Some(ListImagesOptions::<String> {
            all: true,
            ..Default::default()
        });

        let images = docker
            .list_images(options)
            .await
            .map_err(|e| EngineError::from_bollard("list images", e))?;

        debug!(count = images.len(), "listed images");
        Ok(images.into_iter().map(ImageSummary::from).collect())
    }

    async fn start_container(&self, id: &str) -> Result<(), EngineError> {
        let docker = self.connect().await?;
        debug!(container = id, "starting container");

        docker
            .start_container(id, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| EngineError::from_bollard("start container", e))
    }

    async fn stop_container(&self, id: &str) -> Result<(), EngineError> {
        let docker = self.connect().await?;
        debug!(container = id, grace_secs = STOP_GRACE_PERIOD_SECS, "stopping container");

        docker
            .stop_container(id, Some(StopContainerOptions { t: STOP_GRACE_PERIOD_SECS }))
            .await
            .map_err(|e| EngineError::from_bollard("stop container", e))
    }

    async fn inspect_container(&self, id: &str) -> Result<ContainerInspectResponse, EngineError> {
        let docker = self.connect().await?;

        docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
            .map_err(|e| EngineError::from_bollard("inspect container", e))
    }

    async fn fetch_logs(&self, id: &str, tail: TailSpec) -> Result<String, EngineError> {
        let docker = self.connect().await?;

        let options = LogsOptions::<String> {
            stdout: true,
            stderr: true,
            tail: tail.to_string(),
            ..Default::default()
        };

        let mut stream = docker.logs(id, Some(options));
        let mut combined = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| EngineError::from_bollard("fetch logs", e))?;
            combined.push_str(&chunk.to_string());
        }

        debug!(container = id, bytes = combined.len(), %tail, "fetched logs");
        Ok(combined)
    }

    async fn sample_resource_usage(&self, id: &str) -> Result<ResourceSample, EngineError> {
        let docker = self.connect().await.map_err(|e| EngineError::StatsUnavailable {
            message: e.to_string(),
        })?;

        // one_shot=false lets the daemon fill precpu_stats so the CPU delta is meaningful.
        // The daemon waits about a second between the two readings, so each
        // selection change costs inspect plus roughly 1 s.
        let mut stream = docker.stats(
            id,
            Some(StatsOptions {
                stream: false,
                one_shot: false,
            }),
        );

        match stream.next().await {
            Some(Ok(stats)) => Ok(ResourceSample::from_stats(&stats)),
            Some(Err(e)) => Err(EngineError::StatsUnavailable {
                message: e.to_string(),
            }),
            None => Err(EngineError::StatsUnavailable {
                message: "engine returned no sample".to_string(),
            }),
        }
    }
}
