//! Server configuration from environment and command line.

use std::net::SocketAddr;
use std::path::PathBuf;

use graphwalk_graph::{parse_edge_list, Graph, Orientation, SAMPLE_EDGE_LIST};

use crate::error::{Error, Result};
use crate::playback::DEFAULT_SPEED_MS;

/// Configuration for the visualization server.
#[derive(Debug, Clone, PartialEq)]
pub struct VisConfig {
    /// Listen address (`GRAPHWALK_ADDR`)
    pub addr: SocketAddr,
    /// Initial playback interval (`GRAPHWALK_SPEED_MS`)
    pub speed_ms: u64,
    /// Edge list loaded at start (`GRAPHWALK_GRAPH`)
    pub graph_path: Option<PathBuf>,
    /// Initial orientation (`GRAPHWALK_DIRECTED`)
    pub directed: bool,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            speed_ms: DEFAULT_SPEED_MS,
            graph_path: None,
            directed: false,
        }
    }
}

impl VisConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`VisConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(addr) = lookup("GRAPHWALK_ADDR") {
            config.addr = addr
                .parse()
                .map_err(|_| Error::Config(format!("invalid GRAPHWALK_ADDR {:?}", addr)))?;
        }

        if let Some(speed) = lookup("GRAPHWALK_SPEED_MS") {
            config.speed_ms = speed
                .parse()
                .map_err(|_| Error::Config(format!("invalid GRAPHWALK_SPEED_MS {:?}", speed)))?;
        }

        config.graph_path = lookup("GRAPHWALK_GRAPH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        if let Some(directed) = lookup("GRAPHWALK_DIRECTED") {
            config.directed = parse_flag(&directed)
                .ok_or_else(|| Error::Config(format!("invalid GRAPHWALK_DIRECTED {:?}", directed)))?;
        }

        Ok(config)
    }

    /// Apply positional arguments: `[edge-list-file] [port]`.
    pub fn with_args<I>(mut self, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();

        if let Some(path) = args.next() {
            self.graph_path = Some(PathBuf::from(path));
        }

        if let Some(port) = args.next() {
            let port: u16 = port
                .parse()
                .map_err(|_| Error::Config(format!("invalid port {:?}", port)))?;
            self.addr.set_port(port);
        }

        Ok(self)
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_directed(self.directed)
    }

    /// Read the configured edge list, or the built-in sample graph.
    pub fn load_graph(&self) -> Result<Graph> {
        match &self.graph_path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                Ok(parse_edge_list(&text))
            }
            None => Ok(parse_edge_list(SAMPLE_EDGE_LIST)),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = VisConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, VisConfig::default());
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.speed_ms, 1000);
        assert_eq!(config.orientation(), Orientation::Undirected);
    }

    #[test]
    fn reads_variables() {
        let config = VisConfig::from_lookup(lookup(&[
            ("GRAPHWALK_ADDR", "127.0.0.1:8080"),
            ("GRAPHWALK_SPEED_MS", "250"),
            ("GRAPHWALK_GRAPH", "graphs/dag.txt"),
            ("GRAPHWALK_DIRECTED", "true"),
        ]))
        .unwrap();

        assert_eq!(config.addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.speed_ms, 250);
        assert_eq!(config.graph_path, Some(PathBuf::from("graphs/dag.txt")));
        assert!(config.directed);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for (key, value) in [
            ("GRAPHWALK_ADDR", "nowhere"),
            ("GRAPHWALK_SPEED_MS", "-5"),
            ("GRAPHWALK_DIRECTED", "maybe"),
        ] {
            let err = VisConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{} accepted {}", key, value);
        }
    }

    #[test]
    fn positional_args_override() {
        let config = VisConfig::default()
            .with_args(["g.txt".to_string(), "4000".to_string()])
            .unwrap();
        assert_eq!(config.graph_path, Some(PathBuf::from("g.txt")));
        assert_eq!(config.addr.port(), 4000);

        let err = VisConfig::default()
            .with_args(["g.txt".to_string(), "port".to_string()])
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn sample_graph_when_no_file() {
        let graph = VisConfig::default().load_graph().unwrap();
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 6);
    }

    #[test]
    fn missing_file_is_io_error() {
        let config = VisConfig {
            graph_path: Some(PathBuf::from("/definitely/not/here.txt")),
            ..VisConfig::default()
        };
        assert!(matches!(config.load_graph(), Err(Error::Io(_))));
    }
}
