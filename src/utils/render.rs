//! Renders a [`Network`] as a Graphviz drawing, optionally with a
//! highlighted route.
//!
//! The network is copied into a petgraph [`UnGraph`] with one edge per
//! city pair and exported through [`Dot`]. Graphviz's `dot` executable
//! turns the DOT text into a PNG or SVG image.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use petgraph::{
    dot::{Config, Dot},
    graph::{NodeIndex, UnGraph},
    visit::EdgeRef,
};
use serde::{Deserialize, Serialize};

use crate::types::{
    connection::LinkMetrics,
    criterion::Criterion,
    error::{Result, RouterError},
    network::Network,
};

/// Edge labels are dropped from denser drawings.
const MAX_LABELED_EDGES: usize = 50;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
    /// The DOT source only; Graphviz is not invoked.
    Dot,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
            ImageFormat::Dot => "dot",
        }
    }
}

/// Settings of one rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Metric used to color and size the links. `Composite` draws
    /// latency on a blue ramp.
    pub visual: Criterion,
    /// Print each link's value next to it.
    pub show_labels: bool,
    pub format: ImageFormat,
    /// Created if missing.
    pub output_dir: PathBuf,
    /// File name without extension.
    pub file_stem: String,
}

impl RenderOptions {
    /// Default file name of a whole-network drawing.
    pub fn network_file_stem(visual: Criterion) -> String {
        format!("network_{visual}")
    }

    /// Default file name of a drawing with a highlighted route.
    pub fn route_file_stem(
        origin: &str,
        destination: &str,
        criterion: Criterion,
        visual: Criterion,
    ) -> String {
        format!("route_{origin}_{destination}_{criterion}_{visual}")
    }
}

type RenderGraph = UnGraph<String, LinkMetrics>;

/// Color ramp endpoints (light, dark) as RGB.
fn ramp(visual: Criterion) -> ([u8; 3], [u8; 3]) {
    match visual {
        Criterion::Latency => ([0xfe, 0xe0, 0xd2], [0xa5, 0x0f, 0x15]),
        Criterion::Cost => ([0xfe, 0xe6, 0xce], [0xa6, 0x36, 0x03]),
        Criterion::Bandwidth => ([0xe5, 0xf5, 0xe0], [0x00, 0x6d, 0x2c]),
        Criterion::Composite => ([0xde, 0xeb, 0xf7], [0x08, 0x51, 0x9c]),
    }
}

/// Interpolates the ramp of `visual` at `t` in `[0, 1]`.
fn color(visual: Criterion, t: f64) -> String {
    let (light, dark) = ramp(visual);
    let channel = |i: usize| {
        let value = light[i] as f64 + (dark[i] as f64 - light[i] as f64) * t.clamp(0.0, 1.0);
        value.round() as u8
    };
    format!("#{:02x}{:02x}{:02x}", channel(0), channel(1), channel(2))
}

/// Formats a drawn value with its unit.
fn value_label(visual: Criterion, value: f64) -> String {
    match visual {
        Criterion::Cost => format!("{value:.3}/MB"),
        Criterion::Bandwidth => format!("{value:.1}Mbps"),
        Criterion::Latency | Criterion::Composite => format!("{value:.1}ms"),
    }
}

/// The raw value drawn for a link, and its label.
fn visual_value(visual: Criterion, metrics: &LinkMetrics) -> (f64, String) {
    let value = match visual {
        Criterion::Cost => metrics.cost_per_mb(),
        Criterion::Bandwidth => metrics.bandwidth_mbps(),
        Criterion::Latency | Criterion::Composite => metrics.latency_ms(),
    };
    (value, value_label(visual, value))
}

/// What the link colors and widths stand for.
fn scale_caption(visual: Criterion) -> &'static str {
    match visual {
        Criterion::Composite => "Latency (ms), composite view",
        other => other.label(),
    }
}

/// Smallest and largest drawn value over the displayed links, [`None`]
/// for a network without links.
pub fn value_range(network: &Network, visual: Criterion) -> Option<(f64, f64)> {
    network
        .links()
        .iter()
        .map(|(_, _, metrics)| visual_value(visual, metrics).0)
        .fold(None, |range, value| match range {
            None => Some((value, value)),
            Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
        })
}

/// HTML-like label of the legend node: node size, the color scale with
/// its bounds, and the route style when a route is drawn.
fn legend(visual: Criterion, range: Option<(f64, f64)>, with_route: bool) -> String {
    let wider = match visual {
        Criterion::Bandwidth => "higher bandwidth",
        Criterion::Cost => "lower cost",
        Criterion::Latency | Criterion::Composite => "lower latency",
    };
    let mut rows = vec![
        "<TR><TD COLSPAN=\"2\"><B>Legend</B></TD></TR>".to_string(),
        "<TR><TD COLSPAN=\"2\" ALIGN=\"LEFT\">City size: number of connections</TD></TR>"
            .to_string(),
        format!(
            "<TR><TD COLSPAN=\"2\" ALIGN=\"LEFT\">Link color and width: {}</TD></TR>",
            scale_caption(visual)
        ),
    ];
    if let Some((min, max)) = range {
        rows.push(format!(
            "<TR><TD BGCOLOR=\"{}\">min {}</TD><TD BGCOLOR=\"{}\"><FONT COLOR=\"white\">max {}</FONT></TD></TR>",
            color(visual, 0.0),
            value_label(visual, min),
            color(visual, 1.0),
            value_label(visual, max)
        ));
    }
    rows.push(format!(
        "<TR><TD COLSPAN=\"2\" ALIGN=\"LEFT\">Wider links: {wider}</TD></TR>"
    ));
    if with_route {
        rows.push(
            "<TR><TD COLSPAN=\"2\" ALIGN=\"LEFT\">Dashed purple line: highlighted route</TD></TR>"
                .to_string(),
        );
    }
    format!(
        "<<TABLE BORDER=\"1\" CELLBORDER=\"0\" CELLSPACING=\"4\">{}</TABLE>>",
        rows.concat()
    )
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Copies the network into a petgraph graph, one edge per city pair.
fn build_graph(network: &Network) -> RenderGraph {
    let mut graph = RenderGraph::new_undirected();
    let mut node_indices: HashMap<&str, NodeIndex> = HashMap::new();

    for city in network.cities() {
        node_indices.insert(city, graph.add_node(city.clone()));
    }
    for (a, b, metrics) in network.links() {
        graph.add_edge(node_indices[a], node_indices[b], metrics);
    }
    graph
}

/// Produces the DOT source of the drawing.
///
/// # Arguments
/// * `network` - The network to draw.
/// * `highlighted` - A route to emphasize, origin first.
/// * `visual` - The metric that colors and sizes the links.
/// * `show_labels` - Print link values (ignored past 50 links).
pub fn to_dot(
    network: &Network,
    highlighted: Option<&[String]>,
    visual: Criterion,
    show_labels: bool,
) -> String {
    let graph = build_graph(network);
    let highlighted = highlighted.filter(|path| path.len() > 1);

    let route_cities: HashSet<&str> = highlighted
        .map(|path| path.iter().map(String::as_str).collect())
        .unwrap_or_default();
    let route_links: HashSet<(&str, &str)> = highlighted
        .map(|path| {
            path.windows(2)
                .flat_map(|hop| {
                    [
                        (hop[0].as_str(), hop[1].as_str()),
                        (hop[1].as_str(), hop[0].as_str()),
                    ]
                })
                .collect()
        })
        .unwrap_or_default();

    let range = value_range(network, visual);
    let (min, max) = range.unwrap_or((0.0, 0.0));
    let show_labels = show_labels && graph.edge_count() < MAX_LABELED_EDGES;

    let edge_attributes = |g: &RenderGraph, edge: petgraph::graph::EdgeReference<'_, LinkMetrics>| {
        let (value, label) = visual_value(visual, edge.weight());
        let norm = if max > min {
            (value - min) / (max - min)
        } else {
            0.5
        };
        // Wider means better: more bandwidth, less latency or cost.
        let goodness = if visual == Criterion::Bandwidth {
            norm
        } else {
            1.0 - norm
        };

        let mut attributes = format!(
            "color = \"{}\" penwidth = {:.2}",
            color(visual, norm),
            1.0 + goodness * 4.0
        );
        if show_labels {
            let _ = write!(attributes, " label = \"{}\" fontsize = 8", escape(&label));
        }
        let pair = (g[edge.source()].as_str(), g[edge.target()].as_str());
        if route_links.contains(&pair) {
            attributes.push_str(" color = \"purple\" penwidth = 6 style = \"dashed\"");
        }
        attributes
    };

    let node_attributes = |_: &RenderGraph, (_, city): (NodeIndex, &String)| {
        let size = 0.6 + network.degree(city) as f64 * 0.1;
        if route_cities.contains(city.as_str()) {
            format!(
                "label = \"{}\" width = {:.2} fillcolor = \"gold\" color = \"purple\" penwidth = 3",
                escape(city),
                size + 0.1
            )
        } else {
            format!(
                "label = \"{}\" width = {:.2} fillcolor = \"lightblue\" color = \"black\"",
                escape(city),
                size
            )
        }
    };

    let mut title = format!(
        "ISP backbone\\nBy {}\\n{} cities, {} links",
        visual.label(),
        network.city_count(),
        graph.edge_count()
    );
    if let Some(path) = highlighted {
        let _ = write!(title, "\\nHighlighted route: {}", escape(&path.join(" → ")));
    }

    let body = Dot::with_attr_getters(
        &graph,
        &[Config::GraphContentOnly, Config::NodeNoLabel, Config::EdgeNoLabel],
        &edge_attributes,
        &node_attributes,
    );

    let legend_label = legend(visual, range, highlighted.is_some());

    format!(
        "graph {{\n    label = \"{title}\"\n    labelloc = \"t\"\n    fontsize = 16\n    layout = \"neato\"\n    overlap = \"false\"\n    node [shape = \"circle\" style = \"filled\" fixedsize = \"true\" fontsize = 9]\n{body}    legend [shape = \"plaintext\" style = \"solid\" fixedsize = \"false\" label = {legend_label}]\n}}\n"
    )
}

fn log_range(network: &Network, visual: Criterion) {
    if let Some((min, max)) = value_range(network, visual) {
        info!(
            "{} range: {} to {}",
            scale_caption(visual),
            value_label(visual, min),
            value_label(visual, max)
        );
    }
}

/// Draws the network into `options.output_dir`.
///
/// # Returns
/// The path of the written file.
///
/// # Errors
/// [`RouterError::Io`] if the directory or DOT file cannot be written,
/// [`RouterError::Render`] if Graphviz is missing or fails.
pub fn render(
    network: &Network,
    highlighted: Option<&[String]>,
    options: &RenderOptions,
) -> Result<PathBuf> {
    info!(
        "Rendering {} (visual: {})",
        options.file_stem, options.visual
    );
    fs::create_dir_all(&options.output_dir)?;

    let dot = to_dot(network, highlighted, options.visual, options.show_labels);
    let dot_path = options.output_dir.join(format!("{}.dot", options.file_stem));
    fs::write(&dot_path, dot)?;
    if options.format == ImageFormat::Dot {
        log_range(network, options.visual);
        return Ok(dot_path);
    }

    let image_path = options
        .output_dir
        .join(format!("{}.{}", options.file_stem, options.format.extension()));
    let status = Command::new("dot")
        .arg(format!("-T{}", options.format.extension()))
        .arg(&dot_path)
        .arg("-o")
        .arg(&image_path)
        .status()
        .map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => {
                RouterError::Render("Graphviz `dot` executable not found in PATH".to_string())
            }
            _ => RouterError::Render(err.to_string()),
        })?;
    if !status.success() {
        return Err(RouterError::Render(format!("`dot` exited with {status}")));
    }

    info!("Image saved as {}", image_path.display());
    log_range(network, options.visual);
    Ok(image_path)
}
