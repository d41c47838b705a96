//! Interactive text menu over a loaded [`Network`].
//!
//! The menu reads from any [`BufRead`] and writes to any [`Write`], so
//! the binary drives it with stdin/stdout and tests with byte buffers.
//! End of input leaves the menu.

use std::io::{BufRead, Write};

use crate::algorithms::report::{compare_criteria, route, routes_from, Route, RouteOutcome};
use crate::config::Config;
use crate::types::{
    criterion::Criterion,
    error::{Result, RouterError},
    network::Network,
};
use crate::utils::render::{render, ImageFormat, RenderOptions};

const RULE: &str = "--------------------------------------------------";

/// An interactive session.
pub struct Menu<'a, R, W> {
    network: &'a Network,
    config: &'a Config,
    input: R,
    output: W,
}

fn is_yes(answer: Option<&str>) -> bool {
    matches!(
        answer.map(|a| a.to_ascii_lowercase()).as_deref(),
        Some("y" | "yes" | "s" | "si" | "sí")
    )
}

/// Maps `1`..`3` to a drawable metric, latency otherwise.
fn visual_choice(choice: Option<&str>) -> Criterion {
    match choice {
        Some("2") => Criterion::Cost,
        Some("3") => Criterion::Bandwidth,
        _ => Criterion::Latency,
    }
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(network: &'a Network, config: &'a Config, input: R, output: W) -> Self {
        Menu {
            network,
            config,
            input,
            output,
        }
    }

    /// Runs the menu until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "{}", "=".repeat(60))?;
        writeln!(self.output, "   ISP BACKBONE ROUTE SIMULATOR")?;
        writeln!(self.output, "   Least-cost routing with Dijkstra's algorithm")?;
        writeln!(self.output, "{}", "=".repeat(60))?;

        loop {
            writeln!(self.output, "\nMAIN MENU")?;
            writeln!(self.output, "1. Find the best route between two cities")?;
            writeln!(self.output, "2. Compare routes across criteria")?;
            writeln!(self.output, "3. Show every route from a city")?;
            writeln!(self.output, "4. Show network statistics")?;
            writeln!(self.output, "5. Render the network graph")?;
            writeln!(self.output, "0. Exit")?;
            writeln!(self.output, "{RULE}")?;

            let Some(choice) = self.prompt("Select an option: ")? else {
                if self.at_eof()? {
                    break;
                }
                writeln!(self.output, "❌ Invalid option")?;
                continue;
            };
            match choice.as_str() {
                "0" => {
                    writeln!(self.output, "👋 Closing the simulator.")?;
                    break;
                }
                "1" => self.best_route()?,
                "2" => self.compare()?,
                "3" => self.all_routes()?,
                "4" => self.statistics()?,
                "5" => self.render_menu()?,
                _ => writeln!(self.output, "❌ Invalid option")?,
            }
            self.prompt("\nPress Enter to continue...")?;
        }
        Ok(())
    }

    /// Prints `message` and reads one trimmed line; [`None`] if the line
    /// is empty or input has ended.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let line = line.trim();
        Ok((!line.is_empty()).then(|| line.to_string()))
    }

    fn at_eof(&mut self) -> Result<bool> {
        Ok(self.input.fill_buf()?.is_empty())
    }

    fn show_cities(&mut self) -> Result<()> {
        writeln!(self.output, "Available cities:")?;
        writeln!(self.output, "{}", &RULE[..40])?;
        for (i, city) in self.network.cities().iter().enumerate() {
            writeln!(self.output, "{:2}. {}", i + 1, city)?;
        }
        writeln!(self.output, "{}", &RULE[..40])?;
        Ok(())
    }

    /// Asks for a known city; prints an error and returns [`None`]
    /// otherwise.
    fn ask_city(&mut self, message: &str, role: &str) -> Result<Option<String>> {
        match self.prompt(message)? {
            Some(city) if self.network.contains(&city) => Ok(Some(city)),
            _ => {
                writeln!(self.output, "❌ Invalid {role} city")?;
                Ok(None)
            }
        }
    }

    fn ask_criterion(&mut self, message: &str) -> Result<Criterion> {
        writeln!(self.output, "\nOptimization criteria:")?;
        writeln!(self.output, "1. Latency (lowest delay)")?;
        writeln!(self.output, "2. Cost (lowest price)")?;
        writeln!(self.output, "3. Bandwidth (widest links)")?;
        writeln!(self.output, "4. Composite (balance of all)")?;
        let choice = self.prompt(message)?;
        Ok(Criterion::from_menu_choice(choice.as_deref().unwrap_or("")))
    }

    fn ask_visual(&mut self) -> Result<(Criterion, bool)> {
        writeln!(self.output, "\nVisual criterion for coloring links:")?;
        writeln!(self.output, "1. Latency (ms) - red: high latency")?;
        writeln!(self.output, "2. Cost - orange: high cost")?;
        writeln!(self.output, "3. Bandwidth (Mbps) - green: high bandwidth")?;
        let visual = visual_choice(self.prompt("Select visual criterion (1-3): ")?.as_deref());
        let labels = is_yes(self.prompt("Show values on links? (y/n): ")?.as_deref());
        Ok((visual, labels))
    }

    fn print_route_details(&mut self, found: &Route) -> Result<()> {
        writeln!(self.output, "Route: {found}")?;
        if let Some(metrics) = found.metrics {
            writeln!(self.output, "Total latency: {:.1} ms", metrics.latency_total)?;
            writeln!(self.output, "Total cost: {:.4} per MB", metrics.cost_total)?;
            writeln!(
                self.output,
                "Bottleneck bandwidth: {:.0} Mbps",
                metrics.bottleneck_bandwidth
            )?;
            writeln!(self.output, "Hops: {}", metrics.hops)?;
        }
        Ok(())
    }

    fn draw(
        &mut self,
        highlighted: Option<&[String]>,
        visual: Criterion,
        labels: bool,
        stem: String,
    ) -> Result<()> {
        let options = RenderOptions {
            visual,
            show_labels: labels,
            format: ImageFormat::Png,
            output_dir: self.config.output_dir.clone(),
            file_stem: stem,
        };
        match render(self.network, highlighted, &options) {
            Ok(path) => writeln!(self.output, "✅ Image saved as {}", path.display())?,
            Err(err) => writeln!(self.output, "❌ Could not create image: {err}")?,
        }
        Ok(())
    }

    fn best_route(&mut self) -> Result<()> {
        writeln!(self.output, "\nROUTE BETWEEN TWO CITIES")?;
        self.show_cities()?;
        let Some(origin) = self.ask_city("Origin city: ", "origin")? else {
            return Ok(());
        };
        let Some(destination) = self.ask_city("Destination city: ", "destination")? else {
            return Ok(());
        };
        let criterion = self.ask_criterion("Select criterion (1-4): ")?;

        let found = match route(self.network, &origin, &destination, criterion) {
            Ok(found) => found,
            Err(RouterError::Unreachable { .. }) => {
                writeln!(self.output, "❌ No connection between {origin} and {destination}")?;
                return Ok(());
            }
            Err(err) => {
                writeln!(self.output, "❌ {err}")?;
                return Ok(());
            }
        };

        writeln!(
            self.output,
            "\n✅ BEST ROUTE FOUND ({})",
            criterion.as_str().to_uppercase()
        )?;
        writeln!(self.output, "{RULE}")?;
        self.print_route_details(&found)?;

        let answer = self.prompt("\nRender the graph with this route highlighted? (y/n): ")?;
        if is_yes(answer.as_deref()) {
            let (visual, labels) = self.ask_visual()?;
            let stem = RenderOptions::route_file_stem(&origin, &destination, criterion, visual);
            self.draw(Some(found.path.as_slice()), visual, labels, stem)?;
        }
        Ok(())
    }

    fn compare(&mut self) -> Result<()> {
        writeln!(self.output, "\nCOMPARISON OF OPTIMIZATION CRITERIA")?;
        self.show_cities()?;
        let Some(origin) = self.ask_city("Origin city: ", "origin")? else {
            return Ok(());
        };
        let Some(destination) = self.ask_city("Destination city: ", "destination")? else {
            return Ok(());
        };

        writeln!(self.output, "\nROUTE COMPARISON: {origin} → {destination}")?;
        writeln!(self.output, "{}", "=".repeat(70))?;
        let outcomes = match compare_criteria(self.network, &origin, &destination) {
            Ok(outcomes) => outcomes,
            Err(err) => {
                writeln!(self.output, "❌ {err}")?;
                return Ok(());
            }
        };
        for outcome in outcomes {
            match outcome {
                RouteOutcome::Found(found) => {
                    writeln!(self.output, "\n{}:", found.criterion.label())?;
                    writeln!(self.output, "   Route: {found}")?;
                    if let Some(metrics) = found.metrics {
                        writeln!(
                            self.output,
                            "   Latency: {:.1}ms | Cost: {:.4}/MB | Bandwidth: {:.0}Mbps",
                            metrics.latency_total, metrics.cost_total, metrics.bottleneck_bandwidth
                        )?;
                    }
                }
                RouteOutcome::Unreachable { criterion, .. } => {
                    writeln!(self.output, "{}: no connection", criterion.label())?;
                }
            }
        }
        Ok(())
    }

    fn all_routes(&mut self) -> Result<()> {
        writeln!(self.output, "\nROUTES FROM ONE CITY TO ALL OTHERS")?;
        self.show_cities()?;
        let Some(origin) = self.ask_city("Origin city: ", "origin")? else {
            return Ok(());
        };

        writeln!(self.output, "\nROUTES FROM {}:", origin.to_uppercase())?;
        writeln!(self.output, "{}", "=".repeat(60))?;
        let outcomes = match routes_from(self.network, &origin, Criterion::Latency) {
            Ok(outcomes) => outcomes,
            Err(err) => {
                writeln!(self.output, "❌ {err}")?;
                return Ok(());
            }
        };
        for outcome in outcomes {
            match outcome {
                RouteOutcome::Found(found) => {
                    let latency = found.metrics.map_or(0.0, |m| m.latency_total);
                    writeln!(
                        self.output,
                        "✅ {}: {} ({:.1}ms)",
                        found.destination(),
                        found,
                        latency
                    )?;
                }
                RouteOutcome::Unreachable { destination, .. } => {
                    writeln!(self.output, "❌ {destination}: no connection")?;
                }
            }
        }
        Ok(())
    }

    fn statistics(&mut self) -> Result<()> {
        let stats = self.network.stats();
        writeln!(self.output, "\nNETWORK STATISTICS")?;
        writeln!(self.output, "{RULE}")?;
        writeln!(self.output, "Total cities: {}", stats.city_count)?;
        writeln!(self.output, "Total connections: {}", stats.connection_count)?;
        if let Some((city, degree)) = &stats.most_connected {
            writeln!(self.output, "Most connected city: {city} ({degree} connections)")?;
        }
        writeln!(self.output, "\nCONNECTIONS PER CITY:")?;
        for (city, degree) in &stats.degrees {
            writeln!(self.output, "   {city}: {degree} connections")?;
        }
        Ok(())
    }

    fn render_menu(&mut self) -> Result<()> {
        writeln!(self.output, "\nRENDER THE NETWORK GRAPH")?;
        writeln!(self.output, "1. Whole network")?;
        writeln!(self.output, "2. Network with a highlighted route")?;
        let option = self.prompt("Select option (1-2): ")?;
        let (visual, labels) = self.ask_visual()?;

        match option.as_deref() {
            Some("1") => {
                let stem = self
                    .prompt("File name (without extension): ")?
                    .unwrap_or_else(|| RenderOptions::network_file_stem(visual));
                self.draw(None, visual, labels, stem)
            }
            Some("2") => {
                self.show_cities()?;
                let Some(origin) = self.ask_city("Route origin city: ", "origin")? else {
                    return Ok(());
                };
                let Some(destination) = self.ask_city("Route destination city: ", "destination")?
                else {
                    return Ok(());
                };
                let criterion = self.ask_criterion("Select route criterion (1-4): ")?;
                let found = match route(self.network, &origin, &destination, criterion) {
                    Ok(found) => found,
                    Err(RouterError::Unreachable { .. }) => {
                        writeln!(
                            self.output,
                            "❌ No connection between {origin} and {destination}"
                        )?;
                        return Ok(());
                    }
                    Err(err) => {
                        writeln!(self.output, "❌ {err}")?;
                        return Ok(());
                    }
                };
                let stem = self
                    .prompt("File name (without extension): ")?
                    .unwrap_or_else(|| {
                        RenderOptions::route_file_stem(&origin, &destination, criterion, visual)
                    });
                self.draw(Some(found.path.as_slice()), visual, labels, stem)?;

                writeln!(self.output, "\nROUTE DETAILS:")?;
                self.print_route_details(&found)
            }
            _ => {
                writeln!(self.output, "❌ Invalid option")?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod menu_tests {
    use super::*;
    use crate::types::connection::EdgeRecord;

    fn sample() -> Network {
        Network::load(vec![
            EdgeRecord::new("Lima", "Cusco", 12.0, 0.02, 400.0).unwrap(),
            EdgeRecord::new("Lima", "Arequipa", 9.0, 0.03, 600.0).unwrap(),
            EdgeRecord::new("Arequipa", "Cusco", 2.0, 0.01, 300.0).unwrap(),
            EdgeRecord::new("Iquitos", "Pucallpa", 30.0, 0.5, 50.0).unwrap(),
        ])
    }

    fn run(input: &str) -> String {
        let network = sample();
        let config = Config::default();
        let mut output = Vec::new();
        Menu::new(&network, &config, input.as_bytes(), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_exit_and_eof() {
        assert!(run("0\n").contains("Closing the simulator"));
        assert!(run("").contains("MAIN MENU"));
    }

    #[test]
    fn test_best_route() {
        let output = run("1\nLima\nCusco\n1\nn\n\n0\n");
        assert!(output.contains("BEST ROUTE FOUND (LATENCY)"));
        assert!(output.contains("Route: Lima → Arequipa → Cusco"));
        assert!(output.contains("Total latency: 11.0 ms"));
        assert!(output.contains("Bottleneck bandwidth: 300 Mbps"));
        assert!(output.contains("Hops: 2"));
    }

    #[test]
    fn test_unknown_criterion_falls_back_to_latency() {
        let output = run("1\nLima\nCusco\n7\nn\n\n0\n");
        assert!(output.contains("BEST ROUTE FOUND (LATENCY)"));
    }

    #[test]
    fn test_invalid_and_unreachable_cities() {
        let output = run("1\nTacna\n\n1\nLima\nIquitos\n2\n\n0\n");
        assert!(output.contains("❌ Invalid origin city"));
        assert!(output.contains("No connection between Lima and Iquitos"));
    }

    #[test]
    fn test_compare() {
        let output = run("2\nLima\nCusco\n\n0\n");
        assert!(output.contains("ROUTE COMPARISON: Lima → Cusco"));
        assert!(output.contains("Composite:"));
        assert_eq!(output.matches("Route: ").count(), 4);
    }

    #[test]
    fn test_routes_from_city() {
        let output = run("3\nLima\n\n0\n");
        assert!(output.contains("✅ Arequipa: Lima → Arequipa (9.0ms)"));
        assert!(output.contains("✅ Cusco: Lima → Arequipa → Cusco (11.0ms)"));
        assert!(output.contains("❌ Iquitos: no connection"));
    }

    #[test]
    fn test_statistics() {
        let output = run("4\n\n0\n");
        assert!(output.contains("Total cities: 5"));
        assert!(output.contains("Total connections: 4"));
        assert!(output.contains("Most connected city: Arequipa (2 connections)"));
        assert!(output.contains("   Pucallpa: 1 connections"));
    }

    #[test]
    fn test_overflow_is_reported_and_menu_continues() {
        let network = Network::load(vec![
            EdgeRecord::new("A", "B", 1e308, 0.0, 100.0).unwrap(),
            EdgeRecord::new("B", "C", 1e308, 0.0, 100.0).unwrap(),
        ]);
        let config = Config::default();
        let mut output = Vec::new();
        Menu::new(&network, &config, "1\nA\nC\n1\n\n3\nA\n\n0\n".as_bytes(), &mut output)
            .run()
            .unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.matches("❌ path weight from A to C overflows").count(), 2);
        assert!(output.contains("Closing the simulator"));
    }

    #[test]
    fn test_invalid_option() {
        assert!(run("9\n\n0\n").contains("❌ Invalid option"));
    }

    #[test]
    fn test_yes_answers() {
        assert!(is_yes(Some("Y")));
        assert!(is_yes(Some("sí")));
        assert!(!is_yes(Some("no")));
        assert!(!is_yes(None));
    }
}
