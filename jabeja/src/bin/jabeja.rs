//! Partitions a METIS graph with JA-BE-JA and records the edge cut, swap
//! and migration counts of every round.

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use serde_json::json;
use structopt::StructOpt;

use jabeja::graphio::{self, InitialColorPolicy};
use jabeja::report::{self, ReportFormat};
use jabeja::{
    rng, AcceptanceRule, AnnealingSchedule, Config, Jabeja, NodeSelectionPolicy, SummaryStats,
};

/// Reads a METIS adjacency file, colors it, and runs JA-BE-JA.
#[derive(Debug, StructOpt)]
#[structopt(name = "jabeja", about = "Partition a graph with JA-BE-JA.")]
struct Opt {
    /// METIS adjacency file.
    #[structopt(long)]
    graph: PathBuf,

    #[structopt(long, default_value = "1000")]
    rounds: usize,

    /// Number of colors handed out initially.
    #[structopt(long, default_value = "4")]
    num_partitions: u32,

    /// LOCAL, RANDOM or HYBRID.
    #[structopt(long, default_value = "HYBRID")]
    node_selection_policy: NodeSelectionPolicy,

    /// ROUND_ROBIN, RANDOM or BATCH.
    #[structopt(long, default_value = "ROUND_ROBIN")]
    graph_init_color_policy: InitialColorPolicy,

    /// GREEDY, METROPOLIS or BOUNDED_RATIO.
    #[structopt(long, default_value = "GREEDY")]
    acceptance_rule: AcceptanceRule,

    /// LINEAR, MULTIPLICATIVE or PERIODIC.
    #[structopt(long, default_value = "LINEAR")]
    annealing_schedule: AnnealingSchedule,

    /// Initial temperature.
    #[structopt(long, default_value = "2.0")]
    temperature: f64,

    /// Linear decay step.
    #[structopt(long, default_value = "0.003")]
    delta: f64,

    /// Benefit exponent.
    #[structopt(long, default_value = "2.0")]
    alpha: f64,

    /// Multiplicative decay factor.
    #[structopt(long, default_value = "0.9")]
    alpha2: f64,

    /// Rounds between temperature resets for PERIODIC.
    #[structopt(long, default_value = "100")]
    restart_period: usize,

    #[structopt(long, default_value = "3")]
    neighbor_sample_size: usize,

    #[structopt(long, default_value = "6")]
    global_sample_size: usize,

    /// Random sampling seed
    #[structopt(long, default_value = "0")]
    seed: u64,

    #[structopt(long, default_value = "./output")]
    output_dir: PathBuf,

    /// Every run writes a results file under the output dir; JSON also logs each round.
    #[structopt(long, default_value = "JSON")]
    report_format: ReportFormat,
}

impl Opt {
    fn config(&self) -> Config {
        Config {
            rounds: self.rounds,
            node_selection_policy: self.node_selection_policy,
            temperature: self.temperature,
            delta: self.delta,
            alpha: self.alpha,
            alpha2: self.alpha2,
            restart_period: self.restart_period,
            neighbor_sample_size: self.neighbor_sample_size,
            global_sample_size: self.global_sample_size,
            acceptance_rule: self.acceptance_rule,
            annealing_schedule: self.annealing_schedule,
            seed: self.seed,
            num_partitions: self.num_partitions,
            initial_color_policy: self.graph_init_color_policy,
            output_dir: self.output_dir.clone(),
            report_format: self.report_format,
        }
    }
}

fn main() {
    let opt = Opt::from_args();
    if let Err(e) = run(&opt) {
        eprintln!("jabeja: {}", e);
        process::exit(1);
    }
}

fn run(opt: &Opt) -> jabeja::Result<()> {
    let config = opt.config();
    config.validate()?;

    let mut rng = rng::seeded(config.seed);

    let load_graph_start = Instant::now();
    let graph = graphio::read(
        &opt.graph,
        config.num_partitions,
        config.initial_color_policy,
        &mut rng,
    )?;
    println!(
        "{}",
        json!({
            "load_graph_duration":
                format!("{:.0?}", Instant::now().duration_since(load_graph_start)),
            "nvertices": graph.nvertices(),
            "nedges": graph.nedges(),
            "max_degree": graph.max_degree(),
            "initial_edge_cut": graph.edge_cut(),
        })
    );

    let mut reporters = report::reporters(&config, &opt.graph);
    let mut jabeja = Jabeja::new(graph, &config, rng)?;
    jabeja.run(&mut reporters)?;

    let sizes = jabeja.into_graph().partition_sizes();
    println!(
        "{}",
        json!({
            "ncolors": sizes.len(),
            "partition_sizes": SummaryStats::from(sizes.values().map(|&s| s as f64))
                .map(|stats| stats.to_map()),
        })
    );

    Ok(())
}
