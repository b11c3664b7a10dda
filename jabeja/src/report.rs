//! Per-round metrics and where they go.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use itertools::Itertools;
use serde_json::json;

use crate::annealing::AnnealingSchedule;
use crate::config::{normalize, Config};
use crate::error::{Error, Result};
use crate::graph::Graph;

const DELIMITER: &str = "\t\t";

/// Written once, when a results file is created.
pub const HEADER: &str = "# Migration is number of nodes that have changed color.\n\n";

/// Where round metrics go besides the results file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Only the tab-delimited results file.
    Tsv,
    /// The results file, plus one JSON object per round on stdout.
    Json,
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "TSV" => Ok(Self::Tsv),
            "JSON" => Ok(Self::Json),
            _ => Err(Error::Configuration(format!("unknown report format {:?}", s))),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tsv => "TSV",
            Self::Json => "JSON",
        })
    }
}

/// What is recorded after every round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundMetrics {
    /// 0-based index of the round just completed.
    pub round: usize,
    /// Undirected edges whose endpoints differ in color.
    pub edge_cut: usize,
    /// Swaps since the start of the run, not just this round.
    pub swaps: usize,
    /// Nodes whose color differs from their initial color.
    pub migrations: usize,
    /// Temperature after this round's cool-down.
    pub temperature: f64,
}

impl RoundMetrics {
    pub fn measure(graph: &Graph, round: usize, swaps: usize, temperature: f64) -> Self {
        Self {
            round,
            edge_cut: graph.edge_cut(),
            swaps,
            migrations: graph.migrations(),
            temperature,
        }
    }
}

/// Receives the metrics of every completed round, in order. A failure
/// ends the run.
pub trait Reporter {
    fn report(&mut self, metrics: &RoundMetrics) -> Result<()>;
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, metrics: &RoundMetrics) -> Result<()> {
        (**self).report(metrics)
    }
}

/// Keeps every round in memory.
impl Reporter for Vec<RoundMetrics> {
    fn report(&mut self, metrics: &RoundMetrics) -> Result<()> {
        self.push(*metrics);
        Ok(())
    }
}

/// Fans out to each reporter in turn.
impl Reporter for Vec<Box<dyn Reporter>> {
    fn report(&mut self, metrics: &RoundMetrics) -> Result<()> {
        for reporter in self.iter_mut() {
            reporter.report(metrics)?;
        }
        Ok(())
    }
}

/// Appends `round  edge-cut  swaps  migrations` lines to a results file,
/// creating it (and its directory) with a header on the first round.
pub struct TsvReporter {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl TsvReporter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            writer: None,
        }
    }

    fn create(&self) -> io::Result<BufWriter<File>> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut writer = BufWriter::new(File::create(&self.path)?);
        // nothing is ever written under Skipped
        let columns = ["Round", "Edge-Cut", "Swaps", "Migrations", "Skipped"]
            .iter()
            .join(DELIMITER);
        writeln!(writer, "{}{}", HEADER, columns)?;
        Ok(writer)
    }
}

impl Reporter for TsvReporter {
    fn report(&mut self, m: &RoundMetrics) -> Result<()> {
        if self.writer.is_none() {
            self.writer = Some(self.create()?);
        }
        if let Some(writer) = self.writer.as_mut() {
            let line = [m.round, m.edge_cut, m.swaps, m.migrations]
                .iter()
                .join(DELIMITER);
            writeln!(writer, "{}", line)?;
            writer.flush()?;
        }
        Ok(())
    }
}

/// Logs each round as a JSON line.
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl JsonReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, m: &RoundMetrics) -> Result<()> {
        writeln!(
            self.out,
            "{}",
            json!({
                "round": m.round,
                "edge_cut": m.edge_cut,
                "swaps": m.swaps,
                "migrations": m.migrations,
                "temperature": m.temperature,
            })
        )?;
        Ok(())
    }
}

/// The reporters a run on `graph` writes to: the results file under
/// `config.output_dir`, then stdout for [`ReportFormat::Json`].
pub fn reporters(config: &Config, graph: &Path) -> Vec<Box<dyn Reporter>> {
    let mut all: Vec<Box<dyn Reporter>> = vec![Box::new(TsvReporter::new(
        config.output_dir.join(file_name(config, graph)),
    ))];
    if config.report_format == ReportFormat::Json {
        all.push(Box::new(JsonReporter::stdout()));
    }
    all
}

/// Results file name encoding the parameters of a run on `graph`.
pub fn file_name(config: &Config, graph: &Path) -> String {
    let graph = graph
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| "graph".to_string());

    let mut fields = vec![
        ("NS", config.node_selection_policy.to_string()),
        ("GICP", config.initial_color_policy.to_string()),
        ("T", format!("{:?}", config.temperature)),
    ];
    match config.annealing_schedule {
        AnnealingSchedule::Linear | AnnealingSchedule::Periodic => {
            fields.push(("D", format!("{:?}", config.delta)))
        }
        AnnealingSchedule::Multiplicative => fields.push(("A2", format!("{:?}", config.alpha2))),
    }
    fields.push(("RNSS", config.neighbor_sample_size.to_string()));
    fields.push(("URSS", config.global_sample_size.to_string()));
    fields.push(("A", format!("{:?}", config.alpha)));
    fields.push(("R", config.rounds.to_string()));
    if config.annealing_schedule == AnnealingSchedule::Periodic {
        fields.push(("RA", config.restart_period.to_string()));
    }
    fields.push(("AR", config.acceptance_rule.to_string()));

    let fields = fields
        .into_iter()
        .map(|(key, value)| format!("{}_{}", key, value))
        .join("_");
    format!("{}_{}.txt", graph, fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::undirected;

    fn metrics(round: usize, edge_cut: usize, swaps: usize, migrations: usize) -> RoundMetrics {
        RoundMetrics {
            round,
            edge_cut,
            swaps,
            migrations,
            temperature: 1.0,
        }
    }

    #[test]
    fn measure_reads_the_graph() {
        let edges: Vec<_> = (1..=5).map(|l| (0, l)).collect();
        let mut g = undirected(6, &edges, &[0, 1, 1, 1, 1, 1]);
        g.swap_colors(0, 1);
        let m = RoundMetrics::measure(&g, 3, 9, 1.5);
        assert_eq!(m, RoundMetrics { temperature: 1.5, ..metrics(3, 1, 9, 2) });
    }

    #[test]
    fn tsv_writes_header_once() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("run.txt");
        let mut reporter = TsvReporter::new(&path);
        reporter.report(&metrics(0, 10, 2, 2)).unwrap();
        reporter.report(&metrics(1, 8, 5, 4)).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "# Migration is number of nodes that have changed color.\n\n\
             Round\t\tEdge-Cut\t\tSwaps\t\tMigrations\t\tSkipped\n\
             0\t\t10\t\t2\t\t2\n\
             1\t\t8\t\t5\t\t4\n"
        );
    }

    #[test]
    fn tsv_surfaces_io_failure() {
        let dir = tempfile::tempdir().expect("temp dir");
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"").unwrap();
        let mut reporter = TsvReporter::new(blocker.join("run.txt"));
        assert!(matches!(reporter.report(&metrics(0, 0, 0, 0)), Err(Error::Io(_))));
    }

    #[test]
    fn json_lines_carry_every_field() {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.report(&metrics(4, 3, 2, 1)).unwrap();
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["round"], 4);
        assert_eq!(value["edge_cut"], 3);
        assert_eq!(value["swaps"], 2);
        assert_eq!(value["migrations"], 1);
    }

    #[test]
    fn fan_out_reaches_everyone() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("run.txt");
        let mut all: Vec<Box<dyn Reporter>> = vec![
            Box::new(TsvReporter::new(&path)),
            Box::new(Vec::<RoundMetrics>::new()),
        ];
        all.report(&metrics(0, 1, 2, 3)).unwrap();
        all.report(&metrics(1, 1, 4, 3)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 3 + 2);

        let mut kept: Vec<RoundMetrics> = Vec::new();
        (&mut kept).report(&metrics(0, 1, 2, 3)).unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn reporters_follow_the_format() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut config = Config::default();
        config.output_dir = dir.path().join("out");
        let graph = Path::new("graphs/3elt.graph");

        config.report_format = ReportFormat::Tsv;
        let mut quiet = reporters(&config, graph);
        assert_eq!(quiet.len(), 1);
        quiet.report(&metrics(0, 7, 1, 2)).unwrap();
        let written = config.output_dir.join(file_name(&config, graph));
        assert!(fs::read_to_string(&written)
            .unwrap()
            .ends_with("0\t\t7\t\t1\t\t2\n"));

        config.report_format = ReportFormat::Json;
        assert_eq!(reporters(&config, graph).len(), 2);
    }

    #[test]
    fn file_name_lists_schedule_parameters() {
        let config = Config::default();
        assert_eq!(
            file_name(&config, Path::new("graphs/3elt.graph")),
            "3elt.graph_NS_HYBRID_GICP_ROUND_ROBIN_T_2.0_D_0.003_RNSS_3_URSS_6_A_2.0_R_1000_AR_GREEDY.txt"
        );
        let config = config
            .with_schedule(AnnealingSchedule::Multiplicative)
            .with_acceptance_rule(crate::AcceptanceRule::Metropolis);
        let name = file_name(&config, Path::new("add20"));
        assert!(name.contains("_A2_0.9_"));
        assert!(!name.contains("_D_"));
        assert!(name.ends_with("_AR_METROPOLIS.txt"));
        let config = config.with_schedule(AnnealingSchedule::Periodic);
        assert!(file_name(&config, Path::new("add20")).contains("_RA_100_"));
    }

    #[test]
    fn format_names_parse() {
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("csv".parse::<ReportFormat>().is_err());
    }
}
