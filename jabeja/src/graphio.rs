//! METIS adjacency-file reader and initial color assignment.
//!
//! The format is a header line `<nvertices> <nedges> [fmt]` followed by one
//! line per vertex listing its 1-based neighbor ids. Lines starting with
//! `%` are comments; an empty vertex line is an isolated vertex.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use serde_json::json;

use crate::config::normalize;
use crate::error::{Error, Result};
use crate::graph::{Color, Graph, Node, NodeId};
use crate::rng::RandomSource;
use crate::scanner::Scanner;

/// How colors are handed out before the first round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialColorPolicy {
    /// Position `i` gets `i mod k`.
    RoundRobin,
    /// Uniform draw from the run's random stream.
    Random,
    /// Contiguous blocks of `ceil(n / k)` nodes per color.
    Batch,
}

impl FromStr for InitialColorPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "ROUND_ROBIN" => Ok(Self::RoundRobin),
            "RANDOM" => Ok(Self::Random),
            "BATCH" => Ok(Self::Batch),
            _ => Err(Error::Configuration(format!(
                "unknown initial color policy {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for InitialColorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RoundRobin => "ROUND_ROBIN",
            Self::Random => "RANDOM",
            Self::Batch => "BATCH",
        })
    }
}

/// Colors for `n` nodes in processing order.
pub fn initial_colors<R: RandomSource + ?Sized>(
    n: usize,
    num_partitions: u32,
    policy: InitialColorPolicy,
    rng: &mut R,
) -> Vec<Color> {
    let k = num_partitions.max(1) as usize;
    match policy {
        InitialColorPolicy::RoundRobin => (0..n).map(|i| (i % k) as Color).collect(),
        InitialColorPolicy::Random => (0..n).map(|_| rng.next_index(k) as Color).collect(),
        InitialColorPolicy::Batch => {
            let batch = ((n + k - 1) / k).max(1);
            (0..n).map(|i| (i / batch).min(k - 1) as Color).collect()
        }
    }
}

fn parse_word<T: FromStr>(word: &[u8], line: usize, what: &str) -> Result<T> {
    std::str::from_utf8(word)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::Parse {
            line,
            message: format!("bad {} {:?}", what, String::from_utf8_lossy(word)),
        })
}

/// Neighbor lists, in file order, of the graph behind `scanner`.
pub fn parse_adjacency(scanner: &Scanner) -> Result<Vec<Vec<NodeId>>> {
    let mut nvertices: Option<usize> = None;
    let mut adjacency: Vec<Vec<NodeId>> = Vec::new();
    let mut last_line = 0;

    scanner.for_each_line(|line, words| {
        last_line = line;
        let mut words = words.words().peekable();
        if words.peek().map_or(false, |w| w.starts_with(b"%")) {
            return Ok(());
        }

        let n = match nvertices {
            Some(n) => n,
            None => {
                let first = match words.next() {
                    Some(w) => w,
                    None => return Ok(()),
                };
                let n: usize = parse_word(first, line, "vertex count")?;
                let _nedges: usize = match words.next() {
                    Some(w) => parse_word(w, line, "edge count")?,
                    None => {
                        return Err(Error::Parse {
                            line,
                            message: "header needs a vertex and an edge count".to_string(),
                        })
                    }
                };
                nvertices = Some(n);
                adjacency.reserve(n);
                return Ok(());
            }
        };

        if adjacency.len() < n {
            let neighbors = words
                .map(|w| parse_word(w, line, "neighbor id"))
                .collect::<Result<Vec<NodeId>>>()?;
            adjacency.push(neighbors);
        } else if words.next().is_some() {
            return Err(Error::Parse {
                line,
                message: format!("more vertex lines than the {} announced", n),
            });
        }
        Ok(())
    })?;

    match nvertices {
        None => Err(Error::Parse {
            line: last_line,
            message: "missing header line".to_string(),
        }),
        Some(n) if adjacency.len() < n => Err(Error::Parse {
            line: last_line,
            message: format!("expected {} vertex lines, found {}", n, adjacency.len()),
        }),
        Some(_) => Ok(adjacency),
    }
}

/// Reads a METIS graph file and colors it. Node ids are the 1-based line
/// positions of the vertex lines.
pub fn read<R: RandomSource + ?Sized>(
    path: impl AsRef<Path>,
    num_partitions: u32,
    policy: InitialColorPolicy,
    rng: &mut R,
) -> Result<Graph> {
    let scanner = Scanner::new(path, b' ');

    let parse_start = Instant::now();
    let adjacency = parse_adjacency(&scanner)?;
    let parse_time = format!("{:.0?}", Instant::now().duration_since(parse_start));

    let colors = initial_colors(adjacency.len(), num_partitions, policy, rng);
    let nodes = adjacency
        .into_iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (neighbors, color))| Node::new(i as NodeId + 1, color, neighbors));

    let build_start = Instant::now();
    let graph = Graph::new(nodes)?;
    let build_time = format!("{:.0?}", Instant::now().duration_since(build_start));

    println!(
        "{}",
        json!({
            "graph": scanner.path().display().to_string(),
            "parse_time": parse_time,
            "build_time": build_time,
            "initial_color_policy": policy.to_string(),
            "num_partitions": num_partitions,
        })
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_graph(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn reads_a_square() {
        let file = create_temp_graph("% square\n4 4\n2 4\n1 3\n2 4\n3 1\n");
        let mut rng = seeded(0);
        let g = read(file.path(), 2, InitialColorPolicy::RoundRobin, &mut rng).unwrap();
        assert_eq!(g.ids(), &[1, 2, 3, 4]);
        assert_eq!(g.nedges(), 4);
        assert_eq!(g.colors(), &[0, 1, 0, 1]);
        assert_eq!(g.neighbors_of(4).unwrap(), vec![3, 1]);
        assert_eq!(g.edge_cut(), 4);
    }

    #[test]
    fn empty_lines_are_isolated_vertices() {
        let file = create_temp_graph("3 1 0\n2\n1\n\n");
        let adjacency = parse_adjacency(&Scanner::new(file.path(), b' ')).unwrap();
        assert_eq!(adjacency, vec![vec![2], vec![1], vec![]]);
    }

    #[test]
    fn tabs_separate_words() {
        let file = create_temp_graph("2\t1\n2\n1\n");
        let adjacency = parse_adjacency(&Scanner::new(file.path(), b' ')).unwrap();
        assert_eq!(adjacency, vec![vec![2], vec![1]]);

        let file = create_temp_graph("3\t2\n2\t3\n1\n1\n");
        let mut rng = seeded(0);
        let g = read(file.path(), 2, InitialColorPolicy::RoundRobin, &mut rng).unwrap();
        assert_eq!(g.neighbors_of(1).unwrap(), vec![2, 3]);
        assert_eq!(g.nedges(), 2);
    }

    #[test]
    fn short_file_is_rejected() {
        let file = create_temp_graph("3 1\n2\n1\n");
        let result = parse_adjacency(&Scanner::new(file.path(), b' '));
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn trailing_vertex_line_is_rejected() {
        let file = create_temp_graph("2 1\n2\n1\n1\n");
        match parse_adjacency(&Scanner::new(file.path(), b' ')) {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn bad_words_are_rejected() {
        for content in &["x 1\n", "2\n", "2 1\n2\nfoo\n"] {
            let file = create_temp_graph(content);
            let result = parse_adjacency(&Scanner::new(file.path(), b' '));
            assert!(matches!(result, Err(Error::Parse { .. })), "{:?}", content);
        }
        let file = create_temp_graph("");
        let result = parse_adjacency(&Scanner::new(file.path(), b' '));
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn out_of_range_neighbor_breaks_integrity() {
        let file = create_temp_graph("2 1\n2\n3\n");
        let mut rng = seeded(0);
        let result = read(file.path(), 2, InitialColorPolicy::RoundRobin, &mut rng);
        assert!(matches!(
            result,
            Err(Error::GraphIntegrity {
                node: 2,
                neighbor: 3
            })
        ));
    }

    #[test]
    fn initial_color_policies() {
        let mut rng = seeded(0);
        assert_eq!(
            initial_colors(5, 2, InitialColorPolicy::RoundRobin, &mut rng),
            vec![0, 1, 0, 1, 0]
        );
        assert_eq!(
            initial_colors(7, 3, InitialColorPolicy::Batch, &mut rng),
            vec![0, 0, 0, 1, 1, 1, 2]
        );
        let random = initial_colors(100, 4, InitialColorPolicy::Random, &mut rng);
        assert!(random.iter().all(|&c| c < 4));
        assert_eq!(
            random,
            initial_colors(100, 4, InitialColorPolicy::Random, &mut seeded(0))
        );
    }

    #[test]
    fn policy_names_parse() {
        assert_eq!(
            "round-robin".parse::<InitialColorPolicy>().unwrap(),
            InitialColorPolicy::RoundRobin
        );
        assert!("striped".parse::<InitialColorPolicy>().is_err());
    }
}
