use clap::Parser;
use lodestar::{
    graph::{Graph, NodeId, generate_graph},
    queues::HeapKind,
    search::{
        ContractionHierarchy, bidirectional_skewed_observed, dijkstra_observed,
    },
    statistics::Stats,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;
use std::path::PathBuf;
use tqdm::tqdm;
use tracing_subscriber::EnvFilter;

/// Shortest-path engines over interchangeable priority queues
#[derive(Parser, Debug)]
#[command(name = "lodestar")]
#[command(about = "Shortest-path engine benchmark over generated graphs", long_about = None)]
struct Args {
    /// Number of nodes in the generated graph
    #[arg(short, long, default_value_t = 1000)]
    nodes: usize,

    /// Number of directed edges in the generated graph
    #[arg(short, long, default_value_t = 8000)]
    edges: usize,

    /// Largest edge weight to generate (weights are uniform in 1..=max)
    #[arg(long, default_value_t = 100)]
    max_weight: u64,

    /// Seed for both the graph and the query workload
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Queue backends to sweep (comma-separated list, e.g., "binary,radix")
    #[arg(long, value_delimiter = ',', default_value = "binary,fibonacci,radix")]
    heaps: Vec<String>,

    /// Skew values for the bidirectional engine (comma-separated list)
    #[arg(long, value_delimiter = ',', default_value = "0.0,0.5,1.0")]
    sigmas: Vec<f64>,

    /// Number of point-to-point queries per job
    #[arg(short, long, default_value_t = 200)]
    queries: usize,

    /// Also build a contraction hierarchy per backend and query through it
    #[arg(short, long)]
    contraction: bool,

    /// Write the sweep results as JSON to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

/// One engine/backend combination measured over the whole query workload.
#[derive(Debug, Serialize)]
struct JobReport {
    engine: String,
    heap: String,
    sigma: Option<f64>,
    queries: usize,
    reachable: usize,
    /// Wrapping sum of all finite path lengths; backends must agree on it.
    checksum: u64,
    nodes_closed: usize,
    edges_relaxed: usize,
    elapsed_secs: f64,
}

fn print_job(report: &JobReport) {
    println!("\n==========");
    match report.sigma {
        Some(sigma) => println!(
            "Engine {} (sigma={}), heap {}",
            report.engine, sigma, report.heap
        ),
        None => println!("Engine {}, heap {}", report.engine, report.heap),
    }
    println!("==========");
    println!(
        "Reachable: {}/{}, checksum: {}",
        report.reachable, report.queries, report.checksum
    );
    if report.nodes_closed > 0 {
        let per_query = report.nodes_closed as f64 / report.queries.max(1) as f64;
        println!(
            "Work: {} nodes closed, {} edges relaxed ({:.2} closed per query)",
            report.nodes_closed, report.edges_relaxed, per_query
        );
    }
    println!(
        "Completed {} queries in {:.2}s ({:.2} QPS)",
        report.queries,
        report.elapsed_secs,
        report.queries as f64 / report.elapsed_secs.max(f64::MIN_POSITIVE)
    );
}

fn run_dijkstra_job(graph: &Graph, pairs: &[(NodeId, NodeId)], kind: HeapKind) -> JobReport {
    let start_time = std::time::Instant::now();
    let mut stats = Stats::new();
    let mut checksum = 0u64;
    let mut reachable = 0usize;

    for &(source, target) in tqdm(pairs.iter()) {
        let tree = dijkstra_observed(graph, source, kind, &mut stats)
            .expect("workload sources are in range");
        let distance = tree.distance(target);
        if distance != lodestar::graph::INFINITY {
            checksum = checksum.wrapping_add(distance);
            reachable += 1;
        }
    }

    JobReport {
        engine: "dijkstra".to_string(),
        heap: kind.name().to_string(),
        sigma: None,
        queries: pairs.len(),
        reachable,
        checksum,
        nodes_closed: stats.get_nodes_closed(),
        edges_relaxed: stats.get_edges_relaxed(),
        elapsed_secs: start_time.elapsed().as_secs_f64(),
    }
}

fn run_bidirectional_job(
    graph: &Graph,
    pairs: &[(NodeId, NodeId)],
    sigma: f64,
    kind: HeapKind,
) -> JobReport {
    let start_time = std::time::Instant::now();
    let mut stats = Stats::new();
    let mut checksum = 0u64;
    let mut reachable = 0usize;

    for &(source, target) in tqdm(pairs.iter()) {
        let result = bidirectional_skewed_observed(graph, source, target, sigma, kind, &mut stats)
            .expect("workload endpoints are in range");
        if result.is_reachable() {
            checksum = checksum.wrapping_add(result.length);
            reachable += 1;
        }
    }

    JobReport {
        engine: "bidirectional".to_string(),
        heap: kind.name().to_string(),
        sigma: Some(sigma),
        queries: pairs.len(),
        reachable,
        checksum,
        nodes_closed: stats.get_nodes_closed(),
        edges_relaxed: stats.get_edges_relaxed(),
        elapsed_secs: start_time.elapsed().as_secs_f64(),
    }
}

fn run_contraction_job(graph: &Graph, pairs: &[(NodeId, NodeId)], kind: HeapKind) -> JobReport {
    let preprocess_start = std::time::Instant::now();
    let ch = ContractionHierarchy::preprocess(graph, kind);
    println!(
        "Preprocessed {} shortcuts in {:.2}s (heap {})",
        ch.shortcut_count(),
        preprocess_start.elapsed().as_secs_f64(),
        kind.name()
    );

    let start_time = std::time::Instant::now();
    let mut stats = Stats::new();
    let mut checksum = 0u64;
    let mut reachable = 0usize;

    for &(source, target) in tqdm(pairs.iter()) {
        let result = ch
            .query_observed(source, target, &mut stats)
            .expect("workload endpoints are in range");
        if result.is_reachable() {
            checksum = checksum.wrapping_add(result.length);
            reachable += 1;
        }
    }

    JobReport {
        engine: "contraction".to_string(),
        heap: kind.name().to_string(),
        sigma: None,
        queries: pairs.len(),
        reachable,
        checksum,
        nodes_closed: stats.get_nodes_closed(),
        edges_relaxed: stats.get_edges_relaxed(),
        elapsed_secs: start_time.elapsed().as_secs_f64(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let kinds: Vec<HeapKind> = args.heaps.iter().map(|s| HeapKind::from_string(s)).collect();

    println!("Generating graph...");
    let graph = generate_graph(args.nodes, args.edges, (1, args.max_weight), args.seed);
    println!(
        "Graph ready with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    // Same workload for every job, so checksums are comparable.
    let mut rng = StdRng::seed_from_u64(args.seed.wrapping_add(1));
    let pairs: Vec<(NodeId, NodeId)> = (0..args.queries)
        .map(|_| {
            (
                NodeId(rng.random_range(0..args.nodes)),
                NodeId(rng.random_range(0..args.nodes)),
            )
        })
        .collect();

    println!("\nStarting cartesian product sweep:");
    println!("  Heaps: {:?}", args.heaps);
    println!("  Sigmas: {:?}", args.sigmas);
    println!(
        "  Total jobs: {}",
        kinds.len() * (1 + args.sigmas.len() + usize::from(args.contraction))
    );

    let mut reports = Vec::new();
    for &kind in &kinds {
        let report = run_dijkstra_job(&graph, &pairs, kind);
        print_job(&report);
        reports.push(report);

        for &sigma in &args.sigmas {
            let report = run_bidirectional_job(&graph, &pairs, sigma, kind);
            print_job(&report);
            reports.push(report);
        }

        if args.contraction {
            let report = run_contraction_job(&graph, &pairs, kind);
            print_job(&report);
            reports.push(report);
        }
    }

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&reports).expect("reports serialize cleanly");
        std::fs::write(path, json).expect("report path must be writable");
        println!("\nReport written to {}", path.display());
    }

    println!("\n==========");
    println!("All jobs completed!");
    println!("==========");
}
