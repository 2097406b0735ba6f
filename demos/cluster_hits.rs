use hitgraph::community::{modularity, CommunityDetection};
use hitgraph::synth::generate_hits;
use hitgraph::Config;
use std::collections::BTreeMap;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Hits -> correlation graph -> Louvain communities and a sliding purge,
    // all configured from one TOML document. Pass a path to use your own.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(std::path::Path::new(&path))?,
        None => Config::from_toml_str(
            r#"
            [correlate]
            window_width = 40

            [louvain]
            threshold = 1e-6

            [scan]
            slice_len = 500
            "#,
        )?,
    };

    let hits = generate_hits(2000, 60.0, 17);
    let graph = config.graph_builder()?.build(&hits)?;
    println!(
        "n_hits={} n_edges={}",
        graph.node_count(),
        graph.edge_count()
    );

    let out = config.louvain()?.detect(&graph)?;
    let mut sizes: BTreeMap<usize, usize> = BTreeMap::new();
    for &c in &out.value {
        *sizes.entry(c).or_default() += 1;
    }
    println!(
        "communities={} modularity={:.4} iterations={} converged={}",
        sizes.len(),
        modularity(&graph, &out.value)?,
        out.iterations,
        out.converged
    );
    let mut largest: Vec<(usize, usize)> = sizes.into_iter().collect();
    largest.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for (cid, size) in largest.iter().take(5) {
        println!("  community {cid}: {size} hits");
    }

    for slice in config.scanner()?.scan(&hits)? {
        println!(
            "slice @{}: {} hits, {} survivors {:?}",
            slice.start,
            slice.len,
            slice.survivors.len(),
            slice.survivors
        );
    }

    Ok(())
}
