use nn::{Config, build_model};

// cargo run --release
fn main() {
    let mut config = Config::new(128, 128, 4, 16, 3, 1);
    config.se_ratio = 4;
    config.deep_supervision = true;
    config.attention_gate = true;

    let model = build_model(&config).unwrap();
    println!("{}", model.summary());

    println!(
        "{} nodes, {} edges, {} outputs:",
        model.n_nodes(),
        model.n_edges(),
        model.output_metas().len(),
    );
    for edge in model.outputs() {
        println!("  {} {:?}", edge.name, edge.meta.shape())
    }
}
