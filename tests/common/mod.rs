use std::fs;
use std::path::Path;

use house_price_predictor::{run_training, Paths, TrainConfig, TrainedModel};

const LOCATIONS: [(&str, f64); 4] = [
    ("Delhi", 1.15),
    ("Mumbai", 1.45),
    ("Chennai", 1.0),
    ("Pune", 1.1),
];

/// Write a deterministic dataset under `root` in the default layout.
pub fn write_dataset(root: &Path, rows: usize) -> Paths {
    let paths = Paths::under(root);
    let mut csv = String::from("area,bedrooms,bathrooms,year_built,age,location,price\n");
    for i in 0..rows {
        let bedrooms = 1 + i % 5;
        let bathrooms = 1 + i % 3;
        let area = 500 + bedrooms * 350 + (i * 37) % 400;
        let year_built = 1950 + (i * 13) % 75;
        let age = 2025 - year_built;
        let (location, factor) = LOCATIONS[i % LOCATIONS.len()];
        let base = area as f64 * 3200.0 + bedrooms as f64 * 150_000.0
            + bathrooms as f64 * 90_000.0
            - age as f64 * 11_000.0
            + 500_000.0;
        let price = (base * factor).round() as i64;
        csv.push_str(&format!(
            "{area},{bedrooms},{bathrooms},{year_built},{age},{location},{price}\n"
        ));
    }
    write(&paths.dataset, &csv);
    paths
}

pub fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Train a smaller forest on a fresh dataset under `root`.
pub fn train_under(root: &Path, n_trees: usize) -> TrainedModel {
    let paths = write_dataset(root, 120);
    run_training(&paths, &TrainConfig::default().with_n_trees(n_trees)).unwrap()
}
