#![allow(clippy::cast_precision_loss)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]

use std::{error::Error, sync::Once};

use env_logger::Builder;
use log::{LevelFilter, info, warn};
use plotters::prelude::*;
use quadchain::{ChainedTable, HashTable, OpenAddressingTable, hash_functions::default_hash};
use rand::Rng;

// Both tables start from the same prime capacity
const INITIAL_CAPACITY: usize = 53;
const TOTAL_INSERTS: usize = 5_000;
// Points sampled along the insertion run
const NUM_SAMPLES: usize = 25;

const LOAD_CHART: &str = "table_load.png";
const EMPTY_CHART: &str = "empty_buckets.png";

static INIT: Once = Once::new();

fn initialize_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Info)
            .filter_module("quadchain", LevelFilter::Info)
            .format_timestamp_millis()
            .parse_default_env();

        if let Err(err) = builder.try_init() {
            eprintln!("logger already initialized: {err}");
        }
    });
}

// One observation of a table after `inserted` puts
#[derive(Debug, Clone, Copy)]
struct Sample {
    inserted: usize,
    load: f64,
    empty_fraction: f64,
    capacity: usize,
}

impl Sample {
    fn observe<T: HashTable<usize>>(table: &T, inserted: usize) -> Self {
        Self {
            inserted,
            load: table.table_load(),
            empty_fraction: table.empty_buckets() as f64 / table.capacity() as f64,
            capacity: table.capacity(),
        }
    }
}

fn run<T: HashTable<usize>>(mut table: T, keys: &[String]) -> Vec<Sample> {
    let step = (keys.len() / NUM_SAMPLES).max(1);
    let mut samples = vec![Sample::observe(&table, 0)];

    for (i, key) in keys.iter().enumerate() {
        table.put(key, i);
        let inserted = i + 1;
        if inserted % step == 0 {
            samples.push(Sample::observe(&table, inserted));
        }
    }

    samples
}

fn points(samples: &[Sample], value: fn(&Sample) -> f64) -> Vec<(usize, f64)> {
    samples.iter().map(|sample| (sample.inserted, value(sample))).collect()
}

fn plot(
    path: &str,
    caption: &str,
    y_desc: &str,
    series: &[(&str, Vec<(usize, f64)>, RGBColor)],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_x = series.iter().flat_map(|(_, points, _)| points.iter().map(|&(x, _)| x)).max();
    let max_y = series
        .iter()
        .flat_map(|(_, points, _)| points.iter().map(|&(_, y)| y))
        .fold(0.0, f64::max) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0..max_x.unwrap_or(1).max(1), 0.0..max_y.max(f64::EPSILON))?;

    chart
        .configure_mesh()
        .x_desc("Keys inserted")
        .y_desc(y_desc)
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    for (label, points, color) in series {
        let line_style = ShapeStyle::from(color).stroke_width(2);

        chart
            .draw_series(LineSeries::new(points.iter().copied(), line_style))?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(points.iter().map(|&point| Circle::new(point, 4, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    initialize_logger();

    // Generate random keys up front so both tables see the same workload
    let mut rng = rand::rng();
    let keys: Vec<String> =
        (0..TOTAL_INSERTS).map(|_| format!("key-{}", rng.random_range(0..u32::MAX))).collect();

    info!("inserting {TOTAL_INSERTS} keys into tables of initial capacity {INITIAL_CAPACITY}");

    let open = run(OpenAddressingTable::new(INITIAL_CAPACITY, default_hash), &keys);
    let chained = run(ChainedTable::new(INITIAL_CAPACITY, default_hash), &keys);

    println!(
        "{:>8} | {:>10} {:>8} {:>8} | {:>10} {:>8} {:>8}",
        "inserted", "oa cap", "oa load", "oa empty", "sc cap", "sc load", "sc empty"
    );
    for (o, c) in open.iter().zip(&chained) {
        println!(
            "{:>8} | {:>10} {:>8.2} {:>8.2} | {:>10} {:>8.2} {:>8.2}",
            o.inserted, o.capacity, o.load, o.empty_fraction, c.capacity, c.load, c.empty_fraction
        );
    }

    if open.iter().any(|sample| sample.load > OpenAddressingTable::<usize>::MAX_LOAD_FACTOR) {
        warn!("open addressing load factor exceeded its ceiling");
    }

    let colors = [
        RGBColor(220, 50, 50), // Bright red
        RGBColor(50, 90, 220), // Bright blue
    ];
    plot(
        LOAD_CHART,
        "Load Factor While Inserting",
        "Load factor (size / capacity)",
        &[
            ("Quadratic probing", points(&open, |s| s.load), colors[0]),
            ("Separate chaining", points(&chained, |s| s.load), colors[1]),
        ],
    )?;

    plot(
        EMPTY_CHART,
        "Empty Buckets While Inserting",
        "Fraction of buckets without a live entry",
        &[
            ("Quadratic probing", points(&open, |s| s.empty_fraction), colors[0]),
            ("Separate chaining", points(&chained, |s| s.empty_fraction), colors[1]),
        ],
    )?;

    info!("wrote {LOAD_CHART} and {EMPTY_CHART}");
    Ok(())
}
