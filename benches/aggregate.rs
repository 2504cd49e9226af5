use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use fastfood_nutrition::{
    impute,
    loader::{self, LoadOptions},
    rank::Order,
    schema::NumericColumn,
    session::ReportSession,
};
use tempfile::TempDir;

const HEADER: &str = "restaurant,item,calories,cal_fat,total_fat,sat_fat,trans_fat,cholesterol,sodium,total_carb,fiber,sugar,protein,vit_a,vit_c,calcium,salad";

const RESTAURANTS: [&str; 8] = [
    "Arbys",
    "Burger King",
    "Chick Fil-A",
    "Dairy Queen",
    "Mcdonalds",
    "Sonic",
    "Subway",
    "Taco Bell",
];

fn generate_menu(rows: usize) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let csv_path = temp_dir.path().join("fastfood.csv");
    let mut file = File::create(&csv_path).expect("create csv");
    writeln!(file, "{HEADER}").expect("header");
    for i in 0..rows {
        let restaurant = RESTAURANTS[i % RESTAURANTS.len()];
        let salad = if i % 9 == 0 { "Salad" } else { "Other" };
        let calories = 150 + (i * 37) % 1_800;
        let fat = calories / 20;
        // Vitamins go missing on every fifth row, fiber on every eleventh.
        let vitamins = if i % 5 == 0 {
            ",,".to_string()
        } else {
            format!("{},{},{}", i % 120, i % 90, i % 60)
        };
        let fiber = if i % 11 == 0 {
            String::new()
        } else {
            (i % 12).to_string()
        };
        writeln!(
            file,
            "{restaurant},Item {i},{calories},{},{fat},{},{},{},{},{},{fiber},{},{},{vitamins},{salad}",
            fat * 9,
            fat / 3,
            i % 3,
            (i * 7) % 300,
            400 + (i * 53) % 2_500,
            20 + i % 120,
            i % 40,
            10 + i % 70,
        )
        .expect("row");
    }
    (temp_dir, csv_path)
}

fn bench_pipeline(c: &mut Criterion) {
    let (temp_dir, csv_path) = generate_menu(20_000);
    let options = LoadOptions::default();
    let raw = loader::load_dataset(&csv_path, &options).expect("load menu");

    let mut group = c.benchmark_group("pipeline");

    group.bench_function("load", |b| {
        b.iter(|| loader::load_dataset(&csv_path, &options).expect("load"));
    });

    group.bench_function("impute", |b| {
        b.iter(|| impute::impute(&raw).expect("impute"));
    });

    group.bench_function("aggregate_cold", |b| {
        b.iter_batched(
            || raw.clone(),
            |dataset| {
                let session = ReportSession::open(dataset).expect("open session");
                session.grouped_means().expect("means");
                session.correlation().expect("correlation");
                session
                    .top_n(NumericColumn::Calories, 10, Order::Highest)
                    .expect("top");
            },
            BatchSize::LargeInput,
        );
    });

    let session = ReportSession::open(raw.clone()).expect("open session");
    group.bench_function("aggregate_memoized", |b| {
        b.iter(|| {
            session.grouped_means().expect("means");
            session.correlation().expect("correlation");
        });
    });

    drop(temp_dir);
    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
