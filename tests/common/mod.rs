#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use fastfood_nutrition::{
    data::{Dataset, Record},
    schema::{Column, NumericColumn},
};
use tempfile::{TempDir, tempdir};

pub const HEADER: &str = "restaurant,item,calories,cal_fat,total_fat,sat_fat,trans_fat,cholesterol,sodium,total_carb,fiber,sugar,protein,vit_a,vit_c,calcium,salad";

/// A small menu with gaps in fiber, protein and the vitamin columns.
pub const SAMPLE_ROWS: &[&str] = &[
    "Mcdonalds,Artisan Grilled Chicken Sandwich,380,60,7,2,0,95,1110,44,3,11,37,4,20,20,Other",
    "Mcdonalds,Single Bacon Smokehouse Burger,840,410,45,17,1.5,130,1580,62,2,18,46,6,20,20,Other",
    "Mcdonalds,Premium Southwest Salad,450,150,16,4,0,60,850,46,,13,,20,120,15,Salad",
    "Sonic,Hatch Chile Cheeseburger,700,370,41,14,1.5,105,1350,44,2,9,38,,,,Other",
    "Sonic,Corn Dog,230,110,12,3.5,0,20,470,26,1,8,6,0,0,6,Other",
    "Arbys,Roast Turkey Farmhouse Salad,230,100,12,6,0,65,800,10,4,5,22,110,70,20,Salad",
    "Arbys,Classic Roast Beef,360,120,14,5,0,45,970,37,2,5,23,,,,Other",
];

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes the sample menu as `fastfood.csv`.
    pub fn write_sample(&self) -> PathBuf {
        self.write("fastfood.csv", &sample_csv())
    }
}

pub fn sample_csv() -> String {
    csv_with_rows(SAMPLE_ROWS)
}

pub fn csv_with_rows(rows: &[&str]) -> String {
    let mut text = String::from(HEADER);
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

/// Record with every nutrient set to `fill`, then `calories` overridden.
pub fn complete_record(restaurant: &str, item: &str, calories: f64, fill: f64) -> Record {
    let mut record = Record::new(restaurant, item, "Other");
    for column in NumericColumn::ALL {
        record.set_value(column, Some(fill));
    }
    record.set_value(NumericColumn::Calories, Some(calories));
    record
}

/// Total number of missing cells across every column.
pub fn missing_cells(dataset: &Dataset) -> usize {
    Column::all()
        .map(|column| dataset.missing_count(column))
        .sum()
}
