use anyhow::{bail, Context, Result};
use clap::{Args, Parser};
use indexmap::IndexMap;
use log::info;
use ndarray::Array3;
use prettytable::{cell, row, Table};
use std::{env, path::PathBuf};
use voc_loader::{transform, ClassSelector, DatasetConfig, GenericDataset, VocDataset};

#[derive(Debug, Clone, Parser)]
/// Inspect PASCAL VOC dataset splits
enum Opts {
    /// Show image and object counts per class
    Info {
        #[clap(flatten)]
        dataset: DatasetArgs,
    },
    /// Show the boxes and centroids of one sample
    Show {
        #[clap(flatten)]
        dataset: DatasetArgs,
        /// sample index
        #[clap(long)]
        index: usize,
        /// print the boxes and centroids in JSON
        #[clap(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Args)]
struct DatasetArgs {
    /// JSON5 dataset configuration file, overriding the other options
    #[clap(long)]
    config_file: Option<PathBuf>,
    /// directory containing VOCdevkit
    #[clap(long)]
    dataset_dir: Option<PathBuf>,
    #[clap(long, default_value = "2007")]
    year: String,
    /// "all" or a class name
    #[clap(long, default_value = "all")]
    class: String,
    #[clap(long, default_value = "trainval")]
    split: String,
}

impl DatasetArgs {
    fn config(&self) -> Result<DatasetConfig> {
        if let Some(config_file) = &self.config_file {
            return DatasetConfig::open(config_file).with_context(|| {
                format!("failed to load config file '{}'", config_file.display())
            });
        }

        let dataset_dir = match &self.dataset_dir {
            Some(dir) => dir.clone(),
            None => bail!("either --config-file or --dataset-dir must be given"),
        };
        Ok(DatasetConfig {
            dataset_dir,
            year: self.year.clone(),
            class: ClassSelector::from(self.class.clone()),
            split: self.split.clone(),
        })
    }
}

fn main() -> Result<()> {
    // setup logger
    let filters = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned());
    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();

    match Opts::parse() {
        Opts::Info { dataset } => {
            info(&dataset.config()?)?;
        }
        Opts::Show {
            dataset,
            index,
            json,
        } => {
            show(&dataset.config()?, index, json)?;
        }
    }

    Ok(())
}

fn info(config: &DatasetConfig) -> Result<()> {
    let dataset: VocDataset<()> = VocDataset::from_config(config, None)?;
    info!(
        "{} images in split '{}' of '{}' ({})",
        dataset.len(),
        config.split,
        dataset.layout().dir().display(),
        config.class
    );

    // count images and objects per class
    let mut counts: IndexMap<String, (usize, usize)> = dataset
        .classes()
        .iter()
        .map(|name| (name.clone(), (0, 0)))
        .collect();
    for index in 0..dataset.len() {
        let gt_box = dataset.annotation(index)?.gt_box();
        for (name, boxes) in gt_box {
            let (num_images, num_objects) = counts.entry(name).or_insert((0, 0));
            *num_images += 1;
            *num_objects += boxes.len();
        }
    }

    let mut table = Table::new();
    table.add_row(row!["class", "images", "objects"]);
    counts
        .iter()
        .filter(|(_, (num_images, _))| *num_images > 0)
        .for_each(|(name, (num_images, num_objects))| {
            table.add_row(row![name, num_images, num_objects]);
        });
    table.printstd();

    Ok(())
}

fn show(config: &DatasetConfig, index: usize, json: bool) -> Result<()> {
    let dataset: VocDataset<Array3<u8>> =
        VocDataset::from_config(config, Some(Box::new(transform::identity)))?;
    let image_id = dataset.image_id(index)?.to_owned();
    let sample = dataset.get(index)?;

    if json {
        let text = serde_json::to_string_pretty(&serde_json::json!({
            "image_id": image_id,
            "gt_box": sample.gt_box,
            "gt_point": sample.gt_point,
        }))?;
        println!("{}", text);
        return Ok(());
    }

    let (height, width) = sample.image_hw();
    println!(
        "{}: {}x{} image, {} objects",
        image_id,
        width,
        height,
        sample.num_objects()
    );

    let mut table = Table::new();
    table.add_row(row!["class", "xmin", "ymin", "xmax", "ymax", "cx", "cy"]);
    for (name, boxes) in &sample.gt_box {
        for ([xmin, ymin, xmax, ymax], [cx, cy]) in boxes.iter().zip(&sample.gt_point[name]) {
            table.add_row(row![name, xmin, ymin, xmax, ymax, cx, cy]);
        }
    }
    table.printstd();

    Ok(())
}
