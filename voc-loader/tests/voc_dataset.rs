use anyhow::Result;
use approx::assert_abs_diff_eq;
use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use ndarray::Array3;
use std::{fs, path::Path};
use tempfile::TempDir;
use voc_loader::{
    transform, Annotation, ClassSelector, DatasetConfig, DatasetError, RandomAccessDataset,
    VocDataset,
};

const YEAR: &str = "2007";

const ANNOTATIONS: &[(&str, &[(&str, [i64; 4])])] = &[
    ("000001", &[("dog", [10, 10, 50, 50]), ("dog", [60, 60, 100, 100])]),
    ("000002", &[("person", [1, 2, 4, 7]), ("dog", [0, 0, 3, 3])]),
    (
        "000005",
        &[
            ("cat", [5, 5, 9, 9]),
            ("dog", [2, 4, 6, 8]),
            ("cat", [11, 13, 20, 21]),
        ],
    ),
];

/// Build a small VOC2007 tree with three annotated images.
fn voc_fixture() -> TempDir {
    let tempdir = tempfile::tempdir().unwrap();
    let base = tempdir.path().join("VOCdevkit").join(format!("VOC{}", YEAR));
    let split_dir = base.join("ImageSets").join("Main");
    let image_dir = base.join("JPEGImages");
    let annotation_dir = base.join("Annotations");
    fs::create_dir_all(&split_dir).unwrap();
    fs::create_dir_all(&image_dir).unwrap();
    fs::create_dir_all(&annotation_dir).unwrap();

    fs::write(
        split_dir.join("trainval.txt"),
        "000005\n000001\n\n000002\n000001\n",
    )
    .unwrap();
    fs::write(
        split_dir.join("dog_trainval.txt"),
        "000001  1\n000002 -1\n000005  1\n",
    )
    .unwrap();
    fs::write(
        split_dir.join("cat_trainval.txt"),
        "000001 -1\n000002  0\n000005  1\n",
    )
    .unwrap();
    fs::write(split_dir.join("broken.txt"), "000001\n000007\n000002\n").unwrap();
    fs::write(split_dir.join("bird_trainval.txt"), "000001 1\n000002\n").unwrap();

    RgbImage::from_pixel(6, 4, Rgb([200, 30, 30]))
        .save_with_format(image_dir.join("000001.jpg"), ImageFormat::Jpeg)
        .unwrap();
    GrayImage::from_pixel(5, 3, Luma([128]))
        .save_with_format(image_dir.join("000002.jpg"), ImageFormat::Jpeg)
        .unwrap();
    RgbImage::from_pixel(8, 8, Rgb([10, 200, 10]))
        .save_with_format(image_dir.join("000005.jpg"), ImageFormat::Jpeg)
        .unwrap();

    ANNOTATIONS.iter().for_each(|(image_id, objects)| {
        write_annotation(&annotation_dir, image_id, objects);
    });

    tempdir
}

fn write_annotation(dir: &Path, image_id: &str, objects: &[(&str, [i64; 4])]) {
    let objects: String = objects
        .iter()
        .map(|(name, [xmin, ymin, xmax, ymax])| {
            format!(
                "  <object>\n    <name>{}</name>\n    <difficult>0</difficult>\n    <bndbox>\n      <xmin>{}</xmin>\n      <ymin>{}</ymin>\n      <xmax>{}</xmax>\n      <ymax>{}</ymax>\n    </bndbox>\n  </object>\n",
                name, xmin, ymin, xmax, ymax
            )
        })
        .collect();
    let doc = format!(
        "<annotation>\n  <folder>VOC{}</folder>\n  <filename>{}.jpg</filename>\n{}</annotation>\n",
        YEAR, image_id, objects
    );
    fs::write(dir.join(format!("{}.xml", image_id)), doc).unwrap();
}

fn open<T>(
    root: &Path,
    class: &str,
    split: &str,
    transform: Option<voc_loader::Transform<T>>,
) -> Result<VocDataset<T>> {
    VocDataset::open(root, YEAR, class.parse().unwrap(), split, transform)
}

fn identity() -> Option<voc_loader::Transform<Array3<u8>>> {
    Some(Box::new(transform::identity))
}

#[test]
fn class_split_keeps_positive_ids() -> Result<()> {
    let tempdir = voc_fixture();
    let dataset = open(tempdir.path(), "dog", "trainval", identity())?;

    assert_eq!(dataset.image_ids(), ["000001", "000005"]);
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.selector(), &ClassSelector::Class("dog".into()));

    let dataset = open(tempdir.path(), "cat", "trainval", identity())?;
    assert_eq!(dataset.image_ids(), ["000005"]);
    Ok(())
}

#[test]
fn all_split_keeps_order_and_duplicates() -> Result<()> {
    let tempdir = voc_fixture();
    let dataset = open(tempdir.path(), "all", "trainval", identity())?;

    assert_eq!(
        dataset.image_ids(),
        ["000005", "000001", "000002", "000001"]
    );
    assert_eq!(dataset.len(), 4);
    assert!(!dataset.is_empty());
    Ok(())
}

#[test]
fn sample_groups_boxes_by_class() -> Result<()> {
    let tempdir = voc_fixture();
    let dataset = open(tempdir.path(), "dog", "trainval", identity())?;
    let sample = dataset.get(0)?;

    assert_eq!(sample.gt_box.len(), 1);
    assert_eq!(sample.gt_box["dog"], [[10, 10, 50, 50], [60, 60, 100, 100]]);
    assert_eq!(sample.gt_point["dog"], [[30.0, 30.0], [80.0, 80.0]]);
    assert_eq!(sample.num_objects(), 2);

    assert_eq!(sample.image.shape(), &[4, 6, 3]);
    assert_eq!(sample.image_hw(), (4, 6));
    assert_eq!(sample.trans_img, sample.image);
    Ok(())
}

#[test]
fn every_sample_has_aligned_points() -> Result<()> {
    let tempdir = voc_fixture();
    let dataset = open(tempdir.path(), "all", "trainval", identity())?;

    for index in 0..dataset.len() {
        let sample = dataset.get(index)?;
        let image_id = &dataset.image_ids()[index];
        let (_, objects) = ANNOTATIONS
            .iter()
            .find(|(id, _)| id == image_id)
            .unwrap();

        assert!(sample.gt_box.keys().eq(sample.gt_point.keys()));
        assert_eq!(sample.num_objects(), objects.len());

        for (name, boxes) in &sample.gt_box {
            let points = &sample.gt_point[name];
            assert_eq!(boxes.len(), points.len());

            let expected: Vec<_> = objects
                .iter()
                .filter(|(class, _)| class == name)
                .map(|(_, bbox)| *bbox)
                .collect();
            assert_eq!(boxes, &expected);

            for ([xmin, ymin, xmax, ymax], [cx, cy]) in boxes.iter().zip(points) {
                assert_abs_diff_eq!(*cx, (*xmin + *xmax) as f64 / 2.0);
                assert_abs_diff_eq!(*cy, (*ymin + *ymax) as f64 / 2.0);
            }
        }
    }
    Ok(())
}

#[test]
fn class_order_follows_document() -> Result<()> {
    let tempdir = voc_fixture();
    let dataset = open(tempdir.path(), "cat", "trainval", identity())?;
    let sample = dataset.get(0)?;

    assert_eq!(sample.gt_box.keys().collect::<Vec<_>>(), ["cat", "dog"]);
    assert_eq!(sample.gt_box["cat"], [[5, 5, 9, 9], [11, 13, 20, 21]]);
    assert_eq!(sample.gt_point["cat"], [[7.0, 7.0], [15.5, 17.0]]);
    Ok(())
}

#[test]
fn grayscale_image_has_three_channels() -> Result<()> {
    let tempdir = voc_fixture();
    let dataset = open(tempdir.path(), "all", "trainval", identity())?;
    let image = dataset.image(2)?;

    assert_eq!(image.shape(), &[3, 5, 3]);
    Ok(())
}

#[test]
fn index_at_len_is_out_of_range() -> Result<()> {
    let tempdir = voc_fixture();
    let dataset = open(tempdir.path(), "dog", "trainval", identity())?;

    let err = dataset.get(dataset.len()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DatasetError>(),
        Some(DatasetError::IndexOutOfRange { index: 2, len: 2 })
    ));
    assert!(dataset.annotation(usize::MAX).is_err());
    assert!(dataset.nth(7).is_err());
    Ok(())
}

#[test]
fn missing_transform_fails_on_access() -> Result<()> {
    let tempdir = voc_fixture();
    let dataset: VocDataset<Array3<u8>> = open(tempdir.path(), "dog", "trainval", None)?;
    assert_eq!(dataset.len(), 2);

    let err = dataset.get(0).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DatasetError>(),
        Some(DatasetError::MissingTransform)
    ));

    // the annotation alone does not need a transform
    assert_eq!(dataset.annotation(0)?.num_objects(), 2);
    Ok(())
}

#[test]
fn missing_split_file_fails() {
    let tempdir = voc_fixture();
    let err = open(tempdir.path(), "horse", "trainval", identity()).unwrap_err();
    let io_err = err.downcast_ref::<std::io::Error>().unwrap();
    assert_eq!(io_err.kind(), std::io::ErrorKind::NotFound);

    assert!(open(tempdir.path(), "all", "test", identity()).is_err());
    assert!(VocDataset::open(tempdir.path(), "2012", ClassSelector::All, "trainval", identity())
        .is_err());
}

#[test]
fn malformed_class_split_fails() {
    let tempdir = voc_fixture();
    let err = open(tempdir.path(), "bird", "trainval", identity()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DatasetError>(),
        Some(DatasetError::MalformedSplitLine { line_no: 2, .. })
    ));
}

#[test]
fn missing_files_fail_only_their_index() -> Result<()> {
    let tempdir = voc_fixture();
    let dataset = open(tempdir.path(), "all", "broken", identity())?;
    assert_eq!(dataset.len(), 3);

    assert!(dataset.get(1).is_err());
    assert!(dataset.image(1).is_err());
    assert!(dataset.annotation(1).is_err());

    assert_eq!(dataset.get(0)?.num_objects(), 2);
    assert_eq!(dataset.get(2)?.num_objects(), 2);
    assert_eq!(dataset.len(), 3);
    Ok(())
}

#[test]
fn malformed_annotation_fails() -> Result<()> {
    let tempdir = voc_fixture();
    let annotation_file = tempdir
        .path()
        .join("VOCdevkit/VOC2007/Annotations/000005.xml");
    fs::write(
        &annotation_file,
        "<annotation><object><name>cat</name></object></annotation>",
    )?;

    let dataset = open(tempdir.path(), "dog", "trainval", identity())?;
    let err = dataset.get(1).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DatasetError>(),
        Some(DatasetError::MissingField { field, .. }) if field == "bndbox"
    ));
    assert!(dataset.get(0).is_ok());

    fs::write(&annotation_file, "<annotation><object>")?;
    assert!(Annotation::open(&annotation_file).is_err());
    Ok(())
}

#[test]
fn custom_transform_output() -> Result<()> {
    let tempdir = voc_fixture();
    let dataset: VocDataset<Array3<f32>> = open(
        tempdir.path(),
        "dog",
        "trainval",
        Some(Box::new(transform::to_tensor)),
    )?;

    let sample = dataset.nth(1)?;
    assert_eq!(sample.trans_img.shape(), &[3, 8, 8]);
    assert!(sample
        .trans_img
        .iter()
        .all(|&value| (0.0..=1.0).contains(&value)));

    let counted: VocDataset<usize> = open(
        tempdir.path(),
        "dog",
        "trainval",
        Some(Box::new(|image: &Array3<u8>| {
            Ok::<_, anyhow::Error>(image.len())
        })),
    )?;
    assert_eq!(counted.get(0)?.trans_img, 4 * 6 * 3);
    assert_eq!(counted.num_records(), 2);
    Ok(())
}

#[test]
fn dataset_from_config_file() -> Result<()> {
    let tempdir = voc_fixture();
    let config_file = tempdir.path().join("dataset.json5");
    fs::write(
        &config_file,
        format!(
            "{{\n  // dogs only\n  dataset_dir: {:?},\n  year: \"2007\",\n  class: \"dog\",\n  split: \"trainval\",\n}}\n",
            tempdir.path().display().to_string()
        ),
    )?;

    let config = DatasetConfig::open(&config_file)?;
    let dataset = VocDataset::from_config(&config, identity())?;
    assert_eq!(dataset.image_ids(), ["000001", "000005"]);
    assert_eq!(dataset.split(), "trainval");
    assert_eq!(dataset.layout().year(), "2007");
    Ok(())
}
