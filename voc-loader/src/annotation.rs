//! Annotation documents under `Annotations/<id>.xml`.

use crate::{common::*, error::DatasetError};
use bbox::XYXY;
use roxmltree::{Document, Node};

/// Boxes grouped by class name, classes in order of first appearance.
pub type BoxMap = IndexMap<String, Vec<[i64; 4]>>;

/// Box centroids grouped like [BoxMap], index-aligned with it.
pub type PointMap = IndexMap<String, Vec<[f64; 2]>>;

const CORNER_FIELDS: [&str; 4] = ["xmin", "ymin", "xmax", "ymax"];

/// A labeled object in an annotation document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectLabel {
    pub name: String,
    pub bbox: XYXY<i64>,
}

/// The objects of one image in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Annotation {
    pub objects: Vec<ObjectLabel>,
}

impl Annotation {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read annotation file '{}'", path.display()))?;
        Self::parse(&text)
            .with_context(|| format!("failed to parse annotation file '{}'", path.display()))
    }

    /// Collect every `object` element, at any depth, in document order.
    pub fn parse(text: &str) -> Result<Self> {
        let doc = Document::parse(text)?;
        let objects: Vec<_> = doc
            .descendants()
            .filter(|node| node.has_tag_name("object"))
            .map(parse_object)
            .try_collect()?;
        Ok(Self { objects })
    }

    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    pub fn gt_box(&self) -> BoxMap {
        let mut gt_box = BoxMap::new();
        self.objects.iter().for_each(|object| {
            gt_box
                .entry(object.name.clone())
                .or_insert_with(Vec::new)
                .push(object.bbox.xyxy());
        });
        gt_box
    }

    /// Centroids derived from [Annotation::gt_box].
    pub fn gt_point(&self) -> PointMap {
        points_of(&self.gt_box())
    }

    /// Both groupings at once.
    pub fn boxes_and_points(&self) -> (BoxMap, PointMap) {
        let gt_box = self.gt_box();
        let gt_point = points_of(&gt_box);
        (gt_box, gt_point)
    }
}

/// Map every box to the midpoint of its corners, keeping keys and order.
pub fn points_of(gt_box: &BoxMap) -> PointMap {
    gt_box
        .iter()
        .map(|(name, boxes)| {
            let points = boxes
                .iter()
                .map(|&xyxy| XYXY::from_xyxy(xyxy).centroid().xy())
                .collect();
            (name.clone(), points)
        })
        .collect()
}

fn parse_object(object: Node) -> Result<ObjectLabel> {
    let name = child(object, "name")?.text().unwrap_or_default().to_owned();
    let bndbox = child(object, "bndbox")?;

    let mut corners = [0i64; 4];
    for (corner, field) in corners.iter_mut().zip(CORNER_FIELDS) {
        *corner = parse_coordinate(bndbox, field)?;
    }

    Ok(ObjectLabel {
        name,
        bbox: XYXY::from_xyxy(corners),
    })
}

/// The first direct child with the tag.
fn child<'a, 'input>(parent: Node<'a, 'input>, field: &str) -> Result<Node<'a, 'input>> {
    parent
        .children()
        .find(|node| node.has_tag_name(field))
        .ok_or_else(|| {
            DatasetError::MissingField {
                parent: parent.tag_name().name().to_owned(),
                field: field.to_owned(),
            }
            .into()
        })
}

fn parse_coordinate(bndbox: Node, field: &str) -> Result<i64> {
    let text = child(bndbox, field)?
        .text()
        .ok_or_else(|| DatasetError::EmptyField {
            parent: bndbox.tag_name().name().to_owned(),
            field: field.to_owned(),
        })?;
    let value = text
        .trim()
        .parse::<i64>()
        .map_err(|_| DatasetError::InvalidCoordinate {
            field: field.to_owned(),
            text: text.to_owned(),
        })?;
    Ok(value)
}
