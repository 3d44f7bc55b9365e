use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::classifier::{DecisionForest, ForestDocument, ForestError};
use super::context::EligibilityContext;
use super::decoder::LabelTable;
use super::domain::{CategoricalField, Category};
use super::encoding::{
    CategoryEncodingTable, CategoryTables, EncodingError, ScalingParameters,
};

pub const CLASSIFIER_FILE: &str = "random_forest_model.json";
pub const ENCODERS_FILE: &str = "label_encoders.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const STATUS_ENCODER_FILE: &str = "status_encoder.json";

/// The four startup resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Classifier,
    CategoryEncoders,
    Scaler,
    StatusEncoder,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ArtifactKind::Classifier => "classifier",
            ArtifactKind::CategoryEncoders => "category encoder",
            ArtifactKind::Scaler => "scaler",
            ArtifactKind::StatusEncoder => "status encoder",
        };
        f.write_str(label)
    }
}

/// Locations of the four artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub classifier: PathBuf,
    pub encoders: PathBuf,
    pub scaler: PathBuf,
    pub status_encoder: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside one model directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            classifier: dir.join(CLASSIFIER_FILE),
            encoders: dir.join(ENCODERS_FILE),
            scaler: dir.join(SCALER_FILE),
            status_encoder: dir.join(STATUS_ENCODER_FILE),
        }
    }
}

/// Artifact content that parsed but disagrees with the model contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error(transparent)]
    Parameter(#[from] EncodingError),
    #[error("{column} lists class '{class}' more than once")]
    DuplicateClass { column: &'static str, class: String },
    #[error("unexpected column '{column}'")]
    UnexpectedColumn { column: String },
    #[error("column lists disagree: {columns} columns, {means} means, {scales} scales")]
    LengthMismatch {
        columns: usize,
        means: usize,
        scales: usize,
    },
    #[error("non-finite scaling parameter for column {column}")]
    NonFinite { column: &'static str },
    #[error("negative scale for column {column}")]
    NegativeScale { column: &'static str },
    #[error("status classes must be exactly \"N\" and \"Y\" (found {found:?})")]
    LabelClasses { found: Vec<String> },
    #[error(transparent)]
    Forest(#[from] ForestError),
    #[error("classifier declares {found} classes; the status encoder has 2")]
    ClassCount { found: usize },
    #[error("classifier class code {code} has no status label")]
    ClassMismatch { code: i64 },
}

/// Startup failure; the service cannot run without every artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactLoadError {
    #[error("failed to read {resource} artifact at {}", .path.display())]
    Io {
        resource: ArtifactKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{resource} artifact at {} is not valid JSON", .path.display())]
    Malformed {
        resource: ArtifactKind,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{resource} artifact at {} is incompatible: {reason}", .path.display())]
    Schema {
        resource: ArtifactKind,
        path: PathBuf,
        #[source]
        reason: SchemaError,
    },
}

impl ArtifactLoadError {
    pub fn resource(&self) -> ArtifactKind {
        match self {
            ArtifactLoadError::Io { resource, .. }
            | ArtifactLoadError::Malformed { resource, .. }
            | ArtifactLoadError::Schema { resource, .. } => *resource,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderDocument {
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerDocument {
    pub columns: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Load all four artifacts; any failure aborts the whole load.
pub fn load_artifacts(paths: &ArtifactPaths) -> Result<EligibilityContext, ArtifactLoadError> {
    let tables = load_category_tables(&paths.encoders)?;
    let scaling = load_scaling_parameters(&paths.scaler)?;
    let labels = load_label_table(&paths.status_encoder)?;
    let forest = load_forest(&paths.classifier)?;
    check_forest_classes(&forest, &labels)
        .map_err(|reason| schema(ArtifactKind::Classifier, &paths.classifier, reason))?;

    Ok(EligibilityContext::new(tables, scaling, labels, forest))
}

/// Every class the forest can answer must decode to a verdict.
fn check_forest_classes(forest: &DecisionForest, labels: &LabelTable) -> Result<(), SchemaError> {
    let classes = forest.classes();
    if classes.len() != 2 {
        return Err(SchemaError::ClassCount {
            found: classes.len(),
        });
    }
    match classes.iter().find(|code| labels.decode(**code).is_err()) {
        Some(code) => Err(SchemaError::ClassMismatch { code: *code }),
        None => Ok(()),
    }
}

pub fn load_category_tables(path: &Path) -> Result<CategoryTables, ArtifactLoadError> {
    let resource = ArtifactKind::CategoryEncoders;
    let documents: BTreeMap<String, EncoderDocument> = read_document(resource, path)?;
    let tables = category_tables(&documents).map_err(|reason| schema(resource, path, reason))?;
    info!(%resource, path = %path.display(), "loaded artifact");
    Ok(tables)
}

pub fn load_scaling_parameters(path: &Path) -> Result<ScalingParameters, ArtifactLoadError> {
    let resource = ArtifactKind::Scaler;
    let document: ScalerDocument = read_document(resource, path)?;
    let scaling =
        ScalingParameters::from_columns(&document.columns, &document.mean, &document.scale)
            .map_err(|reason| schema(resource, path, reason))?;
    info!(%resource, path = %path.display(), "loaded artifact");
    Ok(scaling)
}

pub fn load_label_table(path: &Path) -> Result<LabelTable, ArtifactLoadError> {
    let resource = ArtifactKind::StatusEncoder;
    let document: EncoderDocument = read_document(resource, path)?;
    let labels = LabelTable::from_classes(&document.classes)
        .map_err(|reason| schema(resource, path, reason))?;
    info!(%resource, path = %path.display(), "loaded artifact");
    Ok(labels)
}

pub fn load_forest(path: &Path) -> Result<DecisionForest, ArtifactLoadError> {
    let resource = ArtifactKind::Classifier;
    let document: ForestDocument = read_document(resource, path)?;
    let forest = DecisionForest::try_from(document)
        .map_err(|reason| schema(resource, path, SchemaError::from(reason)))?;
    info!(
        %resource,
        path = %path.display(),
        trees = forest.tree_count(),
        "loaded artifact"
    );
    Ok(forest)
}

fn category_tables(
    documents: &BTreeMap<String, EncoderDocument>,
) -> Result<CategoryTables, SchemaError> {
    for column in documents.keys() {
        let known = CategoricalField::ALL
            .iter()
            .any(|field| field.column_name() == column);
        if !known {
            warn!(column = %column, "encoder for a column the model does not use; ignoring");
        }
    }

    Ok(CategoryTables {
        gender: table(documents)?,
        married: table(documents)?,
        dependents: table(documents)?,
        education: table(documents)?,
        self_employed: table(documents)?,
        property_area: table(documents)?,
    })
}

fn table<C: Category>(
    documents: &BTreeMap<String, EncoderDocument>,
) -> Result<CategoryEncodingTable<C>, SchemaError> {
    let column = C::FIELD.column_name();
    let document = documents
        .get(column)
        .ok_or(EncodingError::MissingParameter { column })?;
    CategoryEncodingTable::from_classes(&document.classes)
}

fn read_document<T: DeserializeOwned>(
    resource: ArtifactKind,
    path: &Path,
) -> Result<T, ArtifactLoadError> {
    let file = File::open(path).map_err(|source| ArtifactLoadError::Io {
        resource,
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactLoadError::Malformed {
        resource,
        path: path.to_path_buf(),
        source,
    })
}

fn schema(resource: ArtifactKind, path: &Path, reason: SchemaError) -> ArtifactLoadError {
    ArtifactLoadError::Schema {
        resource,
        path: path.to_path_buf(),
        reason,
    }
}
