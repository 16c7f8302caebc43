//! Batch Runner
//!
//! Generates a whole dataset: `training/`, `validation/` and `test/`
//! directories of labeled images plus one `classes.json`.
//!
//! # Phases
//!
//! 1. Load the full scene and a background-only scene once, then freeze both
//!    in an `Arc`.
//! 2. Fan out one blocking job per image, bounded by a semaphore. Each job
//!    lays out, renders and resolves its image with its own seeded
//!    [`SceneRng`] and writes the image files.
//! 3. Collect results in job order, build the [`ClassTable`] and write the
//!    normalized label files and `classes.json`.
//!
//! A failed image is logged and counted; its siblings are unaffected unless
//! `fail_fast` is set.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Semaphore;

use crate::annotation::{Annotation, ClassPolicy, ClassTable, OcclusionResolver};
use crate::assets::ResourceProvider;
use crate::component::Component;
use crate::config::ConfigError;
use crate::context::ContextError;
use crate::export::{
    normalized_labels, write_normalized_image, write_raw, ExportError, ExportMode, CLASSES_FILE,
    DEFAULT_OUTPUT_SIZE,
};
use crate::geometry::Size;
use crate::pipeline::generate_image;
use crate::random::SceneRng;
use crate::scene::{Screen, UiFamily};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can abort a batch or fail a single image
#[derive(Debug, Error)]
pub enum BatchError {
    /// Layout failed for one image
    #[error("Layout failed for {image}: {source}")]
    Layout {
        /// Image name, e.g. `training/image_3`
        image: String,
        /// Underlying context error
        source: ContextError,
    },

    /// Writing output failed
    #[error(transparent)]
    Export(#[from] ExportError),

    /// A generation task panicked or was cancelled
    #[error("Generation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The job semaphore was closed
    #[error("Job semaphore closed: {0}")]
    Semaphore(#[from] tokio::sync::AcquireError),

    /// The job was skipped because an earlier image failed in fail-fast mode
    #[error("Skipped {0} after an earlier failure")]
    Cancelled(String),
}

// ============================================================================
// Run Plan
// ============================================================================

/// Preset dataset shapes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// A handful of raw images for inspection
    #[default]
    Test,
    /// Full normalized dataset
    Prod,
}

impl RunMode {
    /// Parse `test` or `prod`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for any other value.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "test" => Ok(Self::Test),
            "prod" | "production" => Ok(Self::Prod),
            other => Err(ConfigError::Invalid {
                key: "run_mode",
                value: other.to_string(),
            }),
        }
    }

    /// Stable lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Prod => "prod",
        }
    }

    /// Image counts of this preset
    #[must_use]
    pub fn plan(self) -> BatchPlan {
        match self {
            Self::Test => BatchPlan {
                training: 10,
                validation: 0,
                test: 0,
                background_ratio: 0.1,
            },
            Self::Prod => BatchPlan {
                training: 4000,
                validation: 500,
                test: 10,
                background_ratio: 0.1,
            },
        }
    }

    /// Export mode of this preset
    #[must_use]
    pub fn export_mode(self) -> ExportMode {
        match self {
            Self::Test => ExportMode::Raw,
            Self::Prod => ExportMode::Normalized,
        }
    }
}

/// Output split an image belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Split {
    /// `training/`
    Training,
    /// `validation/`
    Validation,
    /// `test/`
    Test,
}

impl Split {
    /// All splits, in job order
    pub const ALL: [Split; 3] = [Split::Training, Split::Validation, Split::Test];

    /// Directory name under the output root
    #[must_use]
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::Validation => "validation",
            Self::Test => "test",
        }
    }
}

/// How many images of each kind a batch produces
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BatchPlan {
    /// Training images
    pub training: usize,
    /// Validation images
    pub validation: usize,
    /// Test images (never background-only)
    pub test: usize,
    /// Share of training and validation images with no UI at all
    pub background_ratio: f64,
}

impl Default for BatchPlan {
    fn default() -> Self {
        RunMode::default().plan()
    }
}

/// One image to generate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Job {
    /// Position in the whole batch; selects the image's random stream
    pub index: u64,
    /// Output split
    pub split: Split,
    /// Position within the split; used in the file name
    pub number: usize,
    /// Render the background-only scene
    pub background_only: bool,
}

impl Job {
    /// File stem, e.g. `image_3`
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!("image_{}", self.number)
    }

    /// Display name, e.g. `training/image_3`
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}/{}", self.split.dir_name(), self.file_stem())
    }
}

impl BatchPlan {
    /// Total number of images
    #[must_use]
    pub fn total(&self) -> usize {
        self.training + self.validation + self.test
    }

    /// Every job of the batch, in output order
    ///
    /// Within training and validation the first `ceil(count * ratio)` images
    /// are background-only.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn jobs(&self) -> Vec<Job> {
        let mut jobs = Vec::with_capacity(self.total());
        for split in Split::ALL {
            let (count, ratio) = match split {
                Split::Training => (self.training, self.background_ratio),
                Split::Validation => (self.validation, self.background_ratio),
                Split::Test => (self.test, 0.0),
            };
            let background_limit = count as f64 * ratio;
            for number in 0..count {
                jobs.push(Job {
                    index: jobs.len() as u64,
                    split,
                    number,
                    background_only: (number as f64) < background_limit,
                });
            }
        }
        jobs
    }
}

// ============================================================================
// Settings and Report
// ============================================================================

/// Everything a [`BatchRunner`] needs besides the scenes
#[derive(Clone, Debug)]
pub struct BatchSettings {
    /// Image counts
    pub plan: BatchPlan,
    /// UI family to synthesize
    pub family: UiFamily,
    /// Batch seed; image `i` uses `SceneRng::for_image(seed, i)`
    pub seed: u64,
    /// Maximum images generated at once
    pub concurrency: usize,
    /// Abort on the first failed image
    pub fail_fast: bool,
    /// Output encoding
    pub mode: ExportMode,
    /// Side of normalized output images
    pub output_size: u32,
    /// How the class table is built
    pub class_policy: ClassPolicy,
    /// Root output directory
    pub output_dir: PathBuf,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            plan: BatchPlan::default(),
            family: UiFamily::default(),
            seed: 42,
            concurrency: default_concurrency(),
            fail_fast: false,
            mode: ExportMode::default(),
            output_size: DEFAULT_OUTPUT_SIZE,
            class_policy: ClassPolicy::default(),
            output_dir: PathBuf::from("output"),
        }
    }
}

/// Number of worker threads available, at least one
#[must_use]
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism().map_or(4, std::num::NonZeroUsize::get)
}

/// Summary of a finished batch
#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    /// Images fully written
    pub generated: usize,
    /// Background-only images among them
    pub background: usize,
    /// Images that failed, by name
    pub failed: Vec<String>,
    /// Surviving annotations across all written images
    pub labels: usize,
    /// Class table written to `classes.json`
    pub classes: ClassTable,
}

impl BatchReport {
    /// True when no image failed
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of one finished job
#[derive(Debug)]
struct JobOutput {
    job: Job,
    canvas: Size,
    annotations: Vec<Annotation>,
}

// ============================================================================
// Runner
// ============================================================================

/// Generates a dataset from two loaded scenes
pub struct BatchRunner {
    settings: BatchSettings,
    scene: Arc<Screen>,
    background: Arc<Screen>,
    resolver: OcclusionResolver,
}

impl std::fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRunner")
            .field("settings", &self.settings)
            .field("family", &self.scene.family())
            .finish_non_exhaustive()
    }
}

impl BatchRunner {
    /// Build the family's scenes and load their assets
    pub async fn load(settings: BatchSettings, provider: &dyn ResourceProvider) -> Self {
        let mut scene = Screen::new(settings.family);
        let mut background = Screen::background_only(settings.family);
        futures::join!(
            scene.load_resources(provider),
            background.load_resources(provider),
        );
        Self::from_scenes(settings, scene, background)
    }

    /// Runner over already loaded scenes
    #[must_use]
    pub fn from_scenes(settings: BatchSettings, scene: Screen, background: Screen) -> Self {
        Self {
            settings,
            scene: Arc::new(scene),
            background: Arc::new(background),
            resolver: OcclusionResolver::default(),
        }
    }

    /// Replace the occlusion resolver
    #[must_use]
    pub fn with_resolver(mut self, resolver: OcclusionResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Settings this runner was built with
    #[must_use]
    pub fn settings(&self) -> &BatchSettings {
        &self.settings
    }

    /// Generate every image of the plan and write `classes.json`
    ///
    /// # Errors
    ///
    /// Returns a [`BatchError`] when the output directories or
    /// `classes.json` cannot be written, or for the first failed image when
    /// `fail_fast` is set.
    pub async fn run(&self) -> Result<BatchReport, BatchError> {
        let settings = &self.settings;
        let jobs = settings.plan.jobs();
        tracing::info!(
            family = %settings.family,
            mode = settings.mode.as_str(),
            images = jobs.len(),
            concurrency = settings.concurrency,
            "Starting batch"
        );

        for split in Split::ALL {
            create_dir(&settings.output_dir.join(split.dir_name())).await?;
        }

        let semaphore = Arc::new(Semaphore::new(settings.concurrency.max(1)));
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut handles = Vec::with_capacity(jobs.len());
        for job in jobs {
            let permit = Arc::clone(&semaphore).acquire_owned().await?;
            let scene = if job.background_only {
                Arc::clone(&self.background)
            } else {
                Arc::clone(&self.scene)
            };
            let resolver = self.resolver;
            let cancelled = Arc::clone(&cancelled);
            let dir = settings.output_dir.join(job.split.dir_name());
            let (seed, mode, side, fail_fast) = (
                settings.seed,
                settings.mode,
                settings.output_size,
                settings.fail_fast,
            );
            let name = job.name();
            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                if cancelled.load(Ordering::Relaxed) {
                    return Err(BatchError::Cancelled(job.name()));
                }
                let result = run_job(job, scene.as_ref(), &resolver, &dir, seed, mode, side);
                if result.is_err() && fail_fast {
                    cancelled.store(true, Ordering::Relaxed);
                }
                result
            });
            handles.push((name, handle));
        }

        let total = handles.len();
        let mut report = BatchReport::default();
        let mut outputs = Vec::with_capacity(total);
        for (done, (name, handle)) in handles.into_iter().enumerate() {
            let result = handle.await.map_err(BatchError::from).and_then(|result| result);
            settle(name, result, settings.fail_fast, &mut report, &mut outputs)?;
            if (done + 1) % 100 == 0 {
                tracing::info!(done = done + 1, total, "Batch progress");
            }
        }

        report.classes = ClassTable::build(
            settings.class_policy,
            settings.family,
            outputs.iter().map(|output| output.annotations.as_slice()),
        );

        for output in outputs {
            let name = output.job.name();
            let written = match settings.mode {
                ExportMode::Raw => Ok(()),
                ExportMode::Normalized => {
                    write_labels(&settings.output_dir, &output, &report.classes).await
                }
            };
            match written {
                Ok(()) => {
                    report.generated += 1;
                    report.labels += output.annotations.len();
                    if output.job.background_only {
                        report.background += 1;
                    }
                }
                Err(err) if settings.fail_fast => return Err(err.into()),
                Err(err) => {
                    tracing::error!(image = %name, error = %err, "Writing labels failed");
                    report.failed.push(name);
                }
            }
        }

        let classes_path = settings.output_dir.join(CLASSES_FILE);
        let classes_json = report.classes.to_json().map_err(|source| ExportError::Json {
            path: classes_path.clone(),
            source,
        })?;
        tokio::fs::write(&classes_path, classes_json)
            .await
            .map_err(|source| ExportError::Io {
                path: classes_path.clone(),
                source,
            })?;

        tracing::info!(
            generated = report.generated,
            background = report.background,
            failed = report.failed.len(),
            labels = report.labels,
            classes = report.classes.len(),
            "Batch finished"
        );
        Ok(report)
    }
}

/// Fold one finished job into the report
///
/// Jobs skipped after a fail-fast cancel are ignored; the failure that
/// triggered the cancel is logged and returned, whatever its job order.
fn settle(
    name: String,
    result: Result<JobOutput, BatchError>,
    fail_fast: bool,
    report: &mut BatchReport,
    outputs: &mut Vec<JobOutput>,
) -> Result<(), BatchError> {
    match result {
        Ok(output) => outputs.push(output),
        Err(BatchError::Cancelled(_)) => {}
        Err(err) => {
            tracing::error!(image = %name, error = %err, "Image generation failed");
            if fail_fast {
                return Err(err);
            }
            report.failed.push(name);
        }
    }
    Ok(())
}

/// Lay out, render, resolve and write one image
fn run_job(
    job: Job,
    scene: &dyn Component,
    resolver: &OcclusionResolver,
    dir: &Path,
    seed: u64,
    mode: ExportMode,
    side: u32,
) -> Result<JobOutput, BatchError> {
    let mut rng = SceneRng::for_image(seed, job.index);
    let image = generate_image(scene, &mut rng, resolver).map_err(|source| BatchError::Layout {
        image: job.name(),
        source,
    })?;

    let stem = job.file_stem();
    match mode {
        ExportMode::Raw => write_raw(dir, &stem, &image.surface, &image.annotations)?,
        ExportMode::Normalized => write_normalized_image(dir, &stem, &image.surface, side)?,
    }

    Ok(JobOutput {
        job,
        canvas: image.canvas(),
        annotations: image.annotations,
    })
}

async fn write_labels(
    output_dir: &Path,
    output: &JobOutput,
    table: &ClassTable,
) -> Result<(), ExportError> {
    let contents = normalized_labels(&output.annotations, output.canvas, table)?;
    let path = output_dir
        .join(output.job.split.dir_name())
        .join(format!("{}.txt", output.job.file_stem()));
    tokio::fs::write(&path, contents)
        .await
        .map_err(|source| ExportError::Io { path, source })
}

async fn create_dir(path: &Path) -> Result<(), ExportError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_run_mode_presets() {
        let test = RunMode::Test.plan();
        assert_eq!((test.training, test.validation, test.test), (10, 0, 0));
        assert_eq!(RunMode::Test.export_mode(), ExportMode::Raw);

        let prod = RunMode::Prod.plan();
        assert_eq!((prod.training, prod.validation, prod.test), (4000, 500, 10));
        assert_eq!(RunMode::Prod.export_mode(), ExportMode::Normalized);
        assert!((prod.background_ratio - 0.1).abs() < f64::EPSILON);
    }

    fn missing_dock(image: &str) -> BatchError {
        BatchError::Layout {
            image: image.to_string(),
            source: ContextError::MissingSection {
                section: "dock",
                requested_by: "test",
            },
        }
    }

    #[test]
    fn test_settle_skips_cancelled_jobs_in_fail_fast() {
        let mut report = BatchReport::default();
        let mut outputs = Vec::new();

        // Job 1 was skipped because job 2 failed first on another thread
        let skipped = Err(BatchError::Cancelled("training/image_1".to_string()));
        settle("training/image_1".to_string(), skipped, true, &mut report, &mut outputs)
            .unwrap();

        let failed = Err(missing_dock("training/image_2"));
        let err = settle("training/image_2".to_string(), failed, true, &mut report, &mut outputs)
            .unwrap_err();

        assert!(matches!(err, BatchError::Layout { ref image, .. } if image == "training/image_2"));
        assert!(report.failed.is_empty());
    }

    #[test]
    fn test_settle_records_failures_without_fail_fast() {
        let mut report = BatchReport::default();
        let mut outputs = Vec::new();

        let failed = Err(missing_dock("validation/image_0"));
        settle("validation/image_0".to_string(), failed, false, &mut report, &mut outputs)
            .unwrap();

        assert_eq!(report.failed, vec!["validation/image_0".to_string()]);
        assert!(outputs.is_empty());
    }

    #[test]
    fn test_run_mode_parse() {
        assert_eq!(RunMode::parse("PROD").unwrap(), RunMode::Prod);
        assert!(matches!(
            RunMode::parse("staging"),
            Err(ConfigError::Invalid { key: "run_mode", .. })
        ));
    }

    #[test]
    fn test_jobs_put_backgrounds_first() {
        let plan = BatchPlan {
            training: 10,
            validation: 5,
            test: 2,
            background_ratio: 0.1,
        };
        let jobs = plan.jobs();

        assert_eq!(jobs.len(), 17);
        let backgrounds: Vec<String> = jobs
            .iter()
            .filter(|job| job.background_only)
            .map(Job::name)
            .collect();
        assert_eq!(backgrounds, vec!["training/image_0", "validation/image_0"]);
        assert_eq!(jobs[10].name(), "validation/image_0");
        assert_eq!(jobs[16].name(), "test/image_1");
        assert!(jobs.iter().enumerate().all(|(i, job)| job.index == i as u64));
    }

    #[test]
    fn test_zero_ratio_has_no_backgrounds() {
        let plan = BatchPlan {
            training: 3,
            validation: 3,
            test: 3,
            background_ratio: 0.0,
        };
        assert!(plan.jobs().iter().all(|job| !job.background_only));
    }
}
