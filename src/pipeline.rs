//! # Image Pipeline
//!
//! Turns a decoded image into a print job, stage by stage:
//!
//! ```text
//! ┌───────────┐   ┌──────┐   ┌────────┐   ┌──────────┐   ┌────────┐
//! │ normalize │ → │ trim │ → │ offset │ → │ quantize │ → │ encode │
//! └───────────┘   └──────┘   └────────┘   └──────────┘   └────────┘
//!  fit width       margins    feed fix     bilevel        ESC/POS
//! ```
//!
//! Every stage is a pure function over an owned [`Raster`]. The pipeline
//! only holds configuration, so one instance can process any number of
//! images, from any number of threads.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, TopstartError};
use crate::ir::CommandStream;
use crate::printer::PrinterConfig;
use crate::raster::Raster;
use crate::render::bounds::BoundsOptions;
use crate::render::calibration::{self, Params};
use crate::render::dither::{self, QuantizeMethod};
use crate::render::normalize::normalize;
use crate::render::offset::shift_rows;
use crate::render::trim::TrimMode;

/// Everything the pipeline needs to know, in one serializable bundle.
///
/// Missing fields take their defaults when deserialized, so a config file
/// only has to name what it changes:
///
/// ```json
/// { "offset_mm": -1.5, "method": "dither" }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Target device
    pub printer: PrinterConfig,

    /// Which blank margins to remove
    pub trim: TrimMode,

    /// Content detection parameters
    pub bounds: BoundsOptions,

    /// Vertical feed correction in millimeters
    pub offset_mm: f32,

    /// Monochrome conversion
    pub method: QuantizeMethod,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        self.printer.validate()?;

        let ratio = self.bounds.min_dark_ratio;
        if !(ratio.is_finite() && (0.0..=1.0).contains(&ratio)) {
            return Err(TopstartError::Config(format!(
                "min_dark_ratio must be within 0..=1, got {}",
                ratio
            )));
        }
        if !self.offset_mm.is_finite() {
            return Err(TopstartError::Config(format!(
                "offset_mm must be finite, got {}",
                self.offset_mm
            )));
        }
        Ok(())
    }
}

/// A configured image-to-job pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline after validating `config`.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage up to quantization and return the bilevel raster.
    ///
    /// ## Errors
    ///
    /// - [`TopstartError::InvalidImage`] for a zero-sized input
    /// - [`TopstartError::ImageTooTall`] if the result would not fit the roll
    ///
    /// ## Example
    ///
    /// ```
    /// use topstart::pipeline::{Pipeline, PipelineConfig};
    /// use topstart::raster::{ColorMode, Raster};
    ///
    /// let pipeline = Pipeline::new(PipelineConfig::default())?;
    /// let photo = Raster::blank(768, 200, ColorMode::Rgb)?;
    /// let out = pipeline.process(&photo)?;
    /// assert_eq!((out.width(), out.mode()), (384, ColorMode::Bilevel));
    /// # Ok::<(), topstart::error::TopstartError>(())
    /// ```
    pub fn process(&self, image: &Raster) -> Result<Raster> {
        let config = &self.config;
        let printer = &config.printer;

        let normalized = normalize(image, printer.width_dots)?;
        let trimmed = config.trim.apply(&normalized, config.bounds);

        let offset_px = printer.mm_to_dots(config.offset_mm);
        let shifted = shift_rows(&trimmed, offset_px, printer.max_height_dots())?;

        let bilevel = dither::to_bilevel(&shifted, config.method);

        info!(
            source_width = image.width(),
            source_height = image.height(),
            normalized_height = normalized.height(),
            trimmed_height = trimmed.height(),
            offset_px,
            height = bilevel.height(),
            length_mm = printer.dots_to_mm(bilevel.height()),
            method = %config.method,
            "Processed image"
        );
        Ok(bilevel)
    }

    /// Process `image` and encode it as a single-copy print job.
    pub fn prepare_job(&self, image: &Raster) -> Result<CommandStream> {
        let bilevel = self.process(image)?;
        let stream = CommandStream::encode(&bilevel, &self.config.printer)?;
        debug!(ops = stream.len(), "Prepared print job");
        Ok(stream)
    }

    /// Encode the printer's test page with the configured offset and method.
    ///
    /// The page starts with a full-width rule, so trimming leaves it alone
    /// and any blank paper above the rule comes from the printer.
    pub fn prepare_test_page(&self) -> Result<CommandStream> {
        let printer = &self.config.printer;
        let params = Params::default();
        let page = calibration::test_page(printer.width_dots, printer.density(), &params)?;
        self.prepare_job(&page)
    }
}

// ============================================================================
// TESTS
// ============================================================================
