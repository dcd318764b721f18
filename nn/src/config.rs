/// Task head selection for the output projection.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ProblemType {
    Classification,
    #[default]
    Regression,
}

/// Build-time hyperparameters. Immutable for the duration of one build;
/// all structural switches are explicit booleans.
#[derive(Clone, Debug)]
pub struct Config {
    /// input height, divisible by `2^model_depth`
    pub length: usize,
    /// input width, divisible by `2^model_depth`
    pub width: usize,
    /// encoder/decoder level count
    pub model_depth: usize,
    /// base channel count; level `i` works at `model_width * 2^(i-1)`
    pub model_width: usize,
    pub kernel_size: usize,
    /// input channel count
    pub num_channel: usize,
    pub problem_type: ProblemType,
    /// output classes (classification) or features (regression)
    pub output_nums: usize,
    /// emit an auxiliary 1-channel output per decoder level
    pub deep_supervision: bool,
    /// insert the latent compress/decompress bottleneck
    pub autoencoder: bool,
    /// gate skip connections with a learned spatial mask
    pub attention_gate: bool,
    /// merge skip and decoder tensors with a backward ConvLSTM
    pub recurrent_merge: bool,
    /// dense bottleneck runs `dense_loop - 1` repeats
    pub dense_loop: usize,
    /// squeeze-excite reduction factor
    pub se_ratio: usize,
    /// latent dimension, autoencoder mode only
    pub feature_number: usize,
    /// learned (conv-transpose) vs. nearest-neighbor decoder upsampling
    pub transposed_conv: bool,
}

impl Config {
    /// Required dimensions up front, everything else at its default.
    pub fn new(
        length: usize,
        width: usize,
        model_depth: usize,
        model_width: usize,
        kernel_size: usize,
        num_channel: usize,
    ) -> Self {
        Self {
            length,
            width,
            model_depth,
            model_width,
            kernel_size,
            num_channel,
            problem_type: ProblemType::default(),
            output_nums: 1,
            deep_supervision: false,
            autoencoder: false,
            attention_gate: false,
            recurrent_merge: false,
            dense_loop: 1,
            se_ratio: 16,
            feature_number: 1024,
            transposed_conv: true,
        }
    }

    /// Rejects structurally invalid configurations before any graph node
    /// exists.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("length", self.length),
            ("width", self.width),
            ("model_depth", self.model_depth),
            ("model_width", self.model_width),
            ("kernel_size", self.kernel_size),
            ("num_channel", self.num_channel),
            ("output_nums", self.output_nums),
            ("se_ratio", self.se_ratio),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroDimension(name));
            }
        }
        if self.autoencoder && self.feature_number == 0 {
            return Err(ConfigError::ZeroDimension("feature_number"));
        }

        // 2^model_depth must fit in usize and divide both spatial dims
        let poolable = u32::try_from(self.model_depth)
            .ok()
            .and_then(|depth| 1usize.checked_shl(depth))
            .is_some_and(|pools| self.length % pools == 0 && self.width % pools == 0);
        if !poolable {
            return Err(ConfigError::NotPoolable {
                length: self.length,
                width: self.width,
                model_depth: self.model_depth,
            });
        }

        // squeeze-excite runs at every decoder level width, and at the
        // bottleneck width when upsampling is non-learned
        let mut widths = (1..=self.model_depth)
            .map(|level| (level, self.model_width << (level - 1)))
            .collect::<Vec<_>>();
        if !self.transposed_conv {
            widths.push((self.model_depth, self.model_width << self.model_depth));
        }
        for (level, channels) in widths {
            if channels % self.se_ratio != 0 {
                return Err(ConfigError::SeRatioIndivisible {
                    level,
                    channels,
                    ratio: self.se_ratio,
                });
            }
        }

        // the level-1 ConvLSTM filter count truncates to zero otherwise
        if self.recurrent_merge && self.model_width < 2 {
            return Err(ConfigError::LstmWidth(self.model_width));
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("`{0}` must be nonzero")]
    ZeroDimension(&'static str),
    #[error("input dims {length}x{width} are not divisible by 2^{model_depth}")]
    NotPoolable {
        length: usize,
        width: usize,
        model_depth: usize,
    },
    #[error("se_ratio {ratio} does not divide the {channels} channels at level {level}")]
    SeRatioIndivisible {
        level: usize,
        channels: usize,
        ratio: usize,
    },
    #[error("recurrent merge needs model_width >= 2, got {0}")]
    LstmWidth(usize),
}
