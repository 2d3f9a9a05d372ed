pub mod uniform_sampler;

pub use uniform_sampler::{uniform, UniformSampler, DEFAULT_MAX_ATTEMPTS};
