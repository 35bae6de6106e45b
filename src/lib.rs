pub mod catalog;
pub mod midi;
pub mod note;
pub mod output;
pub mod scale;
pub mod synth;
pub mod tuning;
pub mod wave;

// Utility modules
pub mod rational;
pub mod util;
