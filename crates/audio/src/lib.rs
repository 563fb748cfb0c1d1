pub mod backend;
pub mod output;
pub mod synth;

pub use backend::{MemorySink, NullSink, ToneSink};
pub use output::CpalSink;
pub use synth::{Tone, ToneEnvelope};
