pub mod accidentals;
pub mod beat_counter;
pub mod duration;
pub mod key_signature;
pub mod measure_counter;
pub mod score_reader;
