/// Round lifecycle and hole navigation.
pub mod round;
/// Stroke insertion and ordinal repacking.
pub mod sequence;
/// Mental-focus percentages, trends and callouts.
pub mod stats;
/// Stroke types and par patterns.
pub mod stroke;
