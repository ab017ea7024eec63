//! The gesture label set.
//!
//! The model emits one score per entry in [`LABELS`], in this order:
//! the letters A through Z, then `"blank"` for no recognized gesture.

/// Labels aligned with the model's output vector.
pub const LABELS: [&str; 27] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z", "blank",
];

/// Number of gesture classes the model distinguishes.
pub const LABEL_COUNT: usize = LABELS.len();

/// Look up a label by model output index.
pub fn label(index: usize) -> Option<&'static str> {
    LABELS.get(index).copied()
}
