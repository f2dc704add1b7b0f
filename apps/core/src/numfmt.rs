//! Number formatting helpers shared by the dispatcher, the weather report,
//! and the algebra solver.

/// Formats a float with at least one decimal digit (`32` renders as `32.0`,
/// `32.25` stays `32.25`). Used everywhere a measurement or evaluation result
/// is shown to the user.
pub(crate) fn display_float(v: f64) -> String {
    let s = format!("{}", v);
    if s.contains('.') || s.contains('e') || s.contains("inf") || s.contains("NaN") {
        s
    } else {
        format!("{}.0", s)
    }
}

/// Compact form for solution sets: integral values render without a decimal
/// point (`5`, not `5.0`). Values within 1e-9 of an integer are snapped first
/// so elimination round-off does not leak into the output.
pub(crate) fn display_number(v: f64) -> String {
    let snapped = if (v - v.round()).abs() < 1e-9 { v.round() } else { v };
    if snapped.fract() == 0.0 && snapped.abs() < 1e15 {
        format!("{}", snapped as i64)
    } else {
        format!("{}", snapped)
    }
}
