//! Validation helpers for DTOs.

use validator::ValidationError;

/// Maximum number of holes a course or home club may declare.
pub const MAX_HOLES: usize = 36;

fn trimmed_length_between(
    value: &str,
    min: usize,
    max: usize,
    code: &'static str,
    message: &'static str,
) -> Result<(), ValidationError> {
    let length = value.trim().chars().count();
    if length < min || length > max {
        let mut err = ValidationError::new(code);
        err.message = Some(message.into());
        return Err(err);
    }
    Ok(())
}

/// Bag club labels are 1 to 40 characters once trimmed.
pub fn validate_club_label(label: &str) -> Result<(), ValidationError> {
    trimmed_length_between(
        label,
        1,
        40,
        "club_label_length",
        "Club name must be between 1 and 40 characters.",
    )
}

/// Mental element labels are 2 to 40 characters once trimmed.
pub fn validate_mental_label(label: &str) -> Result<(), ValidationError> {
    trimmed_length_between(
        label,
        2,
        40,
        "mental_label_length",
        "Label must be between 2 and 40 characters.",
    )
}

pub fn validate_required_name(name: &str) -> Result<(), ValidationError> {
    trimmed_length_between(name, 1, 80, "name_length", "Name must be between 1 and 80 characters.")
}

/// A layout has between one and [`MAX_HOLES`] holes.
pub fn validate_pars(pars: &[u8]) -> Result<(), ValidationError> {
    if pars.is_empty() || pars.len() > MAX_HOLES {
        let mut err = ValidationError::new("holes_count");
        err.message = Some(format!("A course needs between 1 and {MAX_HOLES} holes (got {})", pars.len()).into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_measured_after_trimming() {
        assert!(validate_club_label("  7i ").is_ok());
        assert!(validate_club_label("   ").is_err());
        assert!(validate_mental_label(" a ").is_err());
        assert!(validate_mental_label("Breathe").is_ok());
        assert!(validate_mental_label(&"x".repeat(41)).is_err());
    }

    #[test]
    fn pars_need_at_least_one_hole() {
        assert!(validate_pars(&[]).is_err());
        assert!(validate_pars(&[4; 18]).is_ok());
        assert!(validate_pars(&[4; 37]).is_err());
    }
}
