use crate::error::FlowError;

/// Trimmed recipe text, or `InvalidInput` when nothing is left
pub fn process(text: &str) -> Result<String, FlowError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FlowError::InvalidInput(
            "Recipe text is required".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims() {
        assert_eq!(process("\n  2 eggs, whisk  \n").unwrap(), "2 eggs, whisk");
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(process(""), Err(FlowError::InvalidInput(_))));
        assert!(matches!(process(" \t\n"), Err(FlowError::InvalidInput(_))));
    }
}
