//! Codebook loader.
//!
//! A JSON array of dimension definitions:
//!
//! ```json
//! [{"id": "D1", "name": "Gender", "type": "categorical",
//!   "options": {"1": "Female", "2": "Male", "9": "No Response"},
//!   "missing_codes": ["9"]}]
//! ```

use std::io::Read;
use std::path::Path;

use odi_core::errors::LoadError;
use odi_core::models::{Codebook, Dimension};
use tracing::info;

use super::{open, read_json_array};

pub fn load_codebook_file(path: &Path) -> Result<Codebook, LoadError> {
    let codebook = load_codebook(open(path)?)?;
    info!(
        path = %path.display(),
        dimensions = codebook.dimensions().len(),
        "loaded codebook"
    );
    Ok(codebook)
}

/// The codebook must list at least one dimension, and every categorical
/// dimension needs an option map.
pub fn load_codebook<R: Read>(reader: R) -> Result<Codebook, LoadError> {
    let dimensions: Vec<Dimension> = read_json_array(reader)?;
    if dimensions.is_empty() {
        return Err(LoadError::Empty {
            what: "codebook dimensions",
        });
    }
    for (index, dimension) in dimensions.iter().enumerate() {
        let has_options = dimension.options.as_ref().is_some_and(|o| !o.is_empty());
        if dimension.is_categorical() && !has_options {
            return Err(LoadError::InvalidRecord {
                index: index + 1,
                message: format!("categorical dimension {} must have options", dimension.name),
            });
        }
    }
    Ok(Codebook::new(dimensions))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use odi_core::models::DimensionKind;

    use super::*;

    #[test]
    fn test_load_dimensions() {
        let codebook = load_codebook(Cursor::new(
            r#"[
                {"id": "D1", "name": "Gender", "type": "categorical",
                 "options": {"1": "Female", "2": "Male", "9": "No Response"},
                 "missing_codes": ["9"]},
                {"id": "D4", "name": "Comments", "type": "text"},
                {"id": "D5", "name": "Age", "type": "numeric"}
            ]"#,
        ))
        .unwrap();
        assert_eq!(codebook.dimensions().len(), 3);
        let gender = codebook.dimension("Gender").unwrap();
        assert_eq!(gender.label("2"), Some("Male"));
        assert!(gender.is_missing_code("9"));
        assert_eq!(codebook.dimension("Age").unwrap().kind, DimensionKind::Other);
        assert_eq!(codebook.categorical().count(), 1);
    }

    #[test]
    fn test_empty_codebook() {
        assert!(matches!(
            load_codebook(Cursor::new("[]")),
            Err(LoadError::Empty { .. })
        ));
    }

    #[test]
    fn test_categorical_without_options() {
        let err = load_codebook(Cursor::new(
            r#"[{"id": "D2", "name": "Region", "type": "categorical"}]"#,
        ))
        .unwrap_err();
        assert!(matches!(err, LoadError::InvalidRecord { index: 1, .. }));
    }
}
