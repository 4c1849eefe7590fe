pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No <{tag}> tag found")]
    RootNotFound { tag: String },

    #[error("No closing </{tag}> tag found")]
    RootCloseNotFound { tag: String },

    #[error("<{element}> is missing the `{attribute}` attribute")]
    MissingAttribute { element: String, attribute: String },

    #[error("<{element}> has an invalid `{attribute}` value: {value:?}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    #[error("Could not find top-level group {required} (only {found} resolved)")]
    BoundaryNotFound { required: usize, found: usize },

    #[error("Scanner and tree disagree on the cut offset (scan={scan}, tree={tree})")]
    LocatorMismatch { scan: usize, tree: usize },

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid configuration JSON: {0}")]
    ConfigJson(#[from] serde_json::Error),
}

impl Error {
    /// The document does not have the shape the trimmer expects (root tag or a required
    /// attribute is missing or unusable).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::RootNotFound { .. }
                | Error::RootCloseNotFound { .. }
                | Error::MissingAttribute { .. }
                | Error::InvalidAttribute { .. }
        )
    }

    pub(crate) fn missing_attribute(element: &str, attribute: &str) -> Self {
        Error::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub(crate) fn invalid_attribute(element: &str, attribute: &str, value: &str) -> Self {
        Error::InvalidAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }
}
