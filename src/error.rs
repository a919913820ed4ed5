#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("SVG parse error: {0}")]
    SvgParse(String),
    #[error("Path element not found: {0}")]
    PathNotFound(String),
    #[error("Element <{element}> has no \"{attribute}\" attribute")]
    MissingAttribute { element: String, attribute: String },
    #[error("Invalid viewBox: {0}")]
    ViewBox(String),
    #[error("SVG path parse error: {0}")]
    PathParse(String),
}
