use std::path::PathBuf;

use thiserror::Error;

use crate::literal::ParseError;
use crate::FormError;

/// Unified error type covering form building, configuration, and I/O.
///
/// The render-stack builder and the rule exporter never fail; this type only
/// surfaces from the layers around them, like
/// [`RendererConfig::from_file()`](crate::RendererConfig::from_file) and
/// [`Renderer::checked()`](crate::Renderer::checked).
#[derive(Debug, Error)]
pub enum NestrapsError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid renderer configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("template '{}' does not exist or is not readable", path.display())]
    TemplateNotFound { path: PathBuf },
}
